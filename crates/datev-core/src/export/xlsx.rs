use rust_decimal::prelude::ToPrimitive;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;

use crate::error::DatevError;
use crate::export::ensure_parent;
use crate::model::{CellValue, ExtractionResult};

/// Write the result as a single-sheet Excel workbook mirroring the CSV.
/// Amounts become numeric cells, "not a number" cells stay empty.
pub fn write_xlsx(result: &ExtractionResult, path: &Path) -> Result<(), DatevError> {
    ensure_parent(path)?;

    let header_format = Format::new().set_bold();
    let amount_format = Format::new().set_num_format("#,##0.00");

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(result.kind.to_string())?;

    for (col, column) in result.columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, column.name.as_str(), &header_format)?;
    }

    for (idx, row) in result.rows.iter().enumerate() {
        let r = idx as u32 + 1;
        for (col, cell) in row.cells.iter().enumerate() {
            let c = col as u16;
            match cell {
                CellValue::Text(text) => {
                    sheet.write_string(r, c, text.as_str())?;
                }
                CellValue::Amount(value) => match value.to_f64() {
                    Some(number) => {
                        sheet.write_number_with_format(r, c, number, &amount_format)?;
                    }
                    None => {
                        sheet.write_string(r, c, cell.to_string())?;
                    }
                },
                CellValue::Empty => {}
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}
