use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::error::DatevError;
use crate::export::ensure_parent;
use crate::model::ExtractionResult;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Write the result as `;`-separated UTF-8 with a byte order mark, so that
/// Excel with German locale opens umlauts and decimal commas correctly.
pub fn write_csv(result: &ExtractionResult, path: &Path) -> Result<(), DatevError> {
    ensure_parent(path)?;
    let file = File::create(path)?;
    write_csv_to(result, file)
}

pub fn write_csv_to<W: Write>(result: &ExtractionResult, mut out: W) -> Result<(), DatevError> {
    out.write_all(UTF8_BOM)?;

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_writer(out);

    writer.write_record(result.columns.iter().map(|c| c.name.as_str()))?;
    for row in &result.rows {
        writer.write_record(row.cells.iter().map(|cell| cell.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
