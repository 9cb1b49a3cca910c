use datev_core::error::DatevError;
use datev_core::layout::builtin::load_builtin;
use datev_core::layout::{load_layout, Layout};
use datev_core::model::{ColumnType, ReportKind};
use datev_core::parsing::amount::SignConvention;
use std::path::Path;

pub fn list() -> Result<(), DatevError> {
    println!("Built-in layouts:\n");
    for kind in ReportKind::ALL {
        let layout = load_builtin(kind)?;
        let pages = if kind.spans_pages() {
            "page range"
        } else {
            "single page"
        };
        println!(
            "  {:<24} {} ({}, {} columns)",
            kind.key(),
            layout.name,
            pages,
            layout.columns.len()
        );
        println!();
    }
    Ok(())
}

pub fn explain(kind: &str) -> Result<(), DatevError> {
    let kind = ReportKind::from_str_loose(kind).ok_or_else(|| {
        DatevError::LayoutInvalid(format!(
            "unknown report kind '{kind}' (expected entwicklungsuebersicht or susa)"
        ))
    })?;
    let layout = load_builtin(kind)?;
    print!("{}", describe(&layout));
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), DatevError> {
    let layout = load_layout(file)?;
    println!(
        "Valid layout: {} ({}, {} columns, {} skip rules)",
        layout.name,
        layout.kind,
        layout.columns.len(),
        layout.noise.len()
    );

    if layout.noise.is_empty() {
        println!("  note: no skip rules, every line with a word becomes a row");
    }
    Ok(())
}

fn describe(layout: &Layout) -> String {
    let mut out = String::new();
    out.push_str(&format!("{} ({})\n\n", layout.name, layout.kind.key()));

    let pages = if layout.kind.spans_pages() {
        "every page from the first to the last one"
    } else {
        "the first page"
    };
    out.push_str(&format!(
        "Reads {} whose text matches /{}/.\n",
        pages,
        layout.title.as_str()
    ));
    out.push_str(&format!(
        "Words within {}pt of each other vertically form one line; a word belongs \
         to the column containing its {} edge.\n",
        layout.line_tolerance,
        format!("{:?}", layout.anchor).to_lowercase()
    ));
    if layout.period_header {
        out.push_str("Amount columns are renamed after the month header on the page.\n");
    }
    out.push('\n');

    let name_width = layout
        .columns
        .iter()
        .map(|c| c.name.len())
        .max()
        .unwrap_or(10)
        .max("Column".len());

    out.push_str(&format!(
        "  {:<width$}  {:>7}  {:>7}  Type\n",
        "Column",
        "From",
        "To",
        width = name_width
    ));
    out.push_str(&format!("  {}\n", "-".repeat(name_width + 30)));
    for column in &layout.columns {
        let kind = match (column.column_type, column.sign) {
            (ColumnType::Text, _) => "text",
            (ColumnType::Amount, SignConvention::Plain) => "amount",
            (ColumnType::Amount, SignConvention::SollHaben) => "amount (S/H)",
        };
        out.push_str(&format!(
            "  {:<width$}  {:>7.1}  {:>7.1}  {}\n",
            column.name,
            column.start,
            column.end,
            kind,
            width = name_width
        ));
    }

    if !layout.noise.is_empty() {
        out.push_str("\nSkipped lines:\n");
        for rule in &layout.noise {
            out.push_str(&format!("  - {}\n", rule.describe(&layout.columns)));
        }
    }
    out
}
