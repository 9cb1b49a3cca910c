use crate::error::DatevError;
use crate::layout::schema::LayoutDef;
use crate::layout::Layout;
use crate::model::ReportKind;

const ENTWICKLUNGSUEBERSICHT_JSON: &str =
    include_str!("../../../../layouts/entwicklungsuebersicht.json");
const SUSA_JSON: &str = include_str!("../../../../layouts/susa.json");

/// The layout definition shipped for a report kind.
pub fn builtin_def(kind: ReportKind) -> Result<LayoutDef, DatevError> {
    let json = match kind {
        ReportKind::Entwicklungsuebersicht => ENTWICKLUNGSUEBERSICHT_JSON,
        ReportKind::Susa => SUSA_JSON,
    };
    let def: LayoutDef = serde_json::from_str(json)?;
    Ok(def)
}

/// Load and compile the built-in layout for a report kind.
pub fn load_builtin(kind: ReportKind) -> Result<Layout, DatevError> {
    Layout::compile(&builtin_def(kind)?)
}
