//! Tabular writers for extraction results.

pub mod delimited;
pub mod xlsx;

use std::path::Path;

use crate::error::DatevError;

fn ensure_parent(path: &Path) -> Result<(), DatevError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}
