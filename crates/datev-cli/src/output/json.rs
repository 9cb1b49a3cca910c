use datev_core::error::DatevError;
use datev_core::model::ExtractionResult;

pub fn print(result: &ExtractionResult) -> Result<(), DatevError> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}
