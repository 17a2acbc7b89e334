use std::path::Path;

use serde_json::Value;

use super::writer::write_objects;
use crate::error::LabelResult;

/// Write already decoded records (e.g. augmented detection events) as CSV.
/// Returns the number of rows written.
pub fn values_to_csv(values: &[Value], output: &Path) -> LabelResult<usize> {
    let count = write_objects(output, values)?;
    log::info!("Exported {} rows to {:?}", count, output);
    Ok(count)
}
