use std::borrow::Cow;
use std::path::Path;

use serde_json::{Map, Value};

use super::record::{collect_columns, FlowTable};
use crate::constants::LABEL_FIELD;
use crate::error::{LabelError, LabelResult};

/// Text of one CSV cell. Nested values are written as compact JSON.
pub fn cell_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Bool(b) => Cow::Owned(b.to_string()),
        Value::Number(n) => Cow::Owned(n.to_string()),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// Write the table as CSV, overwriting `path`. `label` is the last column.
pub fn write_table(path: &Path, table: &FlowTable) -> LabelResult<()> {
    let mut wtr = csv::Writer::from_path(path).map_err(|e| LabelError::csv(path, e))?;

    let mut header: Vec<&str> = table.columns().iter().map(String::as_str).collect();
    header.push(LABEL_FIELD);
    wtr.write_record(&header).map_err(|e| LabelError::csv(path, e))?;

    for record in table.records() {
        let mut row: Vec<Cow<'_, str>> = table
            .columns()
            .iter()
            .map(|col| record.fields.get(col).map(cell_text).unwrap_or(Cow::Borrowed("")))
            .collect();

        let label = record.label.as_value().map(|v| v.to_string()).unwrap_or_default();
        row.push(Cow::Owned(label));

        wtr.write_record(row.iter().map(|c| c.as_bytes()))
            .map_err(|e| LabelError::csv(path, e))?;
    }

    wtr.flush().map_err(|e| LabelError::io(path, e))?;

    let stats = table.stats();
    log::info!(
        "Wrote {} records ({} positive) to {:?}",
        stats.total,
        stats.positive,
        path
    );
    Ok(())
}

/// Write JSON objects as CSV rows. Non-object values are skipped.
///
/// Returns the number of rows written.
pub fn write_objects(path: &Path, values: &[Value]) -> LabelResult<usize> {
    let objects: Vec<&Map<String, Value>> = values.iter().filter_map(Value::as_object).collect();
    if objects.len() < values.len() {
        log::warn!("Skipped {} non-object values for {:?}", values.len() - objects.len(), path);
    }

    let mut columns = collect_columns(objects.iter().copied());
    if objects.iter().any(|o| o.contains_key(LABEL_FIELD)) {
        columns.push(LABEL_FIELD.to_string());
    }

    let mut wtr = csv::Writer::from_path(path).map_err(|e| LabelError::csv(path, e))?;
    wtr.write_record(&columns).map_err(|e| LabelError::csv(path, e))?;

    for object in &objects {
        let row = columns
            .iter()
            .map(|col| object.get(col).map(cell_text).unwrap_or(Cow::Borrowed("")));
        wtr.write_record(row.map(|c| c.into_owned()))
            .map_err(|e| LabelError::csv(path, e))?;
    }

    wtr.flush().map_err(|e| LabelError::io(path, e))?;
    Ok(objects.len())
}
