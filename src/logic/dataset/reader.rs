//! Dataset readers
//!
//! Newline-delimited JSON comes in two flavours: raw flow dumps, where a
//! corrupt line means the capture is unusable, and detection event dumps,
//! where a bad line is logged and skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::record::{FlowRecord, FlowTable, Label};
use crate::constants::LABEL_FIELD;
use crate::error::{LabelError, LabelResult};

fn open_lines(path: &Path) -> LabelResult<impl Iterator<Item = (usize, std::io::Result<String>)>> {
    let file = File::open(path).map_err(|e| LabelError::io(path, e))?;
    Ok(BufReader::new(file).lines().enumerate().map(|(idx, line)| (idx + 1, line)))
}

/// Decode every non-blank line, failing on the first malformed one
pub fn read_jsonl_strict<T: DeserializeOwned>(path: &Path) -> LabelResult<Vec<T>> {
    let mut items = Vec::new();

    for (line_no, line) in open_lines(path)? {
        let line = line.map_err(|e| LabelError::io(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let item = serde_json::from_str(trimmed).map_err(|source| LabelError::MalformedRecord {
            path: path.to_path_buf(),
            line: line_no,
            source,
        })?;
        items.push(item);
    }

    Ok(items)
}

/// Decode every non-blank line, logging and skipping malformed ones
pub fn read_jsonl_lenient(path: &Path) -> LabelResult<Vec<Value>> {
    let mut items = Vec::new();
    let mut skipped = 0usize;

    for (line_no, line) in open_lines(path)? {
        let line = line.map_err(|e| LabelError::io(path, e))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        match serde_json::from_str::<Value>(trimmed) {
            Ok(value) => items.push(value),
            Err(e) => {
                skipped += 1;
                log::warn!("Error decoding JSON on line {}: {} - {}", line_no, trimmed, e);
            }
        }
    }

    if skipped > 0 {
        log::warn!("Skipped {} malformed lines in {:?}", skipped, path);
    }
    Ok(items)
}

/// Raw flow records from JSONL; any malformed line aborts
pub fn read_flow_records(path: &Path) -> LabelResult<Vec<FlowRecord>> {
    let objects: Vec<Map<String, Value>> = read_jsonl_strict(path)?;
    log::info!("Loaded {} raw records from {:?}", objects.len(), path);
    Ok(objects.into_iter().map(FlowRecord::new).collect())
}

/// Load a labeled CSV back into a table.
///
/// Cells are kept as strings. A missing `label` column leaves every record
/// unlabeled.
pub fn read_csv(path: &Path) -> LabelResult<FlowTable> {
    let mut rdr = csv::Reader::from_path(path).map_err(|e| LabelError::csv(path, e))?;

    let headers: Vec<String> = rdr
        .headers()
        .map_err(|e| LabelError::csv(path, e))?
        .iter()
        .map(|s| s.to_string())
        .collect();

    let label_idx = headers.iter().position(|h| h == LABEL_FIELD);
    let columns: Vec<String> = headers.iter().filter(|h| *h != LABEL_FIELD).cloned().collect();

    let mut records = Vec::new();
    for result in rdr.records() {
        let row = result.map_err(|e| LabelError::csv(path, e))?;

        let mut fields = Map::new();
        let mut label = Label::Unlabeled;
        for (i, cell) in row.iter().enumerate() {
            if Some(i) == label_idx {
                label = Label::parse_cell(cell)?;
            } else if let Some(header) = headers.get(i) {
                fields.insert(header.clone(), Value::String(cell.to_string()));
            }
        }
        records.push(FlowRecord::with_label(fields, label));
    }

    log::info!("Loaded {} labeled records from {:?}", records.len(), path);
    Ok(FlowTable::from_parts(columns, records))
}
