//! Flow index for window lookups
//!
//! Records are grouped by source fingerprint and each group is sorted by
//! timestamp, so one event costs a hash lookup plus two binary searches
//! instead of a scan over the whole table.

use std::collections::HashMap;

use super::event::TimeWindow;
use super::raw_fingerprint;
use crate::config::RawAddressForm;
use crate::constants::{DEST_FIELD, SOURCE_FIELD, TIMESTAMP_FIELD};
use crate::logic::dataset::FlowTable;

/// One indexed record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexedFlow {
    pub timestamp: String,
    /// Destination fingerprint, `None` when the record has no destination
    pub dest: Option<String>,
    /// Position in the table
    pub row: usize,
}

#[derive(Debug, Default)]
pub struct FlowIndex {
    by_source: HashMap<String, Vec<IndexedFlow>>,
}

impl FlowIndex {
    /// Records without a timestamp or source never match and are left out
    pub fn build(table: &FlowTable, form: RawAddressForm) -> Self {
        let mut by_source: HashMap<String, Vec<IndexedFlow>> = HashMap::new();
        let mut indexed = 0;

        for (row, record) in table.records().iter().enumerate() {
            let timestamp = match record.str_field(TIMESTAMP_FIELD) {
                Some(ts) if !ts.is_empty() => ts,
                _ => continue,
            };
            let source = match record.str_field(SOURCE_FIELD) {
                Some(src) if !src.is_empty() => raw_fingerprint(form, src),
                _ => continue,
            };
            let dest = record
                .str_field(DEST_FIELD)
                .filter(|d| !d.is_empty())
                .map(|d| raw_fingerprint(form, d).into_owned());

            by_source.entry(source.into_owned()).or_default().push(IndexedFlow {
                timestamp: timestamp.to_string(),
                dest,
                row,
            });
            indexed += 1;
        }

        for flows in by_source.values_mut() {
            flows.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then(a.row.cmp(&b.row)));
        }

        log::debug!("Indexed {} flows across {} sources", indexed, by_source.len());
        Self { by_source }
    }

    /// Flows from `source` with a timestamp inside `window`
    pub fn in_window(&self, source: &str, window: &TimeWindow) -> &[IndexedFlow] {
        let flows = match self.by_source.get(source) {
            Some(flows) => flows.as_slice(),
            None => return &[],
        };

        let lo = flows.partition_point(|f| f.timestamp.as_str() < window.start.as_str());
        let hi = flows.partition_point(|f| f.timestamp.as_str() <= window.end.as_str());
        if lo >= hi {
            return &[];
        }
        &flows[lo..hi]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logic::dataset::FlowRecord;
    use serde_json::json;

    fn table() -> FlowTable {
        let rows = [
            json!({"@timestamp": "t3", "source_ip": "s1", "dest_ip": "d1"}),
            json!({"@timestamp": "t1", "source_ip": "s1", "dest_ip": "d2"}),
            json!({"@timestamp": "t2", "source_ip": "s2", "dest_ip": "d1"}),
            json!({"@timestamp": "t2", "source_ip": "s1"}),
            json!({"source_ip": "s1", "dest_ip": "d1"}),
        ];
        FlowTable::new(
            rows.iter()
                .map(|r| FlowRecord::new(r.as_object().cloned().unwrap()))
                .collect(),
        )
    }

    #[test]
    fn test_index_skips_records_without_timestamp() {
        let index = FlowIndex::build(&table(), RawAddressForm::Fingerprint);
        let window = TimeWindow::new("", "t9");

        // Row 4 has no timestamp
        let rows: Vec<usize> = index.in_window("s1", &window).iter().map(|f| f.row).collect();
        assert_eq!(rows, vec![1, 3, 0]);
        assert_eq!(index.in_window("s2", &window).len(), 1);
    }

    #[test]
    fn test_window_lookup_is_inclusive_and_sorted() {
        let index = FlowIndex::build(&table(), RawAddressForm::Fingerprint);

        let rows: Vec<usize> = index
            .in_window("s1", &TimeWindow::new("t1", "t2"))
            .iter()
            .map(|f| f.row)
            .collect();
        assert_eq!(rows, vec![1, 3]);

        assert!(index.in_window("s1", &TimeWindow::new("t4", "t9")).is_empty());
        assert!(index.in_window("unknown", &TimeWindow::new("t0", "t9")).is_empty());
        // Inverted window matches nothing
        assert!(index.in_window("s1", &TimeWindow::new("t3", "t1")).is_empty());
    }

    #[test]
    fn test_plaintext_form_fingerprints_raw_values() {
        let index = FlowIndex::build(&table(), RawAddressForm::Plaintext);
        let hashed = crate::logic::fingerprint::fingerprint("s2");

        let flows = index.in_window(&hashed, &TimeWindow::new("t0", "t9"));
        assert_eq!(flows.len(), 1);
        assert_eq!(flows[0].dest, Some(crate::logic::fingerprint::fingerprint("d1")));
    }
}
