//! Detected-attack correlation
//!
//! Each detection event names a source address, optional destinations and
//! a time window. Raw flows from that source inside the window (and to one
//! of the destinations, when any are known) are attack traffic. A flow that
//! is positive stays positive whatever later events say.

use std::path::Path;

use super::event::{CorrelationTarget, DetectionEvent};
use super::index::FlowIndex;
use crate::config::{Config, RawAddressForm};
use crate::constants::{DEFAULT_TIMESTAMP_SUFFIX_LEN, DEST_FIELD, SOURCE_FIELD, TIMESTAMP_FIELD};
use crate::error::{LabelError, LabelResult};
use crate::logic::dataset::{self, FlowTable, LabelStats};
use crate::logic::fingerprint::fingerprint;

/// Outcome of one correlation pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CorrelationStats {
    pub events: usize,
    pub skipped_events: usize,
    /// Addresses appended to `related.ip` from event bodies
    pub added_addresses: usize,
    /// Flows that became positive during this pass
    pub promoted: usize,
    /// Label counts of the table once the pass is done
    pub labels: LabelStats,
}

pub struct Correlator {
    timestamp_suffix_len: usize,
    raw_addresses: RawAddressForm,
}

impl Default for Correlator {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_SUFFIX_LEN, RawAddressForm::Fingerprint)
    }
}

impl Correlator {
    pub fn new(timestamp_suffix_len: usize, raw_addresses: RawAddressForm) -> Self {
        Self { timestamp_suffix_len, raw_addresses }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.timestamp_suffix_len, config.raw_addresses)
    }

    /// Extend every event's `related.ip` with addresses from its body
    pub fn augment_events(&self, events: &mut [DetectionEvent]) -> usize {
        events.iter_mut().map(DetectionEvent::augment_addresses).sum()
    }

    /// Mark matching flows positive, then settle the rest as negative
    pub fn correlate(&self, events: &mut [DetectionEvent], table: &mut FlowTable) -> CorrelationStats {
        let mut stats = CorrelationStats {
            events: events.len(),
            added_addresses: self.augment_events(events),
            ..Default::default()
        };

        let index = FlowIndex::build(table, self.raw_addresses);
        let records = table.records_mut();

        for (i, event) in events.iter().enumerate() {
            let target = match event.target(self.timestamp_suffix_len) {
                Some(target) => target,
                None => {
                    log::warn!("Detection event #{} has no usable window or related.ip, skipped", i);
                    stats.skipped_events += 1;
                    continue;
                }
            };

            for row in matching_rows(&index, &target) {
                let label = &mut records[row].label;
                if !label.is_positive() {
                    label.promote();
                    stats.promoted += 1;
                }
            }
        }

        table.resolve_unlabeled();
        stats.labels = table.stats();
        stats
    }

    /// Correlate `events` against a labeled CSV and write the merged labels.
    ///
    /// `input` and `output` may be the same file.
    pub fn label_file(
        &self,
        events: &mut [DetectionEvent],
        input: &Path,
        output: &Path,
    ) -> LabelResult<CorrelationStats> {
        let mut table = dataset::read_csv(input)?;
        require_columns(&table, input)?;

        let stats = self.correlate(events, &mut table);
        dataset::write_table(output, &table)?;

        log::info!(
            "Detected attacks in {:?}: {} events ({} skipped), {} flows promoted, {} addresses added",
            input,
            stats.events,
            stats.skipped_events,
            stats.promoted,
            stats.added_addresses
        );
        Ok(stats)
    }
}

/// Rows matched by a target, possibly with repeats across destinations
fn matching_rows(index: &FlowIndex, target: &CorrelationTarget) -> Vec<usize> {
    let source = fingerprint(&target.source);
    let flows = index.in_window(&source, &target.window);

    if target.destinations.is_empty() {
        return flows.iter().map(|f| f.row).collect();
    }

    let mut rows = Vec::new();
    for dest in &target.destinations {
        let dest = fingerprint(dest);
        rows.extend(
            flows
                .iter()
                .filter(|f| f.dest.as_deref() == Some(dest.as_str()))
                .map(|f| f.row),
        );
    }
    rows
}

fn require_columns(table: &FlowTable, path: &Path) -> LabelResult<()> {
    if table.is_empty() {
        return Ok(());
    }
    for column in [TIMESTAMP_FIELD, SOURCE_FIELD, DEST_FIELD] {
        if !table.has_column(column) {
            return Err(LabelError::MissingColumn {
                path: path.to_path_buf(),
                column: column.to_string(),
            });
        }
    }
    Ok(())
}
