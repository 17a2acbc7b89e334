//! Simulated-attack labeling
//!
//! The lab exercises ran between one attacker host and one victim host,
//! so a flow is positive exactly when it goes from the attacker to the
//! victim.

use std::path::Path;

use super::raw_fingerprint;
use crate::config::{Config, RawAddressForm};
use crate::constants::{ATTACKER_FINGERPRINT, DEST_FIELD, SOURCE_FIELD, VICTIM_FINGERPRINT};
use crate::error::LabelResult;
use crate::logic::dataset::{self, FlowRecord, FlowTable, Label, LabelStats};
use crate::logic::fingerprint::is_fingerprint;

pub struct SimulatedAttackLabeler {
    attacker: String,
    victim: String,
    raw_addresses: RawAddressForm,
}

impl Default for SimulatedAttackLabeler {
    fn default() -> Self {
        Self::new(ATTACKER_FINGERPRINT, VICTIM_FINGERPRINT, RawAddressForm::Fingerprint)
    }
}

impl SimulatedAttackLabeler {
    pub fn new(attacker: &str, victim: &str, raw_addresses: RawAddressForm) -> Self {
        Self {
            attacker: attacker.to_string(),
            victim: victim.to_string(),
            raw_addresses,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            raw_addresses: config.raw_addresses,
            ..Self::default()
        }
    }

    /// Attacker → victim flow. Missing address fields never match.
    pub fn is_attack(&self, record: &FlowRecord) -> bool {
        let matches = |field: &str, expected: &str| {
            record
                .str_field(field)
                .map(|value| raw_fingerprint(self.raw_addresses, value) == expected)
                .unwrap_or(false)
        };
        matches(SOURCE_FIELD, &self.attacker) && matches(DEST_FIELD, &self.victim)
    }

    /// Give every record a definite label
    pub fn label(&self, records: Vec<FlowRecord>) -> FlowTable {
        let mut table = FlowTable::new(records);
        for record in table.records_mut() {
            record.label = Label::from_match(self.is_attack(record));
        }
        table
    }

    /// Label a raw JSONL dump and write it as CSV, overwriting `output`.
    ///
    /// A malformed input line aborts before anything is written.
    pub fn label_file(&self, input: &Path, output: &Path) -> LabelResult<LabelStats> {
        let records = dataset::read_flow_records(input)?;
        self.warn_on_address_form(&records, input);

        let table = self.label(records);
        dataset::write_table(output, &table)?;

        let stats = table.stats();
        log::info!(
            "Simulated attacks in {:?}: {} of {} records",
            input,
            stats.positive,
            stats.total
        );
        Ok(stats)
    }

    fn warn_on_address_form(&self, records: &[FlowRecord], input: &Path) {
        if self.raw_addresses != RawAddressForm::Fingerprint {
            return;
        }
        let plaintext = records
            .iter()
            .filter(|r| r.str_field(SOURCE_FIELD).map_or(false, |s| !is_fingerprint(s)))
            .count();
        if plaintext > 0 {
            log::warn!(
                "{} records in {:?} have a source_ip that is not a fingerprint; \
                 set LABELER_RAW_ADDRESSES=plaintext if the capture is not hashed",
                plaintext,
                input
            );
        }
    }
}
