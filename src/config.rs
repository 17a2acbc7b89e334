//! Configuration module

use std::env;
use std::path::{Path, PathBuf};

use crate::constants::{
    DEFAULT_DATA_DIR, DEFAULT_TIMESTAMP_SUFFIX_LEN, EVENTS_SUFFIX, RAW_SUFFIX,
};

/// How `source_ip` / `dest_ip` are stored in the raw flow dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RawAddressForm {
    /// Already SHA-256 fingerprints, compared as stored
    Fingerprint,
    /// Plaintext, fingerprinted before every comparison
    Plaintext,
}

impl RawAddressForm {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fingerprint" | "hashed" | "sha256" => Some(RawAddressForm::Fingerprint),
            "plaintext" | "plain" => Some(RawAddressForm::Plaintext),
            _ => None,
        }
    }
}

/// Labeler configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding input JSONL and output CSV files
    pub data_dir: PathBuf,

    /// Characters stripped from the end of detection timestamps
    pub timestamp_suffix_len: usize,

    /// Representation of addresses in the raw dataset
    pub raw_addresses: RawAddressForm,

    /// Also write augmented detection events as `<split>_ssh_ai.csv`
    pub export_events_csv: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            timestamp_suffix_len: DEFAULT_TIMESTAMP_SUFFIX_LEN,
            raw_addresses: RawAddressForm::Fingerprint,
            export_events_csv: false,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            data_dir: env::var("LABELER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),

            timestamp_suffix_len: env::var("LABELER_TIMESTAMP_SUFFIX_LEN")
                .ok()
                .and_then(|n| n.parse().ok())
                .unwrap_or(defaults.timestamp_suffix_len),

            raw_addresses: env::var("LABELER_RAW_ADDRESSES")
                .ok()
                .and_then(|s| RawAddressForm::parse(&s))
                .unwrap_or(defaults.raw_addresses),

            export_events_csv: env::var("LABELER_EXPORT_EVENTS_CSV")
                .map(|s| s.to_lowercase() == "true" || s == "1")
                .unwrap_or(defaults.export_events_csv),
        }
    }

    /// File locations for one dataset split
    pub fn split_paths(&self, split: &str) -> SplitPaths {
        SplitPaths::new(&self.data_dir, split)
    }
}

/// Input and output files of one split (`train`, `test`)
#[derive(Debug, Clone)]
pub struct SplitPaths {
    pub name: String,
    pub raw_json: PathBuf,
    pub events_json: PathBuf,
    pub raw_csv: PathBuf,
    pub events_csv: PathBuf,
}

impl SplitPaths {
    pub fn new(dir: &Path, split: &str) -> Self {
        Self {
            name: split.to_string(),
            raw_json: dir.join(format!("{}{}.json", split, RAW_SUFFIX)),
            events_json: dir.join(format!("{}{}.json", split, EVENTS_SUFFIX)),
            raw_csv: dir.join(format!("{}{}.csv", split, RAW_SUFFIX)),
            events_csv: dir.join(format!("{}{}.csv", split, EVENTS_SUFFIX)),
        }
    }
}
