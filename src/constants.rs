//! Central Configuration Constants
//!
//! Single source of truth for all labeling defaults.
//! Runtime overrides are read in `config.rs`.

/// Fingerprint of the simulated attacker address
pub const ATTACKER_FINGERPRINT: &str =
    "1ccdb898890cce841210e3fb0bcc3e7974f069ca89da96625e7b7699bf277165";

/// Fingerprint of the simulated victim address
pub const VICTIM_FINGERPRINT: &str =
    "f4c36b35451f863e37f34989cca218a6e7c40d22f699aafeef3a6d7ae76a75a2";

/// Characters stripped from detection timestamps to match raw precision
pub const DEFAULT_TIMESTAMP_SUFFIX_LEN: usize = 5;

/// Default directory holding inputs and outputs
pub const DEFAULT_DATA_DIR: &str = ".";

/// Dataset splits, processed in this order
pub const SPLITS: &[&str] = &["train", "test"];

/// Raw flow dataset suffix (`<split>_ssh_raw.json`)
pub const RAW_SUFFIX: &str = "_ssh_raw";

/// Detection events dataset suffix (`<split>_ssh_ai.json`)
pub const EVENTS_SUFFIX: &str = "_ssh_ai";

// ============================================
// Raw record columns
// ============================================

pub const TIMESTAMP_FIELD: &str = "@timestamp";
pub const SOURCE_FIELD: &str = "source_ip";
pub const DEST_FIELD: &str = "dest_ip";
pub const LABEL_FIELD: &str = "label";

/// App version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// App name
pub const APP_NAME: &str = "SSH Flow Labeler";
