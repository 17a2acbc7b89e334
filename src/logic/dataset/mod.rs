//! Dataset Module - Flow records in, labeled CSV out
//!
//! Reads raw flow dumps and detection events (JSONL), keeps the flow table
//! in memory while it is labeled, and writes it back as CSV for training.

pub mod record;
pub mod reader;
pub mod writer;
pub mod export;


pub use record::{FlowRecord, FlowTable, Label, LabelStats};
pub use reader::{read_csv, read_flow_records, read_jsonl_lenient};
pub use writer::write_table;
