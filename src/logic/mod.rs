//! Logic Module - Labeling engines
//!
//! ## Layout
//! - `address` / `fingerprint` - leaf helpers shared by both passes
//! - `dataset/` - flow records, JSONL/CSV I/O
//! - `labeling/` - simulated-attack rule + detection event correlator
//! - `pipeline` - train/test driver

pub mod address;
pub mod fingerprint;
pub mod dataset;
pub mod labeling;
pub mod pipeline;
