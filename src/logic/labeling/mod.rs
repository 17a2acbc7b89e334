//! Labeling Module
//!
//! Two passes over each raw flow dataset:
//! - `simulated` - attacker/victim rule for the lab exercises
//! - `correlator` - detection events (AI analyst) matched by window + address
//!
//! ## Structure
//! - `event.rs` - DetectionEvent, TimeWindow, CorrelationTarget
//! - `index.rs` - FlowIndex (source fingerprint → time-sorted flows)

pub mod event;
pub mod index;
pub mod simulated;
pub mod correlator;


use std::borrow::Cow;

use crate::config::RawAddressForm;
use crate::logic::fingerprint::fingerprint;

pub use correlator::{CorrelationStats, Correlator};
pub use event::DetectionEvent;
pub use simulated::SimulatedAttackLabeler;

/// Raw address value in fingerprint form
pub(crate) fn raw_fingerprint(form: RawAddressForm, value: &str) -> Cow<'_, str> {
    match form {
        RawAddressForm::Fingerprint => Cow::Borrowed(value),
        RawAddressForm::Plaintext => Cow::Owned(fingerprint(value)),
    }
}
