//! Detection events
//!
//! Alerts from the AI analyst keep their full JSON body (it is scanned
//! for embedded addresses and may be exported). Only `event.start`,
//! `event.end` and `related.ip` are interpreted.

use std::collections::BTreeSet;

use serde_json::Value;

use crate::logic::address::extract_addresses;

/// Inclusive timestamp range, compared lexicographically
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: String,
    pub end: String,
}

impl TimeWindow {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        Self { start: start.into(), end: end.into() }
    }
}

/// What one event asks the correlator to look for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationTarget {
    pub window: TimeWindow,
    /// Plaintext source address (`related.ip[0]`)
    pub source: String,
    /// Plaintext destinations (`related.ip[1..]`), may be empty
    pub destinations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionEvent {
    body: Value,
}

impl DetectionEvent {
    pub fn new(body: Value) -> Self {
        Self { body }
    }

    pub fn into_value(self) -> Value {
        self.body
    }

    /// String entries of `related.ip`, in order
    pub fn related_ips(&self) -> Vec<&str> {
        self.body
            .pointer("/related/ip")
            .and_then(Value::as_array)
            .map(|ips| ips.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    /// Append addresses found elsewhere in the body to `related.ip`.
    ///
    /// Returns how many were added. Events without a `related.ip` list are
    /// left untouched.
    pub fn augment_addresses(&mut self) -> usize {
        let exclude: BTreeSet<String> =
            self.related_ips().into_iter().map(str::to_string).collect();
        let found = extract_addresses(&self.body, &exclude);

        match self.body.pointer_mut("/related/ip").and_then(Value::as_array_mut) {
            Some(ips) => {
                let added = found.len();
                ips.extend(found.into_iter().map(Value::String));
                added
            }
            None => 0,
        }
    }

    /// Event window with `suffix_len` characters stripped from both ends
    pub fn window(&self, suffix_len: usize) -> Option<TimeWindow> {
        let start = first_timestamp(self.body.pointer("/event/start")?)?;
        let end = first_timestamp(self.body.pointer("/event/end")?)?;
        Some(TimeWindow::new(
            truncate_suffix(start, suffix_len),
            truncate_suffix(end, suffix_len),
        ))
    }

    /// `None` when the event has no window or `related.ip[0]` is not an
    /// address string. Non-string destinations are dropped.
    pub fn target(&self, suffix_len: usize) -> Option<CorrelationTarget> {
        let window = self.window(suffix_len)?;
        let ips = self.body.pointer("/related/ip")?.as_array()?;
        let (source, destinations) = ips.split_first()?;

        Some(CorrelationTarget {
            window,
            source: source.as_str()?.to_string(),
            destinations: destinations
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
        })
    }
}

/// First element of a timestamp list; a bare string is taken whole
fn first_timestamp(value: &Value) -> Option<&str> {
    match value {
        Value::Array(items) => items.first().and_then(Value::as_str),
        Value::String(s) => Some(s.as_str()),
        _ => None,
    }
}

/// Drop the last `n` characters. Shorter input yields "".
pub fn truncate_suffix(value: &str, n: usize) -> &str {
    let count = value.chars().count();
    if n == 0 {
        return value;
    }
    if count <= n {
        return "";
    }
    match value.char_indices().nth(count - n) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> DetectionEvent {
        DetectionEvent::new(json!({
            "event": {
                "start": ["2024-03-01T10:00:00.000+0000"],
                "end": ["2024-03-01T10:05:00.000+0000"]
            },
            "related": {"ip": ["10.0.0.5", "10.0.0.9"]},
            "summary": {"details": [{"device": "10.0.0.7"}, {"endpoint": "10.0.0.7:22"}]},
            "triggered_by": "10.0.0.5"
        }))
    }

    #[test]
    fn test_truncate_suffix() {
        assert_eq!(truncate_suffix("2024-03-01T10:00:00.000+0000", 5), "2024-03-01T10:00:00.000");
        assert_eq!(truncate_suffix("abc", 5), "");
        assert_eq!(truncate_suffix("abcde", 5), "");
        assert_eq!(truncate_suffix("abc", 0), "abc");
    }

    #[test]
    fn test_window_strips_suffix() {
        let window = sample().window(5).unwrap();
        assert_eq!(window.start, "2024-03-01T10:00:00.000");
        assert_eq!(window.end, "2024-03-01T10:05:00.000");
    }

    #[test]
    fn test_augment_appends_new_addresses_once() {
        let mut event = sample();
        assert_eq!(event.augment_addresses(), 1);
        assert_eq!(event.related_ips(), vec!["10.0.0.5", "10.0.0.9", "10.0.0.7"]);

        // Second pass finds nothing new
        assert_eq!(event.augment_addresses(), 0);
    }

    #[test]
    fn test_target_splits_source_and_destinations() {
        let target = sample().target(5).unwrap();
        assert_eq!(target.source, "10.0.0.5");
        assert_eq!(target.destinations, vec!["10.0.0.9".to_string()]);
    }

    #[test]
    fn test_target_requires_addresses_and_window() {
        let no_ips = DetectionEvent::new(json!({
            "event": {"start": ["a"], "end": ["b"]},
            "related": {"ip": []}
        }));
        assert!(no_ips.target(0).is_none());

        let no_window = DetectionEvent::new(json!({"related": {"ip": ["1.2.3.4"]}}));
        assert!(no_window.target(5).is_none());
    }

    #[test]
    fn test_non_string_source_is_not_replaced() {
        let event = DetectionEvent::new(json!({
            "event": {"start": ["a"], "end": ["b"]},
            "related": {"ip": [null, "10.0.0.9"]}
        }));
        assert!(event.target(0).is_none());
    }

    #[test]
    fn test_non_string_destinations_are_dropped() {
        let event = DetectionEvent::new(json!({
            "event": {"start": ["a"], "end": ["b"]},
            "related": {"ip": ["10.0.0.5", 42, "10.0.0.9"]}
        }));
        let target = event.target(0).unwrap();
        assert_eq!(target.source, "10.0.0.5");
        assert_eq!(target.destinations, vec!["10.0.0.9".to_string()]);
    }

    #[test]
    fn test_missing_related_is_not_created() {
        let mut event = DetectionEvent::new(json!({"note": "1.2.3.4"}));
        assert_eq!(event.augment_addresses(), 0);
        assert!(event.related_ips().is_empty());
        assert!(event.into_value().get("related").is_none());
    }
}
