//! Address Extractor
//!
//! Collects IPv4 literals embedded anywhere in a detection event
//! (free-text summaries, nested device blocks, ...) that are not already
//! listed in `related.ip`.

use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

/// Whole-value dotted quad. Octet range is not checked.
static IPV4_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[0-9]{1,3}\.){3}[0-9]{1,3}$").expect("valid IPv4 pattern"));

/// True when the whole string is a dotted quad (no port, no surrounding text)
pub fn is_ipv4_literal(value: &str) -> bool {
    IPV4_PATTERN.is_match(value)
}

/// Distinct IPv4 string values found in `value`, minus `exclude`.
///
/// Object keys are not inspected.
pub fn extract_addresses(value: &Value, exclude: &BTreeSet<String>) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    collect(value, &mut found);
    found.retain(|ip| !exclude.contains(ip));
    found
}

fn collect(value: &Value, found: &mut BTreeSet<String>) {
    match value {
        Value::Object(map) => {
            for v in map.values() {
                collect(v, found);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect(item, found);
            }
        }
        Value::String(s) if is_ipv4_literal(s) => {
            found.insert(s.clone());
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_rejects_port_and_excluded() {
        let data = json!({"a": "10.0.0.1", "b": {"c": "10.0.0.1:22"}, "d": ["10.0.0.2"]});
        let found = extract_addresses(&data, &set(&["10.0.0.2"]));
        assert_eq!(found, set(&["10.0.0.1"]));
    }

    #[test]
    fn test_ignores_embedded_text_and_keys() {
        let data = json!({
            "summary": "connection from 10.1.1.1 to 10.1.1.2",
            "10.9.9.9": "key only",
            "count": 4
        });
        assert!(extract_addresses(&data, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn test_deep_nesting_and_duplicates() {
        let data = json!({
            "l1": [{"l2": [{"l3": {"ip": "172.16.0.5"}}]}, "172.16.0.5"],
            "other": [null, true, 1.5, "172.16.0.6"]
        });
        let found = extract_addresses(&data, &BTreeSet::new());
        assert_eq!(found, set(&["172.16.0.5", "172.16.0.6"]));
    }

    #[test]
    fn test_octet_range_not_validated() {
        assert!(is_ipv4_literal("999.1.1.1"));
        assert!(!is_ipv4_literal("1.2.3"));
        assert!(!is_ipv4_literal(" 1.2.3.4"));
        assert!(!is_ipv4_literal("1.2.3.4\n"));
    }
}
