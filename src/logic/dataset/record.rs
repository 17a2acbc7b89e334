use serde_json::{Map, Value};

use crate::constants::LABEL_FIELD;
use crate::error::{LabelError, LabelResult};

// ============================================================================
// LABEL
// ============================================================================

/// Training label of one flow record.
///
/// `Unlabeled` is distinct from `Negative`: only an unlabeled record may
/// become negative, and a positive record is never downgraded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Label {
    #[default]
    Unlabeled,
    Negative,
    Positive,
}

impl Label {
    pub fn from_match(matched: bool) -> Self {
        if matched {
            Label::Positive
        } else {
            Label::Negative
        }
    }

    /// Mark as attack traffic
    pub fn promote(&mut self) {
        *self = Label::Positive;
    }

    /// Settle an undecided label as benign
    pub fn resolve(&mut self) {
        if *self == Label::Unlabeled {
            *self = Label::Negative;
        }
    }

    pub fn is_positive(&self) -> bool {
        *self == Label::Positive
    }

    /// Numeric value written to the CSV, `None` while undecided
    pub fn as_value(&self) -> Option<u8> {
        match self {
            Label::Unlabeled => None,
            Label::Negative => Some(0),
            Label::Positive => Some(1),
        }
    }

    /// Parse a CSV `label` cell. Empty and `nan` mean undecided.
    pub fn parse_cell(cell: &str) -> LabelResult<Self> {
        match cell.trim() {
            "" => Ok(Label::Unlabeled),
            "0" | "0.0" => Ok(Label::Negative),
            "1" | "1.0" => Ok(Label::Positive),
            other if other.eq_ignore_ascii_case("nan") => Ok(Label::Unlabeled),
            other => Err(LabelError::InvalidLabel { value: other.to_string() }),
        }
    }
}

// ============================================================================
// FLOW RECORD
// ============================================================================

/// One raw flow observation with its label.
///
/// `fields` keeps every original column in input order, except `label`.
#[derive(Debug, Clone, PartialEq)]
pub struct FlowRecord {
    pub fields: Map<String, Value>,
    pub label: Label,
}

impl FlowRecord {
    pub fn new(mut fields: Map<String, Value>) -> Self {
        fields.remove(LABEL_FIELD);
        Self { fields, label: Label::Unlabeled }
    }

    pub fn with_label(fields: Map<String, Value>, label: Label) -> Self {
        let mut record = Self::new(fields);
        record.label = label;
        record
    }

    /// String value of a field, `None` if absent or not a string
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.fields.get(key).and_then(Value::as_str)
    }
}

// ============================================================================
// FLOW TABLE
// ============================================================================

/// Label counters of one table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelStats {
    pub total: usize,
    pub positive: usize,
    pub negative: usize,
    pub unlabeled: usize,
}

/// In-memory raw dataset: column order plus records
#[derive(Debug, Clone, Default)]
pub struct FlowTable {
    columns: Vec<String>,
    records: Vec<FlowRecord>,
}

impl FlowTable {
    /// Build a table whose columns are the union of record fields, first-seen order
    pub fn new(records: Vec<FlowRecord>) -> Self {
        let columns = collect_columns(records.iter().map(|r| &r.fields));
        Self { columns, records }
    }

    pub fn from_parts(columns: Vec<String>, records: Vec<FlowRecord>) -> Self {
        Self { columns, records }
    }

    /// Data columns, without `label`
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }

    pub fn records(&self) -> &[FlowRecord] {
        &self.records
    }

    pub fn records_mut(&mut self) -> &mut [FlowRecord] {
        &mut self.records
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every undecided record becomes negative
    pub fn resolve_unlabeled(&mut self) {
        for record in &mut self.records {
            record.label.resolve();
        }
    }

    pub fn stats(&self) -> LabelStats {
        let mut stats = LabelStats { total: self.records.len(), ..Default::default() };
        for record in &self.records {
            match record.label {
                Label::Positive => stats.positive += 1,
                Label::Negative => stats.negative += 1,
                Label::Unlabeled => stats.unlabeled += 1,
            }
        }
        stats
    }
}

/// Union of keys across objects, first-seen order, `label` excluded
pub fn collect_columns<'a>(maps: impl Iterator<Item = &'a Map<String, Value>>) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for map in maps {
        for key in map.keys() {
            if key != LABEL_FIELD && !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}
