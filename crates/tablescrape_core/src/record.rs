use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One data row, keyed by header label.
///
/// Serializes as a flat JSON object of strings. Labels keep the position of
/// their first insertion; re-inserting a label replaces its value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record(Map<String, Value>);

/// Records in source row order.
pub type ExtractionResult = Vec<Record>;

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, label: impl Into<String>, value: impl Into<String>) {
        self.0.insert(label.into(), Value::String(value.into()));
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0.get(label).and_then(Value::as_str)
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (label, value) in iter {
            record.insert(label, value);
        }
        record
    }
}
