//! Consume-and-return-remainder access to a decoded JSON object.
//!
//! Every lookup takes the field set by value and hands back the extracted
//! value together with the leftover fields, so a parser threads one set
//! through its lookups and whatever survives becomes record metadata.

use serde_json::{Map, Value};

/// Preference order for the message field.
pub const MESSAGE_KEYS: &[&str] = &["message", "msg", "event", "text", "msgstr"];
/// Preference order for the severity field.
pub const SEVERITY_KEYS: &[&str] = &["severity", "level", "lvl", "levelname"];
/// Preference order for the record-declared time.
pub const TIMESTAMP_KEYS: &[&str] = &["timestamp", "time"];
/// Field that correlates records of one logical operation.
pub const OPERATION_KEYS: &[&str] = &["operation_id"];

/// Fields of one producer object that no parser has consumed yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldSet {
    fields: Map<String, Value>,
}

/// A value taken from a [`FieldSet`], with the key it was found under.
#[derive(Debug, Clone, PartialEq)]
pub struct Taken {
    pub key: String,
    pub value: Value,
}

impl FieldSet {
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Take the first key of `keys` (in preference order) that is present.
    /// Later keys stay in the remainder even when they are also present.
    pub fn take_first(self, keys: &[&str]) -> (Option<Taken>, FieldSet) {
        self.take_first_where(keys, |_| true)
    }

    /// Like [`FieldSet::take_first`], but only keys whose value satisfies
    /// `accept` are eligible.
    pub fn take_first_where<F>(mut self, keys: &[&str], accept: F) -> (Option<Taken>, FieldSet)
    where
        F: Fn(&Value) -> bool,
    {
        let found = keys
            .iter()
            .find(|key| self.fields.get(**key).is_some_and(&accept))
            .copied();

        let taken = found.and_then(|key| {
            self.fields
                .remove(key)
                .map(|value| Taken { key: key.to_string(), value })
        });
        (taken, self)
    }

    /// Return a previously taken value to the set (used when a value turns
    /// out to be unusable and must survive as metadata).
    pub fn restore(mut self, taken: Taken) -> FieldSet {
        self.fields.insert(taken.key, taken.value);
        self
    }

    pub fn into_metadata(self) -> Map<String, Value> {
        self.fields
    }
}

impl From<Map<String, Value>> for FieldSet {
    fn from(fields: Map<String, Value>) -> Self {
        Self::new(fields)
    }
}

/// Render a message value for display: strings verbatim, everything else
/// as compact JSON.
pub fn display_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
