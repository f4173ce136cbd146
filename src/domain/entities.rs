//! Domain entities: core data structures

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::error::{DomainError, DomainResult};

/// One raw row as delivered by a comment source.
pub type Record = Value;

/// A single comment.
///
/// Immutable once constructed. Equality and hashing cover all three fields,
/// so two comments are equal only if id, text and parent agree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct Comment {
    /// Identifier, unset until the comment has been stored
    pub id: Option<i64>,
    /// Opaque text payload
    pub text: Option<String>,
    /// Id of the parent comment, None for roots
    pub parent_id: Option<i64>,
}

impl Comment {
    pub fn new(id: Option<i64>, text: Option<&str>, parent_id: Option<i64>) -> Self {
        Self {
            id,
            text: text.map(str::to_string),
            parent_id,
        }
    }

    /// Shorthand for a stored root comment.
    pub fn root(id: i64, text: &str) -> Self {
        Self::new(Some(id), Some(text), None)
    }

    /// Shorthand for a stored reply to `parent_id`.
    pub fn reply(id: i64, text: &str, parent_id: i64) -> Self {
        Self::new(Some(id), Some(text), Some(parent_id))
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Text payload, empty when unset.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    /// Parse a raw row.
    ///
    /// Accepts either an object with `id`, `text` and `parent_id` keys, or a
    /// positional array `[id, text, parent_id]` (missing trailing columns are
    /// unset). Unknown object keys are ignored.
    pub fn from_record(record: &Record) -> DomainResult<Self> {
        match record {
            Value::Object(_) => serde_json::from_value(record.clone())
                .map_err(|e| DomainError::malformed(format!("{}: {}", e, record))),
            Value::Array(columns) => {
                if columns.len() > 3 {
                    return Err(DomainError::malformed(format!(
                        "expected at most 3 columns, got {}: {}",
                        columns.len(),
                        record
                    )));
                }
                let column = |i: usize| columns.get(i).unwrap_or(&Value::Null);
                Ok(Self {
                    id: int_column("id", column(0))?,
                    text: text_column("text", column(1))?,
                    parent_id: int_column("parent_id", column(2))?,
                })
            }
            other => Err(DomainError::malformed(format!(
                "expected object or array, got: {}",
                other
            ))),
        }
    }

    /// Parse a batch of rows, stopping at the first malformed one.
    pub fn from_records(records: &[Record]) -> DomainResult<Vec<Self>> {
        records.iter().map(Self::from_record).collect()
    }
}

fn int_column(name: &str, value: &Value) -> DomainResult<Option<i64>> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => n
            .as_i64()
            .map(Some)
            .ok_or_else(|| DomainError::malformed(format!("{name} is not an integer: {n}"))),
        other => Err(DomainError::malformed(format!(
            "{name} is not an integer: {other}"
        ))),
    }
}

fn text_column(name: &str, value: &Value) -> DomainResult<Option<String>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s.clone())),
        other => Err(DomainError::malformed(format!(
            "{name} is not a string: {other}"
        ))),
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.id {
            Some(id) => write!(f, "#{}", id)?,
            None => write!(f, "#?")?,
        }
        if let Some(parent) = self.parent_id {
            write!(f, " (parent #{})", parent)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn given_object_record_when_parsing_then_reads_named_fields() {
        let record = json!({"id": 2, "text": "child", "parent_id": 1, "created": "x"});
        let comment = Comment::from_record(&record).unwrap();
        assert_eq!(comment, Comment::reply(2, "child", 1));
    }

    #[test]
    fn given_short_array_record_when_parsing_then_trailing_fields_are_unset() {
        let comment = Comment::from_record(&json!([1, "root"])).unwrap();
        assert_eq!(comment, Comment::root(1, "root"));
        assert!(comment.is_root());
    }

    #[test]
    fn given_scalar_record_when_parsing_then_malformed() {
        let err = Comment::from_record(&json!(42)).unwrap_err();
        assert!(matches!(err, DomainError::MalformedRecord { .. }));
    }

    #[test]
    fn display_includes_parent() {
        assert_eq!(Comment::reply(3, "c", 2).to_string(), "#3 (parent #2)");
        assert_eq!(Comment::new(None, None, None).to_string(), "#?");
    }
}
