//! I/O boundary traits for testability
//!
//! These traits abstract the comment store, allowing services
//! to be tested with in-memory implementations.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tracing::debug;

use crate::domain::Record;

/// Source of comment rows.
pub trait CommentSource: Send + Sync {
    /// All rows, ordered by `parent_id` ascending with nulls first.
    fn fetch_ordered(&self) -> io::Result<Vec<Record>>;

    /// Store a new comment under the next free id and return the stored row.
    fn insert(&self, text: &str, parent_id: Option<i64>) -> io::Result<Record>;
}

/// Parent id of a raw row, for ordering only (object key or third column).
fn row_parent_id(record: &Record) -> Option<i64> {
    match record {
        Value::Object(map) => map.get("parent_id").and_then(Value::as_i64),
        Value::Array(columns) => columns.get(2).and_then(Value::as_i64),
        _ => None,
    }
}

fn row_id(record: &Record) -> Option<i64> {
    match record {
        Value::Object(map) => map.get("id").and_then(Value::as_i64),
        Value::Array(columns) => columns.first().and_then(Value::as_i64),
        _ => None,
    }
}

/// Stable sort, nulls first.
fn order_rows(mut rows: Vec<Record>) -> Vec<Record> {
    rows.sort_by_key(row_parent_id);
    rows
}

/// Max id + 1, starting at 1.
fn next_id(rows: &[Record]) -> io::Result<i64> {
    let max = rows.iter().filter_map(row_id).max().unwrap_or(0);
    max.checked_add(1).ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("no id left after {}", max),
        )
    })
}

fn new_row(id: i64, text: &str, parent_id: Option<i64>) -> Record {
    json!({ "id": id, "text": text, "parent_id": parent_id })
}

// ============================================================
// IMPLEMENTATIONS
// ============================================================

/// Comments stored as a JSON array in a file.
///
/// A missing file reads as empty. Writes go through a temp file in the same
/// directory and are persisted over the target.
#[derive(Debug)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> io::Result<Vec<Record>> {
        if !self.path.exists() {
            debug!("data file {} missing, treating as empty", self.path.display());
            return Ok(Vec::new());
        }
        let content = std::fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&content).map_err(|e| {
            io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: {}", self.path.display(), e),
            )
        })
    }

    fn write_rows(&self, rows: &[Record]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir)?;
        let content = serde_json::to_string_pretty(rows)?;
        let mut tmp = NamedTempFile::new_in(dir)?;
        std::io::Write::write_all(&mut tmp, content.as_bytes())?;
        tmp.persist(&self.path).map_err(|e| e.error)?;
        Ok(())
    }
}

impl CommentSource for JsonFileSource {
    fn fetch_ordered(&self) -> io::Result<Vec<Record>> {
        Ok(order_rows(self.read_rows()?))
    }

    fn insert(&self, text: &str, parent_id: Option<i64>) -> io::Result<Record> {
        let mut rows = self.read_rows()?;
        let row = new_row(next_id(&rows)?, text, parent_id);
        rows.push(row.clone());
        self.write_rows(&rows)?;
        Ok(row)
    }
}

/// Comments kept in memory.
#[derive(Debug, Default)]
pub struct InMemorySource {
    rows: Mutex<Vec<Record>>,
}

impl InMemorySource {
    pub fn new(rows: Vec<Record>) -> Self {
        Self {
            rows: Mutex::new(rows),
        }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Vec<Record>>> {
        self.rows
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "comment store lock poisoned"))
    }
}

impl CommentSource for InMemorySource {
    fn fetch_ordered(&self) -> io::Result<Vec<Record>> {
        Ok(order_rows(self.lock()?.clone()))
    }

    fn insert(&self, text: &str, parent_id: Option<i64>) -> io::Result<Record> {
        let mut rows = self.lock()?;
        let row = new_row(next_id(&rows)?, text, parent_id);
        rows.push(row.clone());
        Ok(row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_unordered_rows_when_fetching_then_roots_first_and_stable() {
        let source = InMemorySource::new(vec![
            json!({"id": 3, "text": "c", "parent_id": 1}),
            json!([2, "b", 1]),
            json!({"id": 1, "text": "a"}),
        ]);

        let rows = source.fetch_ordered().unwrap();

        let ids: Vec<_> = rows.iter().filter_map(row_id).collect();
        assert_eq!(ids, vec![1, 3, 2]);
    }

    #[test]
    fn given_rows_when_inserting_then_next_id_is_max_plus_one() {
        let source = InMemorySource::new(vec![json!([7, "a", null])]);
        let row = source.insert("b", Some(7)).unwrap();
        assert_eq!(row, json!({"id": 8, "text": "b", "parent_id": 7}));
    }

    #[test]
    fn given_max_id_taken_when_inserting_then_invalid_data_and_nothing_stored() {
        let source = InMemorySource::new(vec![json!([i64::MAX, "a", null])]);

        let err = source.insert("b", None).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(source.fetch_ordered().unwrap().len(), 1);
    }
}
