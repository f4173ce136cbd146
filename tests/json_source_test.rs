//! Tests for the JSON file comment source

use std::fs;
use std::sync::Arc;

use serde_json::json;
use tempfile::TempDir;

use comtree::application::services::CommentService;
use comtree::domain::BuildOrder;
use comtree::infrastructure::traits::{CommentSource, JsonFileSource};

#[test]
fn given_missing_file_when_fetching_then_empty() {
    let temp = TempDir::new().unwrap();
    let source = JsonFileSource::new(temp.path().join("comments.json"));

    assert!(source.fetch_ordered().unwrap().is_empty());
}

#[test]
fn given_missing_file_when_inserting_then_file_created_with_row() {
    // Arrange
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("comments.json");
    let source = JsonFileSource::new(&path);

    // Act
    let row = source.insert("hello", None).unwrap();

    // Assert
    assert_eq!(row, json!({"id": 1, "text": "hello", "parent_id": null}));
    let stored: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(stored, json!([row]));
}

#[test]
fn given_positional_rows_on_disk_when_building_then_threads_rebuilt() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("comments.json");
    fs::write(&path, r#"[[2, "reply", 1], [1, "root", null]]"#).unwrap();
    let service = CommentService::new(Arc::new(JsonFileSource::new(&path)), BuildOrder::ByParentId);

    let text = service.render_text(4).unwrap();

    assert_eq!(text, "root\n    reply\n");
}

#[test]
fn given_invalid_json_when_fetching_then_invalid_data() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("comments.json");
    fs::write(&path, "{ nope").unwrap();
    let source = JsonFileSource::new(&path);

    let err = source.fetch_ordered().unwrap_err();

    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);
}

#[test]
fn given_existing_rows_when_adding_through_service_then_persisted_across_sources() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("comments.json");
    let service = CommentService::new(Arc::new(JsonFileSource::new(&path)), BuildOrder::Topological);

    let root = service.add("root", None).unwrap();
    service.add("reply", root.id).unwrap();

    let reopened = CommentService::new(Arc::new(JsonFileSource::new(&path)), BuildOrder::Topological);
    assert_eq!(reopened.render_text(1).unwrap(), "root\n reply\n");
}
