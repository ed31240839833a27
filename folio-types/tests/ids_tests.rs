use folio_types::{ContentItemId, ContentItemVersionId};
use std::collections::HashSet;
use std::str::FromStr;

// ── ContentItemId ─────────────────────────────────────────────────

#[test]
fn content_item_id_new_is_unique() {
    assert_ne!(ContentItemId::new(), ContentItemId::new());
}

#[test]
fn content_item_id_from_uuid_roundtrip() {
    let uuid = uuid::Uuid::now_v7();
    assert_eq!(ContentItemId::from_uuid(uuid).as_uuid(), uuid);
}

#[test]
fn content_item_id_display_and_parse() {
    let id = ContentItemId::new();
    let parsed = ContentItemId::parse(&id.to_string()).unwrap();
    assert_eq!(id, parsed);
}

#[test]
fn content_item_id_from_str_invalid() {
    assert!(ContentItemId::from_str("garbage").is_err());
}

#[test]
fn content_item_id_hash_and_eq() {
    let id = ContentItemId::new();
    let mut set = HashSet::new();
    set.insert(id);
    set.insert(id);
    assert_eq!(set.len(), 1);
}

#[test]
fn content_item_id_serializes_as_plain_string() {
    let id = ContentItemId::new();
    let json = serde_json::to_value(id).unwrap();
    assert_eq!(json, serde_json::Value::String(id.to_string()));
    let parsed: ContentItemId = serde_json::from_value(json).unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn content_item_ids_are_time_ordered() {
    let first = ContentItemId::new();
    std::thread::sleep(std::time::Duration::from_millis(2));
    let second = ContentItemId::new();
    assert!(first < second);
}

// ── ContentItemVersionId ──────────────────────────────────────────

#[test]
fn version_id_parse_invalid() {
    assert!(ContentItemVersionId::parse("not-a-uuid").is_err());
}

#[test]
fn version_id_debug_names_type() {
    let debug = format!("{:?}", ContentItemVersionId::new());
    assert!(debug.contains("ContentItemVersionId"));
}
