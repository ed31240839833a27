use folio_model::{ContentElement, ContentError};
use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::rc::Rc;

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TitlePart {
    title: String,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Counter {
    hits: u32,
}

fn element(data: Value) -> ContentElement {
    ContentElement::from_value(data).unwrap()
}

// ── get / get_or_default ─────────────────────────────────────────

#[test]
fn get_deserializes_present_property() {
    let e = element(json!({"TitlePart": {"Title": "Hello"}}));
    let part: Option<TitlePart> = e.get("TitlePart").unwrap();
    assert_eq!(
        part,
        Some(TitlePart {
            title: "Hello".into()
        })
    );
}

#[test]
fn get_absent_property_is_none() {
    let e = ContentElement::new();
    let part: Option<TitlePart> = e.get("TitlePart").unwrap();
    assert!(part.is_none());
}

#[test]
fn get_with_wrong_shape_is_serialization_error() {
    let e = element(json!({"TitlePart": 3}));
    let err = e.get::<TitlePart>("TitlePart").unwrap_err();
    assert!(matches!(err, ContentError::Serialization(_)));
}

#[test]
fn get_or_default_falls_back() {
    let e = ContentElement::new();
    assert_eq!(e.get_or_default::<Counter>("Counter").unwrap(), Counter::default());
}

// ── apply / weld ─────────────────────────────────────────────────

#[test]
fn apply_replaces_property() {
    let e = element(json!({"TitlePart": {"Title": "Old", "Extra": 1}}));
    e.apply("TitlePart", &TitlePart { title: "New".into() }).unwrap();
    assert_eq!(e.data().unwrap()["TitlePart"], json!({"Title": "New"}));
}

#[test]
fn apply_scalar_over_cached_element_evicts_it() {
    let e = element(json!({"Body": {"Text": "hi"}}));
    e.get_element("Body").unwrap();
    e.apply("Body", "flat").unwrap();
    assert!(e.cached_element_names().is_empty());
    assert!(e.get_element("Body").unwrap_err().is_shape_mismatch());
}

#[test]
fn apply_object_keeps_cached_element_coherent() {
    let e = element(json!({"Body": {"Text": "hi"}}));
    let body = e.get_element("Body").unwrap();
    e.apply("Body", &json!({"Text": "replaced"})).unwrap();
    assert!(Rc::ptr_eq(&body, &e.get_element("Body").unwrap()));
    assert_eq!(body.content().get_str("Text").as_deref(), Some("replaced"));
}

#[test]
fn weld_only_inserts_when_absent() {
    let e = element(json!({"TitlePart": {"Title": "Existing"}}));
    assert!(!e.weld("TitlePart", &TitlePart { title: "Other".into() }).unwrap());
    assert!(e.weld("Counter", &Counter { hits: 1 }).unwrap());
    assert_eq!(e.data().unwrap()["TitlePart"]["Title"], json!("Existing"));
    assert_eq!(e.data().unwrap()["Counter"], json!({"Hits": 1}));
}

// ── merge ────────────────────────────────────────────────────────

#[test]
fn merge_combines_nested_mappings() {
    let e = element(json!({"Seo": {"Title": "a", "Meta": {"Robots": "index"}}}));
    e.merge("Seo", json!({"Meta": {"Canonical": "/a"}, "Title": "b"}))
        .unwrap();
    assert_eq!(
        e.data().unwrap()["Seo"],
        json!({"Title": "b", "Meta": {"Robots": "index", "Canonical": "/a"}})
    );
}

#[test]
fn merge_inserts_absent_property() {
    let e = ContentElement::new();
    e.merge("Seo", json!({"Title": "a"})).unwrap();
    assert_eq!(e.data().unwrap()["Seo"], json!({"Title": "a"}));
}

#[test]
fn merge_replaces_arrays_and_scalars() {
    let e = element(json!({"Tags": ["a", "b"]}));
    e.merge("Tags", json!(["c"])).unwrap();
    assert_eq!(e.data().unwrap()["Tags"], json!(["c"]));
}

// ── alter / remove ───────────────────────────────────────────────

#[test]
fn alter_reads_modifies_and_writes_back() {
    let e = ContentElement::new();
    e.alter::<Counter, _>("Counter", |c| c.hits += 1).unwrap();
    e.alter::<Counter, _>("Counter", |c| c.hits += 1).unwrap();
    assert_eq!(e.get::<Counter>("Counter").unwrap(), Some(Counter { hits: 2 }));
}

#[test]
fn remove_returns_value_and_evicts_cache() {
    let e = element(json!({"Body": {"Text": "hi"}, "title": "x"}));
    e.get_element("Body").unwrap();
    assert_eq!(e.remove("Body").unwrap(), Some(json!({"Text": "hi"})));
    assert!(e.cached_element_names().is_empty());
    assert_eq!(e.remove("Body").unwrap(), None);
    assert_eq!(e.property_names(), vec!["title"]);
}

#[test]
fn writes_to_detached_element_fail() {
    let e = element(json!({"Body": {"Text": "hi"}}));
    let body = e.get_element("Body").unwrap();
    e.remove("Body").unwrap();
    assert!(matches!(
        body.apply("Text", "lost").unwrap_err(),
        ContentError::Detached { .. }
    ));
    assert!(!e.has("Body"));
}
