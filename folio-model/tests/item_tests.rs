use chrono::{TimeZone, Utc};
use folio_model::{ContentElement, ContentItem, ContentItemMetadata, ContentPart};
use folio_types::ContentItemId;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn article() -> ContentItem {
    ContentItem::from_value(json!({
        "ContentItemId": "0190b2c4-8a4e-7c1b-9f00-000000000001",
        "ContentType": "Article",
        "DisplayText": "Hello",
        "Published": true,
        "Latest": true,
        "CreatedUtc": "2024-05-01T10:00:00Z",
        "Owner": "admin",
        "TitlePart": {"Title": "Hello"},
        "Article": {"Subtitle": {"Text": "World"}, "Rating": {"Value": 4}},
        "Tags": ["news"]
    }))
    .unwrap()
}

// ── Metadata ─────────────────────────────────────────────────────

#[test]
fn new_item_has_fresh_id_and_type() {
    let a = ContentItem::new("Article");
    let b = ContentItem::new("Article");
    assert_ne!(a.id(), b.id());
    assert_eq!(a.content_type(), "Article");
    assert!(!a.metadata().published);
    assert!(a.data().unwrap().is_empty());
}

#[test]
fn deserialization_splits_metadata_from_data() {
    let item = article();
    assert_eq!(
        item.id(),
        ContentItemId::parse("0190b2c4-8a4e-7c1b-9f00-000000000001").unwrap()
    );
    assert_eq!(item.metadata().display_text.as_deref(), Some("Hello"));
    assert_eq!(item.metadata().owner.as_deref(), Some("admin"));
    assert_eq!(
        item.metadata().created_utc,
        Some(Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap())
    );
    assert!(item.metadata().published);
    assert_eq!(item.property_names(), vec!["TitlePart", "Article", "Tags"]);
    assert!(!item.has("ContentType"));
}

#[test]
fn serialization_flattens_metadata_and_data() {
    let item = ContentItem::new("Page");
    item.update_metadata(|m| m.display_text = Some("Home".into()));
    item.content().set("TitlePart.Title", "Home").unwrap();

    let value = item.to_value().unwrap();
    assert_eq!(value["ContentType"], json!("Page"));
    assert_eq!(value["DisplayText"], json!("Home"));
    assert_eq!(value["TitlePart"], json!({"Title": "Home"}));
    assert_eq!(value["ContentItemId"], json!(item.id().to_string()));
    assert!(value.get("Owner").is_none());
}

#[test]
fn json_roundtrip_keeps_data_order() {
    let item = article();
    let json = item.to_json_pretty().unwrap();
    let back = ContentItem::from_json(&json).unwrap();
    assert_eq!(back.property_names(), item.property_names());
    assert_eq!(*back.metadata(), *item.metadata());
    assert_eq!(
        Value::Object(back.snapshot().unwrap()),
        Value::Object(item.snapshot().unwrap())
    );
}

#[test]
fn data_shadowing_metadata_is_not_serialized() {
    let item = ContentItem::new("Page");
    item.apply("ContentType", "Other").unwrap();
    item.apply("Body", "text").unwrap();

    let json = serde_json::to_string(&item).unwrap();
    assert_eq!(json.matches("\"ContentType\"").count(), 1);

    let value = item.to_value().unwrap();
    assert_eq!(value["ContentType"], json!("Page"));
    assert_eq!(value["Body"], json!("text"));
    assert!(ContentItemMetadata::is_reserved("ContentType"));
    assert!(!ContentItemMetadata::is_reserved("Body"));
}

#[test]
fn missing_metadata_uses_defaults() {
    let item = ContentItem::from_value(json!({"TitlePart": {"Title": "x"}})).unwrap();
    assert_eq!(item.content_type(), "");
    assert!(!item.metadata().latest);
    assert!(item.has_part("TitlePart"));
}

#[test]
fn from_parts_adopts_metadata() {
    let metadata = ContentItemMetadata::new("Blog");
    let id = metadata.content_item_id;
    let item = ContentItem::from_parts(metadata, serde_json::Map::new());
    assert_eq!(item.id(), id);
}

// ── Parts and fields ─────────────────────────────────────────────

#[test]
fn part_returns_same_instance() {
    let item = article();
    let first = item.part("TitlePart").unwrap();
    let second = item.part("TitlePart").unwrap();
    assert!(first.ptr_eq(&second));
}

#[test]
fn part_writes_alias_item_data() {
    let item = article();
    item.part("TitlePart").unwrap().apply("Title", "Changed").unwrap();
    assert_eq!(
        item.content().get_str("TitlePart.Title").as_deref(),
        Some("Changed")
    );
}

#[test]
fn missing_part_and_scalar_part_are_distinguished() {
    let item = article();
    assert!(item.part("AutoroutePart").unwrap_err().is_missing());
    assert!(item.part("Tags").unwrap_err().is_shape_mismatch());
    assert!(!item.has_part("Tags"));
    assert!(item.has("Tags"));
}

#[test]
fn get_or_create_part_inserts_mapping() {
    let item = ContentItem::new("Article");
    let part = item.get_or_create_part("AutoroutePart").unwrap();
    part.apply("Path", "/hello").unwrap();
    assert_eq!(item.data().unwrap()["AutoroutePart"], json!({"Path": "/hello"}));
}

#[test]
fn parts_lists_mapping_properties_in_order() {
    let item = article();
    let names: Vec<String> = item.parts().unwrap().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["TitlePart", "Article"]);
}

#[test]
fn parts_include_dotted_names() {
    let item = ContentItem::from_value(json!({
        "ContentType": "Page",
        "Seo.Meta": {"Title": "x"},
        "TitlePart": {"Title": "Home"}
    }))
    .unwrap();

    let part = item.part("Seo.Meta").unwrap();
    assert_eq!(part.get::<String>("Title").unwrap().as_deref(), Some("x"));

    let names: Vec<String> = item.parts().unwrap().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["Seo.Meta", "TitlePart"]);
}

#[test]
fn fields_are_leaf_elements_of_parts() {
    let item = article();
    let part = item.part("Article").unwrap();
    let subtitle = part.field("Subtitle").unwrap();
    assert_eq!(subtitle.text().as_deref(), Some("World"));
    assert_eq!(part.field("Rating").unwrap().value::<i64>("Value").unwrap(), Some(4));

    subtitle.set_value("Text", "Everyone").unwrap();
    assert_eq!(
        item.content().get_str("Article.Subtitle.Text").as_deref(),
        Some("Everyone")
    );

    let names: Vec<String> = part.fields().unwrap().into_iter().map(|(n, _)| n).collect();
    assert_eq!(names, vec!["Subtitle", "Rating"]);
}

#[test]
fn field_lookup_is_cached() {
    let item = article();
    let part = item.part("Article").unwrap();
    let a = part.field("Subtitle").unwrap();
    let b = item.part("Article").unwrap().field("Subtitle").unwrap();
    assert!(a.ptr_eq(&b));
}

#[test]
fn get_or_create_field_inserts_mapping() {
    let item = ContentItem::new("Article");
    let field = item
        .get_or_create_part("Article")
        .unwrap()
        .get_or_create_field("Body")
        .unwrap();
    field.set_value("Html", "<p>hi</p>").unwrap();
    assert_eq!(
        item.content().get_str("Article.Body.Html").as_deref(),
        Some("<p>hi</p>")
    );
}

// ── Back-reference ───────────────────────────────────────────────

#[test]
fn sub_elements_point_back_to_item() {
    let item = article();
    let part = item.part("Article").unwrap();
    let field = part.field("Subtitle").unwrap();

    assert!(item.content_item().unwrap().ptr_eq(&item));
    assert!(part.content_item().unwrap().ptr_eq(&item));
    assert!(field.content_item().unwrap().ptr_eq(&item));
}

#[test]
fn standalone_element_is_unattached_until_attached_once() {
    let item = ContentItem::new("Article");
    let other = ContentItem::new("Page");
    let part = ContentPart::new();
    assert!(part.content_item().is_none());

    assert!(part.attach_to(&item));
    assert!(!part.attach_to(&other));
    assert!(part.content_item().unwrap().ptr_eq(&item));
}

#[test]
fn back_reference_does_not_keep_item_alive() {
    let item = article();
    let part = item.part("TitlePart").unwrap();
    drop(item);
    assert!(part.content_item().is_none());
}

#[test]
fn cloned_item_shares_document() {
    let item = ContentItem::new("Article");
    let clone = item.clone();
    clone.apply("Flag", &true).unwrap();
    assert!(item.has("Flag"));
    assert!(item.ptr_eq(&clone));
}

#[test]
fn element_children_inherit_attachment() {
    let item = ContentItem::new("Article");
    let element = ContentElement::new();
    element.attach_to(&item);
    let child = element.get_or_add_element("Child").unwrap();
    assert!(child.content_item().unwrap().ptr_eq(&item));
}
