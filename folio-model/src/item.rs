//! The root document: a content item with typed metadata and dynamic parts.

use std::cell::{Ref, RefCell};
use std::fmt;
use std::ops::Deref;
use std::rc::{Rc, Weak};

use chrono::{DateTime, Utc};
use folio_types::{ContentItemId, ContentItemVersionId};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use tracing::warn;

use crate::element::ContentElement;
use crate::error::Result;
use crate::part::ContentPart;

/// Typed properties every content item carries next to its dynamic data.
///
/// Serialized with PascalCase keys alongside the item's parts. Data
/// properties under those keys are left out of the serialized form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContentItemMetadata {
    #[serde(default)]
    pub content_item_id: ContentItemId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_item_version_id: Option<ContentItemVersionId>,
    #[serde(default)]
    pub content_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_text: Option<String>,
    #[serde(default)]
    pub latest: bool,
    #[serde(default)]
    pub published: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified_utc: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_utc: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_utc: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

impl ContentItemMetadata {
    /// Serialized names of the metadata properties.
    pub const RESERVED_KEYS: &'static [&'static str] = &[
        "ContentItemId",
        "ContentItemVersionId",
        "ContentType",
        "DisplayText",
        "Latest",
        "Published",
        "ModifiedUtc",
        "PublishedUtc",
        "CreatedUtc",
        "Owner",
        "Author",
    ];

    /// Whether `name` collides with a metadata key in the serialized form.
    pub fn is_reserved(name: &str) -> bool {
        Self::RESERVED_KEYS.contains(&name)
    }

    pub fn new(content_type: impl Into<String>) -> Self {
        Self {
            content_item_id: ContentItemId::new(),
            content_item_version_id: None,
            content_type: content_type.into(),
            display_text: None,
            latest: false,
            published: false,
            modified_utc: None,
            published_utc: None,
            created_utc: None,
            owner: None,
            author: None,
        }
    }
}

pub(crate) struct ItemInner {
    element: ContentElement,
    metadata: RefCell<ContentItemMetadata>,
}

/// A root content document.
///
/// Cloning is cheap and yields another handle to the same document. Every
/// element materialized from the item points back to it through
/// [`ContentElement::content_item`].
#[derive(Clone)]
pub struct ContentItem {
    inner: Rc<ItemInner>,
}

impl ContentItem {
    /// Creates an empty, unpublished item of `content_type` with a fresh id.
    pub fn new(content_type: impl Into<String>) -> Self {
        Self::from_parts(ContentItemMetadata::new(content_type), Map::new())
    }

    /// Builds an item from metadata and an existing data mapping, which is
    /// adopted without copying.
    pub fn from_parts(metadata: ContentItemMetadata, data: Map<String, Value>) -> Self {
        let inner = Rc::new_cyclic(|weak: &Weak<ItemInner>| {
            let element = ContentElement::from_map(data);
            element.set_item_ref(weak.clone());
            ItemInner {
                element,
                metadata: RefCell::new(metadata),
            }
        });
        Self { inner }
    }

    /// Parses a serialized item: metadata keys plus part/property data.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_value(&self) -> Result<Value> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub(crate) fn from_inner(inner: Rc<ItemInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<ItemInner> {
        Rc::downgrade(&self.inner)
    }

    /// The root element holding the item's data.
    pub fn element(&self) -> &ContentElement {
        &self.inner.element
    }

    pub fn id(&self) -> ContentItemId {
        self.inner.metadata.borrow().content_item_id
    }

    pub fn content_type(&self) -> String {
        self.inner.metadata.borrow().content_type.clone()
    }

    pub fn metadata(&self) -> Ref<'_, ContentItemMetadata> {
        self.inner.metadata.borrow()
    }

    pub fn update_metadata<R>(&self, f: impl FnOnce(&mut ContentItemMetadata) -> R) -> R {
        f(&mut self.inner.metadata.borrow_mut())
    }

    /// Whether both handles refer to the same document.
    pub fn ptr_eq(&self, other: &ContentItem) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    // ── Parts ─────────────────────────────────────────────────────

    /// The part stored under `name`.
    pub fn part(&self, name: &str) -> Result<ContentPart> {
        self.element().get_element(name).map(ContentPart::from_element)
    }

    /// The part under `name`, creating an empty one when absent.
    pub fn get_or_create_part(&self, name: &str) -> Result<ContentPart> {
        self.element()
            .get_or_add_element(name)
            .map(ContentPart::from_element)
    }

    /// Whether `name` holds a mapping that can be used as a part.
    pub fn has_part(&self, name: &str) -> bool {
        self.element()
            .data()
            .map(|data| data.get(name).is_some_and(Value::is_object))
            .unwrap_or(false)
    }

    /// All mapping-valued properties as parts, in document order.
    pub fn parts(&self) -> Result<Vec<(String, ContentPart)>> {
        let names: Vec<String> = self
            .element()
            .data()?
            .iter()
            .filter(|(_, value)| value.is_object())
            .map(|(name, _)| name.clone())
            .collect();
        names
            .into_iter()
            .map(|name| {
                let part = self.part(&name)?;
                Ok((name, part))
            })
            .collect()
    }
}

impl Deref for ContentItem {
    type Target = ContentElement;

    fn deref(&self) -> &ContentElement {
        self.element()
    }
}

impl fmt::Debug for ContentItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContentItem")
            .field("metadata", &*self.metadata())
            .field("element", self.element())
            .finish()
    }
}

#[derive(Serialize)]
struct DocumentRef<'a> {
    #[serde(flatten)]
    metadata: &'a ContentItemMetadata,
    #[serde(flatten)]
    data: DataRef<'a>,
}

/// Item data without the properties that metadata already serializes.
struct DataRef<'a>(&'a Map<String, Value>);

impl Serialize for DataRef<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.0 {
            if ContentItemMetadata::is_reserved(key) {
                warn!(property = %key, "skipping data property shadowed by item metadata");
                continue;
            }
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

#[derive(Deserialize)]
struct Document {
    #[serde(flatten)]
    metadata: ContentItemMetadata,
    #[serde(flatten)]
    data: Map<String, Value>,
}

impl Serialize for ContentItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let metadata = self.metadata();
        let data = self.element().data().map_err(serde::ser::Error::custom)?;
        DocumentRef {
            metadata: &*metadata,
            data: DataRef(&data),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ContentItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let Document { metadata, data } = Document::deserialize(deserializer)?;
        Ok(Self::from_parts(metadata, data))
    }
}
