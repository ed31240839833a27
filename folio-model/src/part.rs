//! Parts and fields: named sub-elements of a content item.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::element::ContentElement;
use crate::error::Result;

/// A named composite attached to a content item, grouping related fields.
#[derive(Clone)]
pub struct ContentPart(Rc<ContentElement>);

impl ContentPart {
    /// A standalone part over an empty mapping, not attached to any item.
    pub fn new() -> Self {
        Self(Rc::new(ContentElement::new()))
    }

    /// A standalone part adopting `data`.
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self(Rc::new(ContentElement::from_map(data)))
    }

    pub(crate) fn from_element(element: Rc<ContentElement>) -> Self {
        Self(element)
    }

    pub fn element(&self) -> &Rc<ContentElement> {
        &self.0
    }

    /// Whether both handles wrap the same cached element instance.
    pub fn ptr_eq(&self, other: &ContentPart) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn field(&self, name: &str) -> Result<ContentField> {
        self.0.get_element(name).map(ContentField)
    }

    pub fn get_or_create_field(&self, name: &str) -> Result<ContentField> {
        self.0.get_or_add_element(name).map(ContentField)
    }

    /// All mapping-valued properties as fields, in document order.
    pub fn fields(&self) -> Result<Vec<(String, ContentField)>> {
        let names: Vec<String> = self
            .0
            .data()?
            .iter()
            .filter(|(_, value)| value.is_object())
            .map(|(name, _)| name.clone())
            .collect();
        names
            .into_iter()
            .map(|name| {
                let field = self.field(&name)?;
                Ok((name, field))
            })
            .collect()
    }
}

impl Default for ContentPart {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for ContentPart {
    type Target = ContentElement;

    fn deref(&self) -> &ContentElement {
        &self.0
    }
}

impl fmt::Debug for ContentPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentPart").field(&*self.0).finish()
    }
}

/// Leaf element of a part, holding one value under a conventional key such as
/// `Text` or `Value`.
#[derive(Clone)]
pub struct ContentField(Rc<ContentElement>);

impl ContentField {
    pub fn element(&self) -> &Rc<ContentElement> {
        &self.0
    }

    pub fn ptr_eq(&self, other: &ContentField) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Deserializes the value stored under `key`.
    pub fn value<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.0.get(key)
    }

    pub fn set_value<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        self.0.apply(key, value)
    }

    /// The `Text` value of a text field.
    pub fn text(&self) -> Option<String> {
        self.0.content().get_str("Text")
    }
}

impl Deref for ContentField {
    type Target = ContentElement;

    fn deref(&self) -> &ContentElement {
        &self.0
    }
}

impl fmt::Debug for ContentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ContentField").field(&*self.0).finish()
    }
}
