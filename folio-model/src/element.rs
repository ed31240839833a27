//! The content element: one node of a dynamic document.

use std::cell::{OnceCell, Ref, RefCell};
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{debug, trace};

use crate::dynamic::DynamicObject;
use crate::error::{ContentError, Result};
use crate::item::{ContentItem, ItemInner};
use crate::store::{merge_values, MapHandle, SharedMap};

/// A named-property document node backed by an ordered JSON mapping.
///
/// Sub-elements returned by [`get_element`](Self::get_element) address their
/// mapping by path inside the same root storage, so writes through a
/// sub-element, the dynamic view or the parent are all the same write.
///
/// Elements are single-threaded (`!Send`, `!Sync`). One logical operation
/// owns a document at a time; concurrent use requires one document per
/// thread or an external lock around a serialized form.
///
/// Sub-elements keep the root storage alive but are meant to be borrowed for
/// the duration of an operation on the root. If the subtree they address is
/// removed from the root they become detached: `has` reports `false` and data
/// access returns [`ContentError::Detached`].
pub struct ContentElement {
    handle: MapHandle,
    elements: RefCell<HashMap<String, Rc<ContentElement>>>,
    dynamic: OnceCell<DynamicObject>,
    content_item: OnceCell<Weak<ItemInner>>,
}

impl ContentElement {
    /// Creates an element over an empty mapping.
    pub fn new() -> Self {
        Self::from_map(Map::new())
    }

    /// Adopts `data` as the element's backing mapping. The map is moved, not
    /// copied.
    pub fn from_map(data: Map<String, Value>) -> Self {
        Self::from_shared(Rc::new(RefCell::new(data)))
    }

    /// Adopts caller-owned shared storage. Writes made through other clones of
    /// `data` are visible to the element and vice versa.
    pub fn from_shared(data: SharedMap) -> Self {
        Self::with_handle(MapHandle::root(data))
    }

    /// Wraps a JSON value, which must be an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_map(map)),
            other => Err(ContentError::not_an_object("", &other)),
        }
    }

    fn with_handle(handle: MapHandle) -> Self {
        Self {
            handle,
            elements: RefCell::new(HashMap::new()),
            dynamic: OnceCell::new(),
            content_item: OnceCell::new(),
        }
    }

    /// Whether the element's data has a property named `name`.
    pub fn has(&self, name: &str) -> bool {
        self.handle
            .borrow()
            .map(|data| data.contains_key(name))
            .unwrap_or(false)
    }

    /// The dynamic view over this element's data. Built on first use and
    /// cached; every call returns the same handle.
    pub fn content(&self) -> &DynamicObject {
        self.dynamic
            .get_or_init(|| DynamicObject::new(self.handle.clone()))
    }

    /// Borrows the backing mapping.
    ///
    /// The guard borrows the whole document; drop it before writing through
    /// any element or view of the same document.
    pub fn data(&self) -> Result<Ref<'_, Map<String, Value>>> {
        self.handle.borrow()
    }

    /// Owned deep copy of the backing mapping.
    pub fn snapshot(&self) -> Result<Map<String, Value>> {
        Ok(self.handle.borrow()?.clone())
    }

    /// The shared root storage of the document this element belongs to.
    pub fn storage(&self) -> &SharedMap {
        self.handle.shared_root()
    }

    /// Dotted path of this element from its document root; empty for a root.
    pub fn path(&self) -> String {
        self.handle.path()
    }

    /// Whether both elements address the same mapping of the same document.
    pub fn same_data(&self, other: &ContentElement) -> bool {
        self.handle.same_storage(&other.handle)
    }

    /// Property names in document order.
    pub fn property_names(&self) -> Vec<String> {
        self.handle
            .borrow()
            .map(|data| data.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The root content item this element belongs to, if attached and still
    /// alive.
    pub fn content_item(&self) -> Option<ContentItem> {
        self.content_item
            .get()
            .and_then(Weak::upgrade)
            .map(ContentItem::from_inner)
    }

    /// Attaches this element to `item`. The back-reference is set once;
    /// returns `false` if the element was already attached.
    pub fn attach_to(&self, item: &ContentItem) -> bool {
        self.set_item_ref(item.downgrade())
    }

    pub(crate) fn set_item_ref(&self, item: Weak<ItemInner>) -> bool {
        self.content_item.set(item).is_ok()
    }

    // ── Named sub-elements ────────────────────────────────────────

    /// Returns the sub-element wrapping the mapping at `data[name]`.
    ///
    /// Repeated calls return the same `Rc`. Fails with
    /// [`ContentError::MissingProperty`] if `name` is absent and with
    /// [`ContentError::ShapeMismatch`] if it holds a non-mapping value.
    pub fn get_element(&self, name: &str) -> Result<Rc<ContentElement>> {
        let shape = {
            let data = self.handle.borrow()?;
            data.get(name).map(|value| {
                if value.is_object() {
                    Ok(())
                } else {
                    Err(ContentError::not_an_object(name, value))
                }
            })
        };
        match shape {
            None => {
                self.evict(name);
                Err(ContentError::missing(name))
            }
            Some(Err(err)) => {
                self.evict(name);
                Err(err)
            }
            Some(Ok(())) => Ok(self.materialize(name)),
        }
    }

    /// Like [`get_element`](Self::get_element), but inserts an empty mapping
    /// under `name` first when the property is absent.
    pub fn get_or_add_element(&self, name: &str) -> Result<Rc<ContentElement>> {
        {
            let mut data = self.handle.borrow_mut()?;
            match data.get(name) {
                None => {
                    trace!(element = %self.handle.path(), property = name, "adding empty mapping");
                    data.insert(name.to_owned(), Value::Object(Map::new()));
                }
                Some(value) if !value.is_object() => {
                    return Err(ContentError::not_an_object(name, value));
                }
                Some(_) => {}
            }
        }
        Ok(self.materialize(name))
    }

    /// Optional variant of [`get_element`](Self::get_element): absent
    /// properties yield `Ok(None)`, wrong shapes still fail.
    pub fn try_element(&self, name: &str) -> Result<Option<Rc<ContentElement>>> {
        match self.get_element(name) {
            Ok(element) => Ok(Some(element)),
            Err(err) if err.is_missing() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Names currently materialized in the element cache whose data still
    /// holds a mapping.
    pub fn cached_element_names(&self) -> Vec<String> {
        let Ok(data) = self.handle.borrow() else {
            return Vec::new();
        };
        let mut names: Vec<String> = self
            .elements
            .borrow()
            .keys()
            .filter(|name| data.get(name.as_str()).is_some_and(Value::is_object))
            .cloned()
            .collect();
        names.sort();
        names
    }

    fn materialize(&self, name: &str) -> Rc<ContentElement> {
        if let Some(element) = self.elements.borrow().get(name) {
            return Rc::clone(element);
        }
        let child = ContentElement::with_handle(self.handle.child(name));
        if let Some(item) = self.content_item.get() {
            child.set_item_ref(item.clone());
        }
        let child = Rc::new(child);
        debug!(element = %self.handle.path(), property = name, "materialized sub-element");
        self.elements
            .borrow_mut()
            .insert(name.to_owned(), Rc::clone(&child));
        child
    }

    fn evict(&self, name: &str) {
        if self.elements.borrow_mut().remove(name).is_some() {
            debug!(element = %self.handle.path(), property = name, "evicted stale sub-element");
        }
    }

    // ── Typed access ──────────────────────────────────────────────

    /// Deserializes `data[name]`; `Ok(None)` when the property is absent.
    pub fn get<T: DeserializeOwned>(&self, name: &str) -> Result<Option<T>> {
        let data = self.handle.borrow()?;
        data.get(name)
            .map(|value| T::deserialize(value).map_err(ContentError::from))
            .transpose()
    }

    /// Deserializes `data[name]`, falling back to `T::default()` when absent.
    pub fn get_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        Ok(self.get(name)?.unwrap_or_default())
    }

    /// Serializes `value` into `data[name]`, replacing what was there.
    pub fn apply<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.put(name, value)
    }

    /// Serializes `value` into `data[name]` only if the property is absent.
    /// Returns whether the value was inserted.
    pub fn weld<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<bool> {
        if self.has(name) {
            return Ok(false);
        }
        self.apply(name, value)?;
        Ok(true)
    }

    /// Deep-merges `value` into `data[name]`, inserting it if absent.
    pub fn merge(&self, name: &str, value: Value) -> Result<()> {
        let merged_shape_is_object = {
            let mut data = self.handle.borrow_mut()?;
            match data.get_mut(name) {
                Some(existing) => merge_values(existing, value),
                None => {
                    data.insert(name.to_owned(), value);
                }
            }
            data.get(name).is_some_and(Value::is_object)
        };
        if !merged_shape_is_object {
            self.evict(name);
        }
        Ok(())
    }

    /// Reads `data[name]` (or the default), lets `f` modify it, and writes it
    /// back.
    pub fn alter<T, F>(&self, name: &str, f: F) -> Result<()>
    where
        T: DeserializeOwned + Serialize + Default,
        F: FnOnce(&mut T),
    {
        let mut value: T = self.get_or_default(name)?;
        f(&mut value);
        self.apply(name, &value)
    }

    /// Removes `data[name]` and drops its cached sub-element.
    pub fn remove(&self, name: &str) -> Result<Option<Value>> {
        let removed = self.handle.borrow_mut()?.shift_remove(name);
        self.evict(name);
        Ok(removed)
    }

    fn put(&self, name: &str, value: Value) -> Result<()> {
        let is_object = value.is_object();
        self.handle.borrow_mut()?.insert(name.to_owned(), value);
        if !is_object {
            self.evict(name);
        }
        Ok(())
    }
}

impl Default for ContentElement {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for ContentElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("ContentElement");
        out.field("path", &self.handle.path());
        match self.handle.borrow() {
            Ok(data) => out.field("data", &*data),
            Err(_) => out.field("data", &"<detached>"),
        };
        out.field("cached", &self.elements.borrow().len()).finish()
    }
}
