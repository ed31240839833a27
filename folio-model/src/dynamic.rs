//! String-keyed access to an element's data by property path.

use std::fmt;

use folio_types::PropertyPath;
use serde_json::{Map, Value};
use tracing::trace;

use crate::error::Result;
use crate::store::{self, MapHandle};

/// Untyped view over an element's backing mapping.
///
/// Paths are dotted (`Body.Text`); numeric segments index into arrays
/// (`Items.0.Title`). Reads return owned values, writes land directly in the
/// element's data. Obtain one through [`ContentElement::content`].
///
/// [`ContentElement::content`]: crate::ContentElement::content
#[derive(Clone)]
pub struct DynamicObject {
    handle: MapHandle,
}

impl DynamicObject {
    pub(crate) fn new(handle: MapHandle) -> Self {
        Self { handle }
    }

    /// Value at `path`, or `None` if any segment is absent. The empty path
    /// yields the whole mapping.
    pub fn get(&self, path: impl Into<PropertyPath>) -> Option<Value> {
        let path = path.into();
        let data = self.handle.borrow().ok()?;
        if path.is_root() {
            return Some(Value::Object(data.clone()));
        }
        store::lookup(&data, path.segments()).cloned()
    }

    pub fn get_str(&self, path: impl Into<PropertyPath>) -> Option<String> {
        self.with_value(path, |value| value.as_str().map(str::to_owned))
    }

    pub fn get_bool(&self, path: impl Into<PropertyPath>) -> Option<bool> {
        self.with_value(path, Value::as_bool)
    }

    pub fn get_f64(&self, path: impl Into<PropertyPath>) -> Option<f64> {
        self.with_value(path, Value::as_f64)
    }

    pub fn get_i64(&self, path: impl Into<PropertyPath>) -> Option<i64> {
        self.with_value(path, Value::as_i64)
    }

    /// Whether `path` resolves to a value (including `null`).
    pub fn contains(&self, path: impl Into<PropertyPath>) -> bool {
        let path = path.into();
        let Ok(data) = self.handle.borrow() else {
            return false;
        };
        path.is_root() || store::lookup(&data, path.segments()).is_some()
    }

    /// Writes `value` at `path`, creating intermediate mappings as needed.
    /// Returns the value previously stored there.
    pub fn set(
        &self,
        path: impl Into<PropertyPath>,
        value: impl Into<Value>,
    ) -> Result<Option<Value>> {
        let path = path.into();
        let mut data = self.handle.borrow_mut()?;
        trace!(element = %self.handle.path(), %path, "dynamic set");
        store::assign(&mut data, path.segments(), value.into())
    }

    /// Removes the value at `path`, returning it.
    pub fn remove(&self, path: impl Into<PropertyPath>) -> Option<Value> {
        let path = path.into();
        let mut data = self.handle.borrow_mut().ok()?;
        trace!(element = %self.handle.path(), %path, "dynamic remove");
        store::take(&mut data, path.segments())
    }

    /// Runs `f` against the borrowed value at `path`.
    pub fn with_value<R>(
        &self,
        path: impl Into<PropertyPath>,
        f: impl FnOnce(&Value) -> Option<R>,
    ) -> Option<R> {
        let path = path.into();
        let data = self.handle.borrow().ok()?;
        store::lookup(&data, path.segments()).and_then(f)
    }

    /// Runs `f` against the borrowed backing mapping.
    pub fn with_data<R>(&self, f: impl FnOnce(&Map<String, Value>) -> R) -> Result<R> {
        let data = self.handle.borrow()?;
        Ok(f(&data))
    }

    /// Runs `f` against the mutably borrowed backing mapping.
    pub fn with_data_mut<R>(&self, f: impl FnOnce(&mut Map<String, Value>) -> R) -> Result<R> {
        let mut data = self.handle.borrow_mut()?;
        Ok(f(&mut data))
    }

    /// Owned copy of the backing mapping.
    pub fn snapshot(&self) -> Result<Map<String, Value>> {
        self.with_data(Map::clone)
    }

    /// Whether both views address the same mapping of the same document.
    pub fn same_data(&self, other: &DynamicObject) -> bool {
        self.handle.same_storage(&other.handle)
    }
}

impl fmt::Debug for DynamicObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DynamicObject")
            .field("path", &self.handle.path())
            .finish()
    }
}
