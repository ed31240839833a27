//! Shared backing storage and path navigation.
//!
//! A document owns exactly one `Map` behind `Rc<RefCell<_>>`. Every element
//! and dynamic view in that document holds a [`MapHandle`]: the shared root
//! plus the property path of the mapping it stands for. Handles never copy
//! data, so a write through any handle is visible through all of them.
//!
//! Handle paths are raw key lists and are never re-parsed, so any key that
//! holds a mapping can be addressed, including empty or dotted ones.

use std::cell::{Ref, RefCell, RefMut};
use std::rc::Rc;

use serde_json::{Map, Value};

use crate::error::{kind_of, ContentError, Result};

pub type SharedMap = Rc<RefCell<Map<String, Value>>>;

#[derive(Clone)]
pub(crate) struct MapHandle {
    root: SharedMap,
    segments: Vec<String>,
}

impl MapHandle {
    pub(crate) fn root(root: SharedMap) -> Self {
        Self {
            root,
            segments: Vec::new(),
        }
    }

    pub(crate) fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        Self {
            root: Rc::clone(&self.root),
            segments,
        }
    }

    /// Dotted rendering of the path, for diagnostics only.
    pub(crate) fn path(&self) -> String {
        self.segments.join(".")
    }

    pub(crate) fn shared_root(&self) -> &SharedMap {
        &self.root
    }

    pub(crate) fn same_storage(&self, other: &MapHandle) -> bool {
        Rc::ptr_eq(&self.root, &other.root) && self.segments == other.segments
    }

    /// Borrows the mapping this handle addresses.
    ///
    /// Panics if the document is currently mutably borrowed; guards must not
    /// be held across writes to the same document.
    pub(crate) fn borrow(&self) -> Result<Ref<'_, Map<String, Value>>> {
        let segments = &self.segments;
        Ref::filter_map(self.root.borrow(), |root| object_at(root, segments))
            .map_err(|_| self.detached())
    }

    pub(crate) fn borrow_mut(&self) -> Result<RefMut<'_, Map<String, Value>>> {
        let segments = &self.segments;
        RefMut::filter_map(self.root.borrow_mut(), |root| object_at_mut(root, segments))
            .map_err(|_| self.detached())
    }

    fn detached(&self) -> ContentError {
        ContentError::Detached {
            path: self.path(),
        }
    }
}

fn object_at<'a>(root: &'a Map<String, Value>, segments: &[String]) -> Option<&'a Map<String, Value>> {
    segments
        .iter()
        .try_fold(root, |map, segment| map.get(segment)?.as_object())
}

fn object_at_mut<'a>(
    root: &'a mut Map<String, Value>,
    segments: &[String],
) -> Option<&'a mut Map<String, Value>> {
    segments
        .iter()
        .try_fold(root, |map, segment| map.get_mut(segment)?.as_object_mut())
}

fn parse_index(segment: &str) -> Option<usize> {
    segment.parse().ok()
}

fn step<'a>(value: &'a Value, segment: &str) -> Option<&'a Value> {
    match value {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => items.get(parse_index(segment)?),
        _ => None,
    }
}

/// Looks up a value by path, descending through mappings and sequences.
pub(crate) fn lookup<'a>(map: &'a Map<String, Value>, segments: &[String]) -> Option<&'a Value> {
    let (first, rest) = segments.split_first()?;
    rest.iter()
        .try_fold(map.get(first)?, |value, segment| step(value, segment))
}

fn lookup_mut<'a>(map: &'a mut Map<String, Value>, segments: &[String]) -> Option<&'a mut Value> {
    let (first, rest) = segments.split_first()?;
    let mut current = map.get_mut(first)?;
    for segment in rest {
        current = match current {
            Value::Object(map) => map.get_mut(segment)?,
            Value::Array(items) => items.get_mut(parse_index(segment)?)?,
            _ => return None,
        };
    }
    Some(current)
}

fn prefix(segments: &[String], upto: usize) -> String {
    segments[..=upto].join(".")
}

/// Walks to the container of the last segment, creating empty mappings for
/// absent (or null) intermediate properties.
fn container_mut<'a>(
    map: &'a mut Map<String, Value>,
    parents: &[String],
) -> Result<&'a mut Value> {
    let (first, rest) = parents
        .split_first()
        .ok_or_else(|| ContentError::missing(String::new()))?;
    let mut current = map
        .entry(first.clone())
        .or_insert_with(|| Value::Object(Map::new()));
    for (offset, segment) in rest.iter().enumerate() {
        if current.is_null() {
            *current = Value::Object(Map::new());
        }
        current = match current {
            Value::Object(map) => map
                .entry(segment.clone())
                .or_insert_with(|| Value::Object(Map::new())),
            Value::Array(items) => {
                let len = items.len();
                let index = parse_index(segment).ok_or_else(|| ContentError::ShapeMismatch {
                    name: prefix(parents, offset),
                    expected: "object",
                    found: "array",
                })?;
                items.get_mut(index).ok_or_else(|| ContentError::IndexOutOfBounds {
                    name: prefix(parents, offset),
                    index,
                    len,
                })?
            }
            other => return Err(ContentError::not_an_object(prefix(parents, offset), other)),
        };
    }
    Ok(current)
}

/// Writes `value` at `segments`, returning the previous value if any.
pub(crate) fn assign(
    map: &mut Map<String, Value>,
    segments: &[String],
    value: Value,
) -> Result<Option<Value>> {
    let Some((last, parents)) = segments.split_last() else {
        return match value {
            Value::Object(replacement) => {
                let previous = std::mem::replace(map, replacement);
                Ok(Some(Value::Object(previous)))
            }
            other => Err(ContentError::not_an_object("", &other)),
        };
    };
    if parents.is_empty() {
        return Ok(map.insert(last.clone(), value));
    }

    let container = container_mut(map, parents)?;
    if container.is_null() {
        *container = Value::Object(Map::new());
    }
    match container {
        Value::Object(map) => Ok(map.insert(last.clone(), value)),
        Value::Array(items) => {
            let len = items.len();
            let name = parents.join(".");
            let index = parse_index(last).ok_or(ContentError::ShapeMismatch {
                name: name.clone(),
                expected: "object",
                found: "array",
            })?;
            match index.cmp(&len) {
                std::cmp::Ordering::Less => Ok(Some(std::mem::replace(&mut items[index], value))),
                std::cmp::Ordering::Equal => {
                    items.push(value);
                    Ok(None)
                }
                std::cmp::Ordering::Greater => {
                    Err(ContentError::IndexOutOfBounds { name, index, len })
                }
            }
        }
        other => Err(ContentError::ShapeMismatch {
            name: parents.join("."),
            expected: "object",
            found: kind_of(other),
        }),
    }
}

/// Removes the value at `segments`, preserving the order of its siblings.
pub(crate) fn take(map: &mut Map<String, Value>, segments: &[String]) -> Option<Value> {
    let (last, parents) = segments.split_last()?;
    if parents.is_empty() {
        return map.shift_remove(last);
    }
    match lookup_mut(map, parents)? {
        Value::Object(map) => map.shift_remove(last),
        Value::Array(items) => {
            let index = parse_index(last)?;
            (index < items.len()).then(|| items.remove(index))
        }
        _ => None,
    }
}

/// Deep-merges `source` into `target`: mappings merge key by key, anything
/// else replaces the target value.
pub(crate) fn merge_values(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target), Value::Object(source)) => {
            for (key, value) in source {
                match target.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        target.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}
