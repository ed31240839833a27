//! Field resolution: the read path a query executor takes through content.

use std::rc::Rc;

use folio_model::{ContentElement, ContentError, ContentItem};
use folio_types::PropertyPath;
use serde_json::Value;
use tracing::debug;

use crate::error::{QueryError, Result};
use crate::limits::QueryLimits;

/// Decides whether content of a given type may be read.
pub trait ContentPermissions {
    fn can_read(&self, content_type: &str) -> bool;
}

impl<F> ContentPermissions for F
where
    F: Fn(&str) -> bool,
{
    fn can_read(&self, content_type: &str) -> bool {
        self(content_type)
    }
}

/// Grants read access to every content type.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl ContentPermissions for AllowAll {
    fn can_read(&self, _content_type: &str) -> bool {
        true
    }
}

/// Resolves dotted field paths against content items under a set of limits.
pub struct FieldResolver<'a, P: ContentPermissions = AllowAll> {
    limits: &'a QueryLimits,
    permissions: P,
}

impl<'a> FieldResolver<'a, AllowAll> {
    pub fn new(limits: &'a QueryLimits) -> Self {
        Self {
            limits,
            permissions: AllowAll,
        }
    }
}

impl<'a, P: ContentPermissions> FieldResolver<'a, P> {
    pub fn with_permissions(limits: &'a QueryLimits, permissions: P) -> Self {
        Self {
            limits,
            permissions,
        }
    }

    pub fn limits(&self) -> &QueryLimits {
        self.limits
    }

    fn authorize(&self, item: &ContentItem) -> Result<()> {
        let content_type = item.content_type();
        if !self.permissions.can_read(&content_type) {
            return Err(QueryError::PermissionDenied { content_type });
        }
        Ok(())
    }

    /// Resolves `path` against `item`.
    ///
    /// Mapping-valued segments are walked as named sub-elements, so repeated
    /// resolutions reuse the item's element cache; the first non-mapping
    /// segment hands the rest of the path to the dynamic view.
    pub fn resolve(&self, item: &ContentItem, path: &str) -> Result<Value> {
        self.authorize(item)?;
        let path = PropertyPath::parse(path);
        self.limits.check_depth(path.len())?;

        let segments = path.segments();
        let mut current: Option<Rc<ContentElement>> = None;
        for (index, segment) in segments.iter().enumerate() {
            let element = current.as_deref().unwrap_or(item.element());
            if !element.has(segment) {
                return Err(ContentError::MissingProperty {
                    name: segments[..=index].join("."),
                }
                .into());
            }
            let rest = &segments[index..];
            if rest.len() == 1 {
                return lookup(element, rest, segments);
            }
            match element.get_element(segment) {
                Ok(child) => current = Some(child),
                Err(err) if err.is_shape_mismatch() => return lookup(element, rest, segments),
                Err(err) => return Err(err.into()),
            }
        }

        let element = current.as_deref().unwrap_or(item.element());
        Ok(Value::Object(element.snapshot()?))
    }

    /// Resolves every path in `paths`, checking the combined cost first.
    pub fn resolve_all(&self, item: &ContentItem, paths: &[&str]) -> Result<Vec<Value>> {
        self.limits.check_complexity(paths.len())?;
        paths.iter().map(|path| self.resolve(item, path)).collect()
    }

    /// Selects the readable items of a listing, limited to the page size the
    /// limits allow for `first`.
    pub fn page<'i>(
        &self,
        items: &'i [ContentItem],
        first: Option<usize>,
    ) -> Result<Vec<&'i ContentItem>> {
        let count = self.limits.check_result_count(first)?;
        let page: Vec<&ContentItem> = items
            .iter()
            .filter(|item| self.permissions.can_read(&item.content_type()))
            .take(count)
            .collect();
        debug!(requested = ?first, count, returned = page.len(), "paged content items");
        Ok(page)
    }
}

fn lookup(element: &ContentElement, rest: &[String], full: &[String]) -> Result<Value> {
    element
        .content()
        .get(rest.join(".").as_str())
        .ok_or_else(|| {
            ContentError::MissingProperty {
                name: full.join("."),
            }
            .into()
        })
}
