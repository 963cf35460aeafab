#![forbid(unsafe_code)]

use crate::storage::PropertyStorage;
use ds_core::ids::UserId;
use ds_core::model::PropertyMap;
use ds_core::paths::DavPath;
use ds_storage::StoreError;
use std::collections::HashMap;
use std::collections::hash_map::Entry;

/// Per-request property cache. A collection PROPFIND enumerates many
/// resources within one request; the cache collapses those into at most one
/// storage round-trip per path (or a single subtree query after `preload`).
/// Dropped with the request, never shared, never locked.
#[derive(Debug, Default)]
pub struct RequestCache {
    entries: HashMap<String, PropertyMap>,
    preloaded: Vec<DavPath>,
}

impl RequestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_load<'c, S: PropertyStorage + ?Sized>(
        &'c mut self,
        store: &mut S,
        user: &UserId,
        path: &DavPath,
    ) -> Result<&'c PropertyMap, StoreError> {
        if !self.entries.contains_key(path.as_str()) && self.covered_by_preload(path) {
            // The subtree query already saw everything below the preloaded
            // root; an unlisted path simply has no stored properties.
            self.entries
                .insert(path.as_str().to_string(), PropertyMap::new());
        }
        match self.entries.entry(path.as_str().to_string()) {
            Entry::Occupied(hit) => Ok(hit.into_mut()),
            Entry::Vacant(miss) => Ok(miss.insert(store.get_all(user, path)?)),
        }
    }

    /// One bulk query for a collection and everything below it.
    pub fn preload<S: PropertyStorage + ?Sized>(
        &mut self,
        store: &mut S,
        user: &UserId,
        root: &DavPath,
    ) -> Result<(), StoreError> {
        let subtree = store.get_subtree(user, root)?;
        for (path, props) in subtree {
            self.entries.insert(path, props);
        }
        if !self.preloaded.iter().any(|existing| existing == root) {
            self.preloaded.push(root.clone());
        }
        Ok(())
    }

    /// Drop everything the cache claims to know about `path` and its subtree.
    /// A mutation in the same request must not read stale entries back.
    pub fn invalidate(&mut self, path: &DavPath) {
        let prefix = format!("{}/", path.as_str());
        self.entries
            .retain(|key, _| key.as_str() != path.as_str() && !key.starts_with(&prefix));
        self.preloaded.retain(|root| {
            root != path && !root.is_ancestor_of(path) && !path.is_ancestor_of(root)
        });
    }

    fn covered_by_preload(&self, path: &DavPath) -> bool {
        self.preloaded
            .iter()
            .any(|root| root == path || root.is_ancestor_of(path))
    }
}
