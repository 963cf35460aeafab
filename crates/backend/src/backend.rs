#![forbid(unsafe_code)]

use crate::cache::RequestCache;
use crate::ignored::is_ignored;
use crate::propfind::PropFind;
use crate::proppatch::PropPatch;
use crate::storage::PropertyStorage;
use crate::tree::ResourceTree;
use ds_core::ids::UserId;
use ds_core::model::PropertyUpdate;
use ds_core::paths::DavPath;
use ds_storage::StoreError;
use std::collections::{BTreeMap, BTreeSet};

/// Custom-property backend for one protocol request. Borrows the
/// process-wide store for the request's duration; the request cache lives
/// and dies with the backend value. The user identity arrives already
/// resolved.
pub struct CustomPropertiesBackend<'s, S: PropertyStorage, T: ResourceTree> {
    store: &'s mut S,
    tree: T,
    user: UserId,
    cache: RequestCache,
}

impl<'s, S: PropertyStorage, T: ResourceTree> CustomPropertiesBackend<'s, S, T> {
    pub fn new(store: &'s mut S, tree: T, user: UserId) -> Self {
        Self {
            store,
            tree,
            user,
            cache: RequestCache::new(),
        }
    }

    /// PROPFIND callback. Storage is touched only when at least one
    /// non-ignored requested name is still unanswered; an unresolvable path
    /// has no custom properties and is skipped silently.
    pub fn prop_find(&mut self, path: &DavPath, propfind: &mut PropFind) -> Result<(), StoreError> {
        let Ok(resource) = self.tree.resolve(path) else {
            return Ok(());
        };

        let mut outstanding: BTreeSet<String> = propfind
            .pending()
            .into_iter()
            .map(str::to_string)
            .collect();
        outstanding.extend(propfind.requested().iter().cloned());
        outstanding.retain(|name| !is_ignored(name));
        if outstanding.is_empty() {
            return Ok(());
        }

        let props = self
            .cache
            .get_or_load(&mut *self.store, &self.user, resource.path())?;
        for name in &outstanding {
            if let Some(value) = props.get(name) {
                propfind.set(name, value.clone(), 200);
            }
        }
        Ok(())
    }

    /// PROPPATCH callback: register the commit handler. The engine finalizes
    /// the patch with `PropPatch::commit`, which applies the mutations in one
    /// storage transaction.
    pub fn prop_patch<'b>(&'b mut self, path: &DavPath, patch: &mut PropPatch<'b>) {
        let path = path.clone();
        patch.handle_remaining(move |mutations| self.commit_patch(&path, mutations));
    }

    /// Depth-aware bulk load: one subtree query ahead of a collection walk.
    pub fn preload(&mut self, path: &DavPath) -> Result<(), StoreError> {
        self.cache.preload(&mut *self.store, &self.user, path)
    }

    /// Lifecycle hook from the resource tree: the resource was destroyed.
    pub fn delete(&mut self, path: &DavPath) -> Result<(), StoreError> {
        self.store.delete_all(&self.user, path)?;
        self.cache.invalidate(path);
        Ok(())
    }

    /// Lifecycle hook from the resource tree: the resource (and its subtree)
    /// was renamed.
    pub fn move_resource(&mut self, from: &DavPath, to: &DavPath) -> Result<(), StoreError> {
        self.store.move_path(&self.user, from, to)?;
        self.cache.invalidate(from);
        self.cache.invalidate(to);
        Ok(())
    }

    fn commit_patch(
        &mut self,
        path: &DavPath,
        mutations: &[(String, PropertyUpdate)],
    ) -> Result<BTreeMap<String, u16>, StoreError> {
        self.store.apply_patch(&self.user, path, mutations)?;
        self.cache.invalidate(path);

        let mut statuses = BTreeMap::new();
        for (name, _) in mutations {
            statuses.insert(name.clone(), 200);
        }
        Ok(statuses)
    }
}
