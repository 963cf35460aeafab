#![allow(dead_code)]

use ds_backend::{NotFound, PropertyStorage, Resource, ResourceTree};
use ds_core::ids::UserId;
use ds_core::model::{PropertyMap, PropertyUpdate};
use ds_core::paths::DavPath;
use ds_storage::{PropertyStore, StoreError};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub(crate) fn temp_dir(test_name: &str) -> PathBuf {
    let base = std::env::temp_dir();
    let pid = std::process::id();
    let nonce = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis();
    let dir = base.join(format!("ds_backend_{test_name}_{pid}_{nonce}"));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

pub(crate) fn user() -> UserId {
    UserId::try_new("dummy_user_42").expect("user id")
}

pub(crate) fn dav_path(raw: &str) -> DavPath {
    DavPath::try_new(raw).expect("dav path")
}

/// Tree fake: resolves exactly the paths registered up front, like the
/// node map the protocol engine keeps per request.
pub(crate) struct FakeTree {
    resources: Vec<DavPath>,
}

impl FakeTree {
    pub(crate) fn new() -> Self {
        Self {
            resources: Vec::new(),
        }
    }

    pub(crate) fn with(mut self, path: &DavPath) -> Self {
        self.resources.push(path.clone());
        self
    }
}

impl ResourceTree for FakeTree {
    fn resolve(&self, path: &DavPath) -> Result<Resource, NotFound> {
        if self.resources.iter().any(|known| known == path) {
            Ok(Resource::new(path.clone()))
        } else {
            Err(NotFound)
        }
    }
}

/// Store wrapper counting every storage call, so tests can assert the
/// zero-storage-access invariant and the cache's query budget.
pub(crate) struct CountingStore {
    pub(crate) inner: PropertyStore,
    pub(crate) calls: usize,
}

impl CountingStore {
    pub(crate) fn new(inner: PropertyStore) -> Self {
        Self { inner, calls: 0 }
    }
}

impl PropertyStorage for CountingStore {
    fn get_all(&mut self, user: &UserId, path: &DavPath) -> Result<PropertyMap, StoreError> {
        self.calls += 1;
        PropertyStorage::get_all(&mut self.inner, user, path)
    }

    fn get_subtree(
        &mut self,
        user: &UserId,
        path: &DavPath,
    ) -> Result<BTreeMap<String, PropertyMap>, StoreError> {
        self.calls += 1;
        PropertyStorage::get_subtree(&mut self.inner, user, path)
    }

    fn apply_patch(
        &mut self,
        user: &UserId,
        path: &DavPath,
        mutations: &[(String, PropertyUpdate)],
    ) -> Result<(), StoreError> {
        self.calls += 1;
        PropertyStorage::apply_patch(&mut self.inner, user, path, mutations)
    }

    fn delete_all(&mut self, user: &UserId, path: &DavPath) -> Result<(), StoreError> {
        self.calls += 1;
        PropertyStorage::delete_all(&mut self.inner, user, path)
    }

    fn move_path(
        &mut self,
        user: &UserId,
        from: &DavPath,
        to: &DavPath,
    ) -> Result<(), StoreError> {
        self.calls += 1;
        PropertyStorage::move_path(&mut self.inner, user, from, to)
    }
}
