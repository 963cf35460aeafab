#![forbid(unsafe_code)]

use ds_core::ids::UserId;
use ds_core::model::{PropertyMap, PropertyUpdate};
use ds_core::paths::DavPath;
use ds_storage::{MovePathRequest, PropertyPatchRequest, PropertyStore, StoreError};
use std::collections::BTreeMap;

/// The slice of the store the protocol adapter drives. Test doubles wrap a
/// real store behind this seam to observe (and count) every storage call.
pub trait PropertyStorage {
    fn get_all(&mut self, user: &UserId, path: &DavPath) -> Result<PropertyMap, StoreError>;

    fn get_subtree(
        &mut self,
        user: &UserId,
        path: &DavPath,
    ) -> Result<BTreeMap<String, PropertyMap>, StoreError>;

    fn apply_patch(
        &mut self,
        user: &UserId,
        path: &DavPath,
        mutations: &[(String, PropertyUpdate)],
    ) -> Result<(), StoreError>;

    fn delete_all(&mut self, user: &UserId, path: &DavPath) -> Result<(), StoreError>;

    fn move_path(&mut self, user: &UserId, from: &DavPath, to: &DavPath)
    -> Result<(), StoreError>;
}

impl PropertyStorage for PropertyStore {
    fn get_all(&mut self, user: &UserId, path: &DavPath) -> Result<PropertyMap, StoreError> {
        PropertyStore::get_all(self, user, path)
    }

    fn get_subtree(
        &mut self,
        user: &UserId,
        path: &DavPath,
    ) -> Result<BTreeMap<String, PropertyMap>, StoreError> {
        PropertyStore::get_subtree(self, user, path)
    }

    fn apply_patch(
        &mut self,
        user: &UserId,
        path: &DavPath,
        mutations: &[(String, PropertyUpdate)],
    ) -> Result<(), StoreError> {
        PropertyStore::apply_patch(
            self,
            user,
            PropertyPatchRequest {
                path: path.clone(),
                mutations: mutations.to_vec(),
            },
        )
    }

    fn delete_all(&mut self, user: &UserId, path: &DavPath) -> Result<(), StoreError> {
        PropertyStore::delete_all(self, user, path)
    }

    fn move_path(
        &mut self,
        user: &UserId,
        from: &DavPath,
        to: &DavPath,
    ) -> Result<(), StoreError> {
        PropertyStore::move_path(
            self,
            user,
            MovePathRequest {
                from: from.clone(),
                to: to.clone(),
            },
        )
    }
}
