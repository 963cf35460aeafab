#![forbid(unsafe_code)]

use ds_core::model::PropertyUpdate;
use ds_core::paths::DavPath;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MovePathRequest {
    pub from: DavPath,
    pub to: DavPath,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PropertyPatchRequest {
    pub path: DavPath,
    /// Applied in the order supplied by the request.
    pub mutations: Vec<(String, PropertyUpdate)>,
}
