#![forbid(unsafe_code)]

use ds_core::paths::DavPath;

/// Resolution failure: nothing lives at the requested path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NotFound;

impl std::fmt::Display for NotFound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "resource not found")
    }
}

impl std::error::Error for NotFound {}

/// A resolved resource, reduced to the one thing this backend needs from it:
/// its canonical path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Resource {
    path: DavPath,
}

impl Resource {
    pub fn new(path: DavPath) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &DavPath {
        &self.path
    }
}

/// The external resource tree, narrowed to path resolution so tests can
/// substitute a fake.
pub trait ResourceTree {
    fn resolve(&self, path: &DavPath) -> Result<Resource, NotFound>;
}
