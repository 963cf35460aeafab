#![forbid(unsafe_code)]

mod backend;
mod cache;
mod ignored;
mod propfind;
mod proppatch;
mod storage;
mod tree;

pub use backend::CustomPropertiesBackend;
pub use cache::RequestCache;
pub use ignored::{IGNORED_PROPERTIES, is_ignored};
pub use propfind::PropFind;
pub use proppatch::PropPatch;
pub use storage::PropertyStorage;
pub use tree::{NotFound, Resource, ResourceTree};
