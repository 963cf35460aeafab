#![forbid(unsafe_code)]

mod store;

pub use store::StoreError;
pub use store::{MovePathRequest, PropertyPatchRequest, PropertyStore};
