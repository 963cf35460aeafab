#![forbid(unsafe_code)]

use std::collections::HashSet;
use std::sync::OnceLock;

/// Property names other subsystems compute before this backend runs
/// (permission flags, download URLs, sizes, share state). The backend must
/// never read or write these.
pub const IGNORED_PROPERTIES: [&str; 5] = [
    "{http://owncloud.org/ns}permissions",
    "{http://owncloud.org/ns}downloadURL",
    "{http://owncloud.org/ns}dDC",
    "{http://owncloud.org/ns}size",
    "{http://owncloud.org/ns}share-types",
];

pub fn is_ignored(name: &str) -> bool {
    static SET: OnceLock<HashSet<&'static str>> = OnceLock::new();
    SET.get_or_init(|| IGNORED_PROPERTIES.iter().copied().collect())
        .contains(name)
}
