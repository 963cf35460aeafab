#![forbid(unsafe_code)]

use std::collections::BTreeMap;

/// PROPFIND carrier: the names one request asked for plus the answers
/// resolved so far. Earlier protocol stages may have answered some names
/// before this backend runs; `pending` is what is still open.
#[derive(Debug)]
pub struct PropFind {
    requested: Vec<String>,
    resolved: BTreeMap<String, (String, u16)>,
}

impl PropFind {
    pub fn new(requested: Vec<String>) -> Self {
        Self {
            requested,
            resolved: BTreeMap::new(),
        }
    }

    pub fn requested(&self) -> &[String] {
        &self.requested
    }

    /// Requested names with no answer yet (the engine's "404 properties").
    pub fn pending(&self) -> Vec<&str> {
        self.requested
            .iter()
            .map(String::as_str)
            .filter(|name| !self.resolved.contains_key(*name))
            .collect()
    }

    /// Report one property as resolved.
    pub fn set(&mut self, name: &str, value: String, status: u16) {
        self.resolved.insert(name.to_string(), (value, status));
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.resolved.get(name).map(|(value, _)| value.as_str())
    }

    pub fn status(&self, name: &str) -> Option<u16> {
        self.resolved.get(name).map(|(_, status)| *status)
    }
}
