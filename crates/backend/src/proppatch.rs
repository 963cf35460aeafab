#![forbid(unsafe_code)]

use ds_core::model::PropertyUpdate;
use ds_storage::StoreError;
use std::collections::BTreeMap;

type PatchHandler<'a> =
    Box<dyn FnOnce(&[(String, PropertyUpdate)]) -> Result<BTreeMap<String, u16>, StoreError> + 'a>;

/// PROPPATCH carrier: the ordered mutation list and, after `commit`, the
/// per-property status codes. Two-phase: the backend registers a commit
/// handler during dispatch; the engine finalizes with `commit`.
pub struct PropPatch<'a> {
    mutations: Vec<(String, PropertyUpdate)>,
    handler: Option<PatchHandler<'a>>,
    result: BTreeMap<String, u16>,
}

impl<'a> PropPatch<'a> {
    pub fn new(mutations: Vec<(String, PropertyUpdate)>) -> Self {
        Self {
            mutations,
            handler: None,
            result: BTreeMap::new(),
        }
    }

    pub fn mutations(&self) -> &[(String, PropertyUpdate)] {
        &self.mutations
    }

    /// Register the handler that will apply every still-unclaimed mutation
    /// when the patch is finalized.
    pub fn handle_remaining(
        &mut self,
        handler: impl FnOnce(&[(String, PropertyUpdate)]) -> Result<BTreeMap<String, u16>, StoreError>
        + 'a,
    ) {
        self.handler = Some(Box::new(handler));
    }

    /// Finalize the patch. Mutations no handler claimed fail with 403; a
    /// storage failure inside the handler aborts the whole request.
    pub fn commit(&mut self) -> Result<bool, StoreError> {
        match self.handler.take() {
            Some(handler) => {
                let statuses = handler(&self.mutations)?;
                self.result.extend(statuses);
                Ok(true)
            }
            None => {
                for (name, _) in &self.mutations {
                    self.result.insert(name.clone(), 403);
                }
                Ok(false)
            }
        }
    }

    pub fn status(&self, name: &str) -> Option<u16> {
        self.result.get(name).copied()
    }

    pub fn result(&self) -> &BTreeMap<String, u16> {
        &self.result
    }
}
