use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use lrs_model::StudyInstanceUid;

use crate::raw::RawStudy;

/// Write-through index of raw study payloads, keyed by study instance UID.
///
/// Other subsystems resolve WADO-style raw metadata here without going
/// through the structured manager.
#[derive(Debug, Default)]
pub struct RawMetadataIndex {
    entries: RwLock<BTreeMap<StudyInstanceUid, Arc<RawStudy>>>,
}

impl RawMetadataIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register raw metadata for downstream lookup, replacing any previous
    /// entry for the same study.
    pub fn update(&self, raw: &RawStudy) {
        let mut entries = self.entries.write().expect("raw metadata index lock");
        entries.insert(raw.study_instance_uid.clone(), Arc::new(raw.clone()));
    }

    pub fn get(&self, study_instance_uid: &StudyInstanceUid) -> Option<Arc<RawStudy>> {
        let entries = self.entries.read().expect("raw metadata index lock");
        entries.get(study_instance_uid).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().expect("raw metadata index lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
