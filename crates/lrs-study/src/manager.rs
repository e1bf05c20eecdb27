use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use lrs_model::{StudyInstanceUid, StudyMetadata};

/// Shared registry of loaded studies, keyed by study instance UID.
///
/// Injected into collaborators rather than held as process-global state.
#[derive(Debug, Default)]
pub struct StudyMetadataManager {
    studies: RwLock<BTreeMap<StudyInstanceUid, Arc<StudyMetadata>>>,
}

impl StudyMetadataManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, study: Arc<StudyMetadata>) {
        let mut studies = self.studies.write().expect("study manager lock");
        studies.insert(study.study_instance_uid.clone(), study);
    }

    pub fn get(&self, study_instance_uid: &StudyInstanceUid) -> Option<Arc<StudyMetadata>> {
        let studies = self.studies.read().expect("study manager lock");
        studies.get(study_instance_uid).cloned()
    }

    /// All loaded studies, in UID order.
    pub fn all(&self) -> Vec<Arc<StudyMetadata>> {
        let studies = self.studies.read().expect("study manager lock");
        studies.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.studies.read().expect("study manager lock").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
