//! Single-flight study metadata loading.
//!
//! Concurrent loads of the same study attach to one shared in-flight
//! future; the loading-state map is observable status only and never
//! gates a fetch by itself.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use futures::FutureExt;
use futures::future::{BoxFuture, Shared};

use lrs_model::{LoadingState, StudyInstanceUid, StudyMetadata};

use crate::display_sets::build_display_sets;
use crate::error::StudyLoadError;
use crate::index::RawMetadataIndex;
use crate::manager::StudyMetadataManager;
use crate::metadata::structure_study;
use crate::retrieve::{Server, StudyMetadataRetriever};
use crate::sorting::sort_study;

type SharedLoad = Shared<BoxFuture<'static, Result<Arc<StudyMetadata>, StudyLoadError>>>;

pub struct StudyLoader {
    retriever: Arc<dyn StudyMetadataRetriever>,
    index: Arc<RawMetadataIndex>,
    manager: Arc<StudyMetadataManager>,
    states: Mutex<HashMap<StudyInstanceUid, LoadingState>>,
    in_flight: Mutex<HashMap<StudyInstanceUid, SharedLoad>>,
}

impl StudyLoader {
    pub fn new(
        retriever: Arc<dyn StudyMetadataRetriever>,
        index: Arc<RawMetadataIndex>,
        manager: Arc<StudyMetadataManager>,
    ) -> Self {
        Self {
            retriever,
            index,
            manager,
            states: Mutex::new(HashMap::new()),
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn manager(&self) -> &Arc<StudyMetadataManager> {
        &self.manager
    }

    pub fn index(&self) -> &Arc<RawMetadataIndex> {
        &self.index
    }

    /// Current loading status of a study; `NotLoaded` when never requested.
    pub fn loading_state(&self, study_instance_uid: &StudyInstanceUid) -> LoadingState {
        let states = self.states.lock().expect("loading state lock");
        states
            .get(study_instance_uid)
            .copied()
            .unwrap_or(LoadingState::NotLoaded)
    }

    /// Load a study's metadata: fetch from the server, sort series and
    /// instances, register raw data in the metadata index, build the
    /// structured object with display sets, and register it in the
    /// manager.
    ///
    /// Already-loaded studies resolve from the manager; a concurrent load
    /// of the same study shares one fetch. Failures mark the state
    /// `Failed` and propagate to every waiter.
    pub async fn load_study(
        self: &Arc<Self>,
        server: &Server,
        study_instance_uid: &StudyInstanceUid,
    ) -> Result<Arc<StudyMetadata>, StudyLoadError> {
        if let Some(study) = self.manager.get(study_instance_uid) {
            return Ok(study);
        }

        let load = {
            let mut in_flight = self.in_flight.lock().expect("in-flight map lock");
            if let Some(existing) = in_flight.get(study_instance_uid) {
                tracing::debug!(study = %study_instance_uid, "attaching to in-flight study load");
                existing.clone()
            } else {
                self.set_state(study_instance_uid, LoadingState::Loading);
                let load = Self::fetch_and_register(
                    Arc::clone(self),
                    server.clone(),
                    study_instance_uid.clone(),
                )
                .boxed()
                .shared();
                in_flight.insert(study_instance_uid.clone(), load.clone());
                load
            }
        };

        let result = load.await;
        self.in_flight
            .lock()
            .expect("in-flight map lock")
            .remove(study_instance_uid);
        result
    }

    async fn fetch_and_register(
        this: Arc<Self>,
        server: Server,
        study_instance_uid: StudyInstanceUid,
    ) -> Result<Arc<StudyMetadata>, StudyLoadError> {
        match this.fetch_inner(&server, &study_instance_uid).await {
            Ok(study) => {
                this.set_state(&study_instance_uid, LoadingState::Loaded);
                tracing::debug!(
                    study = %study_instance_uid,
                    series = study.series.len(),
                    instances = study.instance_count(),
                    "study loaded"
                );
                Ok(study)
            }
            Err(error) => {
                tracing::warn!(study = %study_instance_uid, %error, "study load failed");
                this.set_state(&study_instance_uid, LoadingState::Failed);
                Err(error)
            }
        }
    }

    async fn fetch_inner(
        &self,
        server: &Server,
        study_instance_uid: &StudyInstanceUid,
    ) -> Result<Arc<StudyMetadata>, StudyLoadError> {
        tracing::debug!(study = %study_instance_uid, server = %server.name, "retrieving study metadata");
        let mut raw = self
            .retriever
            .retrieve_study_metadata(server, study_instance_uid)
            .await?;
        if raw.study_instance_uid != *study_instance_uid {
            return Err(StudyLoadError::invalid_payload(
                study_instance_uid.clone(),
                format!("payload is for study {}", raw.study_instance_uid),
            ));
        }

        sort_study(&mut raw);
        self.index.update(&raw);

        let mut study = structure_study(raw);
        study.display_sets = build_display_sets(&study);
        let study = Arc::new(study);
        self.manager.add(Arc::clone(&study));
        Ok(study)
    }

    fn set_state(&self, study_instance_uid: &StudyInstanceUid, state: LoadingState) {
        let mut states = self.states.lock().expect("loading state lock");
        states.insert(study_instance_uid.clone(), state);
    }
}
