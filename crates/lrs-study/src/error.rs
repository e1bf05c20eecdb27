use lrs_model::StudyInstanceUid;
use thiserror::Error;

/// Failure of a study metadata load.
///
/// Clone so a single failure can be fanned out to every waiter of a shared
/// in-flight load future.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StudyLoadError {
    #[error("failed to retrieve study {uid}: {message}")]
    Retrieve {
        uid: StudyInstanceUid,
        message: String,
    },
    #[error("study {uid} payload is invalid: {message}")]
    InvalidPayload {
        uid: StudyInstanceUid,
        message: String,
    },
}

impl StudyLoadError {
    pub fn retrieve(uid: StudyInstanceUid, message: impl Into<String>) -> Self {
        Self::Retrieve {
            uid,
            message: message.into(),
        }
    }

    pub fn invalid_payload(uid: StudyInstanceUid, message: impl Into<String>) -> Self {
        Self::InvalidPayload {
            uid,
            message: message.into(),
        }
    }
}
