use lrs_study::StudyLoadError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidateError {
    /// Dataset building failed; the validation run produces no partial
    /// results.
    #[error(transparent)]
    StudyLoad(#[from] StudyLoadError),
}
