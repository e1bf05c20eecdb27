use thiserror::Error;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("invalid study instance uid: {0:?}")]
    InvalidStudyUid(String),
}
