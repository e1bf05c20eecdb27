pub mod error;
pub mod measurement;
pub mod nonconformity;
pub mod study;
pub mod timepoint;

pub use error::ModelError;
pub use measurement::{LesionCategory, Measurement};
pub use nonconformity::{
    GroupedNonconformities, MeasurementBucket, Nonconformity, ToolGroupNonconformities,
    ValidationOutcome,
};
pub use study::{
    DisplaySet, InstanceMetadata, InstanceSnapshot, LoadingState, SeriesMetadata, StudyInstanceUid,
    StudyMetadata,
};
pub use timepoint::{Timepoint, TimepointId, TimepointScope, TimepointType};
