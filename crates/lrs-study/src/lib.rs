pub mod display_sets;
pub mod error;
pub mod index;
pub mod loader;
pub mod manager;
pub mod metadata;
pub mod raw;
pub mod retrieve;
pub mod snapshot;
pub mod sorting;

pub use display_sets::build_display_sets;
pub use error::StudyLoadError;
pub use index::RawMetadataIndex;
pub use loader::StudyLoader;
pub use manager::StudyMetadataManager;
pub use metadata::structure_study;
pub use raw::{RawInstance, RawSeries, RawStudy};
pub use retrieve::{Server, StudyMetadataRetriever};
pub use snapshot::{FirstInstanceSnapshot, InstanceSnapshotSource};
pub use sorting::sort_study;
