pub mod api;
pub mod builtin;
pub mod checks;
pub mod dataset;
pub mod error;
pub mod evaluator;
pub mod grouping;
pub mod registry;
pub mod report;
pub mod validator;

pub use api::{MeasurementApi, TimepointApi};
pub use dataset::{Dataset, DatasetEntry};
pub use error::ValidateError;
pub use evaluator::CriteriaEvaluator;
pub use grouping::group_nonconformities;
pub use registry::CriteriaRegistry;
pub use report::write_conformance_report_json;
pub use validator::{CriteriaValidator, MaxTargetCounts};
