use lrs_model::{LesionCategory, Measurement, Timepoint, TimepointId};

/// Measurement capture collaborator.
pub trait MeasurementApi: Send + Sync {
    /// All measurements of a category, in capture order.
    fn fetch(&self, category: LesionCategory) -> Vec<Measurement>;

    /// Tool-type to tool-group mapping (the tools-groups map).
    fn tool_group(&self, tool_type: &str) -> Option<String>;
}

/// Timepoint lookup collaborator.
pub trait TimepointApi: Send + Sync {
    fn timepoints(&self) -> Vec<Timepoint>;

    fn find(&self, timepoint_id: &TimepointId) -> Option<Timepoint> {
        self.timepoints()
            .into_iter()
            .find(|timepoint| timepoint.timepoint_id == *timepoint_id)
    }
}
