//! Series and instance ordering.

use crate::raw::RawStudy;

/// Sort a raw study in place: series by series number, instances by
/// instance number. Entries without a number sort last; ties keep their
/// served order.
pub fn sort_study(raw: &mut RawStudy) {
    for series in &mut raw.series {
        series
            .instances
            .sort_by_key(|instance| instance.instance_number.unwrap_or(i32::MAX));
    }
    raw.series
        .sort_by_key(|series| series.series_number.unwrap_or(i32::MAX));
}
