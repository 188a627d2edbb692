use crate::types::frames::daily_frame::DailyFrame;
use crate::types::frames::hourly_frame::HourlyFrame;

/// The pair of datasets materialized for one acquisition date.
///
/// A snapshot is never mutated in place; a new acquisition replaces both
/// halves together.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub daily: DailyFrame,
    pub hourly: HourlyFrame,
}

impl Snapshot {
    pub fn new(daily: DailyFrame, hourly: HourlyFrame) -> Self {
        Self { daily, hourly }
    }

    /// Splits the snapshot into its `(daily, hourly)` halves.
    pub fn into_parts(self) -> (DailyFrame, HourlyFrame) {
        (self.daily, self.hourly)
    }
}
