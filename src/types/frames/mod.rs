pub(crate) mod columns;
pub mod daily_frame;
pub mod hourly_frame;
