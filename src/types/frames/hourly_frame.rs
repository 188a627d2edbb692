//! Contains the `HourlyFrame` structure holding one snapshot's hourly dataset.

use crate::types::frames::columns::{
    column_datetimes, column_floats, datetime_column, float_column, required,
};
use crate::types::frequency::{Frequency, HOURLY_VARIABLES};
use crate::types::records::HourlyRecord;
use chrono::NaiveDateTime;
use polars::prelude::*;

/// A wrapper around a Polars `DataFrame` holding the hourly dataset of a snapshot.
///
/// Columns: a `time` column of naive `Datetime(ms)` (local wall-clock time),
/// followed by the hourly variables as `Float64`, in request order.
#[derive(Debug, Clone)]
pub struct HourlyFrame {
    /// The underlying Polars DataFrame containing the hourly data.
    pub frame: DataFrame,
}

impl HourlyFrame {
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Builds a frame from typed rows.
    pub fn from_records(records: &[HourlyRecord]) -> PolarsResult<HourlyFrame> {
        let times: Vec<NaiveDateTime> = records.iter().map(|r| r.time).collect();
        let mut columns = Vec::with_capacity(HOURLY_VARIABLES.len() + 1);
        columns.push(datetime_column(Frequency::Hourly.time_column(), &times)?);
        for (idx, name) in HOURLY_VARIABLES.iter().enumerate() {
            let values = records.iter().map(|r| r.values()[idx]).collect();
            columns.push(float_column(name, values));
        }
        Ok(HourlyFrame::new(DataFrame::new(columns)?))
    }

    pub fn empty() -> PolarsResult<HourlyFrame> {
        Self::from_records(&[])
    }

    /// Collects the frame into typed rows, in frame order.
    pub fn records(&self) -> PolarsResult<Vec<HourlyRecord>> {
        let times = self.times()?;
        let columns = HOURLY_VARIABLES
            .iter()
            .map(|name| column_floats(&self.frame, name))
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(times
            .into_iter()
            .enumerate()
            .map(|(row, time)| {
                let mut values = [None; 4];
                for (idx, column) in columns.iter().enumerate() {
                    values[idx] = column[row];
                }
                HourlyRecord::from_values(time, values)
            })
            .collect())
    }

    /// The `time` column, in frame order.
    pub fn times(&self) -> PolarsResult<Vec<NaiveDateTime>> {
        let name = Frequency::Hourly.time_column();
        required(column_datetimes(&self.frame, name)?, name)
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// Filters the hourly data with a Polars predicate, returning a new frame.
    pub fn filter(&self, predicate: Expr) -> PolarsResult<HourlyFrame> {
        Ok(HourlyFrame::new(self.lazy().filter(predicate).collect()?))
    }
}

impl PartialEq for HourlyFrame {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}
