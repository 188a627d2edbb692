//! Contains the `DailyFrame` structure holding one snapshot's daily dataset.

use crate::types::frames::columns::{
    column_dates, column_floats, date_column, float_column, required,
};
use crate::types::frequency::{Frequency, DAILY_VARIABLES};
use crate::types::records::DailyRecord;
use chrono::NaiveDate;
use polars::prelude::*;

/// A wrapper around a Polars `DataFrame` holding the daily dataset of a snapshot.
///
/// The frame always has the columns returned by
/// [`Frequency::Daily.get_schema_column_names()`](Frequency::get_schema_column_names):
/// a `date` column of `DataType::Date` followed by the daily variables as
/// `Float64`, in request order.
///
/// All operations return new frames; the wrapped data is never modified in place.
#[derive(Debug, Clone)]
pub struct DailyFrame {
    /// The underlying Polars DataFrame containing the daily data.
    pub frame: DataFrame,
}

impl DailyFrame {
    /// Wraps a `DataFrame` that is assumed to have the daily schema.
    pub fn new(frame: DataFrame) -> Self {
        Self { frame }
    }

    /// Builds a frame from typed rows.
    ///
    /// # Example
    ///
    /// ```
    /// use meteodash::{DailyFrame, DailyRecord};
    /// use chrono::NaiveDate;
    ///
    /// let daily = DailyFrame::from_records(&[DailyRecord {
    ///     date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
    ///     temperature_max: Some(70.0),
    ///     ..Default::default()
    /// }])?;
    /// assert_eq!(daily.height(), 1);
    /// # Ok::<(), polars::prelude::PolarsError>(())
    /// ```
    pub fn from_records(records: &[DailyRecord]) -> PolarsResult<DailyFrame> {
        let dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
        let mut columns = Vec::with_capacity(DAILY_VARIABLES.len() + 1);
        columns.push(date_column(Frequency::Daily.time_column(), &dates)?);
        for (idx, name) in DAILY_VARIABLES.iter().enumerate() {
            let values = records.iter().map(|r| r.values()[idx]).collect();
            columns.push(float_column(name, values));
        }
        Ok(DailyFrame::new(DataFrame::new(columns)?))
    }

    /// An empty frame with the daily schema.
    pub fn empty() -> PolarsResult<DailyFrame> {
        Self::from_records(&[])
    }

    /// Collects the frame into typed rows, in frame order.
    pub fn records(&self) -> PolarsResult<Vec<DailyRecord>> {
        let dates = self.dates()?;
        let columns = DAILY_VARIABLES
            .iter()
            .map(|name| column_floats(&self.frame, name))
            .collect::<PolarsResult<Vec<_>>>()?;

        Ok(dates
            .into_iter()
            .enumerate()
            .map(|(row, date)| {
                let mut values = [None; 14];
                for (idx, column) in columns.iter().enumerate() {
                    values[idx] = column[row];
                }
                DailyRecord::from_values(date, values)
            })
            .collect())
    }

    /// The `date` column, in frame order.
    pub fn dates(&self) -> PolarsResult<Vec<NaiveDate>> {
        let name = Frequency::Daily.time_column();
        required(column_dates(&self.frame, name)?, name)
    }

    pub fn height(&self) -> usize {
        self.frame.height()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    /// A lazy view over a clone of the underlying frame.
    pub fn lazy(&self) -> LazyFrame {
        self.frame.clone().lazy()
    }

    /// Filters the daily data based on a Polars predicate expression and
    /// returns the matching rows as a new `DailyFrame`.
    ///
    /// # Example
    ///
    /// ```
    /// use meteodash::{DailyFrame, DailyRecord};
    /// use chrono::NaiveDate;
    /// use polars::prelude::{col, lit};
    ///
    /// let daily = DailyFrame::from_records(&[
    ///     DailyRecord {
    ///         date: NaiveDate::from_ymd_opt(2024, 7, 1).unwrap(),
    ///         temperature_max: Some(91.0),
    ///         ..Default::default()
    ///     },
    ///     DailyRecord {
    ///         date: NaiveDate::from_ymd_opt(2024, 7, 2).unwrap(),
    ///         temperature_max: Some(78.0),
    ///         ..Default::default()
    ///     },
    /// ])?;
    /// let hot = daily.filter(col("temperature_2m_max").gt(lit(85.0f64)))?;
    /// assert_eq!(hot.height(), 1);
    /// # Ok::<(), polars::prelude::PolarsError>(())
    /// ```
    pub fn filter(&self, predicate: Expr) -> PolarsResult<DailyFrame> {
        Ok(DailyFrame::new(self.lazy().filter(predicate).collect()?))
    }

    /// Rows with `start <= date <= end`, in frame order.
    pub fn get_range(&self, start: NaiveDate, end: NaiveDate) -> PolarsResult<DailyFrame> {
        self.filter(
            col("date")
                .gt_eq(lit(start))
                .and(col("date").lt_eq(lit(end))),
        )
    }

    /// The row for a single date; empty if the date is not present.
    pub fn get_at(&self, date: NaiveDate) -> PolarsResult<DailyFrame> {
        self.filter(col("date").eq(lit(date)))
    }
}

/// Two frames are equal when they hold the same columns and values, treating
/// missing values as equal to each other.
impl PartialEq for DailyFrame {
    fn eq(&self, other: &Self) -> bool {
        self.frame.equals_missing(&other.frame)
    }
}
