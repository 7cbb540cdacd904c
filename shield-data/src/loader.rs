//! CSV loading for bracket schedules.
//!
//! Lets a deployment ship its own jurisdiction-year schedule as a small CSV
//! file instead of recompiling the built-in one. Parsing and structural
//! validation are separate steps so a caller can report exactly which one
//! failed.

use std::io::Read;

use rust_decimal::Decimal;
use serde::Deserialize;
use shield_core::{Bracket, BracketTable, BracketTableError};
use thiserror::Error;

/// Errors that can occur when loading a schedule from CSV.
#[derive(Debug, Error)]
pub enum ScheduleLoaderError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("invalid schedule: {0}")]
    InvalidSchedule(#[from] BracketTableError),
}

impl From<csv::Error> for ScheduleLoaderError {
    fn from(err: csv::Error) -> Self {
        ScheduleLoaderError::CsvParse(err.to_string())
    }
}

/// A single row of a schedule CSV file.
///
/// Expected columns:
/// - `label`: display name of the bracket
/// - `lower_bound`: inclusive floor of the bracket
/// - `upper_bound`: exclusive ceiling, empty for the unbounded top bracket
/// - `rate`: marginal rate as a decimal fraction (e.g. 0.1905)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ScheduleRecord {
    pub label: String,
    pub lower_bound: Decimal,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub upper_bound: Option<Decimal>,
    pub rate: Decimal,
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

impl From<ScheduleRecord> for Bracket {
    fn from(record: ScheduleRecord) -> Self {
        Bracket {
            label: record.label,
            lower_bound: record.lower_bound,
            upper_bound: record.upper_bound,
            rate: record.rate,
        }
    }
}

/// Loader for bracket schedules stored as CSV.
pub struct ScheduleLoader;

impl ScheduleLoader {
    /// Parses schedule records from a CSV reader.
    ///
    /// The reader can be any `Read` implementation, such as a file or a
    /// string slice. Rows are returned in file order; validation happens in
    /// [`ScheduleLoader::into_table`].
    pub fn parse<R: Read>(reader: R) -> Result<Vec<ScheduleRecord>, ScheduleLoaderError> {
        let mut csv_reader = csv::Reader::from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: ScheduleRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Validates parsed records into an immutable [`BracketTable`].
    pub fn into_table(
        records: Vec<ScheduleRecord>,
    ) -> Result<BracketTable, ScheduleLoaderError> {
        let brackets = records.into_iter().map(Bracket::from).collect();
        Ok(BracketTable::build(brackets)?)
    }

    /// Parses and validates a schedule in one step.
    pub fn load<R: Read>(reader: R) -> Result<BracketTable, ScheduleLoaderError> {
        Self::into_table(Self::parse(reader)?)
    }
}
