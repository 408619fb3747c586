use chrono::{Datelike, NaiveDate};
use hybridjoin_config::shared::{DateRangeConfig, ValidationError};

use crate::error::JoinResult;

/// Format of calendar dates in stream records and configuration.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Meteorological season of a calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Season {
    Spring,
    Summer,
    Fall,
    Winter,
}

impl Season {
    /// March to May is spring, June to August summer, September to November fall.
    pub fn from_month(month: u32) -> Self {
        match month {
            3..=5 => Season::Spring,
            6..=8 => Season::Summer,
            9..=11 => Season::Fall,
            _ => Season::Winter,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Season::Spring => "Spring",
            Season::Summer => "Summer",
            Season::Fall => "Fall",
            Season::Winter => "Winter",
        }
    }
}

/// One row of the date dimension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateRow {
    pub date_key: i64,
    pub full_date: NaiveDate,
    pub day: u32,
    pub month: u32,
    pub month_name: String,
    pub quarter: u32,
    pub year: i32,
    /// Monday is 0.
    pub day_of_week: u32,
    pub day_name: String,
    pub is_weekend: bool,
    /// ISO 8601 week number.
    pub week_of_year: u32,
    pub season: Season,
    /// 1 for January to June, 2 otherwise.
    pub half_year: u32,
}

impl DateRow {
    fn new(date_key: i64, date: NaiveDate) -> Self {
        let month = date.month();
        let day_of_week = date.weekday().num_days_from_monday();

        Self {
            date_key,
            full_date: date,
            day: date.day(),
            month,
            month_name: date.format("%B").to_string(),
            quarter: (month - 1) / 3 + 1,
            year: date.year(),
            day_of_week,
            day_name: date.format("%A").to_string(),
            is_weekend: day_of_week >= 5,
            week_of_year: date.iso_week().week(),
            season: Season::from_month(month),
            half_year: if month <= 6 { 1 } else { 2 },
        }
    }

    /// Returns the date in the form stream records carry it.
    pub fn iso_date(&self) -> String {
        self.full_date.format(DATE_FORMAT).to_string()
    }
}

/// Calendar rows for every day of an inclusive range, keyed sequentially from 1.
#[derive(Debug, Clone, Default)]
pub struct DateDimension {
    rows: Vec<DateRow>,
}

impl DateDimension {
    /// Generates one row per day from `start` to `end`, both inclusive.
    pub fn generate(start: NaiveDate, end: NaiveDate) -> JoinResult<Self> {
        if start > end {
            return Err(ValidationError::InvertedDateRange {
                start: start.to_string(),
                end: end.to_string(),
            }
            .into());
        }

        let rows = start
            .iter_days()
            .take_while(|date| *date <= end)
            .zip(1..)
            .map(|(date, date_key)| DateRow::new(date_key, date))
            .collect();

        Ok(Self { rows })
    }

    /// Parses the configured range and generates its rows.
    pub fn from_config(config: &DateRangeConfig) -> JoinResult<Self> {
        let start = NaiveDate::parse_from_str(&config.start, DATE_FORMAT)?;
        let end = NaiveDate::parse_from_str(&config.end, DATE_FORMAT)?;

        Self::generate(start, end)
    }

    pub fn rows(&self) -> &[DateRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns `(iso date, date key)` pairs in calendar order.
    pub fn date_keys(&self) -> impl Iterator<Item = (String, i64)> + '_ {
        self.rows.iter().map(|row| (row.iso_date(), row.date_key))
    }
}
