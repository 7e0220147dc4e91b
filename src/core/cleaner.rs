use crate::domain::model::{RawTable, SalesRecord, SalesTable};
use crate::utils::error::ParseError;
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

/// Date-only layouts tried in order. Two-digit years come before four-digit
/// ones because `%Y` would also accept "24" as year 24.
/// Parses landing before year 1000 are treated as misreads.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%Y%m%d",
    "%m/%d/%y",
    "%m/%d/%Y",
    "%m-%d-%y",
    "%m-%d-%Y",
    "%m.%d.%Y",
    "%d %b %Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
    "%b %d %Y",
    "%B %d %Y",
];

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

/// A cleaned table plus how many raw rows were discarded for missing values.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanOutcome {
    pub table: SalesTable,
    pub dropped: usize,
}

#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    extra_formats: Vec<String>,
}

impl Cleaner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extra `strftime` layouts, tried before the built-in ones.
    pub fn with_formats(formats: &[String]) -> Self {
        Self {
            extra_formats: formats.to_vec(),
        }
    }

    pub fn parse_date(&self, value: &str) -> Option<NaiveDate> {
        parse_date(value, &self.extra_formats)
    }

    /// Drops incomplete rows, parses dates and computes `total_sales`.
    pub fn clean_with_report(&self, table: &RawTable) -> Result<CleanOutcome, ParseError> {
        let mut records = Vec::with_capacity(table.len());
        let mut dropped = 0;

        for raw in table {
            let (Some(date), Some(product), Some(category), Some(price), Some(quantity_sold)) = (
                raw.date.as_deref(),
                raw.product.as_ref(),
                raw.category.as_ref(),
                raw.price,
                raw.quantity_sold,
            ) else {
                dropped += 1;
                continue;
            };

            let date = self
                .parse_date(date)
                .ok_or_else(|| ParseError::InvalidDate {
                    line: raw.line,
                    value: date.to_string(),
                })?;

            let total_sales = price
                .checked_mul(Decimal::from(quantity_sold))
                .ok_or(ParseError::Overflow { line: raw.line })?;

            records.push(SalesRecord {
                date,
                product: product.clone(),
                category: category.clone(),
                price,
                quantity_sold,
                total_sales,
            });
        }

        tracing::debug!(
            "Cleaned {} rows, dropped {} with missing values",
            records.len(),
            dropped
        );

        Ok(CleanOutcome {
            table: SalesTable::new(records),
            dropped,
        })
    }
}

/// Cleans with the built-in date formats only.
pub fn clean(table: &RawTable) -> Result<SalesTable, ParseError> {
    Cleaner::new()
        .clean_with_report(table)
        .map(|outcome| outcome.table)
}

/// Parses a calendar date, trying `extra_formats` first. Date-time stamps keep only the date.
pub fn parse_date(value: &str, extra_formats: &[String]) -> Option<NaiveDate> {
    let value = value.trim();

    extra_formats
        .iter()
        .find_map(|format| {
            NaiveDate::parse_from_str(value, format)
                .ok()
                .or_else(|| {
                    NaiveDateTime::parse_from_str(value, format)
                        .ok()
                        .map(|datetime| datetime.date())
                })
                .filter(plausible)
        })
        .or_else(|| {
            DATE_FORMATS.iter().find_map(|format| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .filter(plausible)
            })
        })
        .or_else(|| {
            DATETIME_FORMATS.iter().find_map(|format| {
                NaiveDateTime::parse_from_str(value, format)
                    .ok()
                    .map(|datetime| datetime.date())
                    .filter(plausible)
            })
        })
        .or_else(|| {
            DateTime::parse_from_rfc3339(value)
                .ok()
                .map(|datetime| datetime.date_naive())
        })
}

fn plausible(date: &NaiveDate) -> bool {
    date.year() >= 1000
}
