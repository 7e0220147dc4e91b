use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One row as read from the source, before cleaning.
///
/// Numeric columns are already typed; `date` stays text until the cleaner
/// parses it. A `None` field is a missing cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// 1-based line in the source file (header is line 1).
    pub line: u64,
    pub date: Option<String>,
    pub product: Option<String>,
    pub category: Option<String>,
    pub price: Option<Decimal>,
    pub quantity_sold: Option<u32>,
}

impl RawRecord {
    pub fn is_complete(&self) -> bool {
        self.date.is_some()
            && self.product.is_some()
            && self.category.is_some()
            && self.price.is_some()
            && self.quantity_sold.is_some()
    }
}

/// A cleaned transaction: every field present, `total_sales = price * quantity_sold`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesRecord {
    pub date: NaiveDate,
    pub product: String,
    pub category: String,
    pub price: Decimal,
    pub quantity_sold: u32,
    pub total_sales: Decimal,
}

impl SalesRecord {
    /// Converts back into a raw row, e.g. to feed a cleaned table through the cleaner again.
    pub fn to_raw(&self, line: u64) -> RawRecord {
        RawRecord {
            line,
            date: Some(self.date.format("%Y-%m-%d").to_string()),
            product: Some(self.product.clone()),
            category: Some(self.category.clone()),
            price: Some(self.price),
            quantity_sold: Some(self.quantity_sold),
        }
    }
}

/// Ordered rows sharing one schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table<R> {
    records: Vec<R>,
}

pub type RawTable = Table<RawRecord>;
pub type SalesTable = Table<SalesRecord>;

impl<R> Table<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<R> Default for Table<R> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
        }
    }
}

impl<R> From<Vec<R>> for Table<R> {
    fn from(records: Vec<R>) -> Self {
        Self::new(records)
    }
}

impl<'a, R> IntoIterator for &'a Table<R> {
    type Item = &'a R;
    type IntoIter = std::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl SalesTable {
    /// Turns a cleaned table back into raw rows so it can be passed through
    /// `clean` again. Lines are numbered as a file would number them.
    pub fn to_raw(&self) -> RawTable {
        self.records
            .iter()
            .enumerate()
            .map(|(index, record)| record.to_raw(index as u64 + 2))
            .collect::<Vec<_>>()
            .into()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metrics {
    pub total_revenue: Decimal,
    pub average_sale: Decimal,
    pub top_product: String,
}

/// Result of a category filter request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", content = "records", rename_all = "snake_case")]
pub enum FilterOutcome {
    /// At least one record matched, in table order.
    Matches(Vec<SalesRecord>),
    /// A category was given but nothing matched.
    Empty,
    /// No category was given; filtering was not performed.
    Skipped,
}

/// Title and axis labels a renderer may use for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartLabels {
    pub title: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
}

/// Sum of sales per (price, quantity) pair. Rows are ascending prices,
/// columns ascending quantities. A `None` cell means no transactions.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CrossTab {
    pub prices: Vec<Decimal>,
    pub quantities: Vec<u32>,
    pub cells: Vec<Vec<Option<Decimal>>>,
}

impl CrossTab {
    pub fn get(&self, price: Decimal, quantity: u32) -> Option<Decimal> {
        let row = self.prices.iter().position(|p| *p == price)?;
        let col = self.quantities.iter().position(|q| *q == quantity)?;
        self.cells[row][col]
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Sum over all present cells; `None` if it does not fit in a `Decimal`.
    pub fn total(&self) -> Option<Decimal> {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .try_fold(Decimal::ZERO, |sum, cell| sum.checked_add(*cell))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Aggregations {
    pub by_category: BTreeMap<String, Decimal>,
    /// Iterates in ascending date order.
    pub by_date: BTreeMap<NaiveDate, Decimal>,
    pub by_price_quantity: CrossTab,
}

/// Everything one analysis run produces, handed to the rendering side.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub source: String,
    pub loaded_rows: usize,
    pub dropped_rows: usize,
    pub cleaned_rows: usize,
    pub metrics: Metrics,
    pub filter: FilterOutcome,
    pub aggregations: Aggregations,
}
