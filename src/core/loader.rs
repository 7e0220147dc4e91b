use crate::domain::model::{RawRecord, RawTable};
use crate::domain::ports::RecordSource;
use crate::utils::error::LoadError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const REQUIRED_COLUMNS: [&str; 5] = ["Date", "Product", "Category", "Price", "Quantity Sold"];

/// Cell contents read as "no value", in addition to blank cells.
const MISSING_TOKENS: &[&str] = &[
    "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A", "<NA>",
];

#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(rename = "Date")]
    date: Option<String>,
    #[serde(rename = "Product")]
    product: Option<String>,
    #[serde(rename = "Category")]
    category: Option<String>,
    #[serde(rename = "Price")]
    price: Option<String>,
    #[serde(rename = "Quantity Sold")]
    quantity_sold: Option<String>,
}

/// Checks that `path` exists and carries a `.csv` suffix.
pub fn validate_input_file<P: AsRef<Path>>(path: P) -> Result<(), LoadError> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    if !path.exists() {
        return Err(LoadError::NotFound { path: shown });
    }

    let is_csv = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("csv"))
        .unwrap_or(false);
    if !is_csv {
        return Err(LoadError::InvalidExtension { path: shown });
    }

    Ok(())
}

/// Reads a CSV file into a raw table.
pub fn load<P: AsRef<Path>>(path: P) -> Result<RawTable, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| {
        if source.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                path: path.display().to_string(),
            }
        } else {
            LoadError::Unreadable {
                path: path.display().to_string(),
                source,
            }
        }
    })?;

    let table = load_from_reader(file)?;
    tracing::debug!("Loaded {} rows from {}", table.len(), path.display());
    Ok(table)
}

/// Reads CSV text from any reader. The first row must be the header.
pub fn load_from_reader<R: Read>(reader: R) -> Result<RawTable, LoadError> {
    // The CSV reader is buffered internally. Short rows are padded below.
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr.headers()?.clone();
    let missing: Vec<String> = REQUIRED_COLUMNS
        .iter()
        .filter(|column| !headers.iter().any(|h| h == **column))
        .map(|column| column.to_string())
        .collect();
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns { missing });
    }

    let mut records = Vec::new();
    for result in rdr.records() {
        let mut string_record = result?;
        let line = string_record.position().map(|p| p.line()).unwrap_or(0);
        if string_record.len() > headers.len() {
            return Err(LoadError::TooManyFields {
                line,
                expected: headers.len(),
                found: string_record.len(),
            });
        }
        // 尾端缺少的欄位視為缺值
        while string_record.len() < headers.len() {
            string_record.push_field("");
        }
        let row: CsvRow = string_record.deserialize(Some(&headers))?;
        records.push(type_row(line, row)?);
    }

    Ok(RawTable::new(records))
}

fn type_row(line: u64, row: CsvRow) -> Result<RawRecord, LoadError> {
    let price = match present(row.price) {
        Some(value) => Some(parse_price(line, &value)?),
        None => None,
    };
    let quantity_sold = match present(row.quantity_sold) {
        Some(value) => Some(parse_quantity(line, &value)?),
        None => None,
    };

    Ok(RawRecord {
        line,
        date: present(row.date),
        product: present(row.product),
        category: present(row.category),
        price,
        quantity_sold,
    })
}

fn present(cell: Option<String>) -> Option<String> {
    cell.filter(|value| !value.is_empty() && !MISSING_TOKENS.contains(&value.as_str()))
}

fn parse_price(line: u64, value: &str) -> Result<Decimal, LoadError> {
    let invalid = |reason: &str| LoadError::InvalidValue {
        line,
        column: "Price",
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let price = Decimal::from_str(value)
        .or_else(|_| Decimal::from_scientific(value))
        .map_err(|_| invalid("not a number"))?;
    if price.is_sign_negative() && !price.is_zero() {
        return Err(invalid("must be non-negative"));
    }
    Ok(price)
}

fn parse_quantity(line: u64, value: &str) -> Result<u32, LoadError> {
    let invalid = |reason: &str| LoadError::InvalidValue {
        line,
        column: "Quantity Sold",
        value: value.to_string(),
        reason: reason.to_string(),
    };

    if let Ok(quantity) = value.parse::<u32>() {
        return Ok(quantity);
    }

    // 缺值欄位常被寫成浮點數，例如 "3.0"
    let number = Decimal::from_str(value).map_err(|_| invalid("not an integer"))?;
    if number.is_sign_negative() && !number.is_zero() {
        return Err(invalid("must be non-negative"));
    }
    if !number.fract().is_zero() {
        return Err(invalid("not a whole number"));
    }
    number.to_u32().ok_or_else(|| invalid("out of range"))
}

/// A CSV file on the local filesystem.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl RecordSource for CsvFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_table(&self) -> Result<RawTable, LoadError> {
        validate_input_file(&self.path)?;
        load(&self.path)
    }
}

/// CSV text held in memory.
#[derive(Debug, Clone)]
pub struct CsvTextSource {
    name: String,
    text: String,
}

impl CsvTextSource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

impl RecordSource for CsvTextSource {
    fn describe(&self) -> String {
        self.name.clone()
    }

    fn read_table(&self) -> Result<RawTable, LoadError> {
        load_from_reader(self.text.as_bytes())
    }
}
