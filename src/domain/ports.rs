use crate::domain::model::RawTable;
use crate::utils::error::LoadError;

/// Where raw sales rows come from.
pub trait RecordSource {
    /// Human-readable name of the source, used in logs and reports.
    fn describe(&self) -> String;
    fn read_table(&self) -> Result<RawTable, LoadError>;
}

pub trait ConfigProvider {
    fn input_path(&self) -> &str;
    /// Extra `strftime` layouts tried before the built-in date formats.
    fn date_formats(&self) -> &[String];
    /// Category to filter by; `None` skips filtering.
    fn category(&self) -> Option<&str>;
    fn monitoring_enabled(&self) -> bool;
}
