pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;
pub use crate::config::toml_config::TomlConfig;

pub use crate::core::aggregate::build_aggregations;
pub use crate::core::cleaner::{clean, CleanOutcome, Cleaner};
pub use crate::core::etl::SalesAnalyzer;
pub use crate::core::filter::filter_by_category;
pub use crate::core::loader::{load, load_from_reader, validate_input_file, CsvFileSource, CsvTextSource};
pub use crate::core::metrics::{compute_metrics, total_revenue};
pub use crate::utils::error::{AnalysisError, LoadError, MetricsError, ParseError, Result};
