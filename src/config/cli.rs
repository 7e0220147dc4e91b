use crate::config::{CHART_WIDTH_RANGE, DEFAULT_CHART_WIDTH, DEFAULT_OUTPUT_FORMAT, OUTPUT_FORMATS};
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_range, Validate,
};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "retail-sales")]
#[command(about = "Sales metrics, category filter and chart data from a retail CSV file")]
pub struct CliConfig {
    /// Path to the retail sales CSV file (prompted for when omitted)
    pub input: Option<String>,

    /// TOML configuration file; command line values override it
    #[arg(short, long)]
    pub config: Option<String>,

    /// Only list transactions in this category (exact match)
    #[arg(long)]
    pub category: Option<String>,

    /// Output format: text or json
    #[arg(long)]
    pub format: Option<String>,

    /// Width of the text bar charts, in characters
    #[arg(long)]
    pub chart_width: Option<usize>,

    /// Extra strftime date layout, tried before the built-in ones (repeatable)
    #[arg(long = "date-format")]
    pub date_formats: Vec<String>,

    /// Never prompt on stdin for missing input path or category
    #[arg(long)]
    pub no_prompt: bool,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log per-stage timing and memory")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub log_json: bool,
}

impl CliConfig {
    pub fn output_format(&self) -> &str {
        self.format.as_deref().unwrap_or(DEFAULT_OUTPUT_FORMAT)
    }

    pub fn chart_width(&self) -> usize {
        self.chart_width.unwrap_or(DEFAULT_CHART_WIDTH)
    }
}

impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        self.input.as_deref().unwrap_or("")
    }

    fn date_formats(&self) -> &[String] {
        &self.date_formats
    }

    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitor
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(input) = &self.input {
            validate_path("input", input)?;
        }
        validate_one_of("format", self.output_format(), &OUTPUT_FORMATS)?;
        let (min, max) = CHART_WIDTH_RANGE;
        validate_range("chart_width", self.chart_width(), min, max)?;
        for format in &self.date_formats {
            validate_non_empty_string("date-format", format)?;
        }
        Ok(())
    }
}
