#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

pub const DEFAULT_OUTPUT_FORMAT: &str = "text";
pub const OUTPUT_FORMATS: [&str; 2] = ["text", "json"];
pub const DEFAULT_CHART_WIDTH: usize = 40;
pub const CHART_WIDTH_RANGE: (usize, usize) = (10, 200);
