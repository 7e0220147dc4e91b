use crate::config::{CHART_WIDTH_RANGE, DEFAULT_CHART_WIDTH, DEFAULT_OUTPUT_FORMAT, OUTPUT_FORMATS};
use crate::core::ConfigProvider;
use crate::utils::error::{AnalysisError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_one_of, validate_path, validate_range, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Analysis settings read from a TOML file. Every section is optional.
///
/// ```toml
/// [input]
/// path = "${DATA_DIR}/sales.csv"
///
/// [clean]
/// date_formats = ["%d/%m/%Y"]
///
/// [filter]
/// category = "Electronics"
///
/// [output]
/// format = "text"
/// chart_width = 50
///
/// [monitoring]
/// enabled = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    pub input: InputConfig,
    pub clean: CleanConfig,
    pub filter: FilterConfig,
    pub output: OutputConfig,
    pub monitoring: MonitoringConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CleanConfig {
    pub date_formats: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: Option<String>,
    pub chart_width: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    pub enabled: bool,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AnalysisError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| AnalysisError::ConfigError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| AnalysisError::ConfigError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.into_owned())
    }

    /// Command line values win over file values.
    #[cfg(feature = "cli")]
    pub fn apply_cli_overrides(&mut self, cli: &crate::config::CliConfig) {
        if let Some(input) = &cli.input {
            self.input.path = Some(input.clone());
        }
        if let Some(category) = &cli.category {
            self.filter.category = Some(category.clone());
        }
        if let Some(format) = &cli.format {
            self.output.format = Some(format.clone());
        }
        if let Some(width) = cli.chart_width {
            self.output.chart_width = Some(width);
        }
        if !cli.date_formats.is_empty() {
            // CLI 指定的格式優先嘗試
            let mut formats = cli.date_formats.clone();
            formats.append(&mut self.clean.date_formats);
            self.clean.date_formats = formats;
        }
        if cli.monitor {
            self.monitoring.enabled = true;
        }
    }

    pub fn output_format(&self) -> &str {
        self.output.format.as_deref().unwrap_or(DEFAULT_OUTPUT_FORMAT)
    }

    pub fn chart_width(&self) -> usize {
        self.output.chart_width.unwrap_or(DEFAULT_CHART_WIDTH)
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        self.input.path.as_deref().unwrap_or("")
    }

    fn date_formats(&self) -> &[String] {
        &self.clean.date_formats
    }

    fn category(&self) -> Option<&str> {
        self.filter.category.as_deref()
    }

    fn monitoring_enabled(&self) -> bool {
        self.monitoring.enabled
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.input.path {
            validate_path("input.path", path)?;
        }
        for format in &self.clean.date_formats {
            validate_non_empty_string("clean.date_formats", format)?;
        }
        validate_one_of("output.format", self.output_format(), &OUTPUT_FORMATS)?;
        let (min, max) = CHART_WIDTH_RANGE;
        validate_range("output.chart_width", self.chart_width(), min, max)?;
        Ok(())
    }
}
