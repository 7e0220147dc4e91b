use clap::Parser;
use retail_sales_etl::app::render::{render, OutputFormat};
use retail_sales_etl::core::ConfigProvider;
use retail_sales_etl::utils::error::{AnalysisError, ErrorSeverity};
use retail_sales_etl::utils::{logger, validation::Validate};
use retail_sales_etl::{CliConfig, CsvFileSource, SalesAnalyzer, TomlConfig};
use std::io::{self, BufRead, Write};

const PATH_PROMPT: &str = "Enter path to retail sales CSV file: ";
const CATEGORY_PROMPT: &str = "\nEnter category to filter (or press Enter to skip): ";

fn main() {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting retail-sales");
    tracing::debug!("CLI config: {:?}", cli);

    let result = match cli.config.clone() {
        Some(path) => run_with_file(&path, &cli),
        None => run_with_args(cli),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ Analysis failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::debug!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }
}

fn run_with_file(path: &str, cli: &CliConfig) -> Result<(), AnalysisError> {
    tracing::info!("📁 Loading configuration from: {}", path);
    let mut config = TomlConfig::from_file(path)?;
    config.apply_cli_overrides(cli);

    if config.input.path.is_none() && !cli.no_prompt {
        config.input.path = Some(prompt(PATH_PROMPT)?);
    }
    if config.filter.category.is_none() && !cli.no_prompt {
        config.filter.category = Some(prompt(CATEGORY_PROMPT)?);
    }

    let format = config.output_format().to_string();
    let width = config.chart_width();
    run(config, &format, width)
}

fn run_with_args(mut cli: CliConfig) -> Result<(), AnalysisError> {
    if cli.input.is_none() && !cli.no_prompt {
        cli.input = Some(prompt(PATH_PROMPT)?);
    }
    if cli.category.is_none() && !cli.no_prompt {
        cli.category = Some(prompt(CATEGORY_PROMPT)?);
    }

    let format = cli.output_format().to_string();
    let width = cli.chart_width();
    run(cli, &format, width)
}

fn run<C>(config: C, format: &str, chart_width: usize) -> Result<(), AnalysisError>
where
    C: ConfigProvider + Validate,
{
    config.validate()?;
    let format = OutputFormat::from_name(format).ok_or_else(|| {
        AnalysisError::InvalidConfigValueError {
            field: "format".to_string(),
            value: format.to_string(),
            reason: "Valid values: text, json".to_string(),
        }
    })?;
    if config.input_path().is_empty() {
        return Err(AnalysisError::MissingConfigError {
            field: "input".to_string(),
        });
    }

    let source = CsvFileSource::new(config.input_path());
    let report = SalesAnalyzer::new(source, config).run()?;

    let rendered = render(&report, format, chart_width)?;
    let mut stdout = io::stdout().lock();
    stdout.write_all(rendered.as_bytes())?;
    stdout.flush()?;

    tracing::info!("✅ Analysis completed: {} rows analysed", report.cleaned_rows);
    Ok(())
}

/// Asks on stdout and reads one line from stdin, without the line ending.
fn prompt(question: &str) -> Result<String, AnalysisError> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(question.as_bytes())?;
    stdout.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}
