use retail_sales_etl::app::render::{render, OutputFormat};
use retail_sales_etl::core::filter::filter_by_category;
use retail_sales_etl::core::ConfigProvider;
use retail_sales_etl::domain::model::FilterOutcome;
use retail_sales_etl::{
    build_aggregations, clean, compute_metrics, load, total_revenue, AnalysisError, CsvFileSource,
    LoadError, MetricsError, ParseError, SalesAnalyzer, TomlConfig,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::io::Write;
use std::str::FromStr;
use tempfile::{NamedTempFile, TempDir};

fn write_csv(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

const SALES: &str = "\
Date,Product,Category,Price,Quantity Sold,Store
2024-01-01,Laptop,Electronics,899.99,2,North
2024-01-01,Novel,Books,12.50,4,North
2024-01-02,Headphones,Electronics,59.90,3,South
2024-01-02,Cookbook,Books,,1,South
2024-01-03,Novel,Books,12.50,2,North
2024-01-03,Laptop,Electronics,899.99,1,South
";

#[test]
fn test_reference_scenario_end_to_end() {
    let file = write_csv(
        "Date,Product,Category,Price,Quantity Sold\n\
         2024-01-01,A,X,10,2\n\
         2024-01-01,B,X,5,1\n\
         2024-01-02,A,X,10,3\n",
    );

    let table = clean(&load(file.path()).unwrap()).unwrap();
    let metrics = compute_metrics(&table).unwrap();

    assert_eq!(metrics.total_revenue, Decimal::from(55));
    assert_eq!(
        metrics.average_sale.round_dp(2),
        Decimal::from_str("18.33").unwrap()
    );
    assert_eq!(metrics.top_product, "A");

    let aggregations = build_aggregations(&table).unwrap();
    let by_date: Vec<(NaiveDate, Decimal)> = aggregations
        .by_date
        .iter()
        .map(|(d, v)| (*d, *v))
        .collect();
    assert_eq!(
        by_date,
        vec![
            (ymd(2024, 1, 1), Decimal::from(25)),
            (ymd(2024, 1, 2), Decimal::from(30)),
        ]
    );
}

#[test]
fn test_row_with_missing_price_is_excluded_everywhere() {
    let file = write_csv(SALES);
    let table = clean(&load(file.path()).unwrap()).unwrap();

    assert_eq!(table.len(), 5);
    assert!(table.iter().all(|r| r.product != "Cookbook"));

    let aggregations = build_aggregations(&table).unwrap();
    // Novel: 12.50*4 + 12.50*2
    assert_eq!(
        aggregations.by_category["Books"],
        Decimal::from_str("75.00").unwrap()
    );
    // only the headphones remain on the cookbook's day
    assert_eq!(
        aggregations.by_date[&ymd(2024, 1, 2)],
        Decimal::from_str("179.70").unwrap()
    );
}

#[test]
fn test_three_groupings_agree_with_total_revenue() {
    let file = write_csv(SALES);
    let table = clean(&load(file.path()).unwrap()).unwrap();
    let revenue = total_revenue(&table).unwrap();
    let aggregations = build_aggregations(&table).unwrap();

    assert_eq!(
        aggregations.by_category.values().copied().sum::<Decimal>(),
        revenue
    );
    assert_eq!(aggregations.by_date.values().copied().sum::<Decimal>(), revenue);
    assert_eq!(aggregations.by_price_quantity.total(), Some(revenue));
    assert_eq!(compute_metrics(&table).unwrap().total_revenue, revenue);
}

#[test]
fn test_average_is_revenue_over_rows() {
    let file = write_csv(SALES);
    let table = clean(&load(file.path()).unwrap()).unwrap();
    let metrics = compute_metrics(&table).unwrap();
    assert_eq!(
        metrics.average_sale,
        metrics.total_revenue / Decimal::from(table.len())
    );
    assert_eq!(metrics.top_product, "Laptop");
}

#[test]
fn test_clean_is_idempotent_on_loaded_data() {
    let file = write_csv(SALES);
    let once = clean(&load(file.path()).unwrap()).unwrap();
    let twice = clean(&once.to_raw()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_filter_signals() {
    let file = write_csv(SALES);
    let table = clean(&load(file.path()).unwrap()).unwrap();

    match filter_by_category(&table, Some("Electronics")) {
        FilterOutcome::Matches(records) => {
            assert_eq!(records.len(), 3);
            assert_eq!(records[0].product, "Laptop");
            assert_eq!(records[1].product, "Headphones");
        }
        other => panic!("expected matches, got {:?}", other),
    }
    assert_eq!(
        filter_by_category(&table, Some("Garden")),
        FilterOutcome::Empty
    );
    assert_eq!(filter_by_category(&table, Some("")), FilterOutcome::Skipped);
    assert_eq!(filter_by_category(&table, None), FilterOutcome::Skipped);
}

#[test]
fn test_empty_cleaned_table_fails_metrics() {
    let file = write_csv("Date,Product,Category,Price,Quantity Sold\n2024-01-01,A,X,,1\n");
    let table = clean(&load(file.path()).unwrap()).unwrap();

    assert!(table.is_empty());
    assert_eq!(total_revenue(&table), Ok(Decimal::ZERO));
    assert!(matches!(
        compute_metrics(&table),
        Err(MetricsError::EmptyTable { .. })
    ));
}

#[test]
fn test_short_rows_and_compact_dates() {
    let file = write_csv(
        "Date,Product,Category,Price,Quantity Sold\n\
         20240305,A,X,10,2\n\
         20240306,B,X\n\
         03.07.2024,C,Y,4,1\n",
    );
    let raw = load(file.path()).unwrap();
    assert_eq!(raw.len(), 3);

    let table = clean(&raw).unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table.records()[0].date, ymd(2024, 3, 5));
    assert_eq!(table.records()[1].date, ymd(2024, 3, 7));
}

#[test]
fn test_oversized_values_fail_without_panicking() {
    let file = write_csv(
        "Date,Product,Category,Price,Quantity Sold\n\
         2024-01-01,A,X,79228162514264337593543950335,2\n",
    );
    let raw = load(file.path()).unwrap();
    assert_eq!(clean(&raw), Err(ParseError::Overflow { line: 2 }));

    let file = write_csv(
        "Date,Product,Category,Price,Quantity Sold\n\
         2024-01-01,A,X,79228162514264337593543950335,1\n\
         2024-01-02,B,X,79228162514264337593543950335,1\n",
    );
    let err = SalesAnalyzer::new(CsvFileSource::new(file.path()), TomlConfig::default())
        .run()
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::MetricsError(MetricsError::Overflow { .. })
    ));
}

#[test]
fn test_source_rejects_missing_file_and_wrong_extension() {
    let dir = TempDir::new().unwrap();
    let missing = CsvFileSource::new(dir.path().join("missing.csv"));
    let config = TomlConfig::default();
    let err = SalesAnalyzer::new(missing, config).run().unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::LoadError(LoadError::NotFound { .. })
    ));
    assert_eq!(err.user_friendly_message(), "File not found.");

    let txt_path = dir.path().join("sales.txt");
    std::fs::write(&txt_path, SALES).unwrap();
    let err = SalesAnalyzer::new(CsvFileSource::new(&txt_path), TomlConfig::default())
        .run()
        .unwrap_err();
    assert!(matches!(
        err,
        AnalysisError::LoadError(LoadError::InvalidExtension { .. })
    ));
}

#[test]
fn test_analyzer_with_toml_config_renders_report() {
    let file = write_csv(SALES);
    let toml = format!(
        "[input]\npath = \"{}\"\n\n[filter]\ncategory = \"Books\"\n\n[output]\nformat = \"json\"\n",
        file.path().display().to_string().replace('\\', "\\\\")
    );
    let config = TomlConfig::from_toml_str(&toml).unwrap();
    assert_eq!(config.category(), Some("Books"));

    let source = CsvFileSource::new(config.input_path());
    let report = SalesAnalyzer::new(source, config).run().unwrap();

    assert_eq!(report.loaded_rows, 6);
    assert_eq!(report.dropped_rows, 1);
    assert_eq!(report.cleaned_rows, 5);

    let json = render(&report, OutputFormat::Json, 40).unwrap();
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["filter"]["status"], "matches");
    assert_eq!(value["filter"]["records"].as_array().unwrap().len(), 2);
    assert_eq!(value["metrics"]["top_product"], "Laptop");

    let text = render(&report, OutputFormat::Text, 40).unwrap();
    assert!(text.contains("Top-Selling Product: Laptop"));
    assert!(text.contains("Total Sales by Category"));
    assert!(text.contains("Heatmap: Price vs Quantity Sold"));
}
