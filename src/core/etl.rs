use crate::core::aggregate::build_aggregations;
use crate::core::cleaner::Cleaner;
use crate::core::filter::filter_by_category;
use crate::core::metrics::compute_metrics;
use crate::domain::model::AnalysisReport;
use crate::domain::ports::{ConfigProvider, RecordSource};
use crate::utils::error::Result;
use crate::utils::monitor::StageMonitor;

/// Runs load → clean → {metrics, filter, aggregations} over one source.
pub struct SalesAnalyzer<S: RecordSource, C: ConfigProvider> {
    source: S,
    config: C,
}

impl<S: RecordSource, C: ConfigProvider> SalesAnalyzer<S, C> {
    pub fn new(source: S, config: C) -> Self {
        Self { source, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub fn run(&self) -> Result<AnalysisReport> {
        let mut monitor = StageMonitor::new(self.config.monitoring_enabled());
        let source = self.source.describe();

        tracing::info!("📥 Loading sales data from {}", source);
        let raw = self.source.read_table()?;
        tracing::info!("Data loaded successfully: {} rows", raw.len());
        monitor.finish_stage("load");

        let outcome = Cleaner::with_formats(self.config.date_formats()).clean_with_report(&raw)?;
        if outcome.dropped > 0 {
            tracing::debug!("Dropped {} incomplete rows", outcome.dropped);
        }
        monitor.finish_stage("clean");

        let table = outcome.table;
        let metrics = compute_metrics(&table)?;
        monitor.finish_stage("metrics");

        let filter = filter_by_category(&table, self.config.category());
        monitor.finish_stage("filter");

        let aggregations = build_aggregations(&table)?;
        monitor.finish_stage("aggregate");
        monitor.log_final_stats();

        Ok(AnalysisReport {
            source,
            loaded_rows: raw.len(),
            dropped_rows: outcome.dropped,
            cleaned_rows: table.len(),
            metrics,
            filter,
            aggregations,
        })
    }
}
