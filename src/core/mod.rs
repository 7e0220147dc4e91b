pub mod aggregate;
pub mod cleaner;
pub mod etl;
pub mod filter;
pub mod loader;
pub mod metrics;

pub use crate::domain::model::{
    Aggregations, AnalysisReport, CrossTab, FilterOutcome, Metrics, RawRecord, RawTable,
    SalesRecord, SalesTable, Table,
};
pub use crate::domain::ports::{ConfigProvider, RecordSource};
pub use crate::utils::error::Result;
