//! Batch aggregation pipeline: the orchestrator that rolls raw scan
//! events into facet collections, the read-side summary builder, the
//! sample-data fallback, and the background worker scheduler.

pub mod orchestrator;
pub mod sample;
pub mod scheduler;
pub mod summary;

pub use orchestrator::{AggregationReport, Aggregator, WineryFailure};
pub use scheduler::{WorkerConfig, WorkerScheduler};
pub use summary::{DashboardSummary, RangePreset, ShareEntry, SummaryBuilder, SummaryRange};
