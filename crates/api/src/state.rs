//! Application state shared across handlers.

use std::sync::Arc;

use aggregator::{Aggregator, SummaryBuilder};
use scan_store::{AggregateStore, EventStore};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Write side: rolls raw events into facet collections.
    pub aggregator: Arc<Aggregator>,
    /// Read side: builds dashboard summaries from the facets.
    pub summaries: Arc<SummaryBuilder>,
}

impl AppState {
    pub fn new(events: Arc<dyn EventStore>, aggregates: Arc<dyn AggregateStore>) -> Self {
        Self {
            aggregator: Arc::new(Aggregator::new(events, aggregates.clone())),
            summaries: Arc::new(SummaryBuilder::new(aggregates)),
        }
    }
}
