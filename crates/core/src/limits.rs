//! Operational limits for aggregation runs.

/// Events fetched per page from the event store.
pub const FETCH_PAGE_SIZE: usize = 1_000;

/// Hard cap on events considered in a single aggregation run. Hitting
/// the cap sets `truncated` on the run report; data is never dropped
/// silently.
pub const MAX_EVENTS_PER_RUN: usize = 50_000;

/// Ranking entries included in dashboard summaries.
pub const TOP_WINES_LIMIT: usize = 5;
