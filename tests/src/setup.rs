//! Common test setup functions.

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;

use api::{router, AppState};
use scan_core::ScanEvent;
use scan_store::MemoryStore;
use telemetry::health;

/// Test context wiring the real router and handlers over the in-memory
/// store, so the full production code path runs minus the external
/// document database.
pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub router: Router,
}

impl TestContext {
    pub fn new() -> Self {
        // Health endpoints read the process-global registry.
        health().event_store.set_healthy();
        health().aggregate_store.set_healthy();

        let store = Arc::new(MemoryStore::default());
        let state = AppState::new(store.clone(), store.clone());

        Self {
            store: store.clone(),
            router: router(state),
        }
    }

    pub fn with_events(events: Vec<ScanEvent>) -> Self {
        let ctx = Self::new();
        ctx.store.insert_events(events);
        ctx
    }

    pub fn server(&self) -> TestServer {
        TestServer::new(self.router.clone()).expect("Failed to create test server")
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
