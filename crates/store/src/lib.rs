//! Store boundary for the aggregation engine.
//!
//! The engine never talks to a concrete document store directly: the
//! orchestrator and summary builder depend on the [`EventStore`] and
//! [`AggregateStore`] traits, and production deployments plug in an
//! adapter for their document store. The bundled [`MemoryStore`] backs
//! local runs and tests.

pub mod config;
pub mod interface;
pub mod memory;

pub use config::CollectionConfig;
pub use interface::{AggregateStore, EventFilter, EventStore};
pub use memory::MemoryStore;
