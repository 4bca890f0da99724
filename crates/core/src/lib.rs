//! Core types, grouping functions, and ranking for the corkscan engine.

pub mod aggregates;
pub mod error;
pub mod event;
pub mod grouping;
pub mod limits;
pub mod ranking;

pub use aggregates::*;
pub use error::{Error, Result};
pub use event::{DeviceType, ScanEvent, UNKNOWN_KEY};
pub use grouping::*;
pub use ranking::rank_wines;
