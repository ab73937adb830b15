//! palmcheck-core: ingestion, storage and yield estimation for palm-fruit
//! ripeness detections.

pub mod api;
pub mod client;
pub mod clock;
pub mod config;
pub mod error;
pub mod estimate;
pub mod format;
pub mod ids;
pub mod ingest;
pub mod observation;
pub mod poller;
pub mod simulator;
pub mod store;
pub mod summary;
pub mod types;
pub mod views;
