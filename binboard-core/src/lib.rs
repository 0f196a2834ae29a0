//! Core types and service wiring for the binboard waste-management dashboard.

/// Bin filters applied in memory over the cached bin set.
pub mod bins;
/// Pickup bucketing for the per-route chart.
pub mod chart;
/// Backend endpoint credentials.
pub mod config;
/// Dashboard metrics and recency helpers.
pub mod dashboard;
/// Complaint and ticket submission forms.
pub mod forms;
/// Keyed lookups for zones and routes.
pub mod lookup;
/// Row types mirroring the backend tables.
pub mod model;
/// Traits describing the REST backend and its errors.
pub mod ports;
/// Query strings for the table-as-resource surface.
pub mod query;
/// High-level service facade used by clients.
pub mod service;
/// Display helpers for untrusted row values.
pub mod text;

pub use bins::*;
pub use chart::*;
pub use config::*;
pub use dashboard::*;
pub use forms::*;
pub use lookup::*;
pub use model::*;
pub use ports::*;
pub use query::*;
pub use service::*;
pub use text::*;

#[cfg(test)]
pub(crate) mod fixtures;
