//! `stockdiff-recon` — Stock snapshot reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded cell grids for an OLD and a NEW
//! stock list, returns configuration-level comparison results.
//! No CLI or IO dependencies.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod insight;
pub mod model;
pub mod normalize;
pub mod reconcile;
pub mod summary;
pub mod table;

pub use config::{ColumnMapping, CompareConfig};
pub use engine::run;
pub use error::ReconError;
pub use model::{ComparisonResult, ComparisonRow, ConfigurationKey, InsightSet, Snapshot, Status};
pub use table::{Cell, Grid, RawTable};
