//! Daily portfolio snapshots and the index engine that chains them.

mod index_calculator;
mod snapshot_model;
mod snapshot_service;
mod snapshot_traits;

pub use index_calculator::{compute_index_value, PriorSnapshot};
pub use snapshot_model::{LiveIndex, PortfolioSnapshot, SnapshotOutcome};
pub use snapshot_service::SnapshotService;
pub use snapshot_traits::{SnapshotRepositoryTrait, SnapshotServiceTrait};
