//! Portfolio-level state: daily snapshots and the chain-linked performance index.

pub mod snapshot;

pub use snapshot::*;
