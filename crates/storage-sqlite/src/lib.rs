//! SQLite storage implementation for the trade book.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `tradebook-core` and contains:
//! - Database connection pooling and management
//! - Diesel migrations
//! - Repository implementations for trades and portfolio snapshots
//! - Database-specific model types (with Diesel derives)
//!
//! # Architecture
//!
//! This crate is the only place in the application where Diesel dependencies exist.
//! The core crate is database-agnostic and works with traits.
//!
//! ```text
//!         core (domain)
//!               │
//!               ▼
//!   storage-sqlite (this crate)
//!               │
//!               ▼
//!           SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;

// Repository implementations
pub mod portfolio;
pub mod trades;

// Re-export database utilities
pub use db::{create_pool, get_connection, init, run_migrations, spawn_writer, DbConnection, DbPool, WriteHandle};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

pub use portfolio::snapshot::SnapshotRepository;
pub use trades::TradeRepository;

// Re-export from tradebook-core for convenience
pub use tradebook_core::errors::{DatabaseError, Error, Result};
