//! Local-first meal and nutrition tracking.
//!
//! Meals with their foods and drinks live in a SQLite store that an external
//! replication backend keeps in step with other devices. [`sync::SyncMonitor`]
//! notices those remote writes, [`summary`] rolls meals up per day and week,
//! and [`templates`] provides the reference foods and drinks editors start
//! from.

pub mod config;
pub mod db;
pub mod error;
pub mod lookup;
pub mod models;
pub mod summary;
pub mod sync;
pub mod templates;
