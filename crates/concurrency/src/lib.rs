//! Lock management for the TPC-C in-memory engine
//!
//! `manager` defines [`ConcurrencyManager`], the three [`tpcc_core::ConcurrencyMode`]
//! strategies, and the no-wait table-locking error type. The transaction
//! façade in `tpcc-engine` holds one `TxGuard` for its entire lifetime and
//! requests per-table locks through it as it touches tables.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;

pub use manager::{ConcurrencyManager, LockError, LockMode, TableId, TxGuard};
