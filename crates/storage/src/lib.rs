//! Storage layer for the TPC-C in-memory engine
//!
//! This crate owns the committed state of the database and the allocator
//! cache that sits in front of it:
//! - `database`: the `Database` singleton, its per-table `RwLock<BTreeMap>`
//!   storage, and the `TableAccess`/`SecondaryTableAccess` static-dispatch
//!   traits
//! - `pool`: `RecordPool`, a thread-local bounded free list used on the
//!   insert/update/delete hot paths
//!
//! Isolation and locking are layered on top, in `tpcc-concurrency`; this
//! crate only guarantees map-level consistency, not transaction isolation.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod database;
pub mod pool;

pub use database::{Database, SecondaryTableAccess, TableAccess};
pub use pool::{RecordPool, DEFAULT_POOL_BOUND};
