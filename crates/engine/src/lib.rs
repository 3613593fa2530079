//! Transaction engine for the TPC-C in-memory storage core.
//!
//! This crate ties `tpcc-storage`'s `Database` and `tpcc-concurrency`'s
//! `ConcurrencyManager` together behind the transaction façade:
//! - `writeset`: `WriteSet`, the per-transaction buffered mutation log
//!   (§4.4).
//! - `transaction`: `Transaction`, the lifecycle state machine and public
//!   operation surface (§4.6).

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod transaction;
pub mod writeset;

pub use transaction::{HasTableId, Transaction};
pub use writeset::{Intent, LogRecord, WriteSet, WriteSetAccess};
