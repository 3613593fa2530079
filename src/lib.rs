//! # tpcc-store
//!
//! An in-memory transactional storage engine for the TPC-C workload.
//!
//! This root crate is a thin aggregator, mirroring how the teacher
//! codebase's own root crate re-exports its facade crate rather than
//! defining logic of its own: all behavior lives in the workspace members
//! under `crates/`, and this crate just re-exports [`tpcc_api`]'s public
//! surface.
//!
//! - `tpcc-core` — record/key types, `FixedStr`, `TxResult`, `Config`.
//! - `tpcc-storage` — `Database`, the record allocator cache.
//! - `tpcc-concurrency` — `ConcurrencyManager` and its lock modes.
//! - `tpcc-engine` — `WriteSet`, `Transaction`.
//! - `tpcc-api` — the public façade: the process-wide `Engine` singleton
//!   plus every type above, re-exported here.
//!
//! # Quick start
//!
//! ```
//! use tpcc_store::{Address, Engine, Config, Warehouse, WarehouseKey};
//!
//! let engine = Engine::new(Config::new(1, 4));
//!
//! let tx = engine.begin();
//! let w = Warehouse {
//!     w_id: 1,
//!     w_tax: 0.1,
//!     w_ytd: 300_000.0,
//!     w_name: "W1".try_into().unwrap(),
//!     w_address: Address::new("s1", "s2", "city", "CA", "123456789").unwrap(),
//! };
//! assert!(tx.prepare_record_for_insert(w).is_success());
//! assert!(tx.commit());
//!
//! let check = engine.begin();
//! assert!(check.get::<Warehouse>(&WarehouseKey::new(1)).is_success());
//! ```

#![warn(missing_docs)]

pub use tpcc_api::*;
