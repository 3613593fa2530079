//! Public façade for the TPC-C in-memory transactional storage engine.
//!
//! Application code — TPC-C transaction bodies, the workload driver,
//! loaders (all out of scope per spec §1) — is meant to depend on this
//! crate alone. It re-exports everything a caller needs — record/key
//! types, `TxResult`/`Outcome`, `Config`, `Transaction` — and adds the one
//! thing none of the lower crates can own: the process-wide [`Engine`]
//! singleton (`get_db`/`get_engine`/`begin`), mirroring how
//! `original_source/app/include/db_wrapper.hpp` hands every transaction
//! body a reference to one shared `Database`.
//!
//! ```
//! use tpcc_api::{Address, Engine, Config, Warehouse};
//!
//! let engine = Engine::new(Config::new(1, 1));
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
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod engine;

pub use engine::{begin, get_db, get_engine, init, AlreadyInitialized, Engine};

pub use tpcc_concurrency::{ConcurrencyManager, LockError, LockMode, TableId, TxGuard};
pub use tpcc_core::{
    Address, ConcurrencyMode, Config, Customer, CustomerKey, CustomerSecondary,
    CustomerSecondaryKey, District, DistrictKey, FieldError, FixedStr, HasSecondary, History,
    Item, ItemKey, NewOrder, NewOrderKey, Order, OrderKey, OrderLine, OrderLineKey,
    OrderSecondary, OrderSecondaryKey, Outcome, Record, SecondaryEntry, Stock, StockKey, TxResult,
    Warehouse, WarehouseKey,
};
pub use tpcc_engine::{HasTableId, Transaction};
pub use tpcc_storage::{Database, RecordPool, SecondaryTableAccess, TableAccess};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn end_to_end_insert_commit_get_round_trip() {
        let engine = Engine::new(Config::new(1, 1));

        let tx = engine.begin();
        let w = Warehouse {
            w_id: 7,
            w_tax: 0.05,
            w_ytd: 0.0,
            w_name: "SEVEN".try_into().unwrap(),
            w_address: Address::new("a", "b", "c", "ST", "123456789").unwrap(),
        };
        assert!(tx.prepare_record_for_insert(w.clone()).is_success());
        assert!(tx.commit());

        let check = engine.begin();
        assert_eq!(check.get::<Warehouse>(&WarehouseKey::new(7)), Outcome::Success(w));
    }

    #[test]
    fn singleton_survives_across_begin_calls() {
        // This test shares process state with any other test that touches
        // the default singleton; it only asserts internal consistency
        // (insert then immediately read back), never a specific prior
        // state, so it is safe to run alongside others in the same binary.
        let tx = begin();
        let w = Warehouse {
            w_id: 9001,
            w_tax: 0.02,
            w_ytd: 0.0,
            w_name: "SINGLE".try_into().unwrap(),
            w_address: Address::new("a", "b", "c", "ST", "123456789").unwrap(),
        };
        assert!(tx.prepare_record_for_insert(w.clone()).is_success());
        assert!(tx.commit());

        assert_eq!(
            begin().get::<Warehouse>(&WarehouseKey::new(9001)),
            Outcome::Success(w)
        );
    }
}
