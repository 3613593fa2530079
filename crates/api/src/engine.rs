//! `Engine` — bundles a `Database` with the `ConcurrencyManager` its
//! `Config` selects, and the process-wide singleton built from it.
//!
//! `original_source/app/src/initializer.cpp` constructs its `Database` and
//! reads `Config::get_num_threads()` once at process start; `get_db()` in
//! `original_source/app/include/db_wrapper.hpp` then hands out a reference
//! to that one instance for the lifetime of the process. `Engine` is the
//! idiomatic-Rust reshaping of that pair: a value type callers can also
//! construct directly for test isolation (see the "Global singletons"
//! design note), with `init`/`get_engine` providing the equivalent of the
//! process-wide default.

use once_cell::sync::OnceCell;
use thiserror::Error;
use tpcc_concurrency::ConcurrencyManager;
use tpcc_core::Config;
use tpcc_engine::Transaction;
use tpcc_storage::Database;

/// A `Database` paired with the `ConcurrencyManager` its `Config` selects.
///
/// Construct one directly for test isolation; use [`init`]/[`get_engine`]
/// for the process-wide default the rest of an embedding application
/// shares.
pub struct Engine {
    db: Database,
    manager: ConcurrencyManager,
    config: Config,
}

impl Engine {
    /// Build a fresh, empty engine for `config`, selecting
    /// [`tpcc_core::ConcurrencyMode::Serial`] when `config.num_threads <= 1`
    /// regardless of `config.concurrency_mode` (see `Config::effective_mode`).
    pub fn new(config: Config) -> Self {
        let mode = config.effective_mode();
        tracing::info!(?mode, num_warehouses = config.num_warehouses, "engine initialized");
        Self {
            db: Database::new(),
            manager: ConcurrencyManager::new(mode),
            config,
        }
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The owned `Database`.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Open a new transaction against this engine's database and
    /// concurrency manager.
    pub fn begin(&self) -> Transaction<'_> {
        Transaction::new(&self.db, &self.manager)
    }
}

/// Error returned when [`init`] is called after the engine singleton has
/// already been initialized (explicitly or by a prior [`get_engine`] call).
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("engine already initialized")]
pub struct AlreadyInitialized;

static ENGINE: OnceCell<Engine> = OnceCell::new();

/// Initialize the process-wide [`Engine`] singleton with `config`.
///
/// # Errors
///
/// Returns [`AlreadyInitialized`] if the singleton was already built,
/// whether by an earlier `init()` call or by [`get_engine`] falling back to
/// [`Config::default`] on first access.
pub fn init(config: Config) -> Result<(), AlreadyInitialized> {
    ENGINE.set(Engine::new(config)).map_err(|_| AlreadyInitialized)
}

/// The process-wide [`Engine`] singleton, lazily built with
/// [`Config::default`] (serial mode, one warehouse) if [`init`] was never
/// called.
pub fn get_engine() -> &'static Engine {
    ENGINE.get_or_init(|| Engine::new(Config::default()))
}

/// The process-wide [`Database`] singleton. Shorthand for
/// `get_engine().database()`.
pub fn get_db() -> &'static Database {
    get_engine().database()
}

/// Open a transaction against the process-wide singleton. Shorthand for
/// `get_engine().begin()`.
pub fn begin() -> Transaction<'static> {
    get_engine().begin()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpcc_core::{ConcurrencyMode, WarehouseKey};

    #[test]
    fn direct_construction_is_isolated_from_the_singleton() {
        let engine = Engine::new(Config::with_mode(4, 1, ConcurrencyMode::GlobalMutex));
        assert!(engine.database().get::<tpcc_core::Warehouse>(&WarehouseKey::new(1)).is_none());
    }

    #[test]
    fn engine_default_mode_is_serial_for_single_thread() {
        let engine = Engine::new(Config::new(1, 1));
        assert_eq!(engine.config().effective_mode(), ConcurrencyMode::Serial);
    }
}
