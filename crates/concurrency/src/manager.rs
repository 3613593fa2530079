//! `ConcurrencyManager` — lock acquisition and release for a transaction.
//!
//! `original_source/concurrency_manager.hpp` pairs a single lock per
//! transaction with a `num_threads == 1` bypass. This core keeps that
//! shape for [`ConcurrencyMode::Serial`]/[`ConcurrencyMode::GlobalMutex`]
//! but, per the design note flagging the original's blocking lock wait as
//! a deadlock hazard, implements [`ConcurrencyMode::TableLocking`] as
//! strictly no-wait: a denied lock fails the acquisition immediately
//! rather than parking the thread on a condition variable.

use std::cell::RefCell;
use std::collections::HashMap;

use parking_lot::{Mutex, MutexGuard, RwLock, RwLockReadGuard, RwLockWriteGuard};
use thiserror::Error;
use tpcc_core::ConcurrencyMode;

/// One lockable unit under [`ConcurrencyMode::TableLocking`].
///
/// Granularity is per logical table, not per row: this mirrors the
/// original's table-wide `LockTable`, just made non-blocking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableId {
    /// `Item`.
    Item,
    /// `Warehouse`.
    Warehouse,
    /// `Stock`.
    Stock,
    /// `District`.
    District,
    /// `Customer` (and its secondary index).
    Customer,
    /// `Order` (and its secondary index).
    Order,
    /// `NewOrder`.
    NewOrder,
    /// `OrderLine`.
    OrderLine,
}

/// Requested access mode for a table lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LockMode {
    /// Read access; compatible with other `Shared` holders.
    Shared,
    /// Write access; exclusive of every other holder.
    Exclusive,
}

/// Lock acquisition failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum LockError {
    /// The requested lock was denied without blocking. The caller must
    /// abort the transaction; this core never retries internally.
    #[error("would block acquiring {mode:?} lock on {table:?}")]
    WouldBlock {
        /// The table the lock was requested against.
        table: TableId,
        /// The requested access mode.
        mode: LockMode,
    },
}

impl LockError {
    /// Stable identifier for logging/metrics, independent of the display
    /// message's wording.
    pub fn reason_code(&self) -> &'static str {
        match self {
            LockError::WouldBlock { .. } => "lock_would_block",
        }
    }
}

struct TableLocks {
    item: RwLock<()>,
    warehouse: RwLock<()>,
    stock: RwLock<()>,
    district: RwLock<()>,
    customer: RwLock<()>,
    order: RwLock<()>,
    new_order: RwLock<()>,
    order_line: RwLock<()>,
}

impl TableLocks {
    fn new() -> Self {
        Self {
            item: RwLock::new(()),
            warehouse: RwLock::new(()),
            stock: RwLock::new(()),
            district: RwLock::new(()),
            customer: RwLock::new(()),
            order: RwLock::new(()),
            new_order: RwLock::new(()),
            order_line: RwLock::new(()),
        }
    }

    fn get(&self, table: TableId) -> &RwLock<()> {
        match table {
            TableId::Item => &self.item,
            TableId::Warehouse => &self.warehouse,
            TableId::Stock => &self.stock,
            TableId::District => &self.district,
            TableId::Customer => &self.customer,
            TableId::Order => &self.order,
            TableId::NewOrder => &self.new_order,
            TableId::OrderLine => &self.order_line,
        }
    }
}

enum HeldGuard<'a> {
    Shared(RwLockReadGuard<'a, ()>),
    Exclusive(RwLockWriteGuard<'a, ()>),
}

/// The locks held by one in-flight transaction.
///
/// Dropping a `TxGuard` releases every lock it holds — a transaction ends
/// its lock lifetime by letting this value go out of scope, exactly where
/// `original_source/transaction.hpp`'s destructor calls `release()`.
pub enum TxGuard<'a> {
    /// [`ConcurrencyMode::Serial`]: nothing to hold.
    Serial,
    /// [`ConcurrencyMode::GlobalMutex`]: the whole-database mutex, held
    /// for the lifetime of the transaction.
    Global(#[allow(dead_code)] MutexGuard<'a, ()>),
    /// [`ConcurrencyMode::TableLocking`]: one guard per table already
    /// touched by this transaction, keyed by [`TableId`] so a second touch
    /// of the same table re-acquires nothing (mirroring the original
    /// `LockTable`'s per-transaction already-held bookkeeping).
    TableLocking(RefCell<HashMap<TableId, HeldGuard<'a>>>),
}

/// Acquires and releases locks on behalf of in-flight transactions.
pub struct ConcurrencyManager {
    mode: ConcurrencyMode,
    global: Mutex<()>,
    tables: TableLocks,
}

impl ConcurrencyManager {
    /// Construct a manager operating in `mode`.
    pub fn new(mode: ConcurrencyMode) -> Self {
        Self {
            mode,
            global: Mutex::new(()),
            tables: TableLocks::new(),
        }
    }

    /// The mode this manager was constructed with.
    pub fn mode(&self) -> ConcurrencyMode {
        self.mode
    }

    /// Begin a transaction's lock scope. Under [`ConcurrencyMode::GlobalMutex`],
    /// blocks until the whole-database mutex is free — this is the
    /// required mode and is expected to serialize, not to deadlock. Under
    /// [`ConcurrencyMode::TableLocking`], returns immediately; locks are
    /// acquired lazily via [`ConcurrencyManager::acquire`].
    pub fn begin(&self) -> TxGuard<'_> {
        match self.mode {
            ConcurrencyMode::Serial => TxGuard::Serial,
            ConcurrencyMode::GlobalMutex => TxGuard::Global(self.global.lock()),
            ConcurrencyMode::TableLocking => TxGuard::TableLocking(RefCell::new(HashMap::new())),
        }
    }

    /// Acquire `mode` access to `table` within `guard`'s scope.
    ///
    /// Under `Serial`/`GlobalMutex` this is a no-op: the whole database is
    /// already held exclusively (or there is no concurrency to guard
    /// against). Under `TableLocking` this is a non-blocking `try_read`/
    /// `try_write`; a denied lock returns [`LockError::WouldBlock`] and
    /// the caller must abort rather than wait, so no lock-wait graph ever
    /// forms and no deadlock is possible.
    ///
    /// A transaction that has already touched `table` re-uses the guard it
    /// is already holding instead of re-locking: `parking_lot`'s `RwLock`
    /// is not reentrant, so a second `try_read`/`try_write` from the same
    /// transaction on a table it already holds would otherwise deadlock
    /// against itself (exclusive-then-anything) or spuriously deny a
    /// second shared reader that is, in fact, the same transaction. A
    /// `Shared` hold asked to upgrade to `Exclusive` releases its read
    /// guard and attempts `try_write`; if that fails, the table's prior
    /// shared hold is already gone and the transaction must abort — no
    /// worse than any other denied acquisition under the no-wait contract.
    pub fn acquire(
        &self,
        guard: &TxGuard<'_>,
        table: TableId,
        mode: LockMode,
    ) -> Result<(), LockError> {
        let TxGuard::TableLocking(held) = guard else {
            return Ok(());
        };
        let mut held = held.borrow_mut();
        match held.get(&table) {
            Some(HeldGuard::Exclusive(_)) => return Ok(()),
            Some(HeldGuard::Shared(_)) if mode == LockMode::Shared => return Ok(()),
            Some(HeldGuard::Shared(_)) => {
                // Upgrade: drop the read guard before asking for the write.
                held.remove(&table);
            }
            None => {}
        }
        let lock = self.tables.get(table);
        let acquired = match mode {
            LockMode::Shared => lock.try_read().map(HeldGuard::Shared),
            LockMode::Exclusive => lock.try_write().map(HeldGuard::Exclusive),
        };
        match acquired {
            Some(g) => {
                held.insert(table, g);
                Ok(())
            }
            None => {
                tracing::debug!(?table, ?mode, "lock denied without waiting");
                Err(LockError::WouldBlock { table, mode })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serial_mode_never_denies_a_lock() {
        let mgr = ConcurrencyManager::new(ConcurrencyMode::Serial);
        let guard = mgr.begin();
        assert!(mgr
            .acquire(&guard, TableId::Warehouse, LockMode::Exclusive)
            .is_ok());
    }

    #[test]
    fn global_mutex_mode_serializes_begin() {
        let mgr = ConcurrencyManager::new(ConcurrencyMode::GlobalMutex);
        let guard = mgr.begin();
        assert!(mgr.global.try_lock().is_none());
        drop(guard);
        assert!(mgr.global.try_lock().is_some());
    }

    #[test]
    fn table_locking_allows_concurrent_shared_reads() {
        let mgr = ConcurrencyManager::new(ConcurrencyMode::TableLocking);
        let g1 = mgr.begin();
        let g2 = mgr.begin();
        assert!(mgr.acquire(&g1, TableId::Stock, LockMode::Shared).is_ok());
        assert!(mgr.acquire(&g2, TableId::Stock, LockMode::Shared).is_ok());
    }

    #[test]
    fn table_locking_denies_conflicting_exclusive_without_blocking() {
        let mgr = ConcurrencyManager::new(ConcurrencyMode::TableLocking);
        let g1 = mgr.begin();
        let g2 = mgr.begin();
        assert!(mgr
            .acquire(&g1, TableId::Stock, LockMode::Exclusive)
            .is_ok());
        let err = mgr
            .acquire(&g2, TableId::Stock, LockMode::Exclusive)
            .unwrap_err();
        assert_eq!(err.reason_code(), "lock_would_block");
    }

    #[test]
    fn table_locking_releases_on_guard_drop() {
        let mgr = ConcurrencyManager::new(ConcurrencyMode::TableLocking);
        {
            let g1 = mgr.begin();
            mgr.acquire(&g1, TableId::District, LockMode::Exclusive)
                .unwrap();
        }
        let g2 = mgr.begin();
        assert!(mgr
            .acquire(&g2, TableId::District, LockMode::Exclusive)
            .is_ok());
    }

    #[test]
    fn table_locking_is_independent_per_table() {
        let mgr = ConcurrencyManager::new(ConcurrencyMode::TableLocking);
        let g1 = mgr.begin();
        let g2 = mgr.begin();
        mgr.acquire(&g1, TableId::Customer, LockMode::Exclusive)
            .unwrap();
        assert!(mgr
            .acquire(&g2, TableId::Order, LockMode::Exclusive)
            .is_ok());
    }
}
