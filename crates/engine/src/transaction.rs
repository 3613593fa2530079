//! `Transaction` — the top-level handle tying locking, the write-set, and
//! the database together.
//!
//! Grounded on `original_source/tx_engine/include/transaction.hpp`: that
//! header routes `get_record`/`prepare_record_for_insert`/
//! `prepare_record_for_update`/`delete_record` through its `WriteSet`, but
//! resolves `get_customer_by_last_name`, `get_order_by_customer_id`,
//! `get_neworder_with_smallest_key_no_less_than`, `range_query`, and
//! `range_update` directly against `Database`'s secondary indexes and
//! ordered ranges — this module keeps that split rather than inventing a
//! write-set-aware range scan the source never had.

use tpcc_concurrency::{ConcurrencyManager, LockMode, TableId, TxGuard};
use tpcc_core::{
    Customer, CustomerSecondaryKey, District, History, Item, NewOrder, NewOrderKey, Order,
    OrderLine, OrderSecondaryKey, Outcome, Record, Stock, TxResult, Warehouse,
};
use tpcc_storage::{Database, TableAccess};

use crate::writeset::{WriteSet, WriteSetAccess};

/// Maps a lockable record type to the table lock it is guarded by.
///
/// `History` has no entry: the source takes no lock around its append-only
/// writeset (see spec §4.5's table list, which names eight tables and
/// never `History`).
pub trait HasTableId: Record {
    /// The table lock this record type is guarded by.
    const TABLE_ID: TableId;
}

macro_rules! impl_has_table_id {
    ($record:ty, $table:expr) => {
        impl HasTableId for $record {
            const TABLE_ID: TableId = $table;
        }
    };
}

impl_has_table_id!(Item, TableId::Item);
impl_has_table_id!(Warehouse, TableId::Warehouse);
impl_has_table_id!(Stock, TableId::Stock);
impl_has_table_id!(District, TableId::District);
impl_has_table_id!(Customer, TableId::Customer);
impl_has_table_id!(Order, TableId::Order);
impl_has_table_id!(NewOrder, TableId::NewOrder);
impl_has_table_id!(OrderLine, TableId::OrderLine);

/// The top-level transaction handle.
///
/// Locks are acquired on construction (`ConcurrencyManager::begin`, plus a
/// per-table acquisition the first time an operation touches that table)
/// and released unconditionally when the transaction is dropped — whether
/// it reaches that point via `commit()`, `abort()`, or simply falling out
/// of scope, matching the lifecycle diagram in spec §4.6 ("Destruction in
/// any state releases locks").
pub struct Transaction<'a> {
    db: &'a Database,
    manager: &'a ConcurrencyManager,
    guard: TxGuard<'a>,
    write_set: WriteSet,
}

impl<'a> Transaction<'a> {
    /// Open a new transaction against `db`, acquiring whatever `manager`'s
    /// mode requires up front.
    pub fn new(db: &'a Database, manager: &'a ConcurrencyManager) -> Self {
        let guard = manager.begin();
        tracing::debug!(mode = ?manager.mode(), "transaction opened");
        Self {
            db,
            manager,
            guard,
            write_set: WriteSet::new(),
        }
    }

    fn acquire(&self, table: TableId, mode: LockMode) -> bool {
        self.manager.acquire(&self.guard, table, mode).is_ok()
    }

    /// Read `key`, consulting this transaction's own pending writes first.
    pub fn get<R>(&self, key: &R::Key) -> Outcome<R>
    where
        R: HasTableId,
        WriteSet: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        if !self.acquire(R::TABLE_ID, LockMode::Shared) {
            return Outcome::Abort;
        }
        self.write_set.get::<R>(key, self.db)
    }

    /// Stage an INSERT of `payload`. `FAIL` if the key already exists in
    /// the database or is already staged.
    pub fn prepare_record_for_insert<R>(&self, payload: R) -> Outcome<()>
    where
        R: HasTableId,
        WriteSet: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        if !self.acquire(R::TABLE_ID, LockMode::Exclusive) {
            return Outcome::Abort;
        }
        let key = payload.key();
        self.write_set.prepare_record_for_insert(key, payload, self.db)
    }

    /// Stage an UPDATE at `key`, deep-copying from the database on first
    /// touch and applying `f` to the staged payload. `FAIL` if `key` is
    /// absent from both the write-set and the database, or staged for
    /// deletion.
    pub fn prepare_record_for_update<R>(&self, key: R::Key, f: impl FnOnce(&mut R)) -> Outcome<()>
    where
        R: HasTableId,
        WriteSet: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        if !self.acquire(R::TABLE_ID, LockMode::Exclusive) {
            return Outcome::Abort;
        }
        self.write_set.prepare_record_for_update(key, self.db, f)
    }

    /// Stage a DELETE at `key`. `FAIL` on double-delete or if `key` is
    /// absent from both the write-set and the database.
    pub fn delete_record<R>(&self, key: R::Key) -> TxResult
    where
        R: HasTableId,
        WriteSet: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        if !self.acquire(R::TABLE_ID, LockMode::Exclusive) {
            return TxResult::Abort;
        }
        self.write_set.delete_record(key, self.db)
    }

    /// The median-by-first-name customer among those sharing `sec_key`'s
    /// last name, per spec §4.6 and §8 ("Secondary median"): for `n`
    /// entries sorted ascending by `c_first`, returns the `(n+1)/2`-th
    /// (1-indexed). Resolved directly against the committed database, not
    /// this transaction's write-set — `original_source` does the same.
    pub fn get_customer_by_last_name(&self, sec_key: &CustomerSecondaryKey) -> Outcome<Customer> {
        if !self.acquire(TableId::Customer, LockMode::Shared) {
            return Outcome::Abort;
        }
        let keys = self.db.secondary_lookup::<Customer>(sec_key);
        if keys.is_empty() {
            return Outcome::Fail;
        }
        let mut customers: Vec<Customer> = keys
            .iter()
            .filter_map(|k| self.db.get::<Customer>(k))
            .collect();
        if customers.is_empty() {
            return Outcome::Fail;
        }
        customers.sort_by(|a, b| a.c_first.as_str().cmp(b.c_first.as_str()));
        let n = customers.len();
        let median_idx = (n + 1) / 2 - 1;
        Outcome::Success(customers[median_idx].clone())
    }

    /// The order with the maximal `o_id` among those sharing `sec_key`'s
    /// customer id. `FAIL` if none.
    pub fn get_order_by_customer_id(&self, sec_key: &OrderSecondaryKey) -> Outcome<Order> {
        if !self.acquire(TableId::Order, LockMode::Shared) {
            return Outcome::Abort;
        }
        let keys = self.db.secondary_lookup::<Order>(sec_key);
        let max_order = keys
            .iter()
            .filter_map(|k| self.db.get::<Order>(k))
            .max_by_key(|o| o.o_id);
        match max_order {
            Some(order) => Outcome::Success(order),
            None => Outcome::Fail,
        }
    }

    /// The `NewOrder` with the smallest key `>= low`, restricted to
    /// `low`'s own `(w_id, d_id)` district: `FAIL` if the smallest such
    /// key belongs to a different district (spec §4.6, §8 scenario 6).
    pub fn get_neworder_with_smallest_key_no_less_than(&self, low: NewOrderKey) -> Outcome<NewOrder> {
        if !self.acquire(TableId::NewOrder, LockMode::Shared) {
            return Outcome::Abort;
        }
        match self.db.first_at_or_after::<NewOrder>(low) {
            Some(rec) if rec.no_w_id == low.no_w_id && rec.no_d_id == low.no_d_id => {
                Outcome::Success(rec)
            }
            _ => Outcome::Fail,
        }
    }

    /// Invoke `f` on a deep copy of every record in `[low, up)`, in
    /// ascending key order. `f` sees owned values and cannot mutate the
    /// store directly.
    pub fn range_query<R>(&self, low: R::Key, up: R::Key, mut f: impl FnMut(&R)) -> TxResult
    where
        R: HasTableId,
        Database: TableAccess<R>,
    {
        if !self.acquire(R::TABLE_ID, LockMode::Shared) {
            return TxResult::Abort;
        }
        for record in self.db.range_iter::<R>(low, up) {
            f(&record);
        }
        TxResult::Success
    }

    /// Promote every record in `[low, up)` into the write-set as an
    /// UPDATE, applying `f` to each staged payload.
    pub fn range_update<R>(&self, low: R::Key, up: R::Key, f: impl FnMut(&mut R)) -> TxResult
    where
        R: HasTableId,
        WriteSet: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        if !self.acquire(R::TABLE_ID, LockMode::Exclusive) {
            return TxResult::Abort;
        }
        self.write_set.range_update(low, up, self.db, f);
        TxResult::Success
    }

    /// Append a `History` record. No key, no failure, no table lock (see
    /// the `HasTableId` doc comment).
    pub fn append_history(&self, record: History) {
        self.write_set.append_history(record);
    }

    /// Drain the write-set into the database. The intent table in spec
    /// §4.4 is enforced at staging time, so this step cannot fail — it
    /// always returns `true`, mirroring `WriteSet::apply_to_database`'s
    /// infallible contract in `original_source/writeset.hpp`.
    pub fn commit(self) -> bool {
        tracing::debug!("transaction committing");
        self.write_set.apply_to_database(self.db);
        true
    }

    /// Discard every staged mutation, leaving the database exactly as it
    /// was before the transaction began.
    pub fn abort(self) {
        tracing::debug!("transaction aborting");
        self.write_set.clear_all();
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        // Idempotent: a prior explicit `commit()`/`abort()` already drained
        // or cleared every staging map, so this is a no-op in that case.
        // It only does real work when the transaction is dropped without
        // either call, e.g. on an early return from a caller's `?`.
        self.write_set.clear_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpcc_concurrency::ConcurrencyManager;
    use tpcc_core::{Address, ConcurrencyMode, WarehouseKey};

    fn manager(mode: ConcurrencyMode) -> ConcurrencyManager {
        ConcurrencyManager::new(mode)
    }

    fn warehouse(w_id: u16, w_tax: f32) -> Warehouse {
        Warehouse {
            w_id,
            w_tax,
            w_ytd: 300_000.0,
            w_name: "W1".try_into().unwrap(),
            w_address: Address::new("s1", "s2", "city", "CA", "123456789").unwrap(),
        }
    }

    fn customer(w_id: u16, d_id: u8, c_id: u32, first: &str, last: &str) -> Customer {
        Customer {
            c_id,
            c_d_id: d_id,
            c_w_id: w_id,
            c_payment_cnt: 0,
            c_delivery_cnt: 0,
            c_since: 0,
            c_credit_lim: 50_000.0,
            c_discount: 0.0,
            c_balance: 0.0,
            c_ytd_payment: 0.0,
            c_first: first.try_into().unwrap(),
            c_middle: "OE".try_into().unwrap(),
            c_last: last.try_into().unwrap(),
            c_phone: "1234567890123456".try_into().unwrap(),
            c_credit: "GC".try_into().unwrap(),
            c_data: "".try_into().unwrap(),
            c_address: Address::new("s1", "s2", "city", "CA", "123456789").unwrap(),
        }
    }

    #[test]
    fn insert_then_get_round_trips_across_transactions() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::Serial);

        let tx1 = Transaction::new(&db, &cm);
        assert!(tx1
            .prepare_record_for_insert(warehouse(1, 0.1))
            .is_success());
        assert!(tx1.commit());

        let tx2 = Transaction::new(&db, &cm);
        let got = tx2.get::<Warehouse>(&WarehouseKey::new(1));
        assert_eq!(got, Outcome::Success(warehouse(1, 0.1)));
    }

    #[test]
    fn double_insert_fails_with_no_state_change() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::Serial);

        let tx1 = Transaction::new(&db, &cm);
        tx1.prepare_record_for_insert(warehouse(1, 0.1));
        tx1.commit();

        let tx2 = Transaction::new(&db, &cm);
        assert_eq!(
            tx2.prepare_record_for_insert(warehouse(1, 0.2)),
            Outcome::Fail
        );
        tx2.abort();

        let tx3 = Transaction::new(&db, &cm);
        assert_eq!(
            tx3.get::<Warehouse>(&WarehouseKey::new(1)),
            Outcome::Success(warehouse(1, 0.1))
        );
    }

    #[test]
    fn abort_restores_prior_state() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::Serial);

        let setup = Transaction::new(&db, &cm);
        setup.prepare_record_for_insert(warehouse(1, 0.1));
        setup.commit();

        let tx = Transaction::new(&db, &cm);
        tx.prepare_record_for_update::<Warehouse>(WarehouseKey::new(1), |w| w.w_tax = 0.9);
        tx.abort();

        let check = Transaction::new(&db, &cm);
        assert_eq!(
            check.get::<Warehouse>(&WarehouseKey::new(1)),
            Outcome::Success(warehouse(1, 0.1))
        );
    }

    #[test]
    fn drop_without_commit_or_abort_also_restores_prior_state() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::Serial);

        let setup = Transaction::new(&db, &cm);
        setup.prepare_record_for_insert(warehouse(1, 0.1));
        setup.commit();

        {
            let tx = Transaction::new(&db, &cm);
            tx.prepare_record_for_update::<Warehouse>(WarehouseKey::new(1), |w| w.w_tax = 0.9);
            // tx falls out of scope here with no commit()/abort() call.
        }

        let check = Transaction::new(&db, &cm);
        assert_eq!(
            check.get::<Warehouse>(&WarehouseKey::new(1)),
            Outcome::Success(warehouse(1, 0.1))
        );
    }

    #[test]
    fn secondary_median_selects_middle_first_name() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::Serial);

        let tx = Transaction::new(&db, &cm);
        for (id, first) in [(1u32, "ANNA"), (2, "BETTY"), (3, "CECIL")] {
            tx.prepare_record_for_insert(customer(1, 1, id, first, "BARBAR"));
        }
        tx.commit();

        let check = Transaction::new(&db, &cm);
        let sec_key = CustomerSecondaryKey::new(1, 1, "BARBAR".try_into().unwrap());
        match check.get_customer_by_last_name(&sec_key) {
            Outcome::Success(c) => assert_eq!(c.c_first.as_str(), "BETTY"),
            other => panic!("expected BETTY, got {other:?}"),
        }
    }

    #[test]
    fn order_by_customer_id_picks_max_o_id() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::Serial);

        fn order(o_id: u32, c_id: u32) -> Order {
            Order {
                o_id,
                o_d_id: 1,
                o_w_id: 1,
                o_c_id: c_id,
                o_carrier_id: None,
                o_ol_cnt: 5,
                o_all_local: true,
                o_entry_d: 0,
            }
        }

        let tx = Transaction::new(&db, &cm);
        for o_id in [10u32, 30, 20] {
            tx.prepare_record_for_insert(order(o_id, 7));
        }
        tx.commit();

        let check = Transaction::new(&db, &cm);
        let sec_key = OrderSecondaryKey::new(1, 1, 7);
        match check.get_order_by_customer_id(&sec_key) {
            Outcome::Success(o) => assert_eq!(o.o_id, 30),
            other => panic!("expected o_id 30, got {other:?}"),
        }
    }

    #[test]
    fn neworder_smallest_key_respects_district_boundary() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::Serial);

        fn no(w_id: u16, d_id: u8, o_id: u32) -> NewOrder {
            NewOrder {
                no_o_id: o_id,
                no_d_id: d_id,
                no_w_id: w_id,
            }
        }

        let tx = Transaction::new(&db, &cm);
        tx.prepare_record_for_insert(no(1, 1, 2101));
        tx.prepare_record_for_insert(no(1, 1, 2102));
        tx.prepare_record_for_insert(no(1, 2, 2101));
        tx.commit();

        let check = Transaction::new(&db, &cm);
        let hit = check.get_neworder_with_smallest_key_no_less_than(NewOrderKey::new(1, 1, 0));
        assert_eq!(hit, Outcome::Success(no(1, 1, 2101)));

        let miss = check.get_neworder_with_smallest_key_no_less_than(NewOrderKey::new(1, 3, 0));
        assert_eq!(miss, Outcome::Fail);
    }

    #[test]
    fn range_query_visits_ascending_key_order() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::Serial);

        let tx = Transaction::new(&db, &cm);
        for w_id in [3u16, 1, 2] {
            tx.prepare_record_for_insert(warehouse(w_id, 0.1));
        }
        tx.commit();

        let check = Transaction::new(&db, &cm);
        let mut seen = Vec::new();
        check.range_query::<Warehouse>(WarehouseKey::new(0), WarehouseKey::new(100), |w| {
            seen.push(w.w_id)
        });
        assert_eq!(seen, vec![1, 2, 3]);
    }

    #[test]
    fn range_update_stages_every_record_in_range() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::Serial);

        let tx = Transaction::new(&db, &cm);
        for w_id in [1u16, 2, 3] {
            tx.prepare_record_for_insert(warehouse(w_id, 0.1));
        }
        tx.commit();

        let tx = Transaction::new(&db, &cm);
        tx.range_update::<Warehouse>(WarehouseKey::new(0), WarehouseKey::new(100), |w| {
            w.w_ytd += 1.0
        });
        tx.commit();

        let check = Transaction::new(&db, &cm);
        for w_id in [1u16, 2, 3] {
            match check.get::<Warehouse>(&WarehouseKey::new(w_id)) {
                Outcome::Success(w) => assert_eq!(w.w_ytd, 300_001.0),
                other => panic!("expected warehouse {w_id}, got {other:?}"),
            }
        }
    }

    #[test]
    fn table_locking_aborts_on_conflicting_exclusive_access() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::TableLocking);

        let tx1 = Transaction::new(&db, &cm);
        assert!(tx1
            .prepare_record_for_insert(warehouse(1, 0.1))
            .is_success());

        let tx2 = Transaction::new(&db, &cm);
        assert_eq!(
            tx2.prepare_record_for_insert(warehouse(2, 0.1)),
            Outcome::Abort
        );
    }

    #[test]
    fn table_locking_allows_read_then_update_of_the_same_table_within_one_tx() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::TableLocking);

        let setup = Transaction::new(&db, &cm);
        setup.prepare_record_for_insert(warehouse(1, 0.1));
        setup.commit();

        let tx = Transaction::new(&db, &cm);
        assert_eq!(
            tx.get::<Warehouse>(&WarehouseKey::new(1)),
            Outcome::Success(warehouse(1, 0.1))
        );
        assert_eq!(
            tx.prepare_record_for_update::<Warehouse>(WarehouseKey::new(1), |w| w.w_tax = 0.2),
            Outcome::Success(())
        );
        assert!(tx.commit());

        let check = Transaction::new(&db, &cm);
        assert_eq!(
            check.get::<Warehouse>(&WarehouseKey::new(1)),
            Outcome::Success(warehouse(1, 0.2))
        );
    }

    #[test]
    fn table_locking_allows_two_inserts_into_the_same_table_within_one_tx() {
        let db = Database::new();
        let cm = manager(ConcurrencyMode::TableLocking);

        let tx = Transaction::new(&db, &cm);
        assert!(tx
            .prepare_record_for_insert(warehouse(1, 0.1))
            .is_success());
        assert!(tx
            .prepare_record_for_insert(warehouse(2, 0.1))
            .is_success());
        assert!(tx.commit());
    }
}
