//! `Database` — the singleton owner of all committed TPC-C state.
//!
//! Table dispatch is static and monomorphic (see the "Template-level table
//! dispatch" design note): each record type implements [`TableAccess`] (and,
//! for `Customer`/`Order`, [`SecondaryTableAccess`]) against a concrete
//! field of `Database`, so `Database::get::<Warehouse>(key)` resolves at
//! compile time to the `warehouses` field with no runtime type switch.

use std::cell::RefCell;
use std::collections::{BTreeMap, VecDeque};

use parking_lot::RwLock;
use tpcc_core::{
    Customer, CustomerKey, CustomerSecondary, CustomerSecondaryKey, District, DistrictKey,
    HasSecondary, History, Item, ItemKey, NewOrder, NewOrderKey, Order, OrderKey, OrderLine,
    OrderLineKey, OrderSecondary, OrderSecondaryKey, Record, SecondaryEntry, Stock, StockKey,
    Warehouse, WarehouseKey,
};

thread_local! {
    static HISTORY_LOCAL: RefCell<VecDeque<History>> = RefCell::new(VecDeque::new());
}

/// Resolves a record type to the table field holding it.
///
/// Implemented once per primary record type on [`Database`]; never
/// implemented generically or via a runtime enum, per the design note.
pub trait TableAccess<R: Record> {
    /// The backing ordered, uniquely-keyed table for `R`.
    fn table(&self) -> &RwLock<BTreeMap<R::Key, R>>;
}

/// Resolves a [`HasSecondary`] record type to its multi-valued secondary
/// index table.
pub trait SecondaryTableAccess<R: HasSecondary> {
    /// The backing multimap: secondary key → secondary entries, in
    /// insertion order within an equal secondary key.
    fn secondary_table(&self) -> &RwLock<BTreeMap<R::SecondaryKey, Vec<R::Secondary>>>;
}

/// The singleton owner of all committed TPC-C state.
///
/// Thread-safe point access is coordinated externally by the
/// `ConcurrencyManager`; `Database` itself only guarantees that concurrent
/// calls never corrupt its internal maps, not that a sequence of calls is
/// isolated (that is the transaction layer's job).
pub struct Database {
    items: RwLock<BTreeMap<ItemKey, Item>>,
    warehouses: RwLock<BTreeMap<WarehouseKey, Warehouse>>,
    stocks: RwLock<BTreeMap<StockKey, Stock>>,
    districts: RwLock<BTreeMap<DistrictKey, District>>,
    customers: RwLock<BTreeMap<CustomerKey, Customer>>,
    customers_secondary: RwLock<BTreeMap<CustomerSecondaryKey, Vec<CustomerSecondary>>>,
    orders: RwLock<BTreeMap<OrderKey, Order>>,
    orders_secondary: RwLock<BTreeMap<OrderSecondaryKey, Vec<OrderSecondary>>>,
    new_orders: RwLock<BTreeMap<NewOrderKey, NewOrder>>,
    order_lines: RwLock<BTreeMap<OrderLineKey, OrderLine>>,
}

impl Default for Database {
    fn default() -> Self {
        Self::new()
    }
}

impl Database {
    /// Construct a fresh, empty database. Exposed for test isolation (see
    /// the reset-hook design note); production code reaches the singleton
    /// through `tpcc_api::get_db()`.
    pub fn new() -> Self {
        Self {
            items: RwLock::new(BTreeMap::new()),
            warehouses: RwLock::new(BTreeMap::new()),
            stocks: RwLock::new(BTreeMap::new()),
            districts: RwLock::new(BTreeMap::new()),
            customers: RwLock::new(BTreeMap::new()),
            customers_secondary: RwLock::new(BTreeMap::new()),
            orders: RwLock::new(BTreeMap::new()),
            orders_secondary: RwLock::new(BTreeMap::new()),
            new_orders: RwLock::new(BTreeMap::new()),
            order_lines: RwLock::new(BTreeMap::new()),
        }
    }

    /// Presence check with no copy.
    pub fn lookup<R: Record>(&self, key: &R::Key) -> bool
    where
        Self: TableAccess<R>,
    {
        TableAccess::<R>::table(self).read().contains_key(key)
    }

    /// Deep-copy the record at `key` if present. Callers never alias
    /// committed state: every read returns an owned value.
    pub fn get<R: Record>(&self, key: &R::Key) -> Option<R>
    where
        Self: TableAccess<R>,
    {
        let found = TableAccess::<R>::table(self).read().get(key).cloned();
        if found.is_none() {
            tracing::trace!(table = std::any::type_name::<R>(), "get miss");
        }
        found
    }

    /// Deep copies of every record in `[low, up)`, in ascending key order.
    pub fn range_iter<R: Record>(&self, low: R::Key, up: R::Key) -> Vec<R>
    where
        Self: TableAccess<R>,
    {
        TableAccess::<R>::table(self)
            .read()
            .range(low..up)
            .map(|(_, v)| v.clone())
            .collect()
    }

    /// The record with the smallest key `>= low`, if any, regardless of
    /// whether it matches `low` beyond ordering (callers filter further).
    pub fn first_at_or_after<R: Record>(&self, low: R::Key) -> Option<R>
    where
        Self: TableAccess<R>,
    {
        TableAccess::<R>::table(self)
            .read()
            .range(low..)
            .next()
            .map(|(_, v)| v.clone())
    }

    /// Insert `record` if its key is absent. Returns `false`, making no
    /// change, if the key already exists. For `Customer`/`Order`, use
    /// [`Database::insert_with_secondary`] instead so the secondary index
    /// entry is maintained.
    pub fn insert<R: Record>(&self, record: R) -> bool
    where
        Self: TableAccess<R>,
    {
        let key = record.key();
        let mut table = TableAccess::<R>::table(self).write();
        if table.contains_key(&key) {
            tracing::debug!(table = std::any::type_name::<R>(), "insert miss: key already exists");
            false
        } else {
            table.insert(key, record);
            tracing::trace!(table = std::any::type_name::<R>(), "insert committed");
            true
        }
    }

    /// Insert `record` and its derived secondary-index entry if the
    /// primary key is absent. Returns `false`, making no change, if the
    /// key already exists.
    pub fn insert_with_secondary<R: HasSecondary>(&self, record: R) -> bool
    where
        Self: TableAccess<R> + SecondaryTableAccess<R>,
    {
        let key = record.key();
        let mut table = TableAccess::<R>::table(self).write();
        if table.contains_key(&key) {
            tracing::debug!(table = std::any::type_name::<R>(), "insert miss: key already exists");
            return false;
        }
        let sec_key = record.secondary_key();
        table.insert(key.clone(), record);
        drop(table);

        SecondaryTableAccess::<R>::secondary_table(self)
            .write()
            .entry(sec_key)
            .or_default()
            .push(R::Secondary::new(key));
        tracing::trace!(table = std::any::type_name::<R>(), "insert committed (with secondary)");
        true
    }

    /// All primary keys indexed under `sec_key`, in insertion order.
    pub fn secondary_lookup<R: HasSecondary>(&self, sec_key: &R::SecondaryKey) -> Vec<R::Key>
    where
        Self: SecondaryTableAccess<R>,
    {
        SecondaryTableAccess::<R>::secondary_table(self)
            .read()
            .get(sec_key)
            .map(|entries| entries.iter().map(|e| e.primary_key()).collect())
            .unwrap_or_default()
    }

    /// Replace the record at `key` in place. Returns `false`, making no
    /// change, if `key` is absent. The caller asserts `record.key() == key`.
    pub fn update<R: Record>(&self, key: &R::Key, record: R) -> bool
    where
        Self: TableAccess<R>,
    {
        debug_assert!(&record.key() == key, "update() key must match record key");
        let mut table = TableAccess::<R>::table(self).write();
        if let Some(slot) = table.get_mut(key) {
            *slot = record;
            tracing::trace!(table = std::any::type_name::<R>(), "update committed");
            true
        } else {
            tracing::debug!(table = std::any::type_name::<R>(), "update miss: key absent");
            false
        }
    }

    /// Remove the record at `key`. Returns `false` if absent. Does not
    /// remove any secondary-index entry — this workload never deletes a
    /// primary record with a live secondary entry (see spec record
    /// invariants).
    pub fn delete<R: Record>(&self, key: &R::Key) -> bool
    where
        Self: TableAccess<R>,
    {
        let removed = TableAccess::<R>::table(self).write().remove(key).is_some();
        if removed {
            tracing::trace!(table = std::any::type_name::<R>(), "delete committed");
        } else {
            tracing::debug!(table = std::any::type_name::<R>(), "delete miss: key absent");
        }
        removed
    }

    /// Append to the calling thread's history deque. No key, never fails.
    pub fn history_append(&self, record: History) {
        HISTORY_LOCAL.with(|deque| deque.borrow_mut().push_back(record));
    }

    /// Number of records in the calling thread's history deque (test hook).
    pub fn history_local_len(&self) -> usize {
        HISTORY_LOCAL.with(|deque| deque.borrow().len())
    }

    /// Drain and return the calling thread's history deque (test hook; no
    /// cross-thread aggregation is part of this core).
    pub fn history_local_drain(&self) -> Vec<History> {
        HISTORY_LOCAL.with(|deque| deque.borrow_mut().drain(..).collect())
    }
}

macro_rules! impl_table_access {
    ($record:ty, $key:ty, $field:ident) => {
        impl TableAccess<$record> for Database {
            fn table(&self) -> &RwLock<BTreeMap<$key, $record>> {
                &self.$field
            }
        }
    };
}

impl_table_access!(Item, ItemKey, items);
impl_table_access!(Warehouse, WarehouseKey, warehouses);
impl_table_access!(Stock, StockKey, stocks);
impl_table_access!(District, DistrictKey, districts);
impl_table_access!(Customer, CustomerKey, customers);
impl_table_access!(Order, OrderKey, orders);
impl_table_access!(NewOrder, NewOrderKey, new_orders);
impl_table_access!(OrderLine, OrderLineKey, order_lines);

impl SecondaryTableAccess<Customer> for Database {
    fn secondary_table(&self) -> &RwLock<BTreeMap<CustomerSecondaryKey, Vec<CustomerSecondary>>> {
        &self.customers_secondary
    }
}

impl SecondaryTableAccess<Order> for Database {
    fn secondary_table(&self) -> &RwLock<BTreeMap<OrderSecondaryKey, Vec<OrderSecondary>>> {
        &self.orders_secondary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tpcc_core::Address;

    fn warehouse(w_id: u16) -> Warehouse {
        Warehouse {
            w_id,
            w_tax: 0.1,
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
    fn insert_then_get_round_trips() {
        let db = Database::new();
        let w = warehouse(1);
        assert!(db.insert(w.clone()));
        let got: Warehouse = db.get(&WarehouseKey::new(1)).unwrap();
        assert_eq!(got, w);
    }

    #[test]
    fn double_insert_fails_and_leaves_state_unchanged() {
        let db = Database::new();
        assert!(db.insert(warehouse(1)));
        assert!(!db.insert(warehouse(1)));
        assert_eq!(db.get::<Warehouse>(&WarehouseKey::new(1)).unwrap().w_tax, 0.1);
    }

    #[test]
    fn update_replaces_record() {
        let db = Database::new();
        db.insert(warehouse(1));
        let mut w2 = warehouse(1);
        w2.w_tax = 0.2;
        assert!(db.update(&WarehouseKey::new(1), w2));
        assert_eq!(db.get::<Warehouse>(&WarehouseKey::new(1)).unwrap().w_tax, 0.2);
    }

    #[test]
    fn update_on_absent_key_fails() {
        let db = Database::new();
        assert!(!db.update(&WarehouseKey::new(1), warehouse(1)));
    }

    #[test]
    fn delete_removes_record() {
        let db = Database::new();
        db.insert(warehouse(1));
        assert!(db.delete::<Warehouse>(&WarehouseKey::new(1)));
        assert!(!db.lookup::<Warehouse>(&WarehouseKey::new(1)));
    }

    #[test]
    fn range_iter_visits_ascending_key_order() {
        let db = Database::new();
        for w_id in [3u16, 1, 2] {
            db.insert(warehouse(w_id));
        }
        let got: Vec<u16> = db
            .range_iter::<Warehouse>(WarehouseKey::new(0), WarehouseKey::new(100))
            .into_iter()
            .map(|w| w.w_id)
            .collect();
        assert_eq!(got, vec![1, 2, 3]);
    }

    #[test]
    fn insert_with_secondary_maintains_index() {
        let db = Database::new();
        let c = customer(1, 1, 42, "ANNA", "BARBAR");
        assert!(db.insert_with_secondary(c.clone()));
        let sec_key = CustomerSecondaryKey::new(1, 1, "BARBAR".try_into().unwrap());
        let refs = db.secondary_lookup::<Customer>(&sec_key);
        assert_eq!(refs, vec![c.key()]);
    }

    #[test]
    fn history_append_is_thread_local_and_never_fails() {
        let db = Database::new();
        db.history_append(History {
            h_c_id: 1,
            h_c_d_id: 1,
            h_c_w_id: 1,
            h_d_id: 1,
            h_w_id: 1,
            h_date: 0,
            h_amount: 10.0,
            h_data: "note".try_into().unwrap(),
        });
        assert_eq!(db.history_local_len(), 1);
        assert_eq!(db.history_local_drain().len(), 1);
        assert_eq!(db.history_local_len(), 0);
    }
}
