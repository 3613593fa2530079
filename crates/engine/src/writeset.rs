//! `WriteSet` — the per-transaction buffered mutation log.
//!
//! One `WriteSet` per `Transaction`, owned by it, never shared across
//! threads or outliving the transaction — so every staging container here
//! is a plain `RefCell`, not a lock. The intent-composition rules below are
//! the literal transition table this engine is built from; where
//! `original_source/writeset.hpp` falls through a missing `break` or
//! inverts a check, this table — not that source — is followed.
//!
//! | existing | new op | result           |
//! |----------|--------|------------------|
//! | INSERT   | update | INSERT, payload overwritten |
//! | INSERT   | delete | entry removed    |
//! | INSERT   | insert | fail (already staged) |
//! | UPDATE   | update | UPDATE, payload overwritten |
//! | UPDATE   | delete | DELETE           |
//! | UPDATE   | insert | fail             |
//! | DELETE   | update | fail             |
//! | DELETE   | delete | fail             |
//! | DELETE   | insert | UPDATE, new payload |
//! | (none)   | insert | INSERT if absent from DB, else fail |
//! | (none)   | update | UPDATE seeded from DB, else fail |
//! | (none)   | delete | DELETE if present in DB, else fail |

use std::cell::RefCell;
use std::collections::BTreeMap;

use tpcc_core::{
    Customer, CustomerKey, District, DistrictKey, History, Item, ItemKey, NewOrder, NewOrderKey,
    Order, OrderKey, OrderLine, OrderLineKey, Outcome, Record, Stock, StockKey, TxResult,
    Warehouse, WarehouseKey,
};
use tpcc_storage::{Database, RecordPool, TableAccess};

/// The staged operation on a write-set entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The key does not exist in the database; this entry creates it.
    Insert,
    /// The key exists; this entry replaces its payload.
    Update,
    /// The key is removed at apply time.
    Delete,
}

/// One buffered mutation: an intent plus the payload it carries.
///
/// `Delete` entries still carry a payload (the record's last known value)
/// so it can flow back through [`RecordPool::recycle`] on clear, mirroring
/// `original_source/writeset.hpp`'s cache-aware `LogRecord`.
#[derive(Debug, Clone)]
pub struct LogRecord<R: Record> {
    /// The staged intent.
    pub intent: Intent,
    /// The staged payload.
    pub payload: R,
}

/// Resolves a record type to its staging container on [`WriteSet`].
///
/// Implemented once per primary record type, mirroring
/// [`tpcc_storage::TableAccess`]'s static dispatch.
pub trait WriteSetAccess<R: Record> {
    /// The backing staging map for `R`, keyed identically to its table.
    fn staged(&self) -> &RefCell<BTreeMap<R::Key, LogRecord<R>>>;
}

/// The per-transaction staging buffer.
pub struct WriteSet {
    items: RefCell<BTreeMap<ItemKey, LogRecord<Item>>>,
    warehouses: RefCell<BTreeMap<WarehouseKey, LogRecord<Warehouse>>>,
    stocks: RefCell<BTreeMap<StockKey, LogRecord<Stock>>>,
    districts: RefCell<BTreeMap<DistrictKey, LogRecord<District>>>,
    customers: RefCell<BTreeMap<CustomerKey, LogRecord<Customer>>>,
    orders: RefCell<BTreeMap<OrderKey, LogRecord<Order>>>,
    new_orders: RefCell<BTreeMap<NewOrderKey, LogRecord<NewOrder>>>,
    order_lines: RefCell<BTreeMap<OrderLineKey, LogRecord<OrderLine>>>,
    history: RefCell<Vec<History>>,
}

impl Default for WriteSet {
    fn default() -> Self {
        Self::new()
    }
}

impl WriteSet {
    /// An empty write-set.
    pub fn new() -> Self {
        Self {
            items: RefCell::new(BTreeMap::new()),
            warehouses: RefCell::new(BTreeMap::new()),
            stocks: RefCell::new(BTreeMap::new()),
            districts: RefCell::new(BTreeMap::new()),
            customers: RefCell::new(BTreeMap::new()),
            orders: RefCell::new(BTreeMap::new()),
            new_orders: RefCell::new(BTreeMap::new()),
            order_lines: RefCell::new(BTreeMap::new()),
            history: RefCell::new(Vec::new()),
        }
    }

    /// Read `key`, consulting this write-set's own pending intent before
    /// falling back to `db`. `Delete`-staged keys read as absent.
    pub fn get<R: Record>(&self, key: &R::Key, db: &Database) -> Outcome<R>
    where
        Self: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        if let Some(lr) = self.staged().borrow().get(key) {
            return match lr.intent {
                Intent::Insert | Intent::Update => Outcome::Success(lr.payload.clone()),
                Intent::Delete => Outcome::Fail,
            };
        }
        match db.get::<R>(key) {
            Some(record) => Outcome::Success(record),
            None => Outcome::Fail,
        }
    }

    /// Stage an INSERT of `payload` at `key`.
    pub fn prepare_record_for_insert<R: Record>(
        &self,
        key: R::Key,
        payload: R,
        db: &Database,
    ) -> Outcome<()>
    where
        Self: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        let mut map = self.staged().borrow_mut();
        let existing = map.get(&key).map(|lr| lr.intent);
        match existing {
            Some(Intent::Insert) | Some(Intent::Update) => Outcome::Fail,
            Some(Intent::Delete) => {
                let mut slot = RecordPool::allocate::<R>(|| payload.clone());
                slot.deep_copy_from(&payload);
                map.insert(
                    key,
                    LogRecord {
                        intent: Intent::Update,
                        payload: slot,
                    },
                );
                Outcome::Success(())
            }
            None => {
                if db.lookup::<R>(&key) {
                    Outcome::Fail
                } else {
                    let mut slot = RecordPool::allocate::<R>(|| payload.clone());
                    slot.deep_copy_from(&payload);
                    map.insert(
                        key,
                        LogRecord {
                            intent: Intent::Insert,
                            payload: slot,
                        },
                    );
                    Outcome::Success(())
                }
            }
        }
    }

    /// Stage an UPDATE at `key`, applying `f` to the staged payload —
    /// deep-copied from `db` on first touch so `f` always mutates a value
    /// the transaction now privately owns.
    pub fn prepare_record_for_update<R: Record>(
        &self,
        key: R::Key,
        db: &Database,
        f: impl FnOnce(&mut R),
    ) -> Outcome<()>
    where
        Self: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        let mut map = self.staged().borrow_mut();
        if let Some(lr) = map.get_mut(&key) {
            return match lr.intent {
                Intent::Insert | Intent::Update => {
                    f(&mut lr.payload);
                    Outcome::Success(())
                }
                Intent::Delete => Outcome::Fail,
            };
        }
        match db.get::<R>(&key) {
            Some(db_payload) => {
                let mut slot = RecordPool::allocate::<R>(|| db_payload.clone());
                slot.deep_copy_from(&db_payload);
                f(&mut slot);
                map.insert(
                    key,
                    LogRecord {
                        intent: Intent::Update,
                        payload: slot,
                    },
                );
                Outcome::Success(())
            }
            None => Outcome::Fail,
        }
    }

    /// Stage a DELETE at `key`.
    pub fn delete_record<R: Record>(&self, key: R::Key, db: &Database) -> TxResult
    where
        Self: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        let mut map = self.staged().borrow_mut();
        let existing = map.get(&key).map(|lr| lr.intent);
        match existing {
            Some(Intent::Insert) => {
                if let Some(lr) = map.remove(&key) {
                    RecordPool::recycle(lr.payload);
                }
                TxResult::Success
            }
            Some(Intent::Update) => {
                let lr = map.remove(&key).expect("entry observed present above");
                map.insert(
                    key,
                    LogRecord {
                        intent: Intent::Delete,
                        payload: lr.payload,
                    },
                );
                TxResult::Success
            }
            Some(Intent::Delete) => TxResult::Fail,
            None => match db.get::<R>(&key) {
                Some(payload) => {
                    map.insert(
                        key,
                        LogRecord {
                            intent: Intent::Delete,
                            payload,
                        },
                    );
                    TxResult::Success
                }
                None => TxResult::Fail,
            },
        }
    }

    /// Promote every record in `[low, up)` to a staged UPDATE, applying
    /// `f` to each. Used by `Transaction::range_update`.
    pub fn range_update<R: Record>(
        &self,
        low: R::Key,
        up: R::Key,
        db: &Database,
        mut f: impl FnMut(&mut R),
    ) where
        Self: WriteSetAccess<R>,
        Database: TableAccess<R>,
    {
        for record in db.range_iter::<R>(low, up) {
            let key = record.key();
            let _ = self.prepare_record_for_update::<R>(key, db, |staged| f(staged));
        }
    }

    /// Append a History payload. INSERT is the only legal operation on
    /// this table; there is no key to conflict on.
    pub fn append_history(&self, payload: History) {
        self.history.borrow_mut().push(payload);
    }

    /// Drain every staged intent into `db` in ascending key order per
    /// table, then clear the write-set. Intent legality was already
    /// enforced at staging time, so this step cannot fail.
    pub fn apply_to_database(&self, db: &Database) {
        for (key, lr) in take_map(&self.items) {
            apply_one(db, key, lr);
        }
        for (key, lr) in take_map(&self.warehouses) {
            apply_one(db, key, lr);
        }
        for (key, lr) in take_map(&self.stocks) {
            apply_one(db, key, lr);
        }
        for (key, lr) in take_map(&self.districts) {
            apply_one(db, key, lr);
        }
        for (key, lr) in take_map(&self.customers) {
            apply_customer(db, key, lr);
        }
        for (key, lr) in take_map(&self.orders) {
            apply_order(db, key, lr);
        }
        for (key, lr) in take_map(&self.new_orders) {
            apply_one(db, key, lr);
        }
        for (key, lr) in take_map(&self.order_lines) {
            apply_one(db, key, lr);
        }
        for payload in self.history.borrow_mut().drain(..) {
            db.history_append(payload);
        }
    }

    /// Discard every staged intent without applying it, recycling payloads
    /// through [`RecordPool`].
    pub fn clear_all(&self) {
        clear_map(&self.items);
        clear_map(&self.warehouses);
        clear_map(&self.stocks);
        clear_map(&self.districts);
        clear_map(&self.customers);
        clear_map(&self.orders);
        clear_map(&self.new_orders);
        clear_map(&self.order_lines);
        for payload in self.history.borrow_mut().drain(..) {
            RecordPool::recycle(payload);
        }
    }
}

/// Take ownership of every staged entry, in ascending key order, leaving
/// the staging map empty.
fn take_map<K: Ord, R: Record>(map: &RefCell<BTreeMap<K, LogRecord<R>>>) -> BTreeMap<K, LogRecord<R>> {
    std::mem::take(&mut *map.borrow_mut())
}

fn clear_map<K: Ord, R: Record>(map: &RefCell<BTreeMap<K, LogRecord<R>>>) {
    for (_, lr) in take_map(map) {
        RecordPool::recycle(lr.payload);
    }
}

fn apply_one<R: Record>(db: &Database, key: R::Key, lr: LogRecord<R>)
where
    Database: TableAccess<R>,
{
    match lr.intent {
        Intent::Insert => {
            db.insert(lr.payload);
        }
        Intent::Update => {
            db.update(&key, lr.payload);
        }
        Intent::Delete => {
            db.delete::<R>(&key);
        }
    }
}

fn apply_customer(db: &Database, key: CustomerKey, lr: LogRecord<Customer>) {
    match lr.intent {
        Intent::Insert => {
            db.insert_with_secondary(lr.payload);
        }
        Intent::Update => {
            db.update(&key, lr.payload);
        }
        Intent::Delete => {
            db.delete::<Customer>(&key);
        }
    }
}

fn apply_order(db: &Database, key: OrderKey, lr: LogRecord<Order>) {
    match lr.intent {
        Intent::Insert => {
            db.insert_with_secondary(lr.payload);
        }
        Intent::Update => {
            db.update(&key, lr.payload);
        }
        Intent::Delete => {
            db.delete::<Order>(&key);
        }
    }
}

macro_rules! impl_writeset_access {
    ($record:ty, $key:ty, $field:ident) => {
        impl WriteSetAccess<$record> for WriteSet {
            fn staged(&self) -> &RefCell<BTreeMap<$key, LogRecord<$record>>> {
                &self.$field
            }
        }
    };
}

impl_writeset_access!(Item, ItemKey, items);
impl_writeset_access!(Warehouse, WarehouseKey, warehouses);
impl_writeset_access!(Stock, StockKey, stocks);
impl_writeset_access!(District, DistrictKey, districts);
impl_writeset_access!(Customer, CustomerKey, customers);
impl_writeset_access!(Order, OrderKey, orders);
impl_writeset_access!(NewOrder, NewOrderKey, new_orders);
impl_writeset_access!(OrderLine, OrderLineKey, order_lines);
