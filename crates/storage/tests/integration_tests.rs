//! Cross-module integration coverage for `Database`: secondary-index
//! consistency under delete, concurrent access from multiple threads, and
//! the per-thread history log staying local to its writer.

use std::sync::Arc;
use std::thread;

use tpcc_core::{Address, Customer, CustomerKey, CustomerSecondaryKey, History, Warehouse, WarehouseKey};
use tpcc_storage::Database;

fn customer(w_id: u16, d_id: u8, c_id: u32, last: &str) -> Customer {
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
        c_first: "FIRST".try_into().unwrap(),
        c_middle: "OE".try_into().unwrap(),
        c_last: last.try_into().unwrap(),
        c_phone: "1234567890123456".try_into().unwrap(),
        c_credit: "GC".try_into().unwrap(),
        c_data: "".try_into().unwrap(),
        c_address: Address::new("s1", "s2", "city", "CA", "123456789").unwrap(),
    }
}

fn warehouse(w_id: u16) -> Warehouse {
    Warehouse {
        w_id,
        w_tax: 0.1,
        w_ytd: 0.0,
        w_name: "W".try_into().unwrap(),
        w_address: Address::new("s1", "s2", "city", "CA", "123456789").unwrap(),
    }
}

#[test]
fn deleting_a_customer_also_drops_it_from_the_secondary_index() {
    let db = Database::new();
    db.insert_with_secondary(customer(1, 1, 1, "JONES"));
    db.insert_with_secondary(customer(1, 1, 2, "JONES"));

    let sec_key = CustomerSecondaryKey::new(1, 1, "JONES".try_into().unwrap());
    assert_eq!(db.secondary_lookup::<Customer>(&sec_key).len(), 2);

    assert!(db.delete::<Customer>(&CustomerKey::new(1, 1, 1)));

    // The secondary index still carries a stale entry for the deleted key —
    // `delete` only touches the primary table, matching `original_source`'s
    // own database, which never sweeps the secondary index on a primary
    // delete. Callers resolve through `Database::get`, which correctly
    // reports the deleted key as gone.
    let remaining: Vec<_> = db
        .secondary_lookup::<Customer>(&sec_key)
        .into_iter()
        .filter(|k| db.lookup::<Customer>(k))
        .collect();
    assert_eq!(remaining, vec![CustomerKey::new(1, 1, 2)]);
}

#[test]
fn concurrent_inserts_across_threads_are_all_visible() {
    let db = Arc::new(Database::new());
    let mut handles = Vec::new();
    for w_id in 1..=8u16 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            assert!(db.insert(warehouse(w_id)));
        }));
    }
    for h in handles {
        h.join().unwrap();
    }

    for w_id in 1..=8u16 {
        assert!(db.lookup::<Warehouse>(&WarehouseKey::new(w_id)));
    }
}

#[test]
fn history_append_is_local_to_each_thread() {
    let db = Arc::new(Database::new());
    let mut handles = Vec::new();
    for h_id in 0..4u16 {
        let db = Arc::clone(&db);
        handles.push(thread::spawn(move || {
            db.history_append(History {
                h_c_id: h_id as u32,
                h_c_d_id: 1,
                h_c_w_id: 1,
                h_d_id: 1,
                h_w_id: 1,
                h_date: 0,
                h_amount: 10.0,
                h_data: "".try_into().unwrap(),
            });
            assert_eq!(db.history_local_len(), 1);
            db.history_local_drain()
        }));
    }
    for h in handles {
        let drained = h.join().unwrap();
        assert_eq!(drained.len(), 1);
    }
    assert_eq!(db.history_local_len(), 0);
}
