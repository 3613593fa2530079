//! `Order` — primary key `(o_w_id, o_d_id, o_id)` — and its secondary index
//! keyed by `(o_w_id, o_d_id, o_c_id)`.

use crate::record::{HasSecondary, Record, SecondaryEntry};

/// Primary key for [`Order`], field order `(o_w_id, o_d_id, o_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderKey {
    /// Owning warehouse id.
    pub o_w_id: u16,
    /// Owning district id.
    pub o_d_id: u8,
    /// Order id within the district (10,000,000 unique ids).
    pub o_id: u32,
}

impl OrderKey {
    /// Build a key from its primary fields, in declared order.
    pub fn new(o_w_id: u16, o_d_id: u8, o_id: u32) -> Self {
        Self {
            o_w_id,
            o_d_id,
            o_id,
        }
    }
}

/// Multi-valued secondary index key for [`Order`], field order
/// `(o_w_id, o_d_id, o_c_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderSecondaryKey {
    /// Owning warehouse id.
    pub o_w_id: u16,
    /// Owning district id.
    pub o_d_id: u8,
    /// Placing customer id.
    pub o_c_id: u32,
}

impl OrderSecondaryKey {
    /// Build a secondary key from its fields, in declared order.
    pub fn new(o_w_id: u16, o_d_id: u8, o_c_id: u32) -> Self {
        Self {
            o_w_id,
            o_d_id,
            o_c_id,
        }
    }
}

/// Order record. Foreign key `(o_w_id, o_d_id, o_c_id)` references
/// `Customer::(c_w_id, c_d_id, c_id)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Order {
    /// Order id (10,000,000 unique ids per district).
    pub o_id: u32,
    /// Owning district id.
    pub o_d_id: u8,
    /// Owning warehouse id.
    pub o_w_id: u16,
    /// Placing customer id.
    pub o_c_id: u32,
    /// Carrier id (10 unique ids), `None` until delivery.
    pub o_carrier_id: Option<u8>,
    /// Numeric(2) order-line count.
    pub o_ol_cnt: u8,
    /// Whether every order line is supplied from the home warehouse.
    pub o_all_local: bool,
    /// Date and time the order was entered.
    pub o_entry_d: u64,
}

impl Record for Order {
    type Key = OrderKey;

    fn key(&self) -> Self::Key {
        OrderKey::new(self.o_w_id, self.o_d_id, self.o_id)
    }
}

impl HasSecondary for Order {
    type SecondaryKey = OrderSecondaryKey;
    type Secondary = OrderSecondary;

    fn secondary_key(&self) -> Self::SecondaryKey {
        OrderSecondaryKey::new(self.o_w_id, self.o_d_id, self.o_c_id)
    }
}

/// Secondary-index entry for [`Order`], carrying a back-reference to the
/// primary key rather than a raw pointer (see the Design Notes).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrderSecondary {
    /// Back-reference to the primary `Order` record.
    pub primary_key: OrderKey,
}

impl SecondaryEntry<Order> for OrderSecondary {
    fn new(primary_key: OrderKey) -> Self {
        Self { primary_key }
    }

    fn primary_key(&self) -> OrderKey {
        self.primary_key
    }
}
