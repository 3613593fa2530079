//! `Stock` — primary key `(s_w_id, s_i_id)` — warehouse-partitioned inventory.

use crate::fixed_str::FixedStr;
use crate::record::Record;

/// Primary key for [`Stock`], field order `(s_w_id, s_i_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StockKey {
    /// Owning warehouse id.
    pub s_w_id: u16,
    /// Referenced item id.
    pub s_i_id: u32,
}

impl StockKey {
    /// Build a key from its primary fields, in declared order.
    pub fn new(s_w_id: u16, s_i_id: u32) -> Self {
        Self { s_w_id, s_i_id }
    }
}

/// Stock record. Foreign key `s_w_id` references `Warehouse::w_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct Stock {
    /// Referenced item id (200,000 unique ids).
    pub s_i_id: u32,
    /// Owning warehouse id.
    pub s_w_id: u16,
    /// Signed numeric(4) quantity on hand.
    pub s_quantity: i16,
    /// Numeric(8) year-to-date quantity sold.
    pub s_ytd: u32,
    /// Numeric(4) order count.
    pub s_order_cnt: u16,
    /// Numeric(4) remote-warehouse order count.
    pub s_remote_cnt: u16,
    /// Per-district distribution info (districts 1-10, ≤ 24 bytes each).
    pub s_dist: [FixedStr<24>; 10],
    /// Item description (≤ 50 bytes).
    pub s_data: FixedStr<50>,
}

impl Record for Stock {
    type Key = StockKey;

    fn key(&self) -> Self::Key {
        StockKey::new(self.s_w_id, self.s_i_id)
    }
}
