//! `Warehouse` — primary key `(w_id)`.

use crate::address::Address;
use crate::fixed_str::FixedStr;
use crate::record::Record;

/// Primary key for [`Warehouse`]: `w_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WarehouseKey {
    /// Warehouse id.
    pub w_id: u16,
}

impl WarehouseKey {
    /// Build a key from its primary field.
    pub fn new(w_id: u16) -> Self {
        Self { w_id }
    }
}

/// Warehouse record (static catalog, warehouse-partitioned tables key off
/// `w_id`).
#[derive(Debug, Clone, PartialEq)]
pub struct Warehouse {
    /// Warehouse id.
    pub w_id: u16,
    /// Signed numeric(4,4) tax rate.
    pub w_tax: f32,
    /// Signed numeric(12,2) year-to-date balance.
    pub w_ytd: f32,
    /// Warehouse name (≤ 10 bytes).
    pub w_name: FixedStr<10>,
    /// Warehouse street address.
    pub w_address: Address,
}

impl Record for Warehouse {
    type Key = WarehouseKey;

    fn key(&self) -> Self::Key {
        WarehouseKey::new(self.w_id)
    }
}
