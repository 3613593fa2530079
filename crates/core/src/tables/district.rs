//! `District` — primary key `(d_w_id, d_id)`.

use crate::address::Address;
use crate::fixed_str::FixedStr;
use crate::record::Record;

/// Primary key for [`District`], field order `(d_w_id, d_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DistrictKey {
    /// Owning warehouse id.
    pub d_w_id: u16,
    /// District id within the warehouse.
    pub d_id: u8,
}

impl DistrictKey {
    /// Build a key from its primary fields, in declared order.
    pub fn new(d_w_id: u16, d_id: u8) -> Self {
        Self { d_w_id, d_id }
    }
}

/// District record. Foreign key `d_w_id` references `Warehouse::w_id`.
#[derive(Debug, Clone, PartialEq)]
pub struct District {
    /// District id (20 unique ids per warehouse).
    pub d_id: u8,
    /// Owning warehouse id.
    pub d_w_id: u16,
    /// Next order id to be assigned (10,000,000 unique ids).
    pub d_next_o_id: u32,
    /// Signed numeric(4,4) tax rate.
    pub d_tax: f32,
    /// Signed numeric(12,2) year-to-date balance.
    pub d_ytd: f32,
    /// District name (≤ 10 bytes).
    pub d_name: FixedStr<10>,
    /// District street address.
    pub d_address: Address,
}

impl Record for District {
    type Key = DistrictKey;

    fn key(&self) -> Self::Key {
        DistrictKey::new(self.d_w_id, self.d_id)
    }
}
