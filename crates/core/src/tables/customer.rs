//! `Customer` — primary key `(c_w_id, c_d_id, c_id)` — and its secondary
//! index keyed by `(c_w_id, c_d_id, c_last)`.

use crate::address::Address;
use crate::fixed_str::FixedStr;
use crate::record::{HasSecondary, Record, SecondaryEntry};

/// Primary key for [`Customer`], field order `(c_w_id, c_d_id, c_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerKey {
    /// Owning warehouse id.
    pub c_w_id: u16,
    /// Owning district id.
    pub c_d_id: u8,
    /// Customer id within the district.
    pub c_id: u32,
}

impl CustomerKey {
    /// Build a key from its primary fields, in declared order.
    pub fn new(c_w_id: u16, c_d_id: u8, c_id: u32) -> Self {
        Self {
            c_w_id,
            c_d_id,
            c_id,
        }
    }
}

/// Multi-valued secondary index key for [`Customer`], field order
/// `(c_w_id, c_d_id, c_last)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CustomerSecondaryKey {
    /// Owning warehouse id.
    pub c_w_id: u16,
    /// Owning district id.
    pub c_d_id: u8,
    /// Customer last name (≤ 16 bytes).
    pub c_last: FixedStr<16>,
}

impl CustomerSecondaryKey {
    /// Build a secondary key from its fields, in declared order.
    pub fn new(c_w_id: u16, c_d_id: u8, c_last: FixedStr<16>) -> Self {
        Self {
            c_w_id,
            c_d_id,
            c_last,
        }
    }
}

/// Customer record. Foreign key `(c_w_id, c_d_id)` references
/// `District::(d_w_id, d_id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    /// Customer id (96,000 unique ids per district).
    pub c_id: u32,
    /// Owning district id.
    pub c_d_id: u8,
    /// Owning warehouse id.
    pub c_w_id: u16,
    /// Numeric(4) payment count.
    pub c_payment_cnt: u16,
    /// Numeric(4) delivery count.
    pub c_delivery_cnt: u16,
    /// Date and time of account creation.
    pub c_since: u64,
    /// Signed numeric(2,2) credit limit.
    pub c_credit_lim: f32,
    /// Signed numeric(4,4) discount rate.
    pub c_discount: f32,
    /// Signed numeric(12,2) current balance.
    pub c_balance: f32,
    /// Signed numeric(12,2) year-to-date payments.
    pub c_ytd_payment: f32,
    /// First name (≤ 16 bytes).
    pub c_first: FixedStr<16>,
    /// Middle name (≤ 2 bytes).
    pub c_middle: FixedStr<2>,
    /// Last name (≤ 16 bytes).
    pub c_last: FixedStr<16>,
    /// Phone number (= 16 bytes).
    pub c_phone: FixedStr<16>,
    /// Credit rating, `"GC"` (good) or `"BC"` (bad) (= 2 bytes).
    pub c_credit: FixedStr<2>,
    /// Miscellaneous information (≤ 500 bytes).
    pub c_data: FixedStr<500>,
    /// Customer street address.
    pub c_address: Address,
}

impl Record for Customer {
    type Key = CustomerKey;

    fn key(&self) -> Self::Key {
        CustomerKey::new(self.c_w_id, self.c_d_id, self.c_id)
    }
}

impl HasSecondary for Customer {
    type SecondaryKey = CustomerSecondaryKey;
    type Secondary = CustomerSecondary;

    fn secondary_key(&self) -> Self::SecondaryKey {
        CustomerSecondaryKey::new(self.c_w_id, self.c_d_id, self.c_last.clone())
    }
}

/// Secondary-index entry for [`Customer`], carrying a back-reference to the
/// primary key rather than a raw pointer (see the Design Notes).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerSecondary {
    /// Back-reference to the primary `Customer` record.
    pub primary_key: CustomerKey,
}

impl SecondaryEntry<Customer> for CustomerSecondary {
    fn new(primary_key: CustomerKey) -> Self {
        Self { primary_key }
    }

    fn primary_key(&self) -> CustomerKey {
        self.primary_key
    }
}
