//! `OrderLine` — primary key `(ol_w_id, ol_d_id, ol_o_id, ol_number)`.

use crate::fixed_str::FixedStr;
use crate::record::Record;

/// Primary key for [`OrderLine`], field order
/// `(ol_w_id, ol_d_id, ol_o_id, ol_number)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct OrderLineKey {
    /// Owning warehouse id.
    pub ol_w_id: u16,
    /// Owning district id.
    pub ol_d_id: u8,
    /// Owning order id.
    pub ol_o_id: u32,
    /// Line number within the order (15 unique ids).
    pub ol_number: u8,
}

impl OrderLineKey {
    /// Build a key from its primary fields, in declared order.
    pub fn new(ol_w_id: u16, ol_d_id: u8, ol_o_id: u32, ol_number: u8) -> Self {
        Self {
            ol_w_id,
            ol_d_id,
            ol_o_id,
            ol_number,
        }
    }
}

/// Order-line record. Foreign key `(ol_w_id, ol_d_id, ol_o_id)` references
/// `Order::(o_w_id, o_d_id, o_id)`; `(ol_supply_w_id, ol_i_id)` references
/// `Stock::(s_w_id, s_i_id)`.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderLine {
    /// Owning order id.
    pub ol_o_id: u32,
    /// Owning district id.
    pub ol_d_id: u8,
    /// Owning warehouse id.
    pub ol_w_id: u16,
    /// Line number within the order.
    pub ol_number: u8,
    /// Referenced item id (200,000 unique ids).
    pub ol_i_id: u32,
    /// Warehouse the line is supplied from.
    pub ol_supply_w_id: u16,
    /// Numeric(2) quantity.
    pub ol_quantity: u8,
    /// Signed numeric(6,2) line amount.
    pub ol_amount: f32,
    /// District-specific stock distribution info (≤ 24 bytes).
    pub ol_dist_info: FixedStr<24>,
}

impl Record for OrderLine {
    type Key = OrderLineKey;

    fn key(&self) -> Self::Key {
        OrderLineKey::new(self.ol_w_id, self.ol_d_id, self.ol_o_id, self.ol_number)
    }
}
