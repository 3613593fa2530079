//! `NewOrder` — primary key `(no_w_id, no_d_id, no_o_id)`.

use crate::record::Record;

/// Primary key for [`NewOrder`], field order `(no_w_id, no_d_id, no_o_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NewOrderKey {
    /// Owning warehouse id.
    pub no_w_id: u16,
    /// Owning district id.
    pub no_d_id: u8,
    /// Referenced order id.
    pub no_o_id: u32,
}

impl NewOrderKey {
    /// Build a key from its primary fields, in declared order.
    pub fn new(no_w_id: u16, no_d_id: u8, no_o_id: u32) -> Self {
        Self {
            no_w_id,
            no_d_id,
            no_o_id,
        }
    }
}

/// New-order record (the "not yet delivered" queue). Foreign key
/// `(no_w_id, no_d_id, no_o_id)` references `Order::(o_w_id, o_d_id, o_id)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrder {
    /// Referenced order id.
    pub no_o_id: u32,
    /// Owning district id.
    pub no_d_id: u8,
    /// Owning warehouse id.
    pub no_w_id: u16,
}

impl Record for NewOrder {
    type Key = NewOrderKey;

    fn key(&self) -> Self::Key {
        NewOrderKey::new(self.no_w_id, self.no_d_id, self.no_o_id)
    }
}
