//! `Item` — primary key `(i_id)` — static catalog.

use crate::fixed_str::FixedStr;
use crate::record::Record;

/// Primary key for [`Item`]: `i_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemKey {
    /// Item id.
    pub i_id: u32,
}

impl ItemKey {
    /// Build a key from its primary field.
    pub fn new(i_id: u32) -> Self {
        Self { i_id }
    }
}

/// Item record (static catalog, shared across all warehouses).
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    /// Item id (200,000 unique ids).
    pub i_id: u32,
    /// Associated image id (200,000 unique ids).
    pub i_im_id: u32,
    /// Numeric(5,2) price.
    pub i_price: f32,
    /// Item name (≤ 24 bytes).
    pub i_name: FixedStr<24>,
    /// Item description (≤ 50 bytes).
    pub i_data: FixedStr<50>,
}

impl Record for Item {
    type Key = ItemKey;

    fn key(&self) -> Self::Key {
        ItemKey::new(self.i_id)
    }
}
