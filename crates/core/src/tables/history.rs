//! `History` — no primary key, append-only.

use crate::fixed_str::FixedStr;

/// History record. No primary key and no uniqueness constraint; the only
/// supported mutation is append. Foreign keys `(h_c_w_id, h_c_d_id, h_c_id)`
/// and `(h_w_id, h_d_id)` reference `Customer` and `District` respectively,
/// but are not enforced by this core.
#[derive(Debug, Clone, PartialEq)]
pub struct History {
    /// Referenced customer id.
    pub h_c_id: u32,
    /// Referenced customer district id.
    pub h_c_d_id: u8,
    /// Referenced customer warehouse id.
    pub h_c_w_id: u16,
    /// Referenced district id.
    pub h_d_id: u8,
    /// Referenced warehouse id.
    pub h_w_id: u16,
    /// Date and time of the history event.
    pub h_date: u64,
    /// Signed numeric(6,2) payment amount.
    pub h_amount: f32,
    /// Free-form note (≤ 24 bytes).
    pub h_data: FixedStr<24>,
}
