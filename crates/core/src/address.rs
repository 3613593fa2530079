//! Shared street address, embedded in `Warehouse`, `District`, and `Customer`.

use crate::fixed_str::{FieldError, FixedStr};

/// Street address embedded in warehouse, district, and customer records.
///
/// Field widths come from `original_source/table_layout.hpp`'s `Address`
/// struct: `street_1`/`street_2` ≤ 20 bytes, `city` ≤ 10, `state` = 2,
/// `zip` = 9.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Address {
    /// First line of the street address (≤ 20 bytes).
    pub street_1: FixedStr<20>,
    /// Second line of the street address (≤ 20 bytes).
    pub street_2: FixedStr<20>,
    /// City (≤ 10 bytes).
    pub city: FixedStr<10>,
    /// Two-letter state code (= 2 bytes).
    pub state: FixedStr<2>,
    /// Zip code (= 9 bytes).
    pub zip: FixedStr<9>,
}

impl Address {
    /// Construct an address, validating every field's width.
    pub fn new(
        street_1: impl Into<String>,
        street_2: impl Into<String>,
        city: impl Into<String>,
        state: impl Into<String>,
        zip: impl Into<String>,
    ) -> Result<Self, FieldError> {
        Ok(Self {
            street_1: FixedStr::new(street_1)?,
            street_2: FixedStr::new(street_2)?,
            city: FixedStr::new(city)?,
            state: FixedStr::new(state)?,
            zip: FixedStr::new(zip)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_valid_address() {
        let a = Address::new("s1", "s2", "city", "CA", "123456789").unwrap();
        assert_eq!(a.city.as_str(), "city");
    }

    #[test]
    fn rejects_state_over_width() {
        assert!(Address::new("s1", "s2", "city", "CAL", "123456789").is_err());
    }
}
