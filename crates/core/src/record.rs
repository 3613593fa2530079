//! Static-dispatch traits tying record types to their keys.
//!
//! The original C++ core dispatches per-record-type operations through
//! compile-time template specialization (`RecordToTable<Record>`,
//! `RecordToWS<Record>`). The idiomatic Rust equivalent kept here is a pair
//! of traits resolved at monomorphization time — never a runtime enum
//! dispatch (see the "Template-level table dispatch" design note).

/// A fixed-schema record with a comparable, derivable primary key.
pub trait Record: Clone + Send + Sync + 'static {
    /// The record's primary key type; total-ordered by declared field order.
    type Key: Ord + Clone + Send + Sync + 'static;

    /// Derive this record's primary key from its populated fields.
    fn key(&self) -> Self::Key;

    /// Value-copy every field of `other` into `self`, including embedded
    /// fixed-width strings, leaving no aliasing with `other`.
    fn deep_copy_from(&mut self, other: &Self) {
        *self = other.clone();
    }
}

/// A secondary-index entry for primary record type `P`.
///
/// Per the Design Notes, this carries `P`'s primary key as a plain
/// back-reference rather than a raw pointer into `P` — resolving an entry
/// back to its primary record costs one extra `Database::get` lookup, but
/// buys lifetime safety without pinning primaries at stable addresses.
pub trait SecondaryEntry<P: Record>: Clone + Send + Sync + 'static {
    /// Build an entry referencing `primary_key`.
    fn new(primary_key: P::Key) -> Self;

    /// The primary key this entry refers to.
    fn primary_key(&self) -> P::Key;
}

/// A primary record type that maintains a secondary index.
///
/// Only `Customer` (by `c_last`) and `Order` (by `o_c_id`) implement this.
pub trait HasSecondary: Record {
    /// Secondary index key type (a proper prefix/alternate ordering of the
    /// primary key's fields).
    type SecondaryKey: Ord + Clone + Send + Sync + 'static;

    /// The secondary-index entry type for this record, carrying a
    /// back-reference to its primary key.
    type Secondary: SecondaryEntry<Self>;

    /// Derive the secondary-index key this record should be indexed under.
    fn secondary_key(&self) -> Self::SecondaryKey;
}
