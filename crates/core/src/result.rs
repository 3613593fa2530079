//! The tri-valued transaction result.

/// Result of a [`Transaction`](crate) operation.
///
/// `Success` and `Fail` are both ordinary outcomes a transaction body
/// handles directly (e.g. TPC-C's "item not found" is a specified valid
/// `Fail`). `Abort` is a system-imposed rollback — the client must call
/// `Transaction::abort` and retry; it is never returned for a domain-level
/// miss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxResult {
    /// The operation completed as requested.
    Success,
    /// Domain-level miss: key not found, key already exists, or a
    /// write-set intent conflict. The caller may retry with different
    /// arguments or translate this into a domain decision.
    Fail,
    /// System-imposed rollback: lock acquisition was denied under the
    /// no-wait policy. The caller must call `abort()` and retry the whole
    /// transaction.
    Abort,
}

impl TxResult {
    /// `true` if this is [`TxResult::Success`].
    pub fn is_success(self) -> bool {
        matches!(self, TxResult::Success)
    }

    /// `true` if this is [`TxResult::Abort`].
    pub fn is_abort(self) -> bool {
        matches!(self, TxResult::Abort)
    }
}

/// [`TxResult`] carrying the produced value on the `Success` path.
///
/// The original interface returns the tri-valued result and writes the
/// payload through an out-parameter; an owned sum type is the idiomatic
/// Rust shape for the same contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The operation completed and produced `T`.
    Success(T),
    /// Domain-level miss; see [`TxResult::Fail`].
    Fail,
    /// System-imposed rollback; see [`TxResult::Abort`].
    Abort,
}

impl<T> Outcome<T> {
    /// Discard the payload, keeping only the tri-valued result.
    pub fn as_tx_result(&self) -> TxResult {
        match self {
            Outcome::Success(_) => TxResult::Success,
            Outcome::Fail => TxResult::Fail,
            Outcome::Abort => TxResult::Abort,
        }
    }

    /// The payload, if this is [`Outcome::Success`].
    pub fn success(self) -> Option<T> {
        match self {
            Outcome::Success(v) => Some(v),
            _ => None,
        }
    }

    /// `true` if this is [`Outcome::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Success(_))
    }
}
