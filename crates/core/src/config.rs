//! Runtime configuration.
//!
//! Loading configuration from a file or environment is an external
//! collaborator's job (see spec §1 non-goals) — `Config` is always
//! constructed directly by the embedding application.

/// Concurrency-control regime for [`Transaction`](crate).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConcurrencyMode {
    /// Single-threaded: all lock operations are no-ops.
    Serial,
    /// Multi-threaded, coarse: one process-wide mutex serializes all
    /// transactions. The required mode per spec §4.5.
    #[default]
    GlobalMutex,
    /// Multi-threaded, fine-grained: per-table shared/exclusive no-wait
    /// locking. An optional upgrade over `GlobalMutex`.
    TableLocking,
}

/// Database-wide configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Config {
    /// Number of worker threads the embedding application runs.
    /// `num_threads == 1` always selects [`ConcurrencyMode::Serial`]
    /// regardless of `concurrency_mode`.
    pub num_threads: usize,
    /// Number of warehouses the workload is scaled to. Not enforced by
    /// this core; informational for callers sizing range scans.
    pub num_warehouses: u16,
    /// Explicit concurrency mode for `num_threads > 1`. Ignored when
    /// `num_threads == 1`.
    pub concurrency_mode: ConcurrencyMode,
}

impl Config {
    /// Construct a configuration for the given thread and warehouse counts,
    /// defaulting to [`ConcurrencyMode::GlobalMutex`] when multi-threaded.
    pub fn new(num_threads: usize, num_warehouses: u16) -> Self {
        Self {
            num_threads,
            num_warehouses,
            concurrency_mode: ConcurrencyMode::default(),
        }
    }

    /// Construct a configuration with an explicit concurrency mode.
    pub fn with_mode(num_threads: usize, num_warehouses: u16, mode: ConcurrencyMode) -> Self {
        Self {
            num_threads,
            num_warehouses,
            concurrency_mode: mode,
        }
    }

    /// The effective concurrency mode, resolving the `num_threads == 1`
    /// override.
    pub fn effective_mode(&self) -> ConcurrencyMode {
        if self.num_threads <= 1 {
            ConcurrencyMode::Serial
        } else {
            self.concurrency_mode
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new(1, 1)
    }
}
