//! Ledger configuration.
//!
//! Defaults reproduce the plain lend/return contract with per-record
//! locking. `from_env` layers `BOOK_LEDGER_*` variables on top:
//!
//! - `BOOK_LEDGER_CONCURRENCY=locking|optimistic`
//! - `BOOK_LEDGER_RETURN_POLICY=unchecked|reject`

use config::{Config, ConfigError, Environment, Source};
use serde::Deserialize;

/// How a ledger keeps concurrent read-modify-write cycles on one record serializable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcurrencyMode {
    /// Hold the record's lock from fetch to write.
    #[default]
    Locking,
    /// Write with the fetched version and retry from a fresh read on conflict.
    ///
    /// Retries are unbounded: a conflict means another writer committed, so
    /// every round makes progress for someone and a caller is never refused
    /// for contention alone.
    Optimistic,
}

/// Upper bound applied by `return_book`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnPolicy {
    /// Always increment; exceeding `copies` is logged but allowed.
    #[default]
    Unchecked,
    /// Refuse to return a copy when every copy is already on the shelf.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub concurrency: ConcurrencyMode,
    pub return_policy: ReturnPolicy,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            concurrency: ConcurrencyMode::Locking,
            return_policy: ReturnPolicy::Unchecked,
        }
    }
}

impl LedgerConfig {
    /// Load from `BOOK_LEDGER_*` environment variables over the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(
            Environment::with_prefix("BOOK_LEDGER")
                .prefix_separator("_")
                .try_parsing(true),
        )
    }

    /// Load from any `config` source layered over the defaults.
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(source)
            .build()?
            .try_deserialize()
    }

    pub fn concurrency(mut self, concurrency: ConcurrencyMode) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn return_policy(mut self, return_policy: ReturnPolicy) -> Self {
        self.return_policy = return_policy;
        self
    }
}
