//! Error taxonomy for the clicker engine.
//!
//! Every variant is recoverable: callers treat a failed action as a no-op and
//! the engine itself degrades to defaults or the fallback badge.

use thiserror::Error;

/// Failures surfaced by engine operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    /// A purchase was attempted without enough currency. No state changed.
    #[error("insufficient funds: need {cost}, have {available}")]
    InsufficientFunds { cost: u64, available: u64 },
    /// Badge id not present in the catalog. No state changed.
    #[error("unknown badge: {0}")]
    UnknownBadge(String),
    /// Click refused because the battery is empty.
    #[error("battery is empty")]
    BatteryEmpty,
    /// Catalog fetch or parse failed; the single default badge is used instead.
    #[error("badge catalog unavailable: {0}")]
    CatalogUnavailable(String),
    /// Persisted blob could not be restored; defaults are used instead.
    #[error("corrupt save data: {0}")]
    CorruptSave(String),
    /// Writing to the save slot failed.
    #[error("save slot write failed: {0}")]
    Storage(String),
    /// Engine configuration rejected by validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}
