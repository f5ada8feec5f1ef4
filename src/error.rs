//! Error types.
//!
//! `RulesError` covers the data-entry boundary (parsing snapshots and
//! settings). `RollWarning` is the non-blocking, user-facing kind: the
//! action aborts and nothing is modified.

use thiserror::Error;

/// Hard errors at the boundary where host data enters the crate.
#[derive(Debug, Error)]
pub enum RulesError {
    /// A snapshot or settings document was not valid JSON for its schema.
    #[error("Invalid document: {0}")]
    Document(#[from] serde_json::Error),

    /// A settings key is not one the rules know about.
    #[error("Unknown setting: {0}")]
    UnknownSetting(String),

    /// A settings value exists but has the wrong shape.
    #[error("Invalid value for setting {key}: {reason}")]
    InvalidSetting { key: String, reason: String },
}

/// User-facing warnings. The host shows these as notifications.
///
/// # Examples
///
/// ```rust
/// use bnbstat::RollWarning;
///
/// let warning = RollWarning::NotEnoughResource {
///     resource: "badass tokens".to_string(),
///     needed: 2,
///     available: 1,
/// };
/// assert_eq!(warning.to_string(), "Not enough badass tokens: need 2, have 1");
/// ```
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RollWarning {
    /// The assembled damage formula had no content.
    #[error("No damage to roll")]
    NoDamageToRoll,

    /// A spend would take a pool below zero.
    #[error("Not enough {resource}: need {needed}, have {available}")]
    NotEnoughResource {
        resource: String,
        needed: i64,
        available: i64,
    },

    /// A weapon action was requested for an item that is not a weapon.
    #[error("{0} is not a weapon")]
    NotAWeapon(String),
}
