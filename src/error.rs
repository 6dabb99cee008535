use thiserror::Error;

/// Error type for store operations.
///
/// Corrupt or missing persisted bytes are not errors: they degrade to the
/// default record for the namespace. What remains is the small set of
/// failures a caller can act on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The substrate's internal lock was poisoned by a panicking writer.
    #[error("substrate lock poisoned during {0}")]
    Substrate(String),

    /// A namespace table could not be serialized.
    #[error("failed to encode namespace {namespace}: {reason}")]
    Encode { namespace: String, reason: String },

    /// A visit rating outside `1..=5`.
    #[error("rating {0} is outside the accepted range 1..=5")]
    InvalidRating(u8),

    /// Configuration could not be parsed.
    #[error("invalid store configuration: {0}")]
    Config(String),
}

impl StoreError {
    pub(crate) fn poisoned(operation: &str) -> Self {
        StoreError::Substrate(operation.to_string())
    }
}
