//! Error types for the hotset library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache construction parameters are invalid
//!   (zero capacity, non-positive aging limit, zero shard count).
//!
//! Construction is the only fallible surface of the library: once a cache
//! exists, no operation fails. Misses are reported as `false` / `None` /
//! default values, never as errors.
//!
//! ## Example Usage
//!
//! ```
//! use hotset::error::ConfigError;
//! use hotset::policy::lru::LruCore;
//!
//! // Fallible constructor for user-configurable parameters
//! let cache: Result<LruCore<u64, String>, ConfigError> = LruCore::try_new(128);
//! assert!(cache.is_ok());
//!
//! // Invalid capacity is caught without panicking
//! let bad = LruCore::<u64, String>::try_new(0);
//! assert!(bad.is_err());
//! ```

use std::fmt;

/// Error returned when cache construction parameters are invalid.
///
/// Produced by the `try_new` family of constructors on every policy core and
/// on the sharded wrapper. Carries a human-readable description of which
/// parameter failed validation.
///
/// # Example
///
/// ```
/// use hotset::policy::lfu_aging::LfuAgingCore;
///
/// let err = LfuAgingCore::<u64, u64>::try_with_limit(16, 0.0).unwrap_err();
/// assert!(err.to_string().contains("limit"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}
