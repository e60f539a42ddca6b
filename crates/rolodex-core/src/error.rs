//! Error types for `rolodex-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// Both records carry an explicit `UID` and the two differ (RFC 6350
  /// §7.1.1), so they do not describe the same entity.
  #[error("won't merge vCards with different UIDs: {left:?} and {right:?}")]
  UidMismatch { left: String, right: String },

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
