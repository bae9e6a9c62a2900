//! Error types returned by container resolution.

use crate::core::RegistrationKind;
use thiserror::Error;

/// The error type for all fallible container operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
  /// `get`, `lazy` or `factory` was called for a key nothing was registered under.
  #[error("No registration found for key '{key}'")]
  RegistrationNotFound { key: String },

  /// A fresh-value factory was requested for a registration that can only
  /// ever yield one value.
  #[error("Can't create a factory for key '{key}': it is backed by a {kind} registration")]
  UnsupportedOperation { key: String, kind: RegistrationKind },

  /// The registered service is not of the requested type.
  #[error("Service registered under key '{key}' is not of type {expected}")]
  TypeMismatch { key: String, expected: &'static str },
}

impl Error {
  /// The key the failed operation was asked to resolve.
  pub fn key(&self) -> &str {
    match self {
      Error::RegistrationNotFound { key }
      | Error::UnsupportedOperation { key, .. }
      | Error::TypeMismatch { key, .. } => key,
    }
  }
}

/// A specialized `Result` type for container operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
