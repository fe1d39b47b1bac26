//! Rotation error types
//!
//! Every failure a rotation can end in is one of the [`RotationError`]
//! variants. None of them stores a password: messages are built from the
//! engine, the connection target, the username and the driver's own error.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::engine::Engine;

/// Boxed driver error carried as a rotation failure's source
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type for rotation operations
pub type RotationResult<T> = Result<T, RotationError>;

/// Why a rotation request's new password was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordProblem {
    /// `newPassword` was missing or `null`
    Absent,
    /// `newPassword` was present but empty
    Empty,
}

impl fmt::Display for PasswordProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absent => f.write_str("no new password provided"),
            Self::Empty => f.write_str("new password is empty"),
        }
    }
}

/// Errors that can occur while dispatching or executing a rotation
#[derive(Debug, Error)]
pub enum RotationError {
    /// The payload could not be decoded into the expected shape
    #[error("malformed rotation request: {reason}")]
    MalformedRequest {
        /// What was wrong with the payload
        reason: String,
        /// The decode error, when the failure came from deserialization
        #[source]
        source: Option<serde_json::Error>,
    },

    /// The `type` tag names no registered engine
    #[error("unsupported engine '{tag}'")]
    UnsupportedEngine {
        /// The tag as received
        tag: String,
    },

    /// The request did not carry a usable new password
    #[error("{engine} user '{username}': {problem}")]
    MissingNewPassword {
        /// Target engine
        engine: Engine,
        /// The user that would have been rotated
        username: String,
        /// Absent or empty
        problem: PasswordProblem,
    },

    /// Could not open or verify a connection as the managing user
    #[error("connecting to {engine} database at {host}:{port}")]
    ConnectionFailed {
        /// Target engine
        engine: Engine,
        /// Database host
        host: String,
        /// Database port
        port: u16,
        /// Driver error, or the interruption that cut the attempt short
        #[source]
        source: BoxError,
    },

    /// Connected, but the password change statement was rejected
    #[error("error rotating {engine} user '{username}'")]
    RotationFailed {
        /// Target engine
        engine: Engine,
        /// The user being rotated
        username: String,
        /// Driver error, or the interruption that cut the statement short
        #[source]
        source: BoxError,
    },
}

/// Coarse classification of a [`RotationError`], stable on the wire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`RotationError::MalformedRequest`]
    MalformedRequest,
    /// See [`RotationError::UnsupportedEngine`]
    UnsupportedEngine,
    /// See [`RotationError::MissingNewPassword`]
    MissingNewPassword,
    /// See [`RotationError::ConnectionFailed`]
    ConnectionFailed,
    /// See [`RotationError::RotationFailed`]
    RotationFailed,
}

impl ErrorKind {
    /// `true` when the caller's input is at fault, `false` when the database
    /// could not be reached or refused the change.
    pub const fn is_input_error(self) -> bool {
        matches!(
            self,
            Self::MalformedRequest | Self::UnsupportedEngine | Self::MissingNewPassword
        )
    }

    /// Snake-case name, identical to the serialized form
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedRequest => "malformed_request",
            Self::UnsupportedEngine => "unsupported_engine",
            Self::MissingNewPassword => "missing_new_password",
            Self::ConnectionFailed => "connection_failed",
            Self::RotationFailed => "rotation_failed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RotationError {
    /// Payload failed a structural check after decoding
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedRequest {
            reason: reason.into(),
            source: None,
        }
    }

    /// Payload failed to deserialize
    pub fn decode(reason: impl Into<String>, source: serde_json::Error) -> Self {
        Self::MalformedRequest {
            reason: reason.into(),
            source: Some(source),
        }
    }

    /// Tag did not resolve to an engine
    pub fn unsupported_engine(tag: impl Into<String>) -> Self {
        Self::UnsupportedEngine { tag: tag.into() }
    }

    /// Classification of this error
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedRequest { .. } => ErrorKind::MalformedRequest,
            Self::UnsupportedEngine { .. } => ErrorKind::UnsupportedEngine,
            Self::MissingNewPassword { .. } => ErrorKind::MissingNewPassword,
            Self::ConnectionFailed { .. } => ErrorKind::ConnectionFailed,
            Self::RotationFailed { .. } => ErrorKind::RotationFailed,
        }
    }

    /// Engine the failure belongs to, once one has been resolved
    pub const fn engine(&self) -> Option<Engine> {
        match self {
            Self::MalformedRequest { .. } | Self::UnsupportedEngine { .. } => None,
            Self::MissingNewPassword { engine, .. }
            | Self::ConnectionFailed { engine, .. }
            | Self::RotationFailed { engine, .. } => Some(*engine),
        }
    }

    /// The error followed by its source chain, joined with `": "`.
    ///
    /// ```
    /// use rotator_core::RotationError;
    ///
    /// let err = RotationError::unsupported_engine("oracle");
    /// assert_eq!(err.report(), "unsupported engine 'oracle'");
    /// ```
    pub fn report(&self) -> String {
        let mut message = self.to_string();
        let mut source = std::error::Error::source(self);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        message
    }
}
