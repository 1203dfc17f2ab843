//! Classified failures of an identity chain exchange.

use thiserror::Error;

/// Why a request never produced a response.
#[derive(Debug, Error)]
pub enum ConnectionCause {
    /// DNS, connect, TLS or I/O failure reported by the HTTP client.
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// The caller cancelled the operation context before a response arrived.
    #[error("context canceled")]
    Cancelled,

    /// The operation context's deadline passed before a response arrived.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}

/// Why the body of a successful response could not be returned.
#[derive(Debug, Error)]
pub enum ReadCause {
    /// The connection failed or closed before the whole body arrived.
    #[cfg(feature = "reqwest")]
    #[error(transparent)]
    Body(#[from] reqwest::Error),

    /// The body is not valid UTF-8; it is rejected rather than altered.
    #[error("body is not valid utf-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Enumerates every way an identity chain request can fail.
#[derive(Debug, Error)]
pub enum ChainError {
    /// Transport-level failure: no response was received.
    #[error("POST {endpoint}: {source}")]
    Connection {
        endpoint: String,
        #[source]
        source: ConnectionCause,
    },

    /// The authentication service answered with a status other than 200.
    #[error("POST {endpoint}: {}", status_line(.status, .reason))]
    Rejected {
        endpoint: String,
        status: u16,
        reason: String,
    },

    /// A 200 response arrived but its body could not be read in full.
    #[error("read identity chain: {0}")]
    Read(#[source] ReadCause),

    /// The identity public key could not be encoded as `SubjectPublicKeyInfo`.
    #[error("encode identity public key: {0}")]
    PublicKey(String),

    /// An XSTS response could not be turned into a token.
    #[error("invalid xsts token: {0}")]
    Token(String),

    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ChainError {
    /// Returns `true` for transport failures, including cancellation.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Returns `true` if the service answered with a non-success status.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }

    /// Returns `true` if the operation context was cancelled or timed out.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(
            self,
            Self::Connection {
                source: ConnectionCause::Cancelled | ConnectionCause::DeadlineExceeded,
                ..
            }
        )
    }

    /// HTTP status of a rejection, if any.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// `403 Forbidden`, or just `599` when the status has no reason phrase.
#[allow(clippy::trivially_copy_pass_by_ref)]
fn status_line(status: &u16, reason: &str) -> String {
    if reason.is_empty() {
        status.to_string()
    } else {
        format!("{status} {reason}")
    }
}

/// Convenience alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, ChainError>;
