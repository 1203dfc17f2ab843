//! HTTP transport injected into the chain requester.

use bedrock_types::{ChainError, ConnectionCause, Result};
use reqwest::Client;
use std::{fmt, ops::Deref};

/// Where the HTTP client for an exchange comes from.
///
/// Authentication calls are rare, so the default builds a client per call and
/// drops it afterwards, releasing its idle connections. Callers that already
/// hold a pool can share it instead; [`Client`] is safe for concurrent use.
#[derive(Clone, Default)]
pub enum Transport {
    /// Reuse a caller-owned client across calls.
    Shared(Client),
    /// Build a fresh client for each call.
    #[default]
    Ephemeral,
}

impl Transport {
    #[must_use]
    pub fn shared(client: Client) -> Self {
        Self::Shared(client)
    }

    #[must_use]
    pub fn ephemeral() -> Self {
        Self::Ephemeral
    }

    #[must_use]
    pub fn is_shared(&self) -> bool {
        matches!(self, Self::Shared(_))
    }

    /// Borrow the shared client, or build a short-lived one.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Connection`] if a default client cannot be built.
    pub(crate) fn lease(&self, endpoint: &str) -> Result<Lease<'_>> {
        match self {
            Self::Shared(client) => Ok(Lease::Borrowed(client)),
            Self::Ephemeral => Client::builder()
                .build()
                .map(Lease::Owned)
                .map_err(|e| ChainError::Connection {
                    endpoint: endpoint.to_string(),
                    source: ConnectionCause::Transport(e),
                }),
        }
    }
}

impl fmt::Debug for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Shared(_) => f.write_str("Transport::Shared"),
            Self::Ephemeral => f.write_str("Transport::Ephemeral"),
        }
    }
}

/// A client held for the duration of one exchange.
///
/// An owned client is dropped with the lease, closing its idle connections.
pub(crate) enum Lease<'a> {
    Borrowed(&'a Client),
    Owned(Client),
}

impl Deref for Lease<'_> {
    type Target = Client;

    fn deref(&self) -> &Client {
        match self {
            Self::Borrowed(client) => *client,
            Self::Owned(client) => client,
        }
    }
}
