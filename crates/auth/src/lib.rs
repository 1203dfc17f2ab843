//! Identity chain exchange for the Bedrock game authentication service.
//!
//! A [`ChainRequester`] trades an XSTS token and the client's EC public key
//! for the signed JWT chain a client later presents to a game server. The
//! [`Context`] carries cancellation and deadlines into the request, and the
//! [`Transport`] decides whether a caller-owned connection pool is reused or a
//! short-lived one is built for the call.

pub mod chain;
pub mod context;
pub mod request;
pub mod transport;

pub use bedrock_config::AuthConfig;
pub use bedrock_types::{
    ChainError, ConnectionCause, ProtocolVersion, ReadCause, Result, XblToken,
};
pub use chain::{ChainRequester, request_chain};
pub use context::Context;
pub use p256::pkcs8::EncodePublicKey;
pub use request::{ChainRequest, ChainRequestBody};
pub use transport::Transport;
