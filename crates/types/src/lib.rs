//! Core types for the bedrock-auth workspace.
//!
//! This crate defines the values shared by every layer of the identity chain
//! exchange: the XSTS security token, the pinned game protocol version, and
//! the classified error returned when an exchange fails.

pub mod error;
pub mod token;
pub mod version;

pub use error::{ChainError, ConnectionCause, ReadCause, Result};
pub use token::{XblToken, XstsResponse};
pub use version::{CURRENT_PROTOCOL, CURRENT_VERSION, ProtocolVersion};
