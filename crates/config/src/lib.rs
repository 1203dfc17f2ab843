//! Configuration for the bedrock identity chain exchange.
//!
//! Uses figment to layer YAML files and `BEDROCK_`-prefixed environment
//! variables over built-in defaults.

pub mod logging;
pub mod schema;

pub use logging::init_tracing;
pub use schema::{AuthConfig, DEFAULT_ENDPOINT, DEFAULT_USER_AGENT, LogConfig};
