//! Game protocol revision targeted by this build.

use serde::{Deserialize, Serialize};
use std::{borrow::Cow, fmt};

/// Network protocol number matching [`CURRENT_VERSION`].
pub const CURRENT_PROTOCOL: i32 = 712;

/// Game version string sent as `Client-Version` on authentication requests.
pub const CURRENT_VERSION: &str = "1.21.20";

/// A protocol number paired with its human-readable game version.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProtocolVersion {
    pub protocol: i32,
    pub version: Cow<'static, str>,
}

impl ProtocolVersion {
    /// The revision this build speaks.
    pub const CURRENT: Self = Self {
        protocol: CURRENT_PROTOCOL,
        version: Cow::Borrowed(CURRENT_VERSION),
    };

    pub fn new(protocol: i32, version: impl Into<Cow<'static, str>>) -> Self {
        Self {
            protocol,
            version: version.into(),
        }
    }

    /// The version string, as sent in the `Client-Version` header.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Default for ProtocolVersion {
    fn default() -> Self {
        Self::CURRENT
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (protocol {})", self.version, self.protocol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_pairs_constants() {
        let v = ProtocolVersion::CURRENT;
        assert_eq!(v.protocol, 712);
        assert_eq!(v.version(), "1.21.20");
        assert_eq!(ProtocolVersion::default(), v);
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ProtocolVersion::CURRENT.to_string(),
            "1.21.20 (protocol 712)"
        );
    }

    #[test]
    fn test_deserialize_owned_version() {
        let v: ProtocolVersion =
            serde_json::from_str(r#"{"protocol": 729, "version": "1.21.30"}"#).unwrap();
        assert_eq!(v, ProtocolVersion::new(729, "1.21.30".to_string()));
    }
}
