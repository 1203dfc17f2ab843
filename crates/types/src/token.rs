//! XSTS security token representation.

use crate::{ChainError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An XSTS token scoped to the game authentication relying party.
///
/// Obtained by an upstream Xbox Live flow; consumed once per chain request.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XblToken {
    /// The `uhs` claim bundled with the token.
    pub user_hash: String,
    /// The opaque token string.
    pub token: String,
}

impl XblToken {
    pub fn new(user_hash: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            user_hash: user_hash.into(),
            token: token.into(),
        }
    }

    /// Value of the `Authorization` header: `XBL3.0 x=<uhs>;<token>`.
    #[must_use]
    pub fn authorization_header(&self) -> String {
        format!("XBL3.0 x={};{}", self.user_hash, self.token)
    }

    /// Both fields are non-empty.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.user_hash.is_empty() && !self.token.is_empty()
    }

    /// Build a token from the raw JSON returned by the XSTS authorize endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Token`] if `Token` or the first `uhs` claim is missing.
    pub fn from_xsts_response(json: &serde_json::Value) -> Result<Self> {
        let resp: XstsResponse = serde_json::from_value(json.clone())
            .map_err(|e| ChainError::Token(e.to_string()))?;
        resp.try_into()
    }
}

impl fmt::Debug for XblToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("XblToken")
            .field("user_hash", &self.user_hash)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Body of an XSTS authorize response.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XstsResponse {
    pub token: String,
    pub display_claims: DisplayClaims,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DisplayClaims {
    #[serde(default)]
    pub xui: Vec<UserInfo>,
}

/// One entry of the `xui` claim list.
#[derive(Debug, Clone, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "uhs")]
    pub user_hash: String,
    #[serde(rename = "gtg", default)]
    pub gamer_tag: Option<String>,
    #[serde(rename = "xid", default)]
    pub xuid: Option<String>,
}

impl TryFrom<XstsResponse> for XblToken {
    type Error = ChainError;

    fn try_from(resp: XstsResponse) -> Result<Self> {
        let user_hash = resp
            .display_claims
            .xui
            .into_iter()
            .next()
            .map(|u| u.user_hash)
            .ok_or_else(|| ChainError::Token("missing uhs claim".into()))?;
        Ok(Self::new(user_hash, resp.token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_authorization_header_verbatim() {
        let t = XblToken::new("1234567890", "eyJ0eXAi.abc=");
        assert_eq!(t.authorization_header(), "XBL3.0 x=1234567890;eyJ0eXAi.abc=");
    }

    #[test]
    fn test_authorization_header_no_escaping() {
        let t = XblToken::new("a;b", "c d");
        assert_eq!(t.authorization_header(), "XBL3.0 x=a;b;c d");
    }

    #[test]
    fn test_is_well_formed() {
        assert!(XblToken::new("uhs", "tok").is_well_formed());
        assert!(!XblToken::new("", "tok").is_well_formed());
        assert!(!XblToken::new("uhs", "").is_well_formed());
    }

    #[test]
    fn test_debug_redacts_token() {
        let dbg = format!("{:?}", XblToken::new("uhs-1", "secret-token"));
        assert!(dbg.contains("uhs-1"));
        assert!(!dbg.contains("secret-token"));
    }

    #[test]
    fn test_from_xsts_response() {
        let resp = json!({
            "IssueInstant": "2024-08-01T00:00:00.0000000Z",
            "NotAfter": "2024-08-02T00:00:00.0000000Z",
            "Token": "xsts-token",
            "DisplayClaims": {"xui": [{"uhs": "9876", "gtg": "Steve", "xid": "2535"}]}
        });
        let t = XblToken::from_xsts_response(&resp).unwrap();
        assert_eq!(t.user_hash, "9876");
        assert_eq!(t.token, "xsts-token");
    }

    #[test]
    fn test_from_xsts_response_missing_uhs() {
        let resp = json!({"Token": "t", "DisplayClaims": {"xui": []}});
        let err = XblToken::from_xsts_response(&resp).unwrap_err();
        assert!(matches!(err, ChainError::Token(_)));
    }

    #[test]
    fn test_from_xsts_response_missing_token() {
        let resp = json!({"DisplayClaims": {"xui": [{"uhs": "1"}]}});
        assert!(XblToken::from_xsts_response(&resp).is_err());
    }
}
