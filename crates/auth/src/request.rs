//! Request payload for the identity chain exchange.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use bedrock_types::{ChainError, Result, XblToken};
use p256::pkcs8::EncodePublicKey;
use serde::{Deserialize, Serialize};

/// JSON body: `{"identityPublicKey": "<base64 DER SubjectPublicKeyInfo>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainRequestBody {
    pub identity_public_key: String,
}

/// Everything that varies per exchange, built before any I/O happens.
#[derive(Debug, Clone)]
pub struct ChainRequest {
    body: ChainRequestBody,
    authorization: String,
}

impl ChainRequest {
    /// Encode `public_key` and pair it with the token's authorization header.
    ///
    /// Any key type with a `SubjectPublicKeyInfo` encoding works, e.g.
    /// [`p256::PublicKey`] or an ECDSA verifying key.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::PublicKey`] if the key cannot be DER-encoded.
    pub fn new<K>(token: &XblToken, public_key: &K) -> Result<Self>
    where
        K: EncodePublicKey + ?Sized,
    {
        let der = public_key
            .to_public_key_der()
            .map_err(|e| ChainError::PublicKey(e.to_string()))?;
        Ok(Self {
            body: ChainRequestBody {
                identity_public_key: STANDARD.encode(der.as_bytes()),
            },
            authorization: token.authorization_header(),
        })
    }

    #[must_use]
    pub fn body(&self) -> &ChainRequestBody {
        &self.body
    }

    /// Base64 of the DER-encoded public key.
    #[must_use]
    pub fn identity_public_key(&self) -> &str {
        &self.body.identity_public_key
    }

    /// Value of the `Authorization` header.
    #[must_use]
    pub fn authorization(&self) -> &str {
        &self.authorization
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p256::SecretKey;
    use rand_core::OsRng;

    #[test]
    fn test_body_has_single_key() {
        let key = SecretKey::random(&mut OsRng).public_key();
        let req = ChainRequest::new(&XblToken::new("uhs", "tok"), &key).unwrap();
        let json = serde_json::to_value(req.body()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 1);
        assert!(obj.contains_key("identityPublicKey"));
    }

    #[test]
    fn test_public_key_is_spki_der() {
        let key = SecretKey::random(&mut OsRng).public_key();
        let req = ChainRequest::new(&XblToken::new("uhs", "tok"), &key).unwrap();
        let decoded = STANDARD.decode(req.identity_public_key()).unwrap();
        assert_eq!(decoded, key.to_public_key_der().unwrap().as_bytes());
        // SEQUENCE { AlgorithmIdentifier, BIT STRING } for a P-256 point.
        assert_eq!(decoded.len(), 91);
        assert_eq!(decoded[0], 0x30);
    }

    #[test]
    fn test_verifying_key_matches_public_key() {
        let secret = SecretKey::random(&mut OsRng);
        let verifying = p256::ecdsa::SigningKey::from(&secret);
        let token = XblToken::new("uhs", "tok");
        let a = ChainRequest::new(&token, &secret.public_key()).unwrap();
        let b = ChainRequest::new(&token, verifying.verifying_key()).unwrap();
        assert_eq!(a.identity_public_key(), b.identity_public_key());
    }

    #[test]
    fn test_authorization_from_token() {
        let key = SecretKey::random(&mut OsRng).public_key();
        let req = ChainRequest::new(&XblToken::new("42", "abc.def"), &key).unwrap();
        assert_eq!(req.authorization(), "XBL3.0 x=42;abc.def");
    }
}
