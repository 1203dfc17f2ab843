//! Exchange of an XSTS token and identity key for a signed login chain.
//!
//! One call performs exactly one `POST` to the authentication endpoint. No
//! retries happen here: a failure is classified into a [`ChainError`] and
//! handed back to the caller.

use bedrock_config::AuthConfig;
use bedrock_types::{ChainError, ConnectionCause, Result, XblToken};
use p256::pkcs8::EncodePublicKey;
use reqwest::{
    StatusCode,
    header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT},
};

use crate::{ChainRequest, Context, Transport};

/// Header carrying the pinned game version.
pub const CLIENT_VERSION: &str = "Client-Version";

/// Requests identity chains from the game authentication service.
#[derive(Debug, Clone, Default)]
pub struct ChainRequester {
    config: AuthConfig,
    transport: Transport,
}

impl ChainRequester {
    /// Creates a requester for the given configuration and transport.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::Config`] if the configuration is invalid.
    pub fn new(config: AuthConfig, transport: Transport) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, transport })
    }

    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    #[must_use]
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Trade `token` and `public_key` for the raw identity chain.
    ///
    /// The response body of a `200 OK` is returned verbatim; it is neither
    /// parsed nor verified. The configured timeout, if any, is applied on top
    /// of `ctx`.
    ///
    /// # Errors
    ///
    /// - [`ChainError::Connection`] if no response arrived (network failure,
    ///   cancellation, deadline).
    /// - [`ChainError::Rejected`] if the status is anything but 200.
    /// - [`ChainError::Read`] if the body of a 200 could not be read in full
    ///   or is not valid UTF-8.
    /// - [`ChainError::PublicKey`] if the key cannot be DER-encoded.
    pub async fn request_chain<K>(
        &self,
        ctx: &Context,
        token: &XblToken,
        public_key: &K,
    ) -> Result<String>
    where
        K: EncodePublicKey + ?Sized,
    {
        let request = ChainRequest::new(token, public_key)?;
        let ctx = match self.config.timeout() {
            Some(timeout) => ctx.with_timeout(timeout),
            None => ctx.child(),
        };
        let endpoint = self.config.endpoint.as_str();
        let client = self.transport.lease(endpoint)?;

        tracing::debug!(
            endpoint,
            client_version = self.config.protocol.version(),
            shared_transport = self.transport.is_shared(),
            "requesting identity chain"
        );

        let send = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, request.authorization())
            .header(USER_AGENT, self.config.user_agent.as_str())
            .header(CLIENT_VERSION, self.config.protocol.version())
            .json(request.body())
            .send();

        let resp = match ctx.run(send).await {
            Ok(Ok(resp)) => resp,
            Ok(Err(e)) => return Err(connection_error(endpoint, e.into())),
            Err(cause) => return Err(connection_error(endpoint, cause)),
        };

        let status = resp.status();
        if status != StatusCode::OK {
            tracing::warn!(
                endpoint,
                status = status.as_u16(),
                "identity chain request rejected"
            );
            return Err(ChainError::Rejected {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = match ctx.run(resp.bytes()).await {
            Ok(Ok(body)) => body,
            Ok(Err(e)) => return Err(ChainError::Read(e.into())),
            Err(cause) => return Err(connection_error(endpoint, cause)),
        };
        // No charset decoding: a BOM or any other byte must survive untouched.
        let chain = String::from_utf8(body.to_vec()).map_err(|e| ChainError::Read(e.into()))?;

        tracing::debug!(endpoint, len = chain.len(), "received identity chain");
        Ok(chain)
    }
}

/// Request an identity chain with the default configuration.
///
/// Without a `transport`, a client is built for this call alone and its
/// connections are released when the call returns.
///
/// # Errors
///
/// See [`ChainRequester::request_chain`].
pub async fn request_chain<K>(
    ctx: &Context,
    token: &XblToken,
    public_key: &K,
    transport: Option<Transport>,
) -> Result<String>
where
    K: EncodePublicKey + ?Sized,
{
    ChainRequester::new(AuthConfig::default(), transport.unwrap_or_default())?
        .request_chain(ctx, token, public_key)
        .await
}

fn connection_error(endpoint: &str, source: ConnectionCause) -> ChainError {
    tracing::debug!(endpoint, error = %source, "identity chain request failed");
    ChainError::Connection {
        endpoint: endpoint.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bedrock_config::DEFAULT_ENDPOINT;
    use p256::SecretKey;
    use rand_core::OsRng;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = AuthConfig {
            endpoint: "ftp://example.com".into(),
            ..AuthConfig::default()
        };
        let err = ChainRequester::new(config, Transport::default()).unwrap_err();
        assert!(matches!(err, ChainError::Config(_)));
    }

    #[test]
    fn test_new_rejects_unsendable_user_agent() {
        let config = AuthConfig {
            user_agent: "MCPE\nAndroid".into(),
            ..AuthConfig::default()
        };
        let err = ChainRequester::new(config, Transport::default()).unwrap_err();
        assert!(matches!(err, ChainError::Config(_)));
        assert!(!err.is_connection());
    }

    #[test]
    fn test_default_requester_targets_default_endpoint() {
        let r = ChainRequester::default();
        assert_eq!(r.config().endpoint, DEFAULT_ENDPOINT);
        assert!(!r.transport().is_shared());
    }

    #[tokio::test]
    async fn test_cancelled_context_fails_without_network() {
        let ctx = Context::background();
        ctx.cancel();
        let key = SecretKey::random(&mut OsRng).public_key();
        let err = request_chain(&ctx, &XblToken::new("uhs", "tok"), &key, None)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
        assert!(err.to_string().contains(DEFAULT_ENDPOINT));
    }
}
