//! OAuth2 token acquisition for Microsoft Graph.

use chrono::{DateTime, Duration, Utc};
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use crate::{ClientCredentials, GraphConfig, GraphError, GraphResult};

/// Token response from the Azure AD token endpoint.
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_expired(&self, grace: Duration) -> bool {
        Utc::now() + grace >= self.expires_at
    }
}

/// Supplies bearer tokens for Graph requests.
///
/// Either runs the client-credentials flow with an in-memory cache, or
/// hands out a pre-acquired static token (useful for tests and for callers
/// that manage authentication themselves). Only the constructors and
/// [`TokenProvider::bearer_token`] are public; flow state stays internal.
#[derive(Debug)]
pub struct TokenProvider {
    inner: Inner,
}

#[derive(Debug)]
enum Inner {
    ClientCredentials(ClientCredentialsFlow),
    Static(SecretString),
}

#[derive(Debug)]
struct ClientCredentialsFlow {
    credentials: ClientCredentials,
    token_url: String,
    scope: String,
    http_client: reqwest::Client,
    cached: RwLock<Option<CachedToken>>,
    grace_period: Duration,
}

impl TokenProvider {
    /// Creates a provider running the client-credentials flow against the
    /// configured tenant and cloud.
    #[must_use]
    pub fn client_credentials(config: &GraphConfig, credentials: ClientCredentials) -> Self {
        Self {
            inner: Inner::ClientCredentials(ClientCredentialsFlow {
                credentials,
                token_url: config.token_url(),
                scope: config.default_scope(),
                http_client: reqwest::Client::new(),
                cached: RwLock::new(None),
                // Refresh 5 minutes before the token actually expires.
                grace_period: Duration::minutes(5),
            }),
        }
    }

    /// Creates a provider that always returns the given token.
    #[must_use]
    pub fn static_token(token: SecretString) -> Self {
        Self {
            inner: Inner::Static(token),
        }
    }

    /// True when the provider hands out a pre-acquired token rather than
    /// running the token flow.
    #[must_use]
    pub fn is_static(&self) -> bool {
        matches!(self.inner, Inner::Static(_))
    }

    /// Returns a valid bearer token, refreshing the cache if necessary.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Auth`] if the token endpoint rejects the
    /// request or returns an unparseable response.
    pub async fn bearer_token(&self) -> GraphResult<String> {
        match &self.inner {
            Inner::Static(token) => Ok(token.expose_secret().to_string()),
            Inner::ClientCredentials(flow) => flow.bearer_token().await,
        }
    }
}

impl ClientCredentialsFlow {
    async fn bearer_token(&self) -> GraphResult<String> {
        {
            let guard = self.cached.read().await;
            if let Some(token) = guard.as_ref() {
                if !token.is_expired(self.grace_period) {
                    return Ok(token.access_token.clone());
                }
            }
        }

        let fresh = self.acquire().await?;
        let access_token = fresh.access_token.clone();
        *self.cached.write().await = Some(fresh);
        Ok(access_token)
    }

    #[instrument(skip(self))]
    async fn acquire(&self) -> GraphResult<CachedToken> {
        debug!("Requesting access token");

        let params = [
            ("grant_type", "client_credentials"),
            ("client_id", self.credentials.client_id.as_str()),
            (
                "client_secret",
                self.credentials.client_secret.expose_secret(),
            ),
            ("scope", self.scope.as_str()),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&params)
            .send()
            .await
            .map_err(|e| GraphError::Auth(format!("token request failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(GraphError::Auth(format!(
                "token request failed with status {status}: {body}"
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| GraphError::Auth(format!("invalid token response: {e}")))?;

        Ok(CachedToken {
            access_token: token.access_token,
            expires_at: Utc::now() + Duration::seconds(token.expires_in),
        })
    }
}
