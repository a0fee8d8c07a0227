//! Bearer-token lifecycle for the catalog API.
//!
//! IGDB authenticates through Twitch OAuth2 client credentials: we exchange
//! our client id + secret for a short-lived access token and attach it to
//! every catalog request. [`TokenManager`] caches the current token and
//! refreshes it when it is missing or within a safety margin of expiry.
//!
//! The cache lock is held across the exchange call, so under concurrent
//! callers exactly one refresh is in flight - everyone else queues on the
//! lock and picks up the fresh token instead of issuing a duplicate
//! exchange.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::domain::CatalogError;

/// Refresh this long before the provider-reported expiry.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

/// Successful credential-exchange response.
///
/// Matches the Twitch OAuth2 token endpoint body.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Time to live, in seconds
    pub expires_in: u64,
    #[serde(default)]
    pub token_type: String,
}

/// The credential-exchange call, abstracted so tests can inject a fake.
#[async_trait]
pub trait TokenExchange: Send + Sync {
    /// Trade client credentials for a fresh access token.
    async fn exchange(&self) -> Result<TokenGrant, CatalogError>;
}

/// Real exchange against the configured auth URL.
pub struct HttpTokenExchange {
    http_client: reqwest::Client,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

impl HttpTokenExchange {
    pub fn new(
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let http_client = reqwest::Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            http_client,
            auth_url: auth_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

#[async_trait]
impl TokenExchange for HttpTokenExchange {
    async fn exchange(&self) -> Result<TokenGrant, CatalogError> {
        // Twitch expects the credentials as query parameters on a POST.
        let url = format!(
            "{}?client_id={}&client_secret={}&grant_type=client_credentials",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.client_secret)
        );

        let response = self
            .http_client
            .post(&url)
            .send()
            .await
            .map_err(|e| CatalogError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(CatalogError::Auth(format!(
                "HTTP {}: {}",
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<TokenGrant>()
            .await
            .map_err(|e| CatalogError::Auth(e.to_string()))
    }
}

struct CachedToken {
    access_token: String,
    expires_at: Instant,
}

/// Caches one bearer token and refreshes it on demand.
pub struct TokenManager<E = HttpTokenExchange> {
    exchange: E,
    cached: Mutex<Option<CachedToken>>,
}

impl<E: TokenExchange> TokenManager<E> {
    pub fn new(exchange: E) -> Self {
        Self {
            exchange,
            cached: Mutex::new(None),
        }
    }

    /// Return a valid access token, refreshing first if the cached one is
    /// absent or within [`EXPIRY_MARGIN`] of expiry.
    ///
    /// A failed exchange is fatal to the caller's operation; nothing is
    /// cached and the error propagates.
    pub async fn bearer_token(&self) -> Result<String, CatalogError> {
        let mut cached = self.cached.lock().await;

        if let Some(token) = cached.as_ref()
            && Instant::now() + EXPIRY_MARGIN < token.expires_at
        {
            return Ok(token.access_token.clone());
        }

        tracing::info!("Refreshing catalog access token");
        let grant = self.exchange.exchange().await?;
        tracing::info!(expires_in = grant.expires_in, "Catalog access token refreshed");

        let access_token = grant.access_token.clone();
        *cached = Some(CachedToken {
            access_token: grant.access_token,
            expires_at: Instant::now() + Duration::from_secs(grant.expires_in),
        });

        Ok(access_token)
    }
}
