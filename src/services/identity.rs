//! Identity-provider client
//!
//! Session issuance and the token format belong to the external identity
//! provider; this service only resolves an opaque token to a vendor id via
//! the provider's introspection endpoint. Results are cached briefly so a
//! busy dashboard does not introspect on every request.

use async_trait::async_trait;
use moka::future::Cache;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VendorIdentity {
    pub vendor_id: Uuid,
}

#[derive(Debug)]
pub enum IdentityError {
    Upstream(String),
}

impl std::fmt::Display for IdentityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentityError::Upstream(msg) => write!(f, "Identity provider error: {}", msg),
        }
    }
}

impl std::error::Error for IdentityError {}

/// Seam for token resolution: the HTTP introspection client in production,
/// a static table in tests and local development.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Ok(None) means the token is syntactically fine but not a live session
    async fn verify(&self, token: &str) -> Result<Option<VendorIdentity>, IdentityError>;
}

#[derive(Debug, Deserialize)]
struct IntrospectionResponse {
    vendor_id: Uuid,
    active: bool,
}

pub struct HttpTokenVerifier {
    client: Client,
    base_url: String,
}

impl HttpTokenVerifier {
    pub fn new(base_url: String) -> Self {
        Self {
            client: Client::new(),
            base_url,
        }
    }
}

#[async_trait]
impl TokenVerifier for HttpTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<VendorIdentity>, IdentityError> {
        let url = format!("{}/v1/sessions/introspect", self.base_url);
        let response = self
            .client
            .get(&url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| IdentityError::Upstream(e.to_string()))?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => return Ok(None),
            status if !status.is_success() => {
                return Err(IdentityError::Upstream(format!(
                    "introspection returned {}",
                    status
                )));
            }
            _ => {}
        }

        let body: IntrospectionResponse = response
            .json()
            .await
            .map_err(|e| IdentityError::Upstream(e.to_string()))?;

        if body.active {
            Ok(Some(VendorIdentity {
                vendor_id: body.vendor_id,
            }))
        } else {
            Ok(None)
        }
    }
}

/// Fixed token table. Used by integration tests and local development when
/// no identity provider is running.
pub struct StaticTokenVerifier {
    tokens: HashMap<String, Uuid>,
}

impl StaticTokenVerifier {
    pub fn new(tokens: HashMap<String, Uuid>) -> Self {
        Self { tokens }
    }
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<Option<VendorIdentity>, IdentityError> {
        Ok(self
            .tokens
            .get(token)
            .map(|vendor_id| VendorIdentity {
                vendor_id: *vendor_id,
            }))
    }
}

#[derive(Clone)]
pub struct IdentityService {
    verifier: Arc<dyn TokenVerifier>,
    cache: Cache<String, VendorIdentity>,
}

impl IdentityService {
    pub fn new(verifier: Arc<dyn TokenVerifier>, cache_ttl_secs: u64) -> Self {
        Self {
            verifier,
            cache: Cache::builder()
                .max_capacity(10_000)
                .time_to_live(Duration::from_secs(cache_ttl_secs))
                .build(),
        }
    }

    pub fn http(base_url: String, cache_ttl_secs: u64) -> Self {
        Self::new(Arc::new(HttpTokenVerifier::new(base_url)), cache_ttl_secs)
    }

    /// Resolve a bearer/cookie token to a vendor identity.
    /// Negative results are not cached; a retried token goes back upstream.
    pub async fn resolve(&self, token: &str) -> Result<Option<VendorIdentity>, IdentityError> {
        if let Some(identity) = self.cache.get(token).await {
            return Ok(Some(identity));
        }

        match self.verifier.verify(token).await? {
            Some(identity) => {
                self.cache.insert(token.to_string(), identity).await;
                Ok(Some(identity))
            }
            None => Ok(None),
        }
    }
}
