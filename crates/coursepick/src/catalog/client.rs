//! HTTP client for the course-catalog API.
//!
//! Requests carry an OAuth2 client-credentials bearer token. The token is
//! cached until shortly before its advertised expiry and refreshed once on a
//! 401, so an upstream-side revocation costs one extra round trip instead of
//! a failed page.

use super::error::CatalogError;
use super::types::{CoursePage, Subject, TermSummary};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, warn};
use url::Url;

/// Transport retries per request (deterministic rejections are never retried).
const TRANSPORT_RETRIES: u32 = 1;
/// Delay before a transport retry.
const RETRY_DELAY: Duration = Duration::from_millis(250);
/// Token lifetime assumed when the token endpoint omits `expires_in`.
const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(300);
/// Refresh this long before the advertised expiry.
const TOKEN_EXPIRY_MARGIN: Duration = Duration::from_secs(30);

/// The catalog operations the retrieval pipeline consumes.
///
/// The pipeline only ever sees this trait; tests drive it with a scripted
/// in-memory implementation.
#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// Lists the currently-open terms (id plus minimal attributes).
    async fn open_terms(&self) -> Result<Vec<TermSummary>, CatalogError>;

    /// Fetches full detail for one term. Fails with `NotFound` for an
    /// unknown id.
    async fn term(&self, id: &str) -> Result<TermSummary, CatalogError>;

    /// Fetches one page of the course listing for a (term, subject) pair.
    async fn course_page(
        &self,
        term: &str,
        subject: &str,
        page_size: u32,
        page_number: u32,
    ) -> Result<CoursePage, CatalogError>;

    /// Lists all subjects.
    async fn subjects(&self) -> Result<Vec<Subject>, CatalogError>;
}

/// Configuration for the HTTP catalog client.
#[derive(Debug, Clone)]
pub struct CatalogClientConfig {
    /// Base URL of the catalog API
    pub endpoint: String,
    /// OAuth2 token endpoint; requests go out unauthenticated when unset
    pub token_endpoint: Option<String>,
    pub client_id: String,
    pub client_secret: String,
}

/// An access token with its expiry bookkeeping.
struct CachedToken {
    access_token: String,
    acquired_at: Instant,
    ttl: Duration,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        self.acquired_at.elapsed() < self.ttl
    }
}

/// `reqwest`-backed implementation of [`CatalogApi`].
pub struct CatalogClient {
    http: Client,
    endpoint: String,
    config: CatalogClientConfig,
    token: RwLock<Option<CachedToken>>,
}

impl CatalogClient {
    pub fn new(config: CatalogClientConfig) -> Result<Self, CatalogError> {
        Url::parse(&config.endpoint)?;
        if let Some(token_endpoint) = &config.token_endpoint {
            Url::parse(token_endpoint)?;
        }

        let http = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(30))
            .build()?;

        let endpoint = config.endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            http,
            endpoint,
            config,
            token: RwLock::new(None),
        })
    }

    /// Returns a fresh bearer token, requesting a new one when the cached
    /// token is absent or past its safety margin. None when no token
    /// endpoint is configured.
    async fn bearer_token(&self) -> Result<Option<String>, CatalogError> {
        let Some(token_endpoint) = &self.config.token_endpoint else {
            return Ok(None);
        };

        {
            let slot = self.token.read().await;
            if let Some(token) = slot.as_ref().filter(|t| t.is_fresh()) {
                return Ok(Some(token.access_token.clone()));
            }
        }

        let mut slot = self.token.write().await;
        // another caller may have refreshed while we waited for the lock
        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh()) {
            return Ok(Some(token.access_token.clone()));
        }

        let token = self.request_token(token_endpoint).await?;
        let access_token = token.access_token.clone();
        *slot = Some(token);
        Ok(Some(access_token))
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }

    async fn request_token(&self, token_endpoint: &str) -> Result<CachedToken, CatalogError> {
        debug!("requesting access token");
        let response = self
            .http
            .post(token_endpoint)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(CatalogError::Auth {
                message: "couldn't get access token".to_string(),
            });
        }
        if !status.is_success() {
            return Err(CatalogError::Transport {
                message: format!("token endpoint returned {status}"),
            });
        }

        let payload: TokenResponse =
            response.json().await.map_err(|err| CatalogError::Transport {
                message: format!("couldn't decode token response: {err}"),
            })?;

        // TODO drop "BearerToken" once the gateway returns a proper Bearer token_type
        if !matches!(payload.token_type.as_str(), "Bearer" | "BearerToken") {
            return Err(CatalogError::Auth {
                message: format!("invalid token type {:?}", payload.token_type),
            });
        }

        let ttl = payload
            .expires_in
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TOKEN_TTL)
            .saturating_sub(TOKEN_EXPIRY_MARGIN);

        Ok(CachedToken {
            access_token: payload.access_token,
            acquired_at: Instant::now(),
            ttl,
        })
    }

    /// Issues an authenticated GET and decodes the JSON body.
    ///
    /// Maps the response status to the error taxonomy: 401 -> `Auth` (after
    /// one token refresh), 404 -> `NotFound`, 400 -> `Api`, anything else
    /// non-2xx -> `Transport`. Only transport failures are retried.
    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let mut transport_attempts = 0u32;
        let mut reauthenticated = false;

        loop {
            let mut request = self.http.get(url);
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(token) = self.bearer_token().await? {
                request = request.bearer_auth(token);
            }

            let response = match request.send().await {
                Ok(response) => response,
                Err(err) if transport_attempts < TRANSPORT_RETRIES => {
                    transport_attempts += 1;
                    warn!(error = %err, attempt = transport_attempts, "transport failure, retrying");
                    tokio::time::sleep(RETRY_DELAY).await;
                    continue;
                }
                Err(err) => return Err(err.into()),
            };

            let status = response.status();
            match status {
                StatusCode::UNAUTHORIZED if !reauthenticated => {
                    reauthenticated = true;
                    warn!("catalog returned 401, refreshing access token");
                    self.invalidate_token().await;
                    continue;
                }
                StatusCode::UNAUTHORIZED => {
                    return Err(CatalogError::Auth {
                        message: "not authorized".to_string(),
                    });
                }
                StatusCode::NOT_FOUND => {
                    return Err(CatalogError::NotFound {
                        message: "key not found".to_string(),
                    });
                }
                StatusCode::BAD_REQUEST => {
                    let body = response.text().await.unwrap_or_default();
                    return Err(CatalogError::Api { message: body });
                }
                _ if !status.is_success() => {
                    if status.is_server_error() && transport_attempts < TRANSPORT_RETRIES {
                        transport_attempts += 1;
                        warn!(%status, attempt = transport_attempts, "server error, retrying");
                        tokio::time::sleep(RETRY_DELAY).await;
                        continue;
                    }
                    return Err(CatalogError::Transport {
                        message: format!("unexpected status {status}"),
                    });
                }
                _ => {}
            }

            return response
                .json::<T>()
                .await
                .map_err(|err| CatalogError::Transport {
                    message: format!("malformed response: {err}"),
                });
        }
    }
}

#[async_trait]
impl CatalogApi for CatalogClient {
    async fn open_terms(&self) -> Result<Vec<TermSummary>, CatalogError> {
        let url = format!("{}/terms/open", self.endpoint);
        let document: ResourceList<TermSummary> = self.get_json(&url, &[]).await?;
        Ok(document.data)
    }

    async fn term(&self, id: &str) -> Result<TermSummary, CatalogError> {
        let url = format!("{}/terms/{}", self.endpoint, id);
        let document: ResourceDoc<TermSummary> = self.get_json(&url, &[]).await?;
        Ok(document.data)
    }

    async fn course_page(
        &self,
        term: &str,
        subject: &str,
        page_size: u32,
        page_number: u32,
    ) -> Result<CoursePage, CatalogError> {
        let url = format!("{}/courses", self.endpoint);
        let query = [
            ("term", term.to_string()),
            ("subject", subject.to_string()),
            ("page[size]", page_size.to_string()),
            ("page[number]", page_number.to_string()),
        ];
        self.get_json(&url, &query).await
    }

    async fn subjects(&self) -> Result<Vec<Subject>, CatalogError> {
        let url = format!("{}/subjects", self.endpoint);
        let document: ResourceList<SubjectResource> = self.get_json(&url, &[]).await?;
        Ok(document
            .data
            .into_iter()
            .filter_map(|resource| resource.attributes)
            .collect())
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    token_type: String,
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct ResourceList<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ResourceDoc<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct SubjectResource {
    #[serde(default)]
    attributes: Option<Subject>,
}
