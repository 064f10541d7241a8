//! HTTP client for the store API.

use crate::retry::RetryPolicy;
use crate::ApiError;
use aurum_auth::AuthToken;
use reqwest::{header, Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`ApiClient`].
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub retry: RetryPolicy,
}

impl ApiConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: DEFAULT_TIMEOUT,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}

/// Client for the store's REST API.
///
/// Cloning is cheap and clones share the bearer token, so logging in
/// through one clone authenticates them all.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    retry: RetryPolicy,
    token: Arc<RwLock<Option<AuthToken>>>,
}

impl ApiClient {
    pub fn new(config: ApiConfig) -> Result<Self, ApiError> {
        let mut base = config.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;
        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(ApiError::InvalidUrl(config.base_url));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("aurum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(ApiError::Client)?;

        Ok(Self {
            http,
            base_url,
            retry: config.retry,
            token: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Set the authentication token
    pub fn set_token(&self, token: Option<AuthToken>) {
        let mut guard = match self.token.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        *guard = token;
    }

    /// Get the current token
    pub fn token(&self) -> Option<AuthToken> {
        match self.token.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Resolve a path such as `products/7` against the base URL.
    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        Ok(self.base_url.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, url: Url) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, url)
            .header(header::ACCEPT, "application/json");
        if let Some(token) = self.token() {
            request = request.header(header::AUTHORIZATION, token.bearer_header());
        }
        request
    }

    /// GET with retries.
    pub async fn get<T: DeserializeOwned>(&self, path: &str, action: &str) -> Result<T, ApiError> {
        self.get_with_query(path, &(), action).await
    }

    /// GET with query parameters and retries.
    pub async fn get_with_query<T, Q>(&self, path: &str, query: &Q, action: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let mut attempt = 0;
        loop {
            let request = self.request(Method::GET, url.clone()).query(query);
            match self.execute(request, action).await {
                Ok(value) => return Ok(value),
                Err(error) => match self.retry.next_delay(&error, attempt) {
                    Some(delay) => {
                        tracing::warn!(
                            %url,
                            attempt = attempt + 1,
                            delay_ms = delay.as_millis() as u64,
                            error = %error,
                            "retrying request"
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                    }
                    None => return Err(error),
                },
            }
        }
    }

    pub async fn post<T, B>(&self, path: &str, body: &B, action: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::POST, self.url(path)?).json(body);
        self.execute(request, action).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B, action: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PUT, self.url(path)?).json(body);
        self.execute(request, action).await
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B, action: &str) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let request = self.request(Method::PATCH, self.url(path)?).json(body);
        self.execute(request, action).await
    }

    /// DELETE; any response body is ignored.
    pub async fn delete(&self, path: &str, action: &str) -> Result<(), ApiError> {
        let request = self.request(Method::DELETE, self.url(path)?);
        self.send(request, action).await.map(|_| ())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        action: &str,
    ) -> Result<T, ApiError> {
        let body = self.send(request, action).await?;
        decode(&body, action)
    }

    /// Send and return the body of a successful response.
    async fn send(&self, request: RequestBuilder, action: &str) -> Result<Vec<u8>, ApiError> {
        let request = request
            .build()
            .map_err(|e| ApiError::from_reqwest(action, e))?;
        let method = request.method().clone();
        let url = request.url().clone();
        tracing::debug!(%method, %url, "api request");

        let response = self
            .http
            .execute(request)
            .await
            .map_err(|e| ApiError::from_reqwest(action, e))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::from_reqwest(action, e))?;

        if !status.is_success() {
            let detail = String::from_utf8_lossy(&body).trim().to_string();
            tracing::debug!(%method, %url, status = status.as_u16(), %detail, "api error response");
            return Err(ApiError::from_status(
                status.as_u16(),
                action,
                (!detail.is_empty()).then_some(detail),
            ));
        }

        tracing::debug!(%method, %url, status = status.as_u16(), bytes = body.len(), "api response");
        Ok(body.to_vec())
    }
}

/// Some deployments wrap payloads as `{"data": ...}`; accept both shapes.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

fn decode<T: DeserializeOwned>(body: &[u8], action: &str) -> Result<T, ApiError> {
    let body: &[u8] = if body.iter().all(u8::is_ascii_whitespace) {
        b"null"
    } else {
        body
    };
    match serde_json::from_slice::<Envelope<T>>(body) {
        Ok(Envelope::Wrapped { data }) | Ok(Envelope::Bare(data)) => Ok(data),
        Err(_) => {
            // Re-parse without the envelope for a precise error message.
            serde_json::from_slice::<T>(body).map_err(|source| ApiError::Decode {
                action: action.to_string(),
                source,
            })
        }
    }
}
