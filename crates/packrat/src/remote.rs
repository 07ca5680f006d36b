//! RemoteCas: HTTP-backed implementation of both capability contracts.
//!
//! Every operation maps to one request/response pair against a fixed REST
//! layout rooted at the configured base URL:
//!
//! | operation | method | path                      | success  | not found |
//! |-----------|--------|---------------------------|----------|-----------|
//! | store     | POST   | `cas/objects`             | 200, 201 | —         |
//! | load      | GET    | `cas/objects/{hash}`      | 200      | 404       |
//! | contains  | HEAD   | `cas/objects/{hash}`      | 200      | 404       |
//! | delete    | DELETE | `cas/objects/{hash}`      | 200, 204 | 404 = ok  |
//! | put       | PUT    | `cas/action-cache/{hash}` | 200, 204 | —         |
//! | lookup    | GET    | `cas/action-cache/{hash}` | 200      | 404       |
//!
//! Payloads travel base64-encoded inside JSON bodies. The identifier
//! returned by `store` is the one the server echoes back, not a local
//! recomputation, so a server that assigns its own ids stays
//! authoritative.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{Client, Method, Response};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::action_cache::ActionCache;
use crate::error::{CasError, CasResult};
use crate::id::ObjectId;
use crate::object::Object;
use crate::store::ObjectStore;

/// Connection settings for a remote CAS service.
#[derive(Debug, Clone)]
pub struct RemoteOptions {
    /// Service root. Any path component is preserved when operation paths
    /// are appended.
    pub base_url: String,

    /// Headers sent with every request. Per-request headers win on key
    /// collision.
    pub default_headers: HashMap<String, String>,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl RemoteOptions {
    /// Options for a base URL with no extra headers and a 30s timeout.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            default_headers: HashMap::new(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Replace the default headers.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.default_headers = headers;
        self
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// Wire bodies. Struct field order matches sorted keys so request encoding
// is deterministic; response parsing tolerates unknown fields.

#[derive(Serialize)]
struct StoreRequest<'a> {
    data: String,
    refs: Vec<&'a str>,
}

#[derive(Deserialize)]
struct StoreResponse {
    id: String,
}

#[derive(Deserialize)]
struct ObjectResponse {
    data: String,
    #[serde(default)]
    refs: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct CacheValueBody {
    object_id: String,
}

/// HTTP client implementing both [`ObjectStore`] and [`ActionCache`].
///
/// Operations on one instance are serialized, matching the local
/// backends. The underlying `reqwest::Client` handles pooling; retries
/// and TLS configuration belong to the caller-supplied client.
#[derive(Debug)]
pub struct RemoteCas {
    options: RemoteOptions,
    client: Client,
    lock: Mutex<()>,
}

impl RemoteCas {
    /// Create a client with a default transport.
    pub fn new(options: RemoteOptions) -> Self {
        Self::with_client(options, Client::new())
    }

    /// Create a client over a caller-configured transport.
    pub fn with_client(options: RemoteOptions, client: Client) -> Self {
        Self {
            options,
            client,
            lock: Mutex::new(()),
        }
    }

    /// Get the base URL of this client.
    pub fn base_url(&self) -> &str {
        &self.options.base_url
    }

    /// Join the base URL and an operation path with exactly one slash,
    /// preserving any path component the base URL already carries.
    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.options.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<String>,
        extra_headers: &[(&str, &str)],
    ) -> CasResult<Response> {
        let url = self.endpoint(path);

        let mut headers = self.options.default_headers.clone();
        for (name, value) in extra_headers {
            headers.insert((*name).to_string(), (*value).to_string());
        }

        let mut builder = self
            .client
            .request(method, &url)
            .timeout(self.options.timeout);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = body {
            builder = builder.body(body);
        }

        builder.send().await.map_err(|e| {
            if e.is_builder() {
                CasError::InvalidUrl(url.clone())
            } else {
                CasError::Transport(e)
            }
        })
    }

    /// Read the body of a response whose status was already accepted.
    async fn read_body(response: Response) -> CasResult<String> {
        response
            .text()
            .await
            .map_err(|e| CasError::InvalidResponse(e.to_string()))
    }

    /// Turn a response with an unexpected status into a server error,
    /// carrying the body text when there is one.
    async fn unexpected_status(response: Response) -> CasError {
        let status = response.status().as_u16();
        let message = response.text().await.ok().filter(|body| !body.is_empty());
        CasError::Server { status, message }
    }
}

#[async_trait]
impl ObjectStore for RemoteCas {
    #[tracing::instrument(skip(self, object), fields(bytes = object.data.len()))]
    async fn store(&self, object: &Object) -> CasResult<ObjectId> {
        let _guard = self.lock.lock().await;

        let payload = StoreRequest {
            data: general_purpose::STANDARD.encode(&object.data),
            refs: object.refs.iter().map(ObjectId::as_str).collect(),
        };
        let body = serde_json::to_string(&payload).map_err(CasError::Encoding)?;

        let response = self
            .request(
                Method::POST,
                "cas/objects",
                Some(body),
                &[("Content-Type", "application/json")],
            )
            .await?;

        match response.status().as_u16() {
            200 | 201 => {
                let text = Self::read_body(response).await?;
                let decoded: StoreResponse = serde_json::from_str(&text)
                    .map_err(|e| CasError::Decoding(format!("store response: {e}")))?;
                Ok(ObjectId::new(decoded.id))
            }
            _ => Err(Self::unexpected_status(response).await),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id.short()))]
    async fn load(&self, id: &ObjectId) -> CasResult<Option<Object>> {
        let _guard = self.lock.lock().await;

        let response = self
            .request(Method::GET, &format!("cas/objects/{id}"), None, &[])
            .await?;

        match response.status().as_u16() {
            200 => {
                let text = Self::read_body(response).await?;
                let payload: ObjectResponse = serde_json::from_str(&text)
                    .map_err(|e| CasError::Decoding(format!("object response: {e}")))?;
                let data = general_purpose::STANDARD
                    .decode(&payload.data)
                    .map_err(|e| CasError::Decoding(format!("object payload base64: {e}")))?;
                let refs = payload.refs.into_iter().map(ObjectId::new).collect();
                Ok(Some(Object { data, refs }))
            }
            404 => Ok(None),
            _ => Err(Self::unexpected_status(response).await),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id.short()))]
    async fn contains(&self, id: &ObjectId) -> CasResult<bool> {
        let _guard = self.lock.lock().await;

        let response = self
            .request(Method::HEAD, &format!("cas/objects/{id}"), None, &[])
            .await?;

        // HEAD responses have no body to report.
        match response.status().as_u16() {
            200 => Ok(true),
            404 => Ok(false),
            status => Err(CasError::Server {
                status,
                message: None,
            }),
        }
    }

    #[tracing::instrument(skip(self), fields(id = %id.short()))]
    async fn delete(&self, id: &ObjectId) -> CasResult<()> {
        let _guard = self.lock.lock().await;

        let response = self
            .request(Method::DELETE, &format!("cas/objects/{id}"), None, &[])
            .await?;

        // 404 counts as success: the object is gone either way.
        match response.status().as_u16() {
            200 | 204 | 404 => Ok(()),
            _ => Err(Self::unexpected_status(response).await),
        }
    }
}

#[async_trait]
impl ActionCache for RemoteCas {
    #[tracing::instrument(skip(self), fields(key = %key.short(), value = %value.short()))]
    async fn put(&self, key: &ObjectId, value: &ObjectId) -> CasResult<()> {
        let _guard = self.lock.lock().await;

        let body = serde_json::to_string(&CacheValueBody {
            object_id: value.as_str().to_string(),
        })
        .map_err(CasError::Encoding)?;

        let response = self
            .request(
                Method::PUT,
                &format!("cas/action-cache/{key}"),
                Some(body),
                &[("Content-Type", "application/json")],
            )
            .await?;

        match response.status().as_u16() {
            200 | 204 => Ok(()),
            _ => Err(Self::unexpected_status(response).await),
        }
    }

    #[tracing::instrument(skip(self), fields(key = %key.short()))]
    async fn lookup(&self, key: &ObjectId) -> CasResult<Option<ObjectId>> {
        let _guard = self.lock.lock().await;

        let response = self
            .request(Method::GET, &format!("cas/action-cache/{key}"), None, &[])
            .await?;

        match response.status().as_u16() {
            200 => {
                let text = Self::read_body(response).await?;
                let payload: CacheValueBody = serde_json::from_str(&text)
                    .map_err(|e| CasError::Decoding(format!("action-cache response: {e}")))?;
                Ok(Some(ObjectId::new(payload.object_id)))
            }
            404 => Ok(None),
            _ => Err(Self::unexpected_status(response).await),
        }
    }
}
