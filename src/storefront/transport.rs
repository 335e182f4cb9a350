use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::storefront::config::BackendConfig;
use crate::storefront::error::{Backend, Result, SiteInfoError};

/// `{ query, variables }` body of a GraphQL POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphqlRequest {
    pub query: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
}

impl GraphqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            variables: None,
        }
    }

    pub fn with_variables(mut self, variables: Option<Value>) -> Self {
        self.variables = variables.filter(|v| !v.is_null());
        self
    }
}

/// Executes a GraphQL request and returns its `data` member.
///
/// A missing or null `data` comes back as `Value::Null`; failures of the call
/// itself (network, status, decode, GraphQL `errors`) are `Err`.
#[async_trait]
pub trait GraphqlTransport: Send + Sync {
    fn backend(&self) -> Backend;
    async fn execute(&self, request: &GraphqlRequest) -> Result<Value>;
}

#[derive(Clone)]
pub struct HttpGraphqlTransport {
    backend: Backend,
    endpoint: String,
    http: Client,
}

impl HttpGraphqlTransport {
    pub fn new(backend: Backend, cfg: &BackendConfig) -> Result<Self> {
        cfg.validate(backend)?;
        let headers = default_headers(backend, cfg)?;
        let http = Client::builder()
            .default_headers(headers)
            .gzip(true)
            .brotli(true)
            .timeout(cfg.timeout)
            .tcp_keepalive(std::time::Duration::from_secs(60))
            .build()
            .map_err(|source| SiteInfoError::Transport { backend, source })?;
        Ok(Self {
            backend,
            endpoint: cfg.endpoint.clone(),
            http,
        })
    }
}

fn default_headers(backend: Backend, cfg: &BackendConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    if let Some(token) = &cfg.bearer {
        let mut value = HeaderValue::from_str(&format!("Bearer {token}")).map_err(|_| {
            SiteInfoError::Config(format!("{backend} api token is not a valid header value"))
        })?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }
    for (k, v) in &cfg.extra_headers {
        let name = HeaderName::from_bytes(k.as_bytes())
            .map_err(|_| SiteInfoError::Config(format!("{backend} header name '{k}' is invalid")))?;
        let value = HeaderValue::from_str(v).map_err(|_| {
            SiteInfoError::Config(format!("{backend} header '{k}' has an invalid value"))
        })?;
        headers.insert(name, value);
    }
    Ok(headers)
}

#[async_trait]
impl GraphqlTransport for HttpGraphqlTransport {
    fn backend(&self) -> Backend {
        self.backend
    }

    async fn execute(&self, request: &GraphqlRequest) -> Result<Value> {
        let backend = self.backend;
        let t0 = Instant::now();
        debug!(%backend, url = %self.endpoint, has_variables = request.variables.is_some(), "graphql request");

        let resp = self
            .http
            .post(&self.endpoint)
            .json(request)
            .send()
            .await
            .map_err(|source| SiteInfoError::Transport { backend, source })?;
        let status = resp.status();
        let bytes = resp
            .bytes()
            .await
            .map_err(|source| SiteInfoError::Transport { backend, source })?;

        let result = parse_graphql_response(backend, status, &bytes);
        match &result {
            Ok(_) => info!(
                %backend,
                status = status.as_u16(),
                bytes = bytes.len(),
                elapsed_ms = t0.elapsed().as_millis() as u64,
                "graphql response"
            ),
            Err(e) => warn!(%backend, status = status.as_u16(), error = %e, "graphql request failed"),
        }
        result
    }
}

fn truncate_for_log(mut s: String, max_len: usize) -> String {
    if s.len() > max_len {
        let mut cut = max_len;
        while !s.is_char_boundary(cut) {
            cut -= 1;
        }
        s.truncate(cut);
        s.push('…');
    }
    s
}

/// Turn a raw HTTP response into the `data` member of a GraphQL envelope.
pub fn parse_graphql_response(backend: Backend, status: StatusCode, body: &[u8]) -> Result<Value> {
    if !status.is_success() {
        return Err(SiteInfoError::Http {
            backend,
            status: status.as_u16(),
            body: truncate_for_log(String::from_utf8_lossy(body).into_owned(), 512),
        });
    }
    let mut envelope: Value =
        serde_json::from_slice(body).map_err(|source| SiteInfoError::Decode { backend, source })?;

    if let Some(errs) = envelope.get("errors").and_then(|e| e.as_array()) {
        if !errs.is_empty() {
            let messages = errs
                .iter()
                .map(|err| {
                    err.get("message")
                        .and_then(|m| m.as_str())
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| err.to_string())
                })
                .collect();
            return Err(SiteInfoError::GraphQl { backend, messages });
        }
    }
    Ok(envelope
        .get_mut("data")
        .map(Value::take)
        .unwrap_or(Value::Null))
}
