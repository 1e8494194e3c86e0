//! Stateless HTTP request builder and response parser for the triage API.
//!
//! # Design
//! `ResourceClient` holds the base URL, the success set and a token source,
//! and carries no mutable state between calls. Each operation is split into a
//! `build_*` method that produces an `HttpRequest` and `parse_response`,
//! which consumes an `HttpResponse`. `Api` runs the round-trip in between;
//! keeping this half free of I/O makes it deterministic to test.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::auth::{NoAuth, TokenSource};
use crate::case::{keys_to_camel, keys_to_snake};
use crate::config::{ClientConfig, StatusRange};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::QueryParams;

/// Headers naming the resource a create call produced, in lookup order.
const LOCATION_HEADERS: [&str; 2] = ["content-location", "location"];

/// Synchronous, stateless request builder and response parser.
#[derive(Clone)]
pub struct ResourceClient {
    base_url: String,
    success: StatusRange,
    tokens: Arc<dyn TokenSource>,
}

impl fmt::Debug for ResourceClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceClient")
            .field("base_url", &self.base_url)
            .field("success", &self.success)
            .finish_non_exhaustive()
    }
}

impl ResourceClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            success: StatusRange::default(),
            tokens: Arc::new(NoAuth),
        }
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::new(&config.base_url).with_success(config.success)
    }

    pub fn with_token_source(mut self, tokens: impl TokenSource + 'static) -> Self {
        self.tokens = Arc::new(tokens);
        self
    }

    pub fn with_success(mut self, success: StatusRange) -> Self {
        self.success = success;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn is_success(&self, status: u16) -> bool {
        self.success.contains(status)
    }

    pub fn build_create(&self, path: &str, body: Option<&Value>) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Post, self.url_for(path), body)
    }

    pub fn build_read(&self, path: &str, query: &QueryParams) -> HttpRequest {
        let mut url = self.url_for(path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.encode());
        }
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: self.headers(false),
            body: None,
        }
    }

    pub fn build_update(&self, path: &str, body: Option<&Value>) -> Result<HttpRequest, ApiError> {
        self.request(HttpMethod::Patch, self.url_for(path), body)
    }

    pub fn build_remove(&self, path: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: self.url_for(path),
            headers: self.headers(false),
            body: None,
        }
    }

    /// Build the read of a freshly created resource.
    ///
    /// Returns `None` unless `response` is a success carrying a
    /// location-style header. A relative location is resolved under the base
    /// URL; an absolute one keeps its path and query on the base URL's origin.
    pub fn build_follow_up(&self, response: &HttpResponse) -> Result<Option<HttpRequest>, ApiError> {
        if !self.is_success(response.status) {
            return Ok(None);
        }
        let Some(location) = LOCATION_HEADERS
            .iter()
            .find_map(|name| response.header(name))
            .map(str::trim)
            .filter(|l| !l.is_empty())
        else {
            return Ok(None);
        };

        let url = match url::Url::parse(location) {
            Ok(absolute) => self.on_base_origin(&absolute)?,
            Err(url::ParseError::RelativeUrlWithoutBase) => self.url_for(location),
            Err(e) => return Err(ApiError::InvalidUrl(format!("{location}: {e}"))),
        };

        Ok(Some(HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: self.headers(false),
            body: None,
        }))
    }

    /// Path and query of `absolute`, placed on the base URL's origin. The
    /// path already carries any prefix the base URL has.
    fn on_base_origin(&self, absolute: &url::Url) -> Result<String, ApiError> {
        let base = url::Url::parse(&self.base_url)
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {e}", self.base_url)))?;
        let mut resolved = base
            .join(absolute.path())
            .map_err(|e| ApiError::InvalidUrl(format!("{absolute}: {e}")))?;
        resolved.set_query(absolute.query());
        Ok(resolved.to_string())
    }

    /// Check the status and normalize the body to camelCase keys.
    ///
    /// An empty body is `null`; a body that is not JSON is returned as a JSON
    /// string holding the raw text.
    pub fn parse_response(&self, response: HttpResponse) -> Result<Value, ApiError> {
        if !self.is_success(response.status) {
            return Err(ApiError::Http {
                status: response.status,
                body: response.body,
            });
        }
        if response.body.trim().is_empty() {
            return Ok(Value::Null);
        }
        let body = match serde_json::from_str::<Value>(&response.body) {
            Ok(value) => value,
            Err(_) => Value::String(response.body),
        };
        Ok(keys_to_camel(body))
    }

    fn request(&self, method: HttpMethod, url: String, body: Option<&Value>) -> Result<HttpRequest, ApiError> {
        let body = body
            .map(|b| serde_json::to_string(&keys_to_snake(b.clone())))
            .transpose()
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(HttpRequest {
            method,
            url,
            headers: self.headers(body.is_some()),
            body,
        })
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{path}", self.base_url)
        } else {
            format!("{}/{path}", self.base_url)
        }
    }

    fn headers(&self, has_body: bool) -> Vec<(String, String)> {
        let mut headers = vec![("accept".to_string(), "application/json".to_string())];
        if has_body {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }
        if let Some(token) = self.tokens.bearer_token() {
            headers.push(("authorization".to_string(), format!("Bearer {token}")));
        }
        headers
    }
}
