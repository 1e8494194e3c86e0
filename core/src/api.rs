//! The resource client operations: `create`, `read`, `update`, `remove`.
//!
//! Every operation resolves to the response body with camelCase keys or fails
//! with exactly one `ApiError`. Nothing is retried and nothing is swallowed;
//! callers that treat some statuses as benign use `policy::ResultExt`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, trace};

use crate::auth::TokenSource;
use crate::client::ResourceClient;
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::query::QueryParams;
use crate::transport::ReqwestTransport;

/// A `ResourceClient` paired with the transport that executes its requests.
///
/// Calls are independent: concurrent calls complete in no particular order,
/// and callers that need all of them use a join combinator.
#[derive(Debug, Clone)]
pub struct Api<T> {
    client: ResourceClient,
    transport: T,
}

impl Api<ReqwestTransport> {
    /// An unauthenticated client over reqwest, configured from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(config)?;
        Ok(Self::new(ResourceClient::from_config(config), transport))
    }
}

impl<T: Transport> Api<T> {
    pub fn new(client: ResourceClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn with_token_source(mut self, tokens: impl TokenSource + 'static) -> Self {
        self.client = self.client.with_token_source(tokens);
        self
    }

    pub fn client(&self) -> &ResourceClient {
        &self.client
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `POST path` with a snake_case body.
    ///
    /// When the POST succeeds, `get_after_create` is set and the response
    /// names the new resource, the result is that resource as returned by a
    /// single follow-up `GET`. Otherwise it is the POST's own body.
    pub async fn create(
        &self,
        path: &str,
        body: Option<&Value>,
        get_after_create: bool,
    ) -> Result<Value, ApiError> {
        let request = self.client.build_create(path, body)?;
        let response = self.send(request).await?;

        if get_after_create {
            if let Some(follow_up) = self.client.build_follow_up(&response)? {
                trace!(url = %follow_up.url, "reading created resource");
                let created = self.send(follow_up).await?;
                return self.client.parse_response(created);
            }
        }
        self.client.parse_response(response)
    }

    /// `GET path?query`.
    pub async fn read(&self, path: &str, query: &QueryParams) -> Result<Value, ApiError> {
        let request = self.client.build_read(path, query);
        let response = self.send(request).await?;
        self.client.parse_response(response)
    }

    /// `PATCH path` with a snake_case body, if any.
    pub async fn update(&self, path: &str, body: Option<&Value>) -> Result<Value, ApiError> {
        let request = self.client.build_update(path, body)?;
        let response = self.send(request).await?;
        self.client.parse_response(response)
    }

    /// `DELETE path`.
    pub async fn remove(&self, path: &str) -> Result<Value, ApiError> {
        let request = self.client.build_remove(path);
        let response = self.send(request).await?;
        self.client.parse_response(response)
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        let method = request.method.as_str();
        let url = request.url.clone();
        debug!(method, url = %url, "sending request");
        match self.transport.execute(request).await {
            Ok(response) => {
                debug!(method, url = %url, status = response.status, "response received");
                Ok(response)
            }
            Err(e) => {
                debug!(method, url = %url, error = %e, "request did not complete");
                Err(e.into())
            }
        }
    }
}

/// Encode a caller type as a request body.
pub fn encode<S: Serialize>(value: &S) -> Result<Value, ApiError> {
    serde_json::to_value(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Decode a normalized (camelCase) body into a caller type.
pub fn decode<D: DeserializeOwned>(value: Value) -> Result<D, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Deserialization(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "camelCase")]
    struct Disposition {
        value: String,
        rank: i64,
        #[serde(default)]
        description: Option<String>,
    }

    #[test]
    fn decode_camel_case_body() {
        let body = json!({"value": "FALSE_POSITIVE", "rank": 1});
        let disposition: Disposition = decode(body).unwrap();
        assert_eq!(
            disposition,
            Disposition {
                value: "FALSE_POSITIVE".to_string(),
                rank: 1,
                description: None,
            }
        );
    }

    #[test]
    fn decode_mismatch_is_deserialization_error() {
        let err = decode::<Disposition>(json!("Create successful")).unwrap_err();
        assert!(matches!(err, ApiError::Deserialization(_)));
    }
}
