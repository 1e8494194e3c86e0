//! Error types for the triage API client.
//!
//! # Design
//! `ApiError` is the closed set of outcomes a call can fail with. A request
//! that completed with a status outside the success set becomes `Http`, whose
//! message is uniform across every operation. A request that never completed
//! becomes `Transport` and keeps the underlying message untouched.

use std::fmt;

/// A request that never produced a response (DNS, connect, timeout).
///
/// Displays exactly the message of the underlying transport error.
#[derive(Debug)]
pub struct TransportError {
    inner: Box<dyn std::error::Error + Send + Sync>,
}

impl TransportError {
    pub fn new<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self { inner: err.into() }
    }

    /// Returns the wrapped transport error.
    pub fn get_ref(&self) -> &(dyn std::error::Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl std::error::Error for TransportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.inner.source()
    }
}

/// Errors returned by `Api` operations and `ResourceClient` parse methods.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a status outside the success set.
    #[error("Request failed with status code {status}")]
    Http { status: u16, body: String },

    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A normalized body could not be decoded into the requested type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Query values must be scalars or arrays of scalars.
    #[error("invalid query parameter: {0}")]
    InvalidQuery(String),
}

impl ApiError {
    /// HTTP status of a completed-but-unsuccessful request.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

/// Errors raised while loading `ClientConfig`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("configuration error: {0}")]
    Figment(#[from] Box<figment::Error>),

    #[error("invalid base url {url:?}: {reason}")]
    BaseUrl { url: String, reason: String },

    #[error("success status range is empty: min {min} > max {max}")]
    SuccessRange { min: u16, max: u16 },
}
