//! HTTP resource client for the triage REST API.
//!
//! # Overview
//! Issues GET/POST/PATCH/DELETE calls against the backend, sends request
//! bodies with snake_case keys, hands response bodies back with camelCase
//! keys, optionally reads a created resource back through its
//! `content-location` header, and reports every non-success status as the
//! same `ApiError::Http`.
//!
//! # Design
//! - `ResourceClient` builds `HttpRequest`s and parses `HttpResponse`s
//!   without I/O; `Api` drives a `Transport` between the two.
//! - Credentials come from an injected `TokenSource`, read per call.
//! - Status policy (e.g. "409 means already tagged") stays with callers via
//!   `policy::ResultExt`.

pub mod api;
pub mod auth;
pub mod case;
pub mod client;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod http;
pub mod policy;
pub mod query;
pub mod transport;
pub mod types;

pub use api::{decode, encode, Api};
pub use auth::{NoAuth, SharedToken, StaticToken, TokenSource};
pub use case::{keys_to_camel, keys_to_snake, to_camel_case, to_snake_case};
pub use client::ResourceClient;
pub use config::{ClientConfig, StatusRange};
pub use endpoint::Endpoint;
pub use error::{ApiError, ConfigError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use policy::{IgnorableStatus, ResultExt};
pub use query::{QueryParams, QueryValue};
pub use transport::ReqwestTransport;
pub use types::{Alert, CreateAlert, NodeTag, Page, UpdateAlert};
