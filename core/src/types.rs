//! Triage DTOs in the client's camelCase view.
//!
//! # Design
//! These mirror the mock-server's snake_case schema but are defined
//! independently, with `rename_all = "camelCase"` so they decode the
//! normalized bodies `Api` returns. Integration tests catch schema drift.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An alert as returned by `GET /alert/{uuid}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Alert {
    pub uuid: Uuid,
    pub name: String,
    pub alert_type: String,
    pub queue: String,
    pub disposition: Option<String>,
    pub owner: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request payload for `POST /alert/`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAlert {
    pub name: String,
    pub alert_type: String,
    pub queue: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// Request payload for `PATCH /alert/{uuid}`. Omitted fields stay unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAlert {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

/// One page of a list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NodeTag {
    pub uuid: Uuid,
    pub value: String,
}
