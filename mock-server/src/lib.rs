use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use url::form_urlencoded;
use uuid::Uuid;

const DEFAULT_LIMIT: usize = 50;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Alert {
    pub uuid: Uuid,
    pub name: String,
    pub alert_type: String,
    pub queue: String,
    pub disposition: Option<String>,
    pub owner: Option<String>,
    pub tags: Vec<String>,
}

#[derive(Deserialize)]
pub struct CreateAlert {
    pub name: String,
    pub alert_type: String,
    #[serde(default = "default_queue")]
    pub queue: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

fn default_queue() -> String {
    "default".to_string()
}

#[derive(Deserialize)]
pub struct UpdateAlert {
    pub disposition: Option<String>,
    pub owner: Option<String>,
    pub tags: Option<Vec<String>>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct NodeTag {
    pub uuid: Uuid,
    pub value: String,
}

#[derive(Deserialize)]
pub struct CreateNodeTag {
    pub value: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AlertPage {
    pub items: Vec<Alert>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

#[derive(Clone, Default)]
pub struct Db {
    alerts: Arc<RwLock<HashMap<Uuid, Alert>>>,
    tags: Arc<RwLock<HashMap<Uuid, NodeTag>>>,
}

pub fn app() -> Router {
    Router::new()
        .route("/alert/", get(list_alerts).post(create_alert))
        .route(
            "/alert/{id}",
            get(get_alert).patch(update_alert).delete(delete_alert),
        )
        .route("/node/tag/", get(list_tags).post(create_tag))
        .route("/node/tag/{id}", get(get_tag))
        .route("/auth/validate", get(validate_auth))
        .layer(TraceLayer::new_for_http())
        .with_state(Db::default())
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

fn created(location: String) -> Response {
    (StatusCode::CREATED, [(header::CONTENT_LOCATION, location)]).into_response()
}

/// Filters accepted by `GET /alert/`. Repeated `disposition` keys are OR-ed.
#[derive(Debug, Default, PartialEq, Eq)]
struct AlertFilter {
    offset: usize,
    limit: usize,
    dispositions: Vec<String>,
    owner: Option<String>,
}

fn parse_alert_filter(raw: Option<&str>) -> Result<AlertFilter, StatusCode> {
    let mut filter = AlertFilter {
        limit: DEFAULT_LIMIT,
        ..AlertFilter::default()
    };
    for (key, value) in form_urlencoded::parse(raw.unwrap_or_default().as_bytes()) {
        match key.as_ref() {
            "offset" => filter.offset = value.parse().map_err(|_| StatusCode::BAD_REQUEST)?,
            "limit" => filter.limit = value.parse().map_err(|_| StatusCode::BAD_REQUEST)?,
            "disposition" => filter.dispositions.push(value.into_owned()),
            "owner" => filter.owner = Some(value.into_owned()),
            _ => {}
        }
    }
    Ok(filter)
}

async fn list_alerts(
    State(db): State<Db>,
    RawQuery(raw): RawQuery,
) -> Result<Json<AlertPage>, StatusCode> {
    let filter = parse_alert_filter(raw.as_deref())?;
    let alerts = db.alerts.read().await;

    let mut matching: Vec<Alert> = alerts
        .values()
        .filter(|a| {
            filter.dispositions.is_empty()
                || a.disposition
                    .as_ref()
                    .is_some_and(|d| filter.dispositions.contains(d))
        })
        .filter(|a| filter.owner.is_none() || a.owner == filter.owner)
        .cloned()
        .collect();
    matching.sort_by(|a, b| a.name.cmp(&b.name).then(a.uuid.cmp(&b.uuid)));

    let total = matching.len();
    let items = matching
        .into_iter()
        .skip(filter.offset)
        .take(filter.limit)
        .collect();
    Ok(Json(AlertPage {
        items,
        total,
        offset: filter.offset,
        limit: filter.limit,
    }))
}

async fn create_alert(State(db): State<Db>, Json(input): Json<CreateAlert>) -> Response {
    let alert = Alert {
        uuid: Uuid::new_v4(),
        name: input.name,
        alert_type: input.alert_type,
        queue: input.queue,
        disposition: None,
        owner: None,
        tags: input.tags,
    };
    let location = format!("/alert/{}", alert.uuid);
    db.alerts.write().await.insert(alert.uuid, alert);
    created(location)
}

async fn get_alert(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<Alert>, StatusCode> {
    let alerts = db.alerts.read().await;
    alerts.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn update_alert(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
    Json(input): Json<UpdateAlert>,
) -> Result<Json<Alert>, StatusCode> {
    let mut alerts = db.alerts.write().await;
    let alert = alerts.get_mut(&id).ok_or(StatusCode::NOT_FOUND)?;
    if let Some(disposition) = input.disposition {
        alert.disposition = Some(disposition);
    }
    if let Some(owner) = input.owner {
        alert.owner = Some(owner);
    }
    if let Some(tags) = input.tags {
        alert.tags = tags;
    }
    Ok(Json(alert.clone()))
}

async fn delete_alert(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut alerts = db.alerts.write().await;
    alerts.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}

async fn list_tags(State(db): State<Db>) -> Json<Vec<NodeTag>> {
    let tags = db.tags.read().await;
    let mut all: Vec<NodeTag> = tags.values().cloned().collect();
    all.sort_by(|a, b| a.value.cmp(&b.value));
    Json(all)
}

/// A tag value is unique; posting an existing one is a 409.
async fn create_tag(
    State(db): State<Db>,
    Json(input): Json<CreateNodeTag>,
) -> Result<Response, StatusCode> {
    let mut tags = db.tags.write().await;
    if tags.values().any(|t| t.value == input.value) {
        return Err(StatusCode::CONFLICT);
    }
    let tag = NodeTag {
        uuid: Uuid::new_v4(),
        value: input.value,
    };
    let location = format!("/node/tag/{}", tag.uuid);
    tags.insert(tag.uuid, tag);
    Ok(created(location))
}

async fn get_tag(
    State(db): State<Db>,
    Path(id): Path<Uuid>,
) -> Result<Json<NodeTag>, StatusCode> {
    let tags = db.tags.read().await;
    tags.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn validate_auth(headers: HeaderMap) -> Result<Json<serde_json::Value>, StatusCode> {
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .filter(|t| !t.is_empty())
        .ok_or(StatusCode::UNAUTHORIZED)?;
    tracing::debug!(token_len = token.len(), "bearer token accepted");
    Ok(Json(json!({ "authenticated": true })))
}
