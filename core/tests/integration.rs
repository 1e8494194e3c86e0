//! Full alert and tag lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises every `Api`
//! operation over real HTTP with `ReqwestTransport`. Validates request
//! building, case conversion, follow-up reads and error mapping end-to-end.

use serde_json::json;
use triage_core::{
    decode, encode, Alert, Api, ApiError, ClientConfig, CreateAlert, Endpoint, IgnorableStatus,
    NodeTag, Page, QueryParams, ReqwestTransport, ResultExt, StaticToken, UpdateAlert,
};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { mock_server::run(listener).await });
    format!("http://{addr}")
}

async fn api() -> Api<ReqwestTransport> {
    let base_url = start_server().await;
    Api::from_config(&ClientConfig::new(base_url)).unwrap()
}

#[tokio::test]
async fn alert_lifecycle() {
    let api = api().await;
    let alerts = Endpoint::new("/alert/");

    // Step 1: list — should be empty.
    let page: Page<Alert> = decode(alerts.read_all(&api, &QueryParams::new()).await.unwrap()).unwrap();
    assert!(page.items.is_empty(), "expected empty list");
    assert_eq!(page.total, 0);

    // Step 2: create; the follow-up read returns the stored alert.
    let input = CreateAlert {
        name: "Suspicious login".to_string(),
        alert_type: "splunk".to_string(),
        queue: "external".to_string(),
        tags: vec!["auth".to_string()],
    };
    let created: Alert = decode(alerts.create(&api, &encode(&input).unwrap()).await.unwrap()).unwrap();
    assert_eq!(created.name, "Suspicious login");
    assert_eq!(created.alert_type, "splunk");
    assert_eq!(created.queue, "external");
    assert!(created.disposition.is_none());
    let id = created.uuid;

    // Step 3: get the created alert.
    let fetched: Alert = decode(alerts.read(&api, id).await.unwrap()).unwrap();
    assert_eq!(fetched, created);

    // Step 4: update disposition.
    let patch = UpdateAlert {
        disposition: Some("FALSE_POSITIVE".to_string()),
        ..UpdateAlert::default()
    };
    let updated: Alert = decode(alerts.update(&api, id, &encode(&patch).unwrap()).await.unwrap()).unwrap();
    assert_eq!(updated.disposition.as_deref(), Some("FALSE_POSITIVE"));
    assert_eq!(updated.tags, vec!["auth".to_string()]);

    // Step 5: list filtered with a repeated key.
    let query = QueryParams::new()
        .push("limit", 10)
        .push("disposition", vec!["DELIVERY", "FALSE_POSITIVE"]);
    let page: Page<Alert> = decode(alerts.read_all(&api, &query).await.unwrap()).unwrap();
    assert_eq!(page.total, 1);
    assert_eq!(page.limit, 10);
    assert_eq!(page.items[0].uuid, id);

    // Step 6: delete.
    alerts.remove(&api, id).await.unwrap();

    // Step 7: get after delete — 404.
    let err = alerts.read(&api, id).await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Request failed with status code 404");

    // Step 8: delete again — 404.
    let err = alerts.remove(&api, id).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
}

#[tokio::test]
async fn create_without_follow_up_returns_empty_body() {
    let api = api().await;
    let body = json!({"name": "Phish", "alertType": "manual"});

    let result = api.create("/alert/", Some(&body), false).await.unwrap();
    assert!(result.is_null());
}

#[tokio::test]
async fn duplicate_tag_is_a_caller_no_op() {
    let api = api().await;
    let tags = Endpoint::new("/node/tag/");
    let body = json!({"value": "recon"});

    let first = tags
        .create(&api, &body)
        .await
        .ignoring(&IgnorableStatus::conflict())
        .unwrap();
    let tag: NodeTag = decode(first.unwrap()).unwrap();
    assert_eq!(tag.value, "recon");

    let second = tags
        .create(&api, &body)
        .await
        .ignoring(&IgnorableStatus::conflict())
        .unwrap();
    assert!(second.is_none());

    let all: Vec<NodeTag> = decode(tags.read_all(&api, &QueryParams::new()).await.unwrap()).unwrap();
    assert_eq!(all, vec![tag]);
}

#[tokio::test]
async fn bearer_token_reaches_the_server() {
    let base_url = start_server().await;
    let config = ClientConfig::new(base_url);

    let anonymous = Api::from_config(&config).unwrap();
    let err = anonymous.read("/auth/validate", &QueryParams::new()).await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let authed = Api::from_config(&config).unwrap().with_token_source(StaticToken::new("t0ken"));
    let body = authed.read("/auth/validate", &QueryParams::new()).await.unwrap();
    assert_eq!(body, json!({"authenticated": true}));
}

#[tokio::test]
async fn connection_failure_is_a_transport_error() {
    // Bind then drop to obtain a port nothing listens on.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = Api::from_config(&ClientConfig::new(format!("http://{addr}"))).unwrap();
    let err = api.read("/alert/", &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn slow_server_times_out_as_transport_error() {
    // Accepts connections and holds them open without ever answering.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });

    let config = ClientConfig {
        timeout_secs: 1,
        ..ClientConfig::new(format!("http://{addr}"))
    };
    let api = Api::from_config(&config).unwrap();

    let started = std::time::Instant::now();
    let err = api.read("/alert/", &QueryParams::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
    assert_eq!(err.status(), None);
    assert!(started.elapsed() < std::time::Duration::from_secs(10));
}
