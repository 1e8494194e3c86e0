//! Verify case conversion, query building and response parsing against JSON
//! test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses
//! and expected parse results. Comparing parsed JSON (not raw strings) avoids
//! false negatives from formatting differences.

use serde_json::Value;
use triage_core::{keys_to_camel, keys_to_snake, HttpMethod, HttpResponse, QueryParams, ResourceClient};

const BASE_URL: &str = "http://localhost:8888/api";

fn client() -> ResourceClient {
    ResourceClient::new(BASE_URL)
}

fn simulated(sim: &Value) -> HttpResponse {
    let headers = sim["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect();
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers,
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

// ---------------------------------------------------------------------------
// Case conversion
// ---------------------------------------------------------------------------

#[test]
fn case_test_vectors() {
    let raw = include_str!("../../test-vectors/case.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let camel = &case["camel"];
        let snake = &case["snake"];

        assert_eq!(&keys_to_snake(camel.clone()), snake, "{name}: to snake");
        assert_eq!(&keys_to_camel(snake.clone()), camel, "{name}: to camel");
        assert_eq!(&keys_to_camel(camel.clone()), camel, "{name}: camel idempotent");
        assert_eq!(&keys_to_snake(snake.clone()), snake, "{name}: snake idempotent");
    }
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

#[test]
fn query_test_vectors() {
    let raw = include_str!("../../test-vectors/query.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let params = QueryParams::from_value(&case["params"]).unwrap();

        let req = c.build_read(case["path"].as_str().unwrap(), &params);
        assert_eq!(req.method, HttpMethod::Get, "{name}: method");
        assert_eq!(
            req.url,
            format!("{BASE_URL}{}", case["expected_url"].as_str().unwrap()),
            "{name}: url"
        );
        assert!(req.body.is_none(), "{name}: body should be None");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let c = client();
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = simulated(&case["simulated_response"]);

        let follow_up = c.build_follow_up(&response).unwrap();
        match case.get("expected_follow_up").and_then(Value::as_str) {
            Some(path) => {
                let req = follow_up.unwrap_or_else(|| panic!("{name}: expected a follow-up read"));
                assert_eq!(req.method, HttpMethod::Get, "{name}: follow-up method");
                let expected = if path.starts_with("http") {
                    path.to_string()
                } else {
                    format!("{BASE_URL}{path}")
                };
                assert_eq!(req.url, expected, "{name}: follow-up url");
            }
            None => assert!(follow_up.is_none(), "{name}: unexpected follow-up"),
        }

        let result = c.parse_response(response);
        if let Some(expected_error) = case.get("expected_error") {
            let err = result.unwrap_err();
            assert_eq!(err.to_string(), expected_error.as_str().unwrap(), "{name}: error");
        } else {
            assert_eq!(result.unwrap(), case["expected_result"], "{name}: parsed result");
        }
    }
}
