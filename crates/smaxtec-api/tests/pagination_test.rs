#![allow(clippy::unwrap_used)]
// Offset pagination tests using wiremock.

use serde_json::{Value, json};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use smaxtec_api::{ClientConfig, Error, Params, PublicApi, RequestOptions};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, PublicApi) {
    let server = MockServer::start().await;
    let api = PublicApi::new(
        ClientConfig::new()
            .with_endpoint(format!("{}/api/v1", server.uri()))
            .with_api_key("key"),
    )
    .unwrap();
    (server, api)
}

fn page(offset: u64, count: u64) -> Value {
    let data: Vec<Value> = (offset..offset + count).map(|i| json!({"n": i})).collect();
    json!({"data": data, "pagination": {"next_offset": offset + count}})
}

async fn mount_page(server: &MockServer, endpoint: &str, offset: u64, count: u64) {
    Mock::given(method("GET"))
        .and(path(endpoint))
        .and(query_param("offset", offset.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(offset, count)))
        .expect(1)
        .mount(server)
        .await;
}

// ── Tests ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_short_page_stops() {
    let (server, api) = setup().await;
    mount_page(&server, "/api/v1/event/query", 0, 100).await;
    mount_page(&server, "/api/v1/event/query", 100, 100).await;
    mount_page(&server, "/api/v1/event/query", 200, 37).await;

    let events = api.animal_events("a1", None, None, 100, 0).await.unwrap();

    assert_eq!(events.len(), 237);
    assert_eq!(events[0], json!({"n": 0}));
    assert_eq!(events[236], json!({"n": 236}));
    assert_eq!(api.client().total_requests(), 3);
}

#[tokio::test]
async fn test_full_last_page_triggers_one_more_fetch() {
    let (server, api) = setup().await;
    for offset in [0, 100, 200] {
        mount_page(&server, "/api/v1/event/query", offset, 100).await;
    }
    mount_page(&server, "/api/v1/event/query", 300, 0).await;

    let events = api.device_events("d1", Some(10), Some(20)).await.unwrap();

    assert_eq!(events.len(), 300);
    assert_eq!(api.client().total_requests(), 4);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap();
    assert_eq!(
        query,
        "device_id=d1&limit=100&offset=0&from_date=10&to_date=20"
    );
}

#[tokio::test]
async fn test_full_page_without_next_offset() {
    let (server, api) = setup().await;
    let data: Vec<Value> = (0..100).map(|i| json!(i)).collect();
    Mock::given(method("GET"))
        .and(path("/api/v1/annotation/query"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": data})))
        .expect(1)
        .mount(&server)
        .await;

    let result = api.animal_annotations("a1", 0, 10).await;
    assert!(
        matches!(result, Err(Error::Deserialization { .. })),
        "got: {result:?}"
    );
}

#[tokio::test]
async fn test_missing_limit_is_rejected() {
    let (server, api) = setup().await;

    let result = api
        .client()
        .get_paginated(
            "/event/query",
            RequestOptions::new().query(Params::new().with("offset", 0)),
        )
        .await;
    assert!(matches!(result, Err(Error::InvalidArgument(_))));

    let zero = api
        .client()
        .get_paginated(
            "/event/query",
            RequestOptions::new().query(Params::new().with("limit", 0).with("offset", 0)),
        )
        .await;
    assert!(matches!(zero, Err(Error::InvalidArgument(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_organisation_events_send_categories() {
    let (server, api) = setup().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/event/by_organisation"))
        .and(query_param("categories", "heat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, 3)))
        .expect(1)
        .mount(&server)
        .await;

    let events = api
        .organisation_events("org1", 0, 86_400, Some(&["heat", "health"]))
        .await
        .unwrap();
    assert_eq!(events.len(), 3);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap();
    assert!(query.ends_with("categories=heat&categories=health"), "{query}");
}
