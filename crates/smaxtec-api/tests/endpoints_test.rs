#![allow(clippy::unwrap_used)]
// Endpoint surface tests: paths, parameters, bodies, and shortcuts.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{Map, Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use smaxtec_api::intern::{AccountInfo, DeviceInclude, NewEvent, SensorDataSeries};
use smaxtec_api::public::AnnotationUpdate;
use smaxtec_api::{ClientConfig, Error, InternApi, PrivateApiV2, PublicApi};

// ── Helpers ─────────────────────────────────────────────────────────

fn public_with_key(server: &MockServer) -> PublicApi {
    PublicApi::new(
        ClientConfig::new()
            .with_endpoint(format!("{}/api/v1", server.uri()))
            .with_api_key("key"),
    )
    .unwrap()
}

fn intern(server: &MockServer) -> InternApi {
    InternApi::new(
        ClientConfig::new()
            .with_endpoint(format!("{}/api/v0", server.uri()))
            .with_api_key("key"),
    )
    .unwrap()
}

async fn body_of(server: &MockServer, index: usize) -> Value {
    let requests = server.received_requests().await.unwrap();
    serde_json::from_slice(&requests[index].body).unwrap()
}

// ── Public v1: shortcuts ────────────────────────────────────────────

#[tokio::test]
async fn test_api_key_user_and_organisations_skip_requests() {
    let server = MockServer::start().await;
    let api = public_with_key(&server);

    assert_eq!(api.user().await.unwrap(), json!({"type": "apikey"}));
    assert_eq!(api.organisations().await.unwrap(), json!([]));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_credential_user_is_tagged_email() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user/get_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "t"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/user"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "Farmer"})))
        .expect(1)
        .mount(&server)
        .await;

    let api = PublicApi::new(
        ClientConfig::new()
            .with_endpoint(format!("{}/api/v1", server.uri()))
            .with_credentials("farmer@example.com", "pw"),
    )
    .unwrap();

    assert_eq!(
        api.user().await.unwrap(),
        json!({"name": "Farmer", "type": "email"})
    );
}

#[tokio::test]
async fn test_download_link_makes_no_request() {
    let server = MockServer::start().await;
    let api = public_with_key(&server);

    assert_eq!(
        api.download_link("f1"),
        format!("{}/api/v1/user/files/f1/download", server.uri())
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

// ── Public v1: organisations ────────────────────────────────────────

#[tokio::test]
async fn test_organisation_animal_ids() {
    let server = MockServer::start().await;
    let api = public_with_key(&server);

    Mock::given(method("GET"))
        .and(path("/api/v1/animal/ids_by_organisation"))
        .and(query_param("organisation_id", "org1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([{"_id": "a1", "name": "Berta"}, {"_id": "a2"}])),
        )
        .mount(&server)
        .await;

    let ids = api.organisation_animal_ids("org1").await.unwrap();
    assert_eq!(ids, vec!["a1".to_string(), "a2".to_string()]);
}

#[tokio::test]
async fn test_timezone_is_memoized() {
    let server = MockServer::start().await;
    let api = public_with_key(&server);

    Mock::given(method("GET"))
        .and(path("/api/v1/organisation/by_id"))
        .and(query_param("organisation_id", "org-tz"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"timezone": "Europe/Vienna"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/organisation/by_id"))
        .and(query_param("organisation_id", "org-none"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "no tz"})))
        .expect(1)
        .mount(&server)
        .await;

    for _ in 0..3 {
        assert_eq!(
            api.timezone_for_organisation("org-tz").await.unwrap().as_deref(),
            Some("Europe/Vienna")
        );
        assert_eq!(api.timezone_for_organisation("org-none").await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_timezone_cache_is_per_client() {
    let server = MockServer::start().await;
    let client_with = |key: &str| {
        PublicApi::new(
            ClientConfig::new()
                .with_endpoint(format!("{}/api/v1", server.uri()))
                .with_api_key(key),
        )
        .unwrap()
    };
    let owner = client_with("owner");
    let stranger = client_with("stranger");
    assert_ne!(owner.client().id(), stranger.client().id());

    Mock::given(method("GET"))
        .and(path("/api/v1/organisation/by_id"))
        .and(header("Authorization", "Bearer owner"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"timezone": "Europe/Vienna"})),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/organisation/by_id"))
        .and(header("Authorization", "Bearer stranger"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "forbidden"})))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(
        owner.timezone_for_organisation("org-shared").await.unwrap().as_deref(),
        Some("Europe/Vienna")
    );
    let result = stranger.timezone_for_organisation("org-shared").await;
    assert!(
        matches!(&result, Err(Error::Client { status: 403, .. })),
        "got: {result:?}"
    );
}

// ── Public v1: sensor data ──────────────────────────────────────────

#[tokio::test]
async fn test_sensordata_is_fetched_in_chunks() {
    let server = MockServer::start().await;
    let api = public_with_key(&server);
    let hundred_days = 100 * 86_400;
    let end = 150 * 86_400;

    Mock::given(method("GET"))
        .and(path("/api/v1/data/query"))
        .and(query_param("from_date", "0"))
        .and(query_param("to_date", hundred_days.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [[0, 38.1], [1, 38.2]]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/data/query"))
        .and(query_param("from_date", hundred_days.to_string().as_str()))
        .and(query_param("to_date", end.to_string().as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"data": [[2, 38.3]]})))
        .expect(1)
        .mount(&server)
        .await;

    let data = api
        .animal_sensordata("a1", "temp", 0, end)
        .await
        .unwrap();
    assert_eq!(data, vec![json!([0, 38.1]), json!([1, 38.2]), json!([2, 38.3])]);

    let requests = server.received_requests().await.unwrap();
    assert!(
        requests[0]
            .url
            .query()
            .unwrap()
            .starts_with("animal_id=a1&metric=temp")
    );
}

// ── Public v1: annotations ──────────────────────────────────────────

#[tokio::test]
async fn test_update_annotation_sends_only_set_fields() {
    let server = MockServer::start().await;
    let api = public_with_key(&server);

    Mock::given(method("POST"))
        .and(path("/api/v1/annotation/id"))
        .and(body_json(json!({"annotation_id": "an1", "end_ts": 500})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    let update = AnnotationUpdate {
        end_ts: Some(500),
        ..AnnotationUpdate::default()
    };
    api.update_annotation("an1", update).await.unwrap();
}

#[tokio::test]
async fn test_insert_animal_annotation() {
    let server = MockServer::start().await;
    let api = public_with_key(&server);

    Mock::given(method("PUT"))
        .and(path("/api/v1/annotation/animal"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "an1"})))
        .expect(1)
        .mount(&server)
        .await;

    api.insert_animal_annotation("a1", 10, 20, Some(json!(["heat"])), None)
        .await
        .unwrap();
    assert_eq!(
        body_of(&server, 0).await,
        json!({"animal_id": "a1", "ts": 10, "end_ts": 20, "classes": ["heat"]})
    );
}

// ── Private v2 ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_private_events_send_boolean_flag() {
    let server = MockServer::start().await;
    let api = PrivateApiV2::new(
        ClientConfig::new()
            .with_endpoint(format!("{}/api/v2", server.uri()))
            .with_api_key("key"),
    )
    .unwrap();

    Mock::given(method("GET"))
        .and(path("/api/v2/data/animals/a1/events"))
        .and(query_param("deleted_events", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    api.events_by_animal("a1", false).await.unwrap();
}

// ── Intern ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_healthy_maps_status() {
    let server = MockServer::start().await;
    let api = intern(&server);

    Mock::given(method("GET"))
        .and(path("/api/v0/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "ok"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v0/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    assert!(api.healthy().await);
    assert!(!api.healthy().await);
}

#[tokio::test]
async fn test_insert_sensor_data_returns_first_result() {
    let server = MockServer::start().await;
    let api = intern(&server);

    Mock::given(method("PUT"))
        .and(path("/api/v0/sensordatabulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"inserted": 2}])))
        .expect(1)
        .mount(&server)
        .await;

    let series =
        SensorDataSeries::for_device("dev1", "temp", [(1_000, 38.5), (1_600, 38.7)]).unwrap();
    let result = api.insert_sensor_data(series).await.unwrap();

    assert_eq!(result, json!({"inserted": 2}));
    assert_eq!(
        body_of(&server, 0).await,
        json!({"sensordata": [{
            "device_id": "dev1",
            "metric": "temp",
            "data": [[1_000, 38.5], [1_600, 38.7]],
        }]})
    );
}

#[tokio::test]
async fn test_sensor_data_bulk_repeats_metrics() {
    let server = MockServer::start().await;
    let api = intern(&server);

    Mock::given(method("GET"))
        .and(path("/api/v0/sensordatabulk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"metric": "temp"}])))
        .expect(1)
        .mount(&server)
        .await;

    let first = api.sensor_data("dev1", "temp", 0, 10).await.unwrap();
    assert_eq!(first, json!({"metric": "temp"}));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("device_id=dev1&metrics=temp&from_date=0&to_date=10")
    );
}

#[tokio::test]
async fn test_insert_event_folds_value_into_metadata() {
    let server = MockServer::start().await;
    let api = intern(&server);

    Mock::given(method("PUT"))
        .and(path("/api/v0/event"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "e1"})))
        .expect(1)
        .mount(&server)
        .await;

    let mut metadata = Map::new();
    metadata.insert("source".into(), json!("test"));
    let event = NewEvent {
        metadata,
        disable_notifications: true,
        ..NewEvent::new("dev1", "heat", 1_700_000_000, 3)
    };
    api.insert_event(event).await.unwrap();

    assert_eq!(
        body_of(&server, 0).await,
        json!({
            "device_id": "dev1",
            "metadata": {"source": "test", "value": 3},
            "event_type": "heat",
            "level": 10,
            "timestamp": 1_700_000_000,
            "disable_hooks": 1,
        })
    );
}

#[tokio::test]
async fn test_device_lookup_flags() {
    let server = MockServer::start().await;
    let api = intern(&server);

    Mock::given(method("GET"))
        .and(path("/api/v0/device"))
        .and(query_param("with_animal", "1"))
        .and(query_param("with_organisation", "0"))
        .and(query_param("with_allmeta", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "dev1"})))
        .expect(1)
        .mount(&server)
        .await;

    let include = DeviceInclude {
        organisation: false,
        ..DeviceInclude::default()
    };
    api.device("dev1", include).await.unwrap();
}

#[tokio::test]
async fn test_v1_writes_use_rewritten_path() {
    let server = MockServer::start().await;
    let api = intern(&server);

    Mock::given(method("PUT"))
        .and(path("/api/v1/devices/dev1/defect"))
        .and(body_json(json!({
            "defect_date": "2024-03-01T12:00:00+00:00",
            "defect_info": "battery",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/v1/account/acc1/internal_information"))
        .and(body_json(json!({"account_nr": "42", "billing_emails": ["b@x.y"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;

    let date = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    api.set_device_defect("dev1", date, "battery").await.unwrap();

    let info = AccountInfo {
        account_nr: Some("42".into()),
        billing_emails: Some(vec!["b@x.y".into()]),
        ..AccountInfo::default()
    };
    api.update_account_infos("acc1", info).await.unwrap();
}

#[tokio::test]
async fn test_query_users_paginates_on_v1() {
    let server = MockServer::start().await;
    let api = intern(&server);

    Mock::given(method("GET"))
        .and(path("/api/v1/user/list"))
        .and(query_param("email_search_string", "farm"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": [{"_id": "u1"}], "pagination": {"next_offset": 1}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let users = api.query_users(Some("farm")).await.unwrap();
    assert_eq!(users, vec![json!({"_id": "u1"})]);
}
