// Integration tests for `ElementClient` accessors and the paginated fetch
// engine, using wiremock.

use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use wiremock::matchers::{method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

use element_api::{ElementClient, Error, PacketType, PacketsQuery, ReadingsQuery};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, ElementClient) {
    let server = MockServer::start().await;
    let client = ElementClient::new(&server.uri(), "123456789ABCDEFG").unwrap();
    (server, client)
}

fn reading(device_id: u64, measured_at: &str) -> Value {
    json!({
        "measured_at": measured_at,
        "inserted_at": measured_at,
        "data": {
            "device_id": device_id,
            "air_temperature": 37.2,
            "battery_voltage": 3.095,
        },
    })
}

async fn requests_to(server: &MockServer, route: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == route)
        .count()
}

// ── Pagination ──────────────────────────────────────────────────────

#[tokio::test]
async fn folders_merge_all_pages_in_order() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .and(query_param("auth", "123456789ABCDEFG"))
        .and(query_param_is_missing("retrieve_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [
                { "slug": "dew21-service-button-lager" },
                { "slug": "stadt-dortmund-erlebnisroute-lager" },
            ],
            "retrieve_after_id": "0a2eacc2-eb3c-4b44-a9c8-cff9411747ac",
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .and(query_param("retrieve_after", "0a2eacc2-eb3c-4b44-a9c8-cff9411747ac"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [{ "slug": "stadt-dortmund-klimasensoren-aktiv-sht35" }],
        })))
        .mount(&server)
        .await;

    let slugs = client.folder_slugs().await.unwrap();

    assert_eq!(
        slugs,
        vec![
            "dew21-service-button-lager",
            "stadt-dortmund-erlebnisroute-lager",
            "stadt-dortmund-klimasensoren-aktiv-sht35",
        ],
    );
    assert_eq!(requests_to(&server, "/tags").await, 2);
}

#[tokio::test]
async fn max_pages_caps_cursor_following() {
    let (server, client) = setup().await;
    let route = "/devices/by-name/DEC0054A6/readings";

    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param_is_missing("retrieve_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [reading(21670, "2024-08-13T13:06:03Z")],
            "retrieve_after_id": "page-2",
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("retrieve_after", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [reading(21670, "2024-08-13T13:11:04Z")],
            "retrieve_after_id": "page-3",
        })))
        .mount(&server)
        .await;

    // page 3 exists but must never be requested with max_pages = 2
    Mock::given(method("GET"))
        .and(path(route))
        .and(query_param("retrieve_after", "page-3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [reading(21670, "2024-08-13T13:16:04Z")],
        })))
        .expect(0)
        .mount(&server)
        .await;

    let query = ReadingsQuery {
        max_pages: Some(2),
        ..ReadingsQuery::default()
    };
    let readings = client.readings("DEC0054A6", &query).await.unwrap();

    assert_eq!(readings.len(), 2);
    assert_eq!(requests_to(&server, route).await, 2);
}

#[tokio::test]
async fn max_pages_one_never_follows_a_cursor() {
    let (server, client) = setup().await;
    let route = "/devices/by-name/DEC0054A6/readings";

    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [reading(21670, "2024-08-13T13:06:03Z")],
            "retrieve_after_id": "page-2",
        })))
        .mount(&server)
        .await;

    let query = ReadingsQuery {
        max_pages: Some(1),
        ..ReadingsQuery::default()
    };
    let readings = client.readings("DEC0054A6", &query).await.unwrap();

    assert_eq!(readings.len(), 1);
    assert_eq!(requests_to(&server, route).await, 1);
}

#[tokio::test]
async fn cursor_on_scalar_body_is_a_shape_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/dec0054b0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": { "name": "DEC0054B0" },
            "retrieve_after_id": "sth",
        })))
        .mount(&server)
        .await;

    let result = client.device("DEC0054B0").await;

    assert!(
        matches!(result, Err(Error::ScalarPagination)),
        "expected ScalarPagination, got: {result:?}"
    );
    // the error fires before any continuation request goes out
    assert_eq!(requests_to(&server, "/devices/dec0054b0").await, 1);
}

#[tokio::test]
async fn transport_error_mid_pagination_aborts_the_fetch() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .and(query_param_is_missing("retrieve_after"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [{ "slug": "folder-a" }],
            "retrieve_after_id": "page-2",
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/tags"))
        .and(query_param("retrieve_after", "page-2"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = client.folders().await;

    assert!(
        matches!(result, Err(Error::Transport(_))),
        "expected Transport, got: {result:?}"
    );
    assert_eq!(requests_to(&server, "/tags").await, 2);
}

// ── Devices ─────────────────────────────────────────────────────────

#[tokio::test]
async fn device_fetch_lowercases_the_address() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/dec0054b0"))
        .and(query_param("auth", "123456789ABCDEFG"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": {
                "name": "DEC0054B0",
                "fields": { "gerateinformation": { "seriennummer": "21680" } },
            },
        })))
        .mount(&server)
        .await;

    let device = client.device("DEC0054B0").await.unwrap();

    assert_eq!(device.name, "DEC0054B0");
    assert_eq!(device.decentlab_id().unwrap(), 21680);
}

#[tokio::test]
async fn device_addresses_projects_names() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tags/stadt-dortmund-klimasensoren-aktiv-sht35/devices"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [{ "name": "DEC0054A6" }, { "name": "DEC0054B0" }],
        })))
        .mount(&server)
        .await;

    let addresses = client
        .device_addresses("stadt-dortmund-klimasensoren-aktiv-sht35")
        .await
        .unwrap();

    assert_eq!(addresses, vec!["DEC0054A6", "DEC0054B0"]);
}

#[tokio::test]
async fn missing_device_is_a_not_found_transport_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/deadbeef"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = client.device("DEADBEEF").await.unwrap_err();
    assert!(err.is_not_found(), "got: {err:?}");
}

// ── Readings ────────────────────────────────────────────────────────

#[tokio::test]
async fn readings_translate_query_parameters() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/by-name/DEC0054A6/readings"))
        .and(query_param("sort", "measured_at"))
        .and(query_param("sort_direction", "asc"))
        .and(query_param("limit", "100"))
        .and(query_param("after", "2024-08-13T13:05:00Z"))
        .and(query_param("before", "2024-08-13T13:15:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [
                reading(21670, "2024-08-13T13:06:03.622052Z"),
                reading(21670, "2024-08-13T13:11:04.070758Z"),
            ],
        })))
        .mount(&server)
        .await;

    let query = ReadingsQuery {
        start: Some(Utc.with_ymd_and_hms(2024, 8, 13, 13, 5, 0).unwrap()),
        end: Some(Utc.with_ymd_and_hms(2024, 8, 13, 13, 15, 0).unwrap()),
        ..ReadingsQuery::default()
    };
    let readings = client.readings("DEC0054A6", &query).await.unwrap();

    assert_eq!(readings.len(), 2);
    assert_eq!(readings[0].decentlab_id().unwrap(), 21670);
    assert!(readings[0].measured_at < readings[1].measured_at);
}

#[tokio::test]
async fn readings_reject_out_of_range_limit() {
    let (server, client) = setup().await;

    for limit in [0, 101] {
        let query = ReadingsQuery {
            limit,
            ..ReadingsQuery::default()
        };
        let err = client.readings("DEC0054A6", &query).await.unwrap_err();
        assert!(
            matches!(err, Error::InvalidLimit { limit: l } if l == limit),
            "got: {err:?}"
        );
    }
    // rejected client-side, nothing hits the wire
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn readings_frame_projects_data_rows() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/by-name/DEC0054A6/readings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [
                reading(21670, "2024-08-13T13:06:03.622052Z"),
                reading(21670, "2024-08-13T13:11:04.070758Z"),
            ],
        })))
        .mount(&server)
        .await;

    let frame = client
        .readings_frame("DEC0054A6", &ReadingsQuery::default())
        .await
        .unwrap();

    assert_eq!(frame.len(), 2);
    assert_eq!(frame.index().len(), 2);
    assert_eq!(frame.column("device_id"), vec![
        Some(&json!(21670)),
        Some(&json!(21670)),
    ]);
    assert_eq!(frame.column("air_temperature")[0], Some(&json!(37.2)));
}

#[tokio::test]
async fn readings_frame_empty_device_is_not_an_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/by-name/DEC0054A6/readings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "body": [] })))
        .mount(&server)
        .await;

    let frame = client
        .readings_frame("DEC0054A6", &ReadingsQuery::default())
        .await
        .unwrap();

    assert!(frame.is_empty());
    assert!(frame.columns().is_empty());
}

// ── Packets ─────────────────────────────────────────────────────────

#[tokio::test]
async fn packets_by_device_filters_by_type() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/devices/by-name/DEC0054A6/packets"))
        .and(query_param("limit", "100"))
        .and(query_param("packet_type", "up"))
        .and(query_param("after", "2024-08-13T13:05:00Z"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [
                {
                    "transceived_at": "2024-08-13T13:06:03.622052Z",
                    "packet_type": "up",
                    "payload": "0208591500b96400",
                },
            ],
        })))
        .mount(&server)
        .await;

    let query = PacketsQuery {
        packet_type: Some(PacketType::Up),
        start: Some(Utc.with_ymd_and_hms(2024, 8, 13, 13, 5, 0).unwrap()),
        ..PacketsQuery::default()
    };
    let packets = client.packets_by_device("DEC0054A6", &query).await.unwrap();

    assert_eq!(packets.len(), 1);
    assert_eq!(packets[0].packet_type, PacketType::Up);
    assert_eq!(packets[0].payload.as_deref(), Some("0208591500b96400"));
}

#[tokio::test]
async fn packets_by_folder_uses_the_tags_route() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/tags/stadt-dortmund-klimasensoren-aktiv-sht35/packets"))
        .and(query_param("limit", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "body": [
                { "transceived_at": "2024-08-13T13:06:03Z", "packet_type": "up" },
                { "transceived_at": "2024-08-13T13:07:12Z", "packet_type": "down" },
            ],
        })))
        .mount(&server)
        .await;

    let packets = client
        .packets_by_folder(
            "stadt-dortmund-klimasensoren-aktiv-sht35",
            &PacketsQuery::default(),
        )
        .await
        .unwrap();

    assert_eq!(packets.len(), 2);
    assert_eq!(packets[1].packet_type, PacketType::Down);
}
