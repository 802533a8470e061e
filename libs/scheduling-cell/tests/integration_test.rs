use std::sync::Arc;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use tower::ServiceExt;
use serde_json::{json, Value};
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, query_param};

use scheduling_cell::router::{appointment_routes, consultation_routes};
use shared_config::AppConfig;

fn test_config(mock_server: &MockServer) -> AppConfig {
    AppConfig {
        postgrest_url: mock_server.uri(),
        postgrest_api_key: "test-api-key".to_string(),
        listen_port: 4002,
    }
}

fn appointment_app(config: &AppConfig) -> Router {
    appointment_routes(Arc::new(config.clone()))
}

fn consultation_app(config: &AppConfig) -> Router {
    consultation_routes(Arc::new(config.clone()))
}

fn appointment_row(id: i32, specialist_id: Option<i32>, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "patient_id": 1,
        "specialist_id": specialist_id,
        "treatment_id": 1,
        "origin_consultation_id": null,
        "start_time": start,
        "end_time": end,
        "agreed_price": 50.0,
        "paid": false,
        "amount_paid": 0.0,
        "notes": null,
        "status": "pending"
    })
}

fn consultation_row(id: i32, specialist_id: Option<i32>, start: &str, end: &str) -> Value {
    json!({
        "id": id,
        "patient_id": 1,
        "specialist_id": specialist_id,
        "reason": "first visit",
        "diagnosis": null,
        "recommended_treatment_id": null,
        "start_time": start,
        "end_time": end,
        "suggested_price": 30.0,
        "paid": false,
        "amount_paid": 0.0,
        "notes": null,
        "status": "pending"
    })
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn put_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_create_appointment_conflicts_with_overlapping_booking() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // Specialist 5 already has 09:00-09:30 that day
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .and(query_param("specialist_id", "eq.5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(10, Some(5), "2024-05-01T09:00:00", "2024-05-01T09:30:00")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": 1,
                "specialist_id": 5,
                "treatment_id": 1,
                "date": "2024-05-01",
                "start_time": "09:15",
                "end_time": "09:45",
                "agreed_price": 50.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_appointment_on_adjacent_slot_succeeds() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(10, Some(5), "2024-05-01T09:00:00", "2024-05-01T09:30:00")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            appointment_row(11, Some(5), "2024-05-01T09:30:00", "2024-05-01T10:00:00")
        ])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    // Starts exactly when the existing one ends
    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": 1,
                "specialist_id": 5,
                "treatment_id": 1,
                "date": "2024-05-01",
                "start_time": "09:30",
                "end_time": "10:00",
                "agreed_price": 50.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_conflict_scan_filters_out_cancelled_bookings() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // The store is asked to exclude cancelled rows; respond empty only when
    // that filter is present so a missing filter fails the test.
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .and(query_param("status", "neq.cancelled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/consultations"))
        .and(query_param("status", "neq.cancelled"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            appointment_row(12, Some(5), "2024-05-01T09:00:00", "2024-05-01T09:30:00")
        ])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": 1,
                "specialist_id": 5,
                "treatment_id": 1,
                "date": "2024-05-01",
                "start_time": "09:00",
                "end_time": "09:30",
                "agreed_price": 50.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_consultation_blocks_appointment_slot() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            consultation_row(20, Some(5), "2024-05-01T10:00:00", "2024-05-01T10:30:00")
        ])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": 1,
                "specialist_id": 5,
                "treatment_id": 1,
                "date": "2024-05-01",
                "start_time": "10:15",
                "end_time": "10:45",
                "agreed_price": 50.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_create_appointment_rejects_inverted_interval() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // No mocks: validation fails before any store access
    let app = appointment_app(&config);
    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": 1,
                "specialist_id": 5,
                "treatment_id": 1,
                "date": "2024-05-01",
                "start_time": "10:00",
                "end_time": "09:00",
                "agreed_price": 50.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unassigned_appointment_skips_availability_check() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // Only the insert is mocked; any availability lookup would 404 and
    // surface as a 500.
    Mock::given(method("POST"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            appointment_row(13, None, "2024-05-01T09:00:00", "2024-05-01T09:30:00")
        ])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": 1,
                "specialist_id": null,
                "treatment_id": 1,
                "date": "2024-05-01",
                "start_time": "09:00",
                "end_time": "09:30",
                "agreed_price": 50.0
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_notes_only_update_does_not_touch_availability() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    Mock::given(method("PATCH"))
        .and(path("/appointments"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(7, Some(5), "2024-05-01T09:00:00", "2024-05-01T09:30:00")
        ])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    let response = app
        .oneshot(put_json("/7", json!({"notes": "bring previous x-rays"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_update_with_null_specialist_clears_assignment() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // Clearing the assignment needs no availability lookup
    Mock::given(method("PATCH"))
        .and(path("/appointments"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(7, None, "2024-05-01T09:00:00", "2024-05-01T09:30:00")
        ])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    let response = app
        .oneshot(put_json("/7", json!({"specialist_id": null})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["specialist_id"].is_null());
}

#[tokio::test]
async fn test_reschedule_excludes_own_booking_from_conflict_scan() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // The store applies id=neq.7; answer empty only when it is present
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .and(query_param("id", "neq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/appointments"))
        .and(query_param("id", "eq.7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(7, Some(5), "2024-05-01T11:00:00", "2024-05-01T11:30:00")
        ])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    let response = app
        .oneshot(put_json(
            "/7",
            json!({
                "specialist_id": 5,
                "date": "2024-05-01",
                "start_time": "11:00",
                "end_time": "11:30"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_availability_endpoint_reports_free_and_busy() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(10, Some(5), "2024-05-01T09:00:00", "2024-05-01T09:30:00")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let busy = appointment_app(&config)
        .oneshot(
            Request::builder()
                .uri("/availability/check?specialist_id=5&start=2024-05-01T09:15:00&end=2024-05-01T09:45:00")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(busy.status(), StatusCode::OK);
    assert_eq!(body_json(busy).await, json!({"available": false}));

    let free = appointment_app(&config)
        .oneshot(
            Request::builder()
                .uri("/availability/check?specialist_id=5&start=2024-05-01T11:00:00&end=2024-05-01T11:30:00")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(free.status(), StatusCode::OK);
    assert_eq!(body_json(free).await, json!({"available": true}));
}

#[tokio::test]
async fn test_availability_check_is_repeatable_and_writes_nothing() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // Only reads are mocked; any insert or update would 404 and surface
    // as a 500.
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(10, Some(5), "2024-05-01T09:00:00", "2024-05-01T09:30:00")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let uri =
        "/availability/check?specialist_id=5&start=2024-05-01T09:15:00&end=2024-05-01T09:45:00";
    let mut bodies = Vec::new();
    for _ in 0..2 {
        let response = appointment_app(&config)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        bodies.push(body_json(response).await);
    }

    assert_eq!(bodies[0], bodies[1]);
    assert_eq!(bodies[0], json!({"available": false}));
}

#[tokio::test]
async fn test_unfiltered_list_sends_a_clean_query_string() {
    struct ExactQuery(&'static str);

    impl wiremock::Match for ExactQuery {
        fn matches(&self, request: &wiremock::Request) -> bool {
            request.url.query() == Some(self.0)
        }
    }

    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // No filters: the ordering clause must be the whole query, with no
    // stray separator in front of it.
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .and(ExactQuery("order=start_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let response = appointment_app(&config)
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_missing_appointment_returns_not_found() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // Nothing matched the filter: representation comes back empty
    Mock::given(method("DELETE"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    let response = app
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/99")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_consultation_checks_both_tables() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    // An appointment occupies the slot, so the consultation is rejected
    Mock::given(method("GET"))
        .and(path("/appointments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(10, Some(3), "2024-05-02T16:00:00", "2024-05-02T16:30:00")
        ])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/consultations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let app = consultation_app(&config);
    let response = app
        .oneshot(post_json(
            "/",
            json!({
                "patient_id": 2,
                "specialist_id": 3,
                "reason": "heel pain",
                "date": "2024-05-02",
                "start_time": "16:00",
                "end_time": "16:30"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_list_appointments_by_day() {
    let mock_server = MockServer::start().await;
    let config = test_config(&mock_server);

    Mock::given(method("GET"))
        .and(path("/appointments"))
        .and(query_param("order", "start_time.asc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            appointment_row(1, Some(5), "2024-05-01T09:00:00", "2024-05-01T09:30:00"),
            appointment_row(2, None, "2024-05-01T12:00:00", "2024-05-01T12:30:00")
        ])))
        .mount(&mock_server)
        .await;

    let app = appointment_app(&config);
    let response = app
        .oneshot(
            Request::builder()
                .uri("/?date=2024-05-01")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}
