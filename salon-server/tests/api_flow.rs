use axum::Router;
use axum::body::Body;
use chrono::{TimeZone, Utc};
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::Arc;
use tower::ServiceExt;

use salon_server::{Config, DbService, ErrorBody, FixedClock, ServerState, build_router};

const ADMIN_EMAIL: &str = "owner@salon.test";
const ADMIN_PASSWORD: &str = "correct horse battery";

/// Router over an in-memory database, clock pinned to 2024-03-01 10:00 in Kuala Lumpur
async fn test_app() -> Router {
    let secret = "test-secret-with-at-least-32-characters!";
    let vars = HashMap::from([
        ("ADMIN_EMAIL", ADMIN_EMAIL),
        ("ADMIN_PASSWORD", ADMIN_PASSWORD),
        ("JWT_SECRET", secret),
        ("TIMEZONE", "Asia/Kuala_Lumpur"),
    ]);
    let config = Config::from_map(&vars).unwrap();
    let db = DbService::in_memory().await.unwrap();
    let clock = FixedClock(Utc.with_ymd_and_hms(2024, 3, 1, 2, 0, 0).unwrap());

    let state = ServerState::with_parts(config, db, Arc::new(clock)).unwrap();
    build_router(state)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, http::HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

async fn send_json(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, bytes) = send(app, method, uri, token, body).await;
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn login(app: &Router) -> String {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": ADMIN_PASSWORD })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["token"].as_str().unwrap().to_string()
}

async fn create_service(app: &Router, token: &str, name: &str, price: f64, duration: i64) -> i64 {
    let (status, body) = send_json(
        app,
        Method::POST,
        "/api/services",
        Some(token),
        Some(json!({ "name": name, "price": price, "duration": duration })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_health_is_public() {
    let app = test_app().await;
    let (status, body) = send_json(&app, Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "ok");
}

#[tokio::test]
async fn test_api_requires_token() {
    let app = test_app().await;

    let (status, body) = send_json(&app, Method::GET, "/api/services", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let error: ErrorBody = serde_json::from_value(body).unwrap();
    assert_eq!(error.code, 1001);
    assert!(!error.message.is_empty());

    let (status, body) =
        send_json(&app, Method::GET, "/api/sales", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1004);
}

#[tokio::test]
async fn test_login_rejects_wrong_password() {
    let app = test_app().await;
    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "email": ADMIN_EMAIL, "password": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1002);
}

#[tokio::test]
async fn test_login_me_logout() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, body) = send_json(&app, Method::GET, "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], ADMIN_EMAIL);
    assert_eq!(body["role"], "admin");

    let (status, _) = send_json(&app, Method::POST, "/api/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_catalog_validation_and_uniqueness() {
    let app = test_app().await;
    let token = login(&app).await;
    create_service(&app, &token, "Haircut", 30.0, 30).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/services",
        Some(&token),
        Some(json!({ "name": "haircut", "price": 25.0, "duration": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 6002);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/services",
        Some(&token),
        Some(json!({ "name": "Scalp Massage", "price": -1.0, "duration": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6003);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/services",
        Some(&token),
        Some(json!({ "name": "Scalp Massage", "price": 10.0, "duration": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 6004);

    let (status, body) =
        send_json(&app, Method::DELETE, "/api/services/42", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_booking_requires_services() {
    let app = test_app().await;
    let token = login(&app).await;

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/appointments",
        Some(&token),
        Some(json!({
            "customer_name": "Aina",
            "date": "2024-03-05",
            "time": "10:00",
            "service_ids": []
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 4002);

    let (status, body) = send_json(
        &app,
        Method::POST,
        "/api/appointments",
        Some(&token),
        Some(json!({
            "customer_name": "Aina",
            "date": "2024-03-05",
            "time": "10:00",
            "service_ids": [123]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 6001);
}

#[tokio::test]
async fn test_booking_to_revenue_flow() {
    let app = test_app().await;
    let token = login(&app).await;
    let token = Some(token.as_str());

    let haircut = create_service(&app, token.unwrap(), "Haircut", 30.0, 30).await;
    let manicure = create_service(&app, token.unwrap(), "Manicure", 45.0, 45).await;

    // book: totals derived from snapshots
    let (status, appt) = send_json(
        &app,
        Method::POST,
        "/api/appointments",
        token,
        Some(json!({
            "customer_name": "Aina",
            "phone": "012-3456789",
            "staff": "Mei",
            "date": "2024-03-05",
            "time": "14:30",
            "service_ids": [haircut, manicure]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{appt}");
    assert_eq!(appt["total_price"], 75.0);
    assert_eq!(appt["total_duration"], 75);
    let appt_id = appt["id"].as_i64().unwrap();

    // catalog edit does not reach the booked snapshot
    let (status, _) = send_json(
        &app,
        Method::PUT,
        &format!("/api/services/{haircut}"),
        token,
        Some(json!({ "price": 35.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, list) =
        send_json(&app, Method::GET, "/api/appointments?date=2024-03-05", token, None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["total_price"], 75.0);

    // complete without a date: sale dated "today" per the pinned clock
    let (status, sale) = send_json(
        &app,
        Method::POST,
        &format!("/api/appointments/{appt_id}/complete"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{sale}");
    assert_eq!(sale["amount"], 75.0);
    assert_eq!(sale["service"], "Haircut, Manicure");
    assert_eq!(sale["date"], "2024-03-01");
    assert_eq!(sale["staff"], "Mei");
    assert_eq!(sale["appointment_id"], appt_id);

    let (status, body) = send_json(
        &app,
        Method::GET,
        &format!("/api/appointments/{appt_id}"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    let (status, body) = send_json(
        &app,
        Method::POST,
        &format!("/api/appointments/{appt_id}/complete"),
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["details"]["appointment_id"], appt_id);

    let (status, body) = send_json(&app, Method::POST, "/api/appointments/42/complete", token, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 4001);

    // manual sale earlier in February
    let (status, _) = send_json(
        &app,
        Method::POST,
        "/api/sales",
        token,
        Some(json!({
            "customer_name": "Walk-in",
            "service": "Pedicure",
            "amount": 20.0,
            "date": "2024-02-15"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, sales) = send_json(&app, Method::GET, "/api/sales", token, None).await;
    let sales = sales.as_array().unwrap();
    assert_eq!(sales.len(), 2);
    assert_eq!(sales[0]["date"], "2024-03-01");

    // dashboard
    let (status, dash) =
        send_json(&app, Method::GET, "/api/statistics/dashboard", token, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(dash["date"], "2024-03-01");
    assert_eq!(dash["revenue"]["daily"], 75.0);
    assert_eq!(dash["revenue"]["weekly"], 75.0);
    assert_eq!(dash["revenue"]["monthly"], 75.0);
    assert_eq!(dash["total_revenue"], 95.0);
    assert_eq!(dash["sales_count"], 2);

    // analytics
    let (status, analytics) = send_json(
        &app,
        Method::GET,
        "/api/statistics/analytics?days=3&top=5",
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(analytics["revenue_by_service"][0]["name"], "Haircut, Manicure");
    assert_eq!(analytics["revenue_by_service"][0]["value"], 75.0);
    assert_eq!(analytics["revenue_by_service"][0]["color"], "#3B82F6");
    assert_eq!(analytics["revenue_by_service"][1]["name"], "Pedicure");
    let trend = analytics["daily_trend"].as_array().unwrap();
    assert_eq!(trend.len(), 3);
    assert_eq!(trend[0]["date"], "2024-02-28");
    assert_eq!(trend[2]["date"], "2024-03-01");
    assert_eq!(trend[2]["amount"], 75.0);

    // report
    let (status, report) = send_json(
        &app,
        Method::GET,
        "/api/statistics/sales-report?period=all",
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total"], 2);
    assert_eq!(report["total_amount"], 95.0);
    assert_eq!(report["totalPages"], 1);

    // export
    let (status, headers, bytes) = send(
        &app,
        Method::GET,
        "/api/sales/export?period=monthly",
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(
        headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );
    assert!(
        headers[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap()
            .contains("sales-monthly-2024-03-01.csv")
    );
    let csv = String::from_utf8(bytes).unwrap();
    assert!(csv.starts_with("Date,Customer,Service,Staff,Amount (RM)\r\n"));
    assert!(csv.contains("2024-03-01,Aina,\"Haircut, Manicure\",Mei,75.00"));
    assert!(!csv.contains("Pedicure"));
    assert!(csv.ends_with("Total,,,,75.00\r\n"));

    let (status, _, _) = send(
        &app,
        Method::GET,
        "/api/sales/export?period=yearly",
        token,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
