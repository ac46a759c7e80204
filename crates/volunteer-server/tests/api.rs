use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;
use volunteer_core::{MemoryBackend, RecordStore};
use volunteer_server::services::AuthService;
use volunteer_server::{build_router, AppState};

const BOUNDARY: &str = "----volunteer-upload";

struct TestApp {
    router: Router,
    _static_dir: TempDir,
}

fn test_app() -> TestApp {
    let static_dir = tempfile::tempdir().unwrap();
    std::fs::write(static_dir.path().join("index.html"), "<h1>Volunteers</h1>").unwrap();

    let state = AppState {
        store: Arc::new(RecordStore::new(Arc::new(MemoryBackend::new()))),
        auth_service: Arc::new(
            AuthService::from_password("admin".to_string(), "pw", "test-secret".to_string())
                .unwrap(),
        ),
    };

    TestApp {
        router: build_router(state, static_dir.path()),
        _static_dir: static_dir,
    }
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).to_string()))
    };
    (status, body)
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

async fn admin_token(app: &TestApp) -> String {
    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/login",
            None,
            json!({"username": "admin", "password": "pw"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_backend() {
    let app = test_app();
    let (status, body) = send(&app, get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[tokio::test]
async fn admin_routes_require_login() {
    let app = test_app();

    let (status, body) = send(&app, get("/volunteers", None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Unauthorized");

    let (status, _) = send(&app, get("/hours", Some("not-a-token"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        json_request(Method::POST, "/add-event", None, json!({"title": "Cleanup"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn failed_login_reports_invalid_credentials() {
    let app = test_app();
    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/login",
            None,
            json!({"username": "admin", "password": "wrong"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Invalid credentials");
}

#[tokio::test]
async fn session_cookie_grants_admin_access() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(json_request(
            Method::POST,
            "/login",
            None,
            json!({"username": "admin", "password": "pw"}),
        ))
        .await
        .unwrap();
    let set_cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    assert!(cookie.starts_with("vh_session="));
    assert!(set_cookie.contains("HttpOnly"));

    let request = Request::builder()
        .uri("/volunteers")
        .header(header::COOKIE, cookie)
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn logout_clears_cookie_and_redirects() {
    let app = test_app();
    let response = app
        .router
        .clone()
        .oneshot(get("/logout", None))
        .await
        .unwrap();

    assert!(response.status().is_redirection());
    assert_eq!(response.headers().get(header::LOCATION).unwrap(), "/");
    let set_cookie = response.headers().get(header::SET_COOKIE).unwrap();
    assert!(set_cookie.to_str().unwrap().contains("Max-Age=0"));
}

#[tokio::test]
async fn volunteer_event_and_hours_flow() {
    let app = test_app();
    let token = admin_token(&app).await;

    let (status, ann) = send(
        &app,
        json_request(
            Method::POST,
            "/add-volunteers",
            Some(&token),
            json!({"firstName": "Ann", "lastName": "Lee", "email": "ann@x.org"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(ann["email"], "ann@x.org");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/add-volunteers",
            Some(&token),
            json!({"firstName": "Ann", "lastName": "Again", "email": "ann@x.org"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "conflict");

    // Legacy single-name form
    let (status, bo) = send(
        &app,
        json_request(
            Method::POST,
            "/add-volunteers",
            Some(&token),
            json!({"name": "Bo Kim", "email": "bo@x.org"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(bo["firstName"], "Bo");
    assert_eq!(bo["lastName"], "Kim");

    let (status, event) = send(
        &app,
        json_request(
            Method::POST,
            "/add-event",
            Some(&token),
            json!({"title": "Food drive", "date": "2026-11-01", "capacity": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(event["capacity"], 1);
    let event_id = event["id"].as_str().unwrap().to_string();

    let register_uri = format!("/events/{}/register", event_id);
    let (status, updated) = send(
        &app,
        json_request(Method::POST, &register_uri, None, json!({"email": "ann@x.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["attendees"], json!([ann["id"]]));

    let (status, body) = send(
        &app,
        json_request(Method::POST, &register_uri, None, json!({"email": "ann@x.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "already registered");

    let (status, body) = send(
        &app,
        json_request(Method::POST, &register_uri, None, json!({"email": "bo@x.org"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "event full");

    let (status, _) = send(
        &app,
        json_request(
            Method::POST,
            "/events/missing/register",
            None,
            json!({"email": "bo@x.org"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, events) = send(&app, get("/events", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(events.as_array().unwrap().len(), 1);

    let (status, entry) = send(
        &app,
        json_request(
            Method::POST,
            "/hours",
            None,
            json!({"email": "ann@x.org", "hours": 2.5}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["hours"], 2.5);
    assert!(entry["eventTitle"].is_null());

    let (status, entry) = send(
        &app,
        json_request(
            Method::POST,
            "/hours",
            None,
            json!({"email": "bo@x.org", "eventId": event_id, "hours": "3", "notes": "sorting"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(entry["eventTitle"], "Food drive");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/hours",
            None,
            json!({"email": "ann@x.org", "hours": 0}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "validation");

    let (status, body) = send(
        &app,
        json_request(
            Method::POST,
            "/hours",
            None,
            json!({"email": "ghost@x.org", "hours": 1}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");

    let (status, hours) = send(&app, get("/hours", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(hours.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn import_uploaded_file() {
    let app = test_app();
    let token = admin_token(&app).await;

    let body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"volunteers.csv\"\r\n\
         Content-Type: text/csv\r\n\
         \r\n\
         Ann,Lee,ann@x.org\nbadline\nBo,Kim,bo@x.org\n\r\n\
         --{b}--\r\n",
        b = BOUNDARY
    );
    let request = Request::builder()
        .method(Method::POST)
        .uri("/volunteers/import")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["volunteers"][0]["firstName"], "Ann");
    assert_eq!(body["volunteers"][1]["firstName"], "Bo");

    let (_, volunteers) = send(&app, get("/volunteers", Some(&token))).await;
    assert_eq!(volunteers.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn import_keeps_valid_lines_around_latin1_bytes() {
    let app = test_app();
    let token = admin_token(&app).await;

    let mut body = format!(
        "--{b}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"volunteers.csv\"\r\n\
         Content-Type: text/csv\r\n\
         \r\n\
         Ann,Lee,ann@x.org\n",
        b = BOUNDARY
    )
    .into_bytes();
    body.extend_from_slice(b"Ren\xe9,Roy,rene@x.org\n");
    body.extend_from_slice(format!("Bo,Kim,bo@x.org\n\r\n--{}--\r\n", BOUNDARY).as_bytes());

    let request = Request::builder()
        .method(Method::POST)
        .uri("/volunteers/import")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from(body))
        .unwrap();

    let (status, body) = send(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["imported"], 2);
    assert_eq!(body["volunteers"][0]["email"], "ann@x.org");
    assert_eq!(body["volunteers"][1]["email"], "bo@x.org");
}

#[tokio::test]
async fn unknown_paths_serve_frontend() {
    let app = test_app();
    let (status, body) = send(&app, get("/admin/dashboard", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("<h1>Volunteers</h1>".to_string()));
}
