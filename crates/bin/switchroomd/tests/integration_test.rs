//! End-to-end tests for the full switchroomd stack.
//!
//! Each test wires the complete application (in-memory `SQLite`, real
//! repository, filesystem photo storage in a temp dir, real service, real
//! axum router) and exercises it via `tower::ServiceExt::oneshot`. No TCP
//! port is bound.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use switchroom_adapter_http_axum::router::{self, MediaMount, RouterOptions};
use switchroom_adapter_http_axum::state::AppState;
use switchroom_adapter_storage_sqlite_sqlx::{Database, SqliteSwitchroomRepository};
use switchroom_app::services::switchroom_service::SwitchroomService;
use tempfile::TempDir;
use tower::ServiceExt;

const PNG: &[u8] = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR\0\0\0\x01\0\0\0\x01";
const BOUNDARY: &str = "switchroom-test-boundary";

struct TestApp {
    router: Router,
    db: Database,
    media: TempDir,
}

/// Build a fully-wired router backed by an in-memory `SQLite` database.
async fn app() -> TestApp {
    let db = switchroom_adapter_storage_sqlite_sqlx::Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");
    let media = TempDir::new().expect("temp dir");

    let repo = SqliteSwitchroomRepository::new(db.pool().clone());
    let storage = switchroom_adapter_media_fs::Config {
        root: media.path().to_path_buf(),
        url_prefix: "/media".to_string(),
    }
    .build();

    let options = RouterOptions {
        max_upload_bytes: 1024 * 1024,
        media: Some(MediaMount {
            url_prefix: "/media".to_string(),
            root: media.path().to_path_buf(),
        }),
    };
    let router = router::build(AppState::new(SwitchroomService::new(repo, storage)), &options);

    TestApp { router, db, media }
}

enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, data) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; \
                         filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(data);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn multipart_request(method: &str, uri: &str, parts: &[Part<'_>]) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap()
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn send(app: &TestApp, request: Request<Body>) -> (StatusCode, Value) {
    let resp = app.router.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn item_uri(id: &str) -> String {
    format!("/api/switchrooms/{id}")
}

async fn count(app: &TestApp, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(app.db.pool())
        .await
        .unwrap()
}

async fn create_point(app: &TestApp, name: &str) -> Value {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/api/switchrooms",
            &json!({"name": name, "area_type": "POINT", "coordinates": "[1.0, 2.0]"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let app = app().await;
    let resp = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_switchroom_with_photos_from_multipart() {
    let app = app().await;
    let (status, created) = send(
        &app,
        multipart_request(
            "POST",
            "/api/switchrooms/",
            &[
                Part::Text("name", "Room A"),
                Part::Text("area_type", "POINT"),
                Part::Text("coordinates", "[1.0, 2.0]"),
                Part::File("photos", "a.png", PNG),
                Part::File("photos", "b.png", PNG),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let id = created["id"].as_str().unwrap();
    let (status, fetched) = send(&app, empty_request("GET", &item_uri(id))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["name"], "Room A");
    assert_eq!(fetched["description"], "");
    assert_eq!(fetched["area_type"], "POINT");
    assert_eq!(fetched["coordinates"], json!([1.0, 2.0]));

    let photos = fetched["photos"].as_array().unwrap();
    assert_eq!(photos.len(), 2);
    for photo in photos {
        let url = photo["image"].as_str().unwrap();
        assert!(url.starts_with("/media/switchroom_photos/"));
        assert!(url.ends_with(".png"));
    }
    assert_eq!(count(&app, "photos").await, 2);
}

#[tokio::test]
async fn should_serve_uploaded_photo_under_media_prefix() {
    let app = app().await;
    let (_, created) = send(
        &app,
        multipart_request(
            "POST",
            "/api/switchrooms",
            &[
                Part::Text("name", "Room B"),
                Part::Text("area_type", "POINT"),
                Part::Text("coordinates", "[0, 0]"),
                Part::File("photos", "a.png", PNG),
            ],
        ),
    )
    .await;
    let url = created["photos"][0]["image"].as_str().unwrap().to_string();

    let resp = app
        .router
        .clone()
        .oneshot(empty_request("GET", &url))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    assert_eq!(&bytes[..], PNG);
}

#[tokio::test]
async fn should_point_location_header_at_new_switchroom() {
    let app = app().await;
    let resp = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/switchrooms",
            &json!({
                "name": "Room C",
                "area_type": "POLYGON",
                "coordinates": [[0, 0], [1, 0], [1, 1]],
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let location = resp.headers()[header::LOCATION].to_str().unwrap().to_string();
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(
        location,
        format!("/api/switchrooms/{}", body["id"].as_str().unwrap())
    );
    let (status, _) = send(&app, empty_request("GET", &location)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn should_reject_invalid_area_type_without_persisting() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/switchrooms",
            &json!({"name": "Room D", "area_type": "CIRCLE", "coordinates": "[1, 2]"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["area_type"].is_array());
    assert_eq!(count(&app, "switchrooms").await, 0);
}

#[tokio::test]
async fn should_reject_malformed_coordinates() {
    let app = app().await;
    let (status, body) = send(
        &app,
        multipart_request(
            "POST",
            "/api/switchrooms",
            &[
                Part::Text("name", "Room E"),
                Part::Text("area_type", "POINT"),
                Part::Text("coordinates", "{bad"),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid coordinates format");
    assert_eq!(count(&app, "switchrooms").await, 0);
}

#[tokio::test]
async fn should_reject_missing_required_fields() {
    let app = app().await;
    let (status, body) = send(&app, json_request("POST", "/api/switchrooms", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["name"].is_array());
    assert!(body["fields"]["area_type"].is_array());
    assert!(body["fields"]["coordinates"].is_array());
}

#[tokio::test]
async fn should_reject_non_image_upload_without_persisting() {
    let app = app().await;
    let (status, body) = send(
        &app,
        multipart_request(
            "POST",
            "/api/switchrooms",
            &[
                Part::Text("name", "Room F"),
                Part::Text("area_type", "POINT"),
                Part::Text("coordinates", "[1, 2]"),
                Part::File("photos", "notes.txt", b"plain text"),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["photos"].is_array());
    assert_eq!(count(&app, "switchrooms").await, 0);
    assert!(!app.media.path().join("switchroom_photos").exists());
}

// ---------------------------------------------------------------------------
// Read
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_list_switchrooms_in_creation_order() {
    let app = app().await;
    create_point(&app, "First").await;
    create_point(&app, "Second").await;

    let (status, body) = send(&app, empty_request("GET", "/api/switchrooms")).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["First", "Second"]);
}

#[tokio::test]
async fn should_return_404_for_unknown_id() {
    let app = app().await;
    let (status, _) = send(&app, empty_request("GET", "/api/switchrooms/999999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(
        &app,
        empty_request("GET", "/api/switchrooms/00000000-0000-4000-8000-000000000000"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_round_trip_nested_coordinates() {
    let app = app().await;
    let coordinates = json!({"type": "Polygon", "rings": [[[0.5, 1.25], [2, 3], [0.5, 1.25]]]});
    let (_, created) = send(
        &app,
        json_request(
            "POST",
            "/api/switchrooms",
            &json!({
                "name": "Nested",
                "area_type": "POLYGON",
                "coordinates": coordinates.to_string(),
            }),
        ),
    )
    .await;

    let id = created["id"].as_str().unwrap();
    let (_, fetched) = send(&app, empty_request("GET", &item_uri(id))).await;
    assert_eq!(fetched["coordinates"], coordinates);
}

#[tokio::test]
async fn should_round_trip_scalar_coordinates() {
    let app = app().await;
    for coordinates in [json!(42), json!("free text"), json!([])] {
        let (status, created) = send(
            &app,
            json_request(
                "POST",
                "/api/switchrooms",
                &json!({
                    "name": "Scalar",
                    "area_type": "POINT",
                    "coordinates": coordinates.to_string(),
                }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["photos"], json!([]));

        let id = created["id"].as_str().unwrap();
        let (_, fetched) = send(&app, empty_request("GET", &item_uri(id))).await;
        assert_eq!(fetched["coordinates"], coordinates);
    }
}

#[tokio::test]
async fn should_give_each_photo_its_own_id() {
    let app = app().await;
    let (_, created) = send(
        &app,
        multipart_request(
            "POST",
            "/api/switchrooms",
            &[
                Part::Text("name", "Gallery"),
                Part::Text("area_type", "POINT"),
                Part::Text("coordinates", "[1, 2]"),
                Part::File("photos", "a.png", PNG),
                Part::File("photos", "b.png", PNG),
                Part::File("photos", "c.png", PNG),
            ],
        ),
    )
    .await;

    let mut ids: Vec<&str> = created["photos"]
        .as_array()
        .unwrap()
        .iter()
        .map(|photo| photo["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids.len(), 3);
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), 3);
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_patch_description_and_advance_updated_at() {
    let app = app().await;
    let created = create_point(&app, "Patched").await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        json_request(
            "PATCH",
            &item_uri(id),
            &json!({"description": "new text"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["description"], "new text");
    assert_eq!(updated["name"], "Patched");
    assert_eq!(updated["created_at"], created["created_at"]);

    let before = chrono_of(&created["updated_at"]);
    let after = chrono_of(&updated["updated_at"]);
    assert!(after > before);
}

#[tokio::test]
async fn should_replace_switchroom_from_multipart_put() {
    let app = app().await;
    let created = create_point(&app, "Old").await;
    let id = created["id"].as_str().unwrap();

    let (status, updated) = send(
        &app,
        multipart_request(
            "PUT",
            &format!("/api/switchrooms/{id}/"),
            &[
                Part::Text("name", "New"),
                Part::Text("description", "rebuilt"),
                Part::Text("area_type", "POLYGON"),
                Part::Text("coordinates", "[[0, 0], [1, 1], [0, 1]]"),
            ],
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "New");
    assert_eq!(updated["area_type"], "POLYGON");
    assert_eq!(updated["coordinates"], json!([[0, 0], [1, 1], [0, 1]]));
}

#[tokio::test]
async fn should_require_every_field_on_put() {
    let app = app().await;
    let created = create_point(&app, "Strict").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request("PUT", &item_uri(id), &json!({"name": "Only"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["fields"]["area_type"].is_array());
}

#[tokio::test]
async fn should_return_404_when_updating_unknown_id() {
    let app = app().await;
    let (status, _) = send(
        &app,
        json_request(
            "PATCH",
            "/api/switchrooms/00000000-0000-4000-8000-000000000000",
            &json!({"description": "x"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn should_answer_404_before_parsing_coordinates_of_unknown_id() {
    let app = app().await;
    let (status, body) = send(
        &app,
        json_request(
            "PATCH",
            "/api/switchrooms/00000000-0000-4000-8000-000000000000",
            &json!({"coordinates": "{bad"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_ne!(body["error"], "invalid coordinates format");
}

#[tokio::test]
async fn should_reject_malformed_coordinates_on_patch() {
    let app = app().await;
    let created = create_point(&app, "Kept").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request("PATCH", &item_uri(id), &json!({"coordinates": "{bad"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid coordinates format");

    let (_, fetched) = send(&app, empty_request("GET", &item_uri(id))).await;
    assert_eq!(fetched["coordinates"], json!([1.0, 2.0]));
}

#[tokio::test]
async fn should_reject_explicit_null_coordinates() {
    let app = app().await;
    let created = create_point(&app, "Nullable").await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        json_request("PATCH", &item_uri(id), &json!({"coordinates": null})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["coordinates"][0], "this field may not be null");

    let (_, fetched) = send(&app, empty_request("GET", &item_uri(id))).await;
    assert_eq!(fetched["coordinates"], json!([1.0, 2.0]));

    let (status, body) = send(
        &app,
        json_request(
            "POST",
            "/api/switchrooms",
            &json!({"name": "Null", "area_type": "POINT", "coordinates": null}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["fields"]["coordinates"][0], "this field may not be null");
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_delete_switchroom_with_its_photos() {
    let app = app().await;
    let (_, created) = send(
        &app,
        multipart_request(
            "POST",
            "/api/switchrooms",
            &[
                Part::Text("name", "Doomed"),
                Part::Text("area_type", "POINT"),
                Part::Text("coordinates", "[1, 2]"),
                Part::File("photos", "a.png", PNG),
            ],
        ),
    )
    .await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(count(&app, "photos").await, 1);

    let (status, _) = send(&app, empty_request("DELETE", &item_uri(id))).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    assert_eq!(count(&app, "photos").await, 0);
    let (status, _) = send(&app, empty_request("GET", &item_uri(id))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let remaining = std::fs::read_dir(app.media.path().join("switchroom_photos"))
        .unwrap()
        .count();
    assert_eq!(remaining, 0);
}

#[tokio::test]
async fn should_return_404_when_deleting_twice() {
    let app = app().await;
    let created = create_point(&app, "Once").await;
    let uri = format!("/api/switchrooms/{}", created["id"].as_str().unwrap());

    let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, empty_request("DELETE", &uri)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

fn chrono_of(value: &Value) -> chrono::DateTime<chrono::Utc> {
    value.as_str().unwrap().parse().unwrap()
}
