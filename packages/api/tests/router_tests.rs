// ABOUTME: End-to-end tests of the HTTP router over file-backed stores
// ABOUTME: Drives requests through tower oneshot and checks bodies, status codes, and files on disk

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use taskbook_api::{create_router, AppState};

const BOUNDARY: &str = "taskbook-test-boundary";

/// Hand-built multipart/form-data body
struct Form {
    body: Vec<u8>,
}

impl Form {
    fn new() -> Self {
        Self { body: Vec::new() }
    }

    fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                BOUNDARY, name, value
            )
            .as_bytes(),
        );
        self
    }

    fn file(mut self, file_name: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"images\"; filename=\"{}\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, file_name, content_type
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    fn png(self, file_name: &str) -> Self {
        self.file(file_name, "image/png", b"\x89PNG fake image bytes")
    }

    fn request(mut self, method: Method, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        Request::builder()
            .method(method)
            .uri(uri)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}

struct TestApp {
    dir: TempDir,
    router: Router,
}

impl TestApp {
    async fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let state = AppState::open(dir.path());
        state.initialize().await.unwrap();
        let router = create_router(state);
        Self { dir, router }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Vec<u8>) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, bytes.to_vec())
    }

    async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, bytes) = self.send(request).await;
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send_json(empty(Method::GET, uri)).await
    }

    /// Create a task through the API and return its JSON
    async fn create(&self, form: Form) -> Value {
        let (status, body) = self
            .send_json(form.request(Method::POST, "/api/tasks"))
            .await;
        assert_eq!(status, StatusCode::OK, "create failed: {}", body);
        body["task"].clone()
    }

    fn image_files(&self) -> usize {
        std::fs::read_dir(self.dir.path().join("images"))
            .unwrap()
            .count()
    }
}

fn empty(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn ids(list: &Value) -> Vec<String> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|t| t["id"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_create_without_title_is_rejected() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send_json(
            Form::new()
                .text("content", "no title here")
                .png("a.png")
                .request(Method::POST, "/api/tasks"),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Title required" }));
    assert_eq!(app.get("/api/tasks").await.1, json!([]));
    assert_eq!(app.image_files(), 0);
}

#[tokio::test]
async fn test_create_with_image_and_serve_it() {
    let app = TestApp::new().await;

    let task = app
        .create(
            Form::new()
                .text("title", "Holiday photos")
                .text("tags", "travel, family")
                .text("priority", "high")
                .png("beach.png"),
        )
        .await;

    assert_eq!(task["title"], "Holiday photos");
    assert_eq!(task["tags"], json!(["travel", "family"]));
    assert_eq!(task["priority"], "high");
    assert_eq!(task["done"], false);
    assert_eq!(task["textColor"], "#000000");
    let image = task["images"][0].as_str().unwrap().to_string();
    assert!(image.starts_with("images/"));
    assert!(image.ends_with(".png"));

    let (status, bytes) = app.send(empty(Method::GET, &format!("/{}", image))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bytes, b"\x89PNG fake image bytes".to_vec());
}

#[tokio::test]
async fn test_non_image_upload_rejected_without_writes() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send_json(
            Form::new()
                .text("title", "Sneaky")
                .png("ok.png")
                .file("notes.txt", "text/plain", b"hello")
                .request(Method::POST, "/api/tasks"),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Only images"));
    assert_eq!(app.image_files(), 0);
}

#[tokio::test]
async fn test_more_than_three_uploads_rejected() {
    let app = TestApp::new().await;

    let (status, _) = app
        .send_json(
            Form::new()
                .text("title", "Too many")
                .png("1.png")
                .png("2.png")
                .png("3.png")
                .png("4.png")
                .request(Method::POST, "/api/tasks"),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(app.image_files(), 0);
}

#[tokio::test]
async fn test_fourth_image_is_discarded_on_update() {
    let app = TestApp::new().await;
    let task = app
        .create(
            Form::new()
                .text("title", "Full")
                .png("1.png")
                .png("2.png")
                .png("3.png"),
        )
        .await;
    let id = task["id"].as_str().unwrap();

    let (status, body) = app
        .send_json(
            Form::new()
                .text("content", "one more")
                .png("4.png")
                .request(Method::PUT, &format!("/api/tasks/{}", id)),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["images"], task["images"]);
    assert_eq!(body["task"]["content"], "one more");
    assert_eq!(app.image_files(), 3);
}

#[tokio::test]
async fn test_update_removes_images_and_clears_due_date() {
    let app = TestApp::new().await;
    let task = app
        .create(
            Form::new()
                .text("title", "Receipts")
                .text("dueAt", "2024-05-14T09:00:00.000Z")
                .png("a.png")
                .png("b.png"),
        )
        .await;
    let id = task["id"].as_str().unwrap();
    let removed = task["images"][0].as_str().unwrap().to_string();
    let kept = task["images"][1].clone();

    let (status, body) = app
        .send_json(
            Form::new()
                .text("removeImages", &json!([removed]).to_string())
                .text("dueAt", "")
                .request(Method::PUT, &format!("/api/tasks/{}", id)),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["task"]["images"], json!([kept]));
    assert!(body["task"]["dueAt"].is_null());
    assert_eq!(body["task"]["title"], "Receipts");

    let (status, _) = app.send(empty(Method::GET, &format!("/{}", removed))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_unknown_task_cleans_up_upload() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send_json(
            Form::new()
                .text("title", "ghost")
                .png("a.png")
                .request(Method::PUT, "/api/tasks/does-not-exist"),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Task not found");
    assert_eq!(app.image_files(), 0);
}

#[tokio::test]
async fn test_toggle_twice_restores_done() {
    let app = TestApp::new().await;
    let task = app.create(Form::new().text("title", "Flip")).await;
    let uri = format!("/api/tasks/{}/done", task["id"].as_str().unwrap());

    let (status, first) = app.send_json(empty(Method::PATCH, &uri)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["ok"], true);
    assert_eq!(first["task"]["done"], true);

    let (_, second) = app.send_json(empty(Method::PATCH, &uri)).await;
    assert_eq!(second["task"]["done"], false);
    assert_ne!(second["task"]["updatedAt"], first["task"]["updatedAt"]);
}

#[tokio::test]
async fn test_delete_removes_task_and_images() {
    let app = TestApp::new().await;
    let task = app
        .create(Form::new().text("title", "Trash").png("a.png"))
        .await;
    let id = task["id"].as_str().unwrap();
    let image = task["images"][0].as_str().unwrap();

    let (status, body) = app
        .send_json(empty(Method::DELETE, &format!("/api/tasks/{}", id)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (status, body) = app.get(&format!("/api/tasks/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Task not found" }));

    let (status, _) = app.send(empty(Method::GET, &format!("/{}", image))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.image_files(), 0);
}

#[tokio::test]
async fn test_list_filters_tags_and_search() {
    let app = TestApp::new().await;
    let groceries = app
        .create(
            Form::new()
                .text("title", "Groceries")
                .text("content", "Milk and EGGS")
                .text("tags", "home"),
        )
        .await;
    let report = app
        .create(
            Form::new()
                .text("title", "Quarterly report")
                .text("tags", "work")
                .text("priority", "high"),
        )
        .await;
    let uri = format!("/api/tasks/{}/done", groceries["id"].as_str().unwrap());
    app.send(empty(Method::PATCH, &uri)).await;

    let groceries_id = groceries["id"].as_str().unwrap().to_string();
    let report_id = report["id"].as_str().unwrap().to_string();

    let (_, all) = app.get("/api/tasks").await;
    assert_eq!(ids(&all), vec![report_id.clone(), groceries_id.clone()]);

    let (_, active) = app.get("/api/tasks?filter=active").await;
    assert_eq!(ids(&active), vec![report_id.clone()]);

    let (_, done) = app.get("/api/tasks?filter=done").await;
    assert_eq!(ids(&done), vec![groceries_id.clone()]);

    let (_, unknown) = app.get("/api/tasks?filter=whatever").await;
    assert_eq!(ids(&unknown).len(), 2);

    let (_, home) = app.get("/api/tasks?tag=home").await;
    assert_eq!(ids(&home), vec![groceries_id.clone()]);

    let (_, eggs) = app.get("/api/tasks?q=eggs").await;
    assert_eq!(ids(&eggs), vec![groceries_id]);

    let (_, tags) = app.get("/api/tags").await;
    assert_eq!(
        tags,
        json!([{ "tag": "home", "count": 1 }, { "tag": "work", "count": 1 }])
    );
}

#[tokio::test]
async fn test_export_import_round_trip() {
    let source = TestApp::new().await;
    source.create(Form::new().text("title", "First")).await;
    source
        .create(Form::new().text("title", "Second").text("tags", "x"))
        .await;
    let (status, exported) = source.get("/api/export").await;
    assert_eq!(status, StatusCode::OK);

    let target = TestApp::new().await;
    target.create(Form::new().text("title", "Overwritten")).await;
    let (status, body) = target
        .send_json(json_request(Method::POST, "/api/import", &exported))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "ok": true }));

    let (_, reexported) = target.get("/api/export").await;
    assert_eq!(reexported, exported);
}

#[tokio::test]
async fn test_import_rejects_non_array() {
    let app = TestApp::new().await;
    app.create(Form::new().text("title", "Survivor")).await;

    let (status, body) = app
        .send_json(json_request(
            Method::POST,
            "/api/import",
            &json!({ "tasks": [] }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid format" }));

    let malformed = Request::builder()
        .method(Method::POST)
        .uri("/api/import")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("[{not json"))
        .unwrap();
    let (status, _) = app.send_json(malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, all) = app.get("/api/tasks").await;
    assert_eq!(ids(&all).len(), 1);
}

#[tokio::test]
async fn test_import_rejects_image_shared_between_tasks() {
    let app = TestApp::new().await;
    app.create(Form::new().text("title", "Survivor")).await;

    let (status, body) = app
        .send_json(json_request(
            Method::POST,
            "/api/import",
            &json!([
                { "id": "a", "title": "a", "images": ["images/shared.png"] },
                { "id": "b", "title": "b", "images": ["images/shared.png"] }
            ]),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("images/shared.png"));

    let (_, all) = app.get("/api/tasks").await;
    assert_eq!(ids(&all).len(), 1);
}

#[tokio::test]
async fn test_calendar_month() {
    let app = TestApp::new().await;
    let task = app
        .create(
            Form::new()
                .text("title", "Dentist")
                .text("dueAt", "2024-05-14T09:00"),
        )
        .await;

    let (status, view) = app.get("/api/calendar?year=2024&month=5").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["year"], 2024);
    assert_eq!(view["month"], 5);

    let days = view["days"].as_array().unwrap();
    assert_eq!(days.len() % 7, 0);
    assert_eq!(days[0]["date"], "2024-04-28");
    assert_eq!(days[0]["inMonth"], false);

    let due: Vec<&Value> = days
        .iter()
        .filter(|d| !d["tasks"].as_array().unwrap().is_empty())
        .collect();
    assert_eq!(due.len(), 1);
    assert_eq!(due[0]["date"], "2024-05-14");
    assert_eq!(due[0]["tasks"][0]["id"], task["id"]);

    let (status, body) = app.get("/api/calendar?year=2024&month=13").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_calendar_rejects_unrepresentable_months() {
    let app = TestApp::new().await;

    for query in ["year=262142&month=12", "year=-262143&month=1"] {
        let (status, body) = app.get(&format!("/api/calendar?{}", query)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {}", query);
        assert!(body["error"].as_str().unwrap().starts_with("Invalid month"));
    }

    let (status, _) = app.get("/api/calendar?year=2024&month=12").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_templates_lifecycle() {
    let app = TestApp::new().await;

    let (status, created) = app
        .send_json(json_request(
            Method::POST,
            "/api/templates",
            &json!({
                "name": "Bug report",
                "title": "Fix: ",
                "content": "Steps to reproduce",
                "fontWeight": "bold",
                "tags": "bug, triage",
                "priority": "high"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    let template = &created["template"];
    let id = template["id"].as_str().unwrap().to_string();
    assert!(id.starts_with("template-"));

    let (_, list) = app.get("/api/templates").await;
    assert_eq!(ids(&list), vec![id.clone()]);

    let (status, applied) = app
        .send_json(empty(Method::POST, &format!("/api/templates/{}/tasks", id)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(applied["task"]["title"], "Fix: ");
    assert_eq!(applied["task"]["tags"], json!(["bug", "triage"]));
    assert_eq!(applied["task"]["images"], json!([]));
    assert!(applied["task"]["dueAt"].is_null());

    let (status, _) = app
        .send_json(empty(Method::DELETE, &format!("/api/templates/{}", id)))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.get(&format!("/api/templates/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Template not found" }));
}

#[tokio::test]
async fn test_template_requires_name() {
    let app = TestApp::new().await;

    let (status, body) = app
        .send_json(json_request(
            Method::POST,
            "/api/templates",
            &json!({ "name": "  ", "title": "x" }),
        ))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}
