use serde_json::{Value, json};
use stride::db::Store;
use stride::server::router;
use tempfile::TempDir;
use tokio::net::TcpListener;

struct TestServer {
    base: String,
    store: Store,
    _temp: TempDir,
}

impl TestServer {
    async fn start() -> Self {
        let temp = TempDir::new().unwrap();
        let store = Store::new(temp.path().join("test.db"));
        store.init_async().await.unwrap();

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = router(store.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base: format!("http://{addr}"),
            store,
            _temp: temp,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get(&self, path: &str) -> Value {
        let response = reqwest::get(self.url(path)).await.unwrap();
        assert!(response.status().is_success());
        response.json().await.unwrap()
    }

    async fn send(&self, method: reqwest::Method, path: &str, body: Option<Value>) -> (u16, Value) {
        let client = reqwest::Client::new();
        let mut request = client.request(method, self.url(path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await.unwrap();
        let status = response.status().as_u16();
        (status, response.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        self.send(reqwest::Method::POST, path, Some(body)).await
    }

    fn task_count(&self) -> i64 {
        let mut session = self.store.session();
        session.conn().unwrap().count_tasks().unwrap()
    }
}

fn today() -> String {
    chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string()
}

fn titles(view: &Value) -> Vec<String> {
    view["tasks"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["title"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_create_with_only_title_uses_defaults() {
    let server = TestServer::start().await;

    let (status, body) = server.post("/api/tasks", json!({"title": "Essay"})).await;
    assert_eq!(status, 200);
    assert_eq!(body, json!({"success": true}));

    let view = server.get("/tasks").await;
    assert_eq!(view["page"], "tasks");
    let task = &view["tasks"][0];
    assert_eq!(task["title"], "Essay");
    assert_eq!(task["status"], "Not Started");
    assert_eq!(task["priority"], "Medium");
    assert_eq!(task["time_needed"], 1.0);
    assert_eq!(task["due_date"], Value::Null);
}

#[tokio::test]
async fn test_home_lists_today_by_priority() {
    let server = TestServer::start().await;
    let today = today();

    server
        .post(
            "/api/tasks",
            json!({"title": "Reading", "priority": "Low", "due_date": today}),
        )
        .await;
    server
        .post(
            "/api/tasks",
            json!({"title": "Essay", "priority": "High", "due_date": today}),
        )
        .await;
    server
        .post(
            "/api/tasks",
            json!({"title": "Someday", "priority": "High", "due_date": "2001-01-01"}),
        )
        .await;

    let view = server.get("/").await;
    assert_eq!(view["page"], "home");
    assert_eq!(titles(&view), vec!["Essay", "Reading"]);
}

#[tokio::test]
async fn test_update_replaces_task() {
    let server = TestServer::start().await;
    server
        .post("/api/tasks", json!({"title": "Draft", "subject": "English"}))
        .await;

    let replacement = json!({
        "title": "Final draft",
        "subject": "Literature",
        "status": "In Progress",
        "due_date": "2026-11-30",
        "priority": "High",
        "time_needed": 4.5
    });
    let (status, body) = server
        .send(reqwest::Method::PUT, "/api/tasks/1", Some(replacement))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);

    let view = server.get("/tasks").await;
    let task = &view["tasks"][0];
    assert_eq!(task["id"], 1);
    assert_eq!(task["title"], "Final draft");
    assert_eq!(task["subject"], "Literature");
    assert_eq!(task["status"], "In Progress");
    assert_eq!(task["due_date"], "2026-11-30");
    assert_eq!(task["priority"], "High");
    assert_eq!(task["time_needed"], 4.5);
}

#[tokio::test]
async fn test_update_without_title_is_internal_error() {
    let server = TestServer::start().await;
    server.post("/api/tasks", json!({"title": "Draft"})).await;

    let (status, body) = server
        .send(
            reqwest::Method::PUT,
            "/api/tasks/1",
            Some(json!({"subject": "English"})),
        )
        .await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);

    let view = server.get("/tasks").await;
    let task = &view["tasks"][0];
    assert_eq!(task["title"], "Draft");
}

#[tokio::test]
async fn test_create_without_title_is_internal_error() {
    let server = TestServer::start().await;

    let (status, body) = server.post("/api/tasks", json!({"subject": "Maths"})).await;
    assert_eq!(status, 500);
    assert_eq!(body["success"], false);
    assert_eq!(server.task_count(), 0);
}

#[tokio::test]
async fn test_delete_unknown_task_succeeds() {
    let server = TestServer::start().await;
    server.post("/api/tasks", json!({"title": "Keep"})).await;

    let (status, body) = server
        .send(reqwest::Method::DELETE, "/api/tasks/77", None)
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["success"], true);
    assert_eq!(server.task_count(), 1);

    server
        .send(reqwest::Method::DELETE, "/api/tasks/1", None)
        .await;
    assert_eq!(server.task_count(), 0);
}

#[tokio::test]
async fn test_schedule_hides_completed_tasks() {
    let server = TestServer::start().await;
    server
        .post(
            "/api/tasks",
            json!({"title": "Later", "due_date": "2026-12-01", "priority": "High"}),
        )
        .await;
    server
        .post(
            "/api/tasks",
            json!({"title": "Sooner", "due_date": "2026-11-01", "priority": "Low"}),
        )
        .await;
    server
        .post("/api/tasks", json!({"title": "Done", "status": "Completed"}))
        .await;

    let view = server.get("/schedule").await;
    assert_eq!(view["page"], "schedule");
    assert_eq!(titles(&view), vec!["Sooner", "Later"]);
    assert_eq!(view["settings"]["study_start_time"], "09:00");
    assert_eq!(view["settings"]["study_end_time"], "17:00");
}

#[tokio::test]
async fn test_settings_round_trip_keeps_single_row() {
    let server = TestServer::start().await;

    let view = server.get("/settings").await;
    assert_eq!(view["page"], "settings");
    assert_eq!(view["settings"]["excluded_days"], "");

    for start in ["07:00", "08:15"] {
        let (status, body) = server
            .post(
                "/api/settings",
                json!({"study_start_time": start, "study_end_time": "18:00", "excluded_days": "Saturday,Sunday"}),
            )
            .await;
        assert_eq!(status, 200);
        assert_eq!(body["success"], true);
    }

    let view = server.get("/settings").await;
    let settings = &view["settings"];
    assert_eq!(settings["study_start_time"], "08:15");
    assert_eq!(settings["study_end_time"], "18:00");
    assert_eq!(settings["excluded_days"], "Saturday,Sunday");

    let mut session = server.store.session();
    assert_eq!(session.conn().unwrap().count_settings_rows().unwrap(), 1);
}

#[tokio::test]
async fn test_onboarding_is_static() {
    let server = TestServer::start().await;

    let view = server.get("/onboarding").await;
    assert_eq!(view, json!({"page": "onboarding"}));
}

#[tokio::test]
async fn test_create_keeps_explicit_null_status() {
    let server = TestServer::start().await;

    let (status, _) = server
        .post("/api/tasks", json!({"title": "x", "status": null}))
        .await;
    assert_eq!(status, 200);

    let view = server.get("/tasks").await;
    let task = &view["tasks"][0];
    assert_eq!(task["status"], Value::Null);
    assert_eq!(task["priority"], "Medium");
    assert_eq!(task["time_needed"], 1.0);
}

#[tokio::test]
async fn test_settings_null_excluded_days_is_stored_as_null() {
    let server = TestServer::start().await;

    let (status, _) = server
        .post("/api/settings", json!({"excluded_days": null}))
        .await;
    assert_eq!(status, 200);

    let view = server.get("/settings").await;
    assert_eq!(view["settings"]["excluded_days"], Value::Null);
}
