use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use course_admin::client::{CourseApi, HttpCourseApi};
use course_admin::config::ApiConfig;
use course_admin::error::AppError;
use course_admin::models::{Course, Id, NewCourseRequest, NewInstanceRequest};
use serde_json::{Value, json};
use tokio::net::TcpListener;

#[derive(Default)]
struct MockApi {
    next_course_id: i64,
    courses: Vec<Value>,
    instances: Vec<Value>,
    requests: Vec<(String, String, Option<Value>)>,
}

type Shared = Arc<Mutex<MockApi>>;

fn record(state: &Shared, method: &str, path: String, body: Option<Value>) {
    state
        .lock()
        .unwrap()
        .requests
        .push((method.to_string(), path, body));
}

async fn list_courses(State(state): State<Shared>) -> Json<Value> {
    record(&state, "GET", "/api/courses".to_string(), None);
    Json(Value::Array(state.lock().unwrap().courses.clone()))
}

async fn create_course(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "POST", "/api/courses".to_string(), Some(body.clone()));
    let mut api = state.lock().unwrap();
    api.next_course_id += 1;
    let mut course = body;
    course["id"] = json!(api.next_course_id);
    api.courses.push(course.clone());
    Json(course)
}

async fn delete_course(State(state): State<Shared>, Path(id): Path<String>) -> StatusCode {
    record(&state, "DELETE", format!("/api/courses/{}", id), None);
    state
        .lock()
        .unwrap()
        .courses
        .retain(|c| c["id"].to_string() != id);
    StatusCode::NO_CONTENT
}

async fn list_instances(
    State(state): State<Shared>,
    Path((year, semester)): Path<(String, String)>,
) -> Json<Value> {
    record(&state, "GET", format!("/api/instances/{}/{}", year, semester), None);
    let instances = state
        .lock()
        .unwrap()
        .instances
        .iter()
        .filter(|i| i["year"] == json!(year) && i["semester"] == json!(semester))
        .cloned()
        .collect();
    Json(Value::Array(instances))
}

async fn create_instance(State(state): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    record(&state, "POST", "/api/instances".to_string(), Some(body.clone()));
    let mut instance = body;
    instance["id"] = json!(uuid::Uuid::new_v4().to_string());
    state.lock().unwrap().instances.push(instance.clone());
    Json(instance)
}

async fn delete_instance(
    State(state): State<Shared>,
    Path((year, semester, id)): Path<(String, String, String)>,
) -> StatusCode {
    record(
        &state,
        "DELETE",
        format!("/api/instances/{}/{}/{}", year, semester, id),
        None,
    );
    state
        .lock()
        .unwrap()
        .instances
        .retain(|i| i["id"] != json!(id));
    StatusCode::OK
}

async fn spawn_mock_api() -> (String, Shared) {
    let state: Shared = Arc::new(Mutex::new(MockApi::default()));
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind mock api");
    let addr = listener.local_addr().expect("Failed to read local addr");

    let app = Router::new()
        .route("/api/courses", get(list_courses).post(create_course))
        .route("/api/courses/{id}", delete(delete_course))
        .route("/api/instances", post(create_instance))
        .route("/api/instances/{year}/{semester}", get(list_instances))
        .route(
            "/api/instances/{year}/{semester}/{id}",
            delete(delete_instance),
        )
        .with_state(state.clone());

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{}/api", addr), state)
}

async fn spawn_failing_api() -> String {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind failing api");
    let addr = listener.local_addr().expect("Failed to read local addr");

    let app = Router::new().fallback(|| async {
        (StatusCode::INTERNAL_SERVER_ERROR, "database unavailable")
    });

    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    format!("http://{}/api", addr)
}

#[tokio::test]
async fn create_course_posts_exact_payload() {
    let (base_url, mock) = spawn_mock_api().await;
    let api = HttpCourseApi::new(&ApiConfig::new(base_url)).expect("Failed to build client");

    api.create_course(&NewCourseRequest {
        title: "Algorithms".to_string(),
        code: "CS301".to_string(),
        description: "Intro to algorithms".to_string(),
    })
    .await
    .expect("create failed");

    let requests = mock.lock().unwrap().requests.clone();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].0, "POST");
    assert_eq!(requests[0].1, "/api/courses");
    assert_eq!(
        requests[0].2,
        Some(json!({
            "title": "Algorithms",
            "code": "CS301",
            "description": "Intro to algorithms"
        }))
    );

    let courses = api.list_courses().await.expect("list failed");
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].id, Id::from(1));
    assert_eq!(courses[0].title, "Algorithms");
}

#[tokio::test]
async fn delete_course_hits_id_path() {
    let (base_url, mock) = spawn_mock_api().await;
    let api = HttpCourseApi::new(&ApiConfig::new(base_url)).expect("Failed to build client");

    for code in ["CS101", "CS102"] {
        api.create_course(&NewCourseRequest {
            title: format!("Course {}", code),
            code: code.to_string(),
            description: "d".to_string(),
        })
        .await
        .expect("create failed");
    }

    api.delete_course(&Id::from(1)).await.expect("delete failed");

    let courses = api.list_courses().await.expect("list failed");
    assert!(courses.iter().all(|c| c.id != Id::from(1)));
    assert_eq!(courses.len(), 1);

    let requests = mock.lock().unwrap().requests.clone();
    assert!(requests
        .iter()
        .any(|(method, path, _)| method == "DELETE" && path == "/api/courses/1"));
}

#[tokio::test]
async fn typed_id_is_sent_as_written() {
    let (base_url, mock) = spawn_mock_api().await;
    let api = HttpCourseApi::new(&ApiConfig::new(base_url)).expect("Failed to build client");

    api.delete_course(&Id::from("007")).await.expect("delete failed");

    let requests = mock.lock().unwrap().requests.clone();
    assert_eq!(requests[0].0, "DELETE");
    assert_eq!(requests[0].1, "/api/courses/007");
}

#[tokio::test]
async fn instance_lifecycle_is_scoped_by_term() {
    let (base_url, mock) = spawn_mock_api().await;
    let api = HttpCourseApi::new(&ApiConfig::new(base_url)).expect("Failed to build client");

    let course = Course {
        id: Id::from(4),
        title: "Algorithms".to_string(),
        code: "CS301".to_string(),
        description: "Intro to algorithms".to_string(),
    };

    api.create_instance(&NewInstanceRequest {
        year: "2024".to_string(),
        semester: "1".to_string(),
        course: course.clone(),
    })
    .await
    .expect("create failed");

    let posted = mock.lock().unwrap().requests[0].2.clone().unwrap();
    assert_eq!(posted["course"]["id"], json!(4));
    assert_eq!(posted["year"], json!("2024"));

    let listed = api.list_instances("2024", "1").await.expect("list failed");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].course, course);

    assert!(api
        .list_instances("2024", "2")
        .await
        .expect("list failed")
        .is_empty());

    api.delete_instance("2024", "1", &listed[0].id)
        .await
        .expect("delete failed");
    assert!(api
        .list_instances("2024", "1")
        .await
        .expect("list failed")
        .is_empty());

    let requests = mock.lock().unwrap().requests.clone();
    let expected = format!("/api/instances/2024/1/{}", listed[0].id);
    assert!(requests
        .iter()
        .any(|(method, path, _)| method == "DELETE" && *path == expected));
}

#[tokio::test]
async fn non_success_status_is_an_error() {
    let base_url = spawn_failing_api().await;
    let api = HttpCourseApi::new(&ApiConfig::new(base_url)).expect("Failed to build client");

    match api.list_courses().await {
        Err(AppError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 500);
            assert_eq!(body, "database unavailable");
        }
        other => panic!("expected status error, got {:?}", other),
    }

    let err = api
        .delete_instance("2024", "1", &Id::from(1))
        .await
        .expect_err("delete should fail");
    assert!(!err.is_local());
}

#[tokio::test]
async fn unreachable_server_is_a_network_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let api = HttpCourseApi::new(&ApiConfig::new(format!("http://{}/api", addr)))
        .expect("Failed to build client");

    assert!(matches!(
        api.list_courses().await,
        Err(AppError::Network(_))
    ));
}
