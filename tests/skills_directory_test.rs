use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Router,
};
use jobboard_backend::services::skills_service::SkillsService;
use jobboard_backend::utils::ttl_cache::SystemClock;
use serde_json::{json, Value as JsonValue};
use tokio::net::TcpListener;
use uuid::Uuid;

const LEVELED_USER: &str = "00000000-0000-0000-0000-00000000aaaa";

#[derive(Clone)]
struct DirectoryState {
    catalog_hits: Arc<AtomicUsize>,
    completed_hits: Arc<AtomicUsize>,
}

async fn catalog_handler(State(state): State<DirectoryState>) -> Json<JsonValue> {
    state.catalog_hits.fetch_add(1, Ordering::SeqCst);
    Json(json!([
        { "id": "rust", "parent_id": null },
        { "id": "sql", "parent_id": "databases" },
        { "id": "docker", "parent_id": null }
    ]))
}

async fn completed_handler(
    State(state): State<DirectoryState>,
    Path(user_id): Path<String>,
) -> Json<JsonValue> {
    state.completed_hits.fetch_add(1, Ordering::SeqCst);
    if user_id == LEVELED_USER {
        Json(json!({ "rust": 7, "sql": 10 }))
    } else {
        Json(json!(["rust", "sql"]))
    }
}

async fn spawn_directory(state: DirectoryState) -> SocketAddr {
    let app = Router::new()
        .route("/skills", get(catalog_handler))
        .route("/skills/:user_id", get(completed_handler))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve directory");
    });
    addr
}

fn directory_state() -> DirectoryState {
    DirectoryState {
        catalog_hits: Arc::new(AtomicUsize::new(0)),
        completed_hits: Arc::new(AtomicUsize::new(0)),
    }
}

fn service_for(addr: SocketAddr, ttl: Duration) -> SkillsService {
    SkillsService::new(format!("http://{}", addr), ttl, Arc::new(SystemClock))
}

#[tokio::test]
async fn catalog_is_fetched_once_per_ttl_window() {
    let state = directory_state();
    let addr = spawn_directory(state.clone()).await;
    let service = service_for(addr, Duration::from_secs(60));

    let first = service.catalog().await.expect("catalog");
    let second = service.catalog().await.expect("catalog");

    assert_eq!(first.len(), 3);
    assert!(first.contains("rust"));
    assert_eq!(first, second);
    assert_eq!(state.catalog_hits.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn completed_skills_are_memoized_per_user() {
    let state = directory_state();
    let addr = spawn_directory(state.clone()).await;
    let service = service_for(addr, Duration::from_secs(60));

    let user_a = Uuid::new_v4();
    let user_b = Uuid::new_v4();

    let completed_a = service.completed_skills(user_a).await.expect("completed");
    let again_a = service.completed_skills(user_a).await.expect("completed");
    let completed_b = service.completed_skills(user_b).await.expect("completed");

    assert!(completed_a.contains("rust"));
    assert_eq!(completed_a, again_a);
    assert_eq!(completed_a, completed_b);
    assert_eq!(state.completed_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn zero_ttl_disables_memoization() {
    let state = directory_state();
    let addr = spawn_directory(state.clone()).await;
    let service = service_for(addr, Duration::from_secs(0));

    let user = Uuid::new_v4();
    service.completed_skills(user).await.expect("completed");
    service.completed_skills(user).await.expect("completed");

    assert_eq!(state.completed_hits.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn leveled_completion_payload_collapses_to_id_set() {
    let state = directory_state();
    let addr = spawn_directory(state.clone()).await;
    let service = service_for(addr, Duration::from_secs(60));

    let user = LEVELED_USER.parse::<Uuid>().expect("uuid");
    let completed = service.completed_skills(user).await.expect("completed");

    assert_eq!(completed.len(), 2);
    assert!(completed.contains("rust"));
    assert!(completed.contains("sql"));
}

#[tokio::test]
async fn unreachable_directory_degrades_to_empty_set() {
    // Bind and immediately drop a listener so the port is very likely closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let service = service_for(addr, Duration::from_secs(60));
    let completed = service.completed_skills_or_empty(Uuid::new_v4()).await;
    assert!(completed.is_empty());

    let catalog = service.catalog().await;
    assert!(catalog.is_err());
}
