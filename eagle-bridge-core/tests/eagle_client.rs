use std::{
    collections::HashMap,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use eagle_bridge_core::{EagleClient, GatewayError, HostApi};
use serde_json::{Value, json};

#[derive(Clone, Default)]
struct Stub {
    switched: Arc<Mutex<Vec<String>>>,
    last_list_query: Arc<Mutex<HashMap<String, String>>>,
}

async fn library_info() -> Json<Value> {
    Json(json!({"status": "success", "data": {"library": {"name": "Work"}}}))
}

async fn switch(State(stub): State<Stub>, Json(body): Json<Value>) -> Json<Value> {
    let path = body["libraryPath"].as_str().unwrap_or_default().to_string();
    stub.switched.lock().unwrap().push(path);
    Json(json!({"status": "success"}))
}

async fn item_info(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    match q.get("id").map(String::as_str) {
        Some("K1") => Json(json!({
            "status": "success",
            "data": {"id": "K1", "name": "x", "ext": "png", "tags": ["a"]}
        })),
        _ => Json(json!({"status": "success", "data": {}})),
    }
}

async fn thumbnail() -> Json<Value> {
    Json(json!({"status": "success", "data": "%2Flib%2Fx_thumbnail.png"}))
}

async fn item_list(
    State(stub): State<Stub>,
    Query(q): Query<HashMap<String, String>>,
) -> Json<Value> {
    *stub.last_list_query.lock().unwrap() = q;
    Json(json!({"status": "success", "data": [{"id": "a"}, {"id": "b"}]}))
}

async fn folder_list() -> impl IntoResponse {
    (StatusCode::SERVICE_UNAVAILABLE, "eagle is starting")
}

async fn spawn_stub(stub: Stub) -> String {
    let router = Router::new()
        .route("/api/library/info", get(library_info))
        .route("/api/library/switch", post(switch))
        .route("/api/item/info", get(item_info))
        .route("/api/item/thumbnail", get(thumbnail))
        .route("/api/item/list", get(item_list))
        .route("/api/folder/list", get(folder_list))
        .with_state(stub);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

async fn client(stub: Stub) -> EagleClient {
    let base = spawn_stub(stub).await;
    EagleClient::new(&base, Duration::from_secs(5)).unwrap()
}

#[tokio::test]
async fn reads_library_info_envelope() {
    let client = client(Stub::default()).await;
    let info = client.library_info().await.unwrap();
    assert_eq!(info["library"]["name"], "Work");
}

#[tokio::test]
async fn posts_library_path_on_switch() {
    let stub = Stub::default();
    let client = client(stub.clone()).await;

    client
        .switch_library(Path::new("/libs/Work.library"))
        .await
        .unwrap();

    assert_eq!(
        stub.switched.lock().unwrap().as_slice(),
        ["/libs/Work.library".to_string()]
    );
}

#[tokio::test]
async fn item_info_keeps_extra_fields() {
    let client = client(Stub::default()).await;
    let meta = client.item_info("K1").await.unwrap();
    assert_eq!(meta.name(), "x");
    assert_eq!(meta.ext(), "png");
    assert_eq!(meta.get("tags"), Some(&json!(["a"])));
}

#[tokio::test]
async fn empty_item_info_is_not_found() {
    let client = client(Stub::default()).await;
    let err = client.item_info("missing").await.unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn thumbnail_path_is_returned_raw() {
    let client = client(Stub::default()).await;
    let raw = client.item_thumbnail("K1").await.unwrap();
    assert_eq!(raw, "%2Flib%2Fx_thumbnail.png");
}

#[tokio::test]
async fn item_list_forwards_limit_and_folder() {
    let stub = Stub::default();
    let client = client(stub.clone()).await;

    let rows = client
        .list_items(25, Some("F9".to_string()))
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    let query = stub.last_list_query.lock().unwrap().clone();
    assert_eq!(query.get("limit").map(String::as_str), Some("25"));
    assert_eq!(query.get("folders").map(String::as_str), Some("F9"));
}

#[tokio::test]
async fn non_success_status_carries_status_and_body() {
    let client = client(Stub::default()).await;
    let err = client.list_folders().await.unwrap_err();
    match err {
        GatewayError::UpstreamUnavailable { status, body } => {
            assert_eq!(status, 503);
            assert_eq!(body, "eagle is starting");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_is_upstream_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client =
        EagleClient::new(&format!("http://{addr}"), Duration::from_secs(2))
            .unwrap();
    let err = client.library_info().await.unwrap_err();

    assert!(matches!(
        err,
        GatewayError::UpstreamUnavailable { status: 502, .. }
    ));
}
