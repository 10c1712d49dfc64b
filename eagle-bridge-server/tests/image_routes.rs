use anyhow::Result;
use axum::http::StatusCode;
use serde_json::{Value, json};
use tempfile::TempDir;

#[path = "support/mod.rs"]
mod support;

use support::{FakeHost, build_test_app, encode_slashes};

/// `{dir}/{id}.info/` with a thumbnail, and optionally the original.
fn item_dir(
    images: &TempDir,
    id: &str,
    name: &str,
    ext: &str,
    original: Option<&[u8]>,
) -> Result<std::path::PathBuf> {
    let dir = images.path().join(format!("{id}.info"));
    std::fs::create_dir_all(&dir)?;
    let thumbnail = dir.join(format!("{name}_thumbnail.png"));
    std::fs::write(&thumbnail, b"thumbnail-bytes")?;
    if let Some(bytes) = original {
        std::fs::write(dir.join(format!("{name}.{ext}")), bytes)?;
    }
    Ok(thumbnail)
}

#[tokio::test]
async fn serves_original_with_metadata_header() -> Result<()> {
    let images = TempDir::new()?;
    let original: Vec<u8> = (0..10 * 1024).map(|i| (i % 256) as u8).collect();
    let thumbnail = item_dir(&images, "P1", "photo", "jpg", Some(&original))?;

    let host = FakeHost::new().with_item(
        "P1",
        encode_slashes(&thumbnail),
        json!({"id": "P1", "name": "photo", "ext": "jpg"}),
    );
    let app = build_test_app(host)?;

    let response = app.server.get("/library/image/P1").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/jpg");
    assert_eq!(
        response.header("cache-control"),
        "public, max-age=31536000"
    );
    assert_eq!(
        response.header("image-data"),
        r#"{"id":"P1","name":"photo","ext":"jpg"}"#
    );
    assert_eq!(response.as_bytes().as_ref(), original.as_slice());
    Ok(())
}

#[tokio::test]
async fn falls_back_to_thumbnail_when_original_is_missing() -> Result<()> {
    let images = TempDir::new()?;
    let thumbnail = item_dir(&images, "T1", "shot", "heic", None)?;

    let host = FakeHost::new().with_item(
        "T1",
        encode_slashes(&thumbnail),
        json!({"id": "T1", "name": "shot", "ext": "heic"}),
    );
    let app = build_test_app(host)?;

    let response = app.server.get("/library/image/T1").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(response.as_bytes().as_ref(), b"thumbnail-bytes");
    Ok(())
}

#[tokio::test]
async fn large_original_is_streamed_whole() -> Result<()> {
    let images = TempDir::new()?;
    let original: Vec<u8> = (0..(300 * 1024 + 4096)).map(|i| (i % 253) as u8).collect();
    let thumbnail = item_dir(&images, "L1", "large", "PNG", Some(&original))?;

    let host = FakeHost::new().with_item(
        "L1",
        encode_slashes(&thumbnail),
        json!({"id": "L1", "name": "large", "ext": "PNG", "tags": ["写真"]}),
    );
    let app = build_test_app(host)?;

    let response = app.server.get("/library/image/L1").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "image/png");
    assert_eq!(response.as_bytes().len(), original.len());
    assert_eq!(response.as_bytes().as_ref(), original.as_slice());

    let header = response.header("image-data");
    let header = header.to_str()?;
    assert!(header.is_ascii());
    let decoded: Value = serde_json::from_str(header)?;
    assert_eq!(decoded["tags"][0], "写真");
    Ok(())
}

#[tokio::test]
async fn missing_files_are_not_found() -> Result<()> {
    let images = TempDir::new()?;
    let ghost = images.path().join("G1.info/ghost_thumbnail.png");

    let host = FakeHost::new().with_item(
        "G1",
        encode_slashes(&ghost),
        json!({"id": "G1", "name": "ghost", "ext": "png"}),
    );
    let app = build_test_app(host)?;

    let response = app.server.get("/library/image/G1").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["detail"], "Image file not found for ID: G1");
    Ok(())
}

#[tokio::test]
async fn unknown_item_is_not_found() -> Result<()> {
    let app = build_test_app(FakeHost::new())?;

    let response = app.server.get("/library/image/nope").await;
    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["detail"], "Image not found for ID: nope");
    Ok(())
}

#[tokio::test]
async fn host_failure_during_lookup_is_not_found() -> Result<()> {
    let app = build_test_app(FakeHost::new().failing(503))?;

    let response = app.server.get("/library/image/any").await;
    response.assert_status(StatusCode::NOT_FOUND);
    Ok(())
}
