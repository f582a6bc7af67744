//! Integration tests for downloads (`GET /?file=...`) and method dispatch.

mod helpers;

use axum::http::StatusCode;
use bytes::Bytes;
use helpers::fixtures::create_test_blob;
use helpers::setup_test_app;

#[tokio::test]
async fn test_download_returns_stored_bytes() {
    let app = setup_test_app().await;
    let data = create_test_blob(200 * 1024 + 3);
    std::fs::write(app.storage_root().join("report.pdf"), &data).unwrap();

    let response = app
        .client()
        .get("/")
        .add_query_param("file", "report.pdf")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-type"), "application/pdf");
    assert_eq!(
        response.header("content-length"),
        data.len().to_string().as_str()
    );
    assert_eq!(response.as_bytes().as_ref(), data.as_slice());
}

#[tokio::test]
async fn test_download_empty_file() {
    let app = setup_test_app().await;
    std::fs::write(app.storage_root().join("empty.txt"), b"").unwrap();

    let response = app
        .client()
        .get("/")
        .add_query_param("file", "empty.txt")
        .await;

    assert_eq!(response.status_code(), StatusCode::OK);
    assert_eq!(response.header("content-length"), "0");
    assert!(response.as_bytes().is_empty());
}

#[tokio::test]
async fn test_download_keep_alive_follows_request() {
    let app = setup_test_app().await;
    std::fs::write(app.storage_root().join("a.txt"), b"a").unwrap();

    let response = app.client().get("/").add_query_param("file", "a.txt").await;
    assert_eq!(response.header("connection"), "keep-alive");

    let response = app
        .client()
        .get("/")
        .add_query_param("file", "a.txt")
        .add_header("connection", "close")
        .await;
    assert_eq!(response.header("connection"), "close");
}

#[tokio::test]
async fn test_download_missing_file() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .get("/")
        .add_query_param("file", "does-not-exist.png")
        .await;

    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    assert_eq!(response.text(), "Failure: 404 Not Found\r\n");
    assert_eq!(response.header("content-type"), "text/plain; charset=UTF-8");
    assert_eq!(response.header("connection"), "close");
}

#[tokio::test]
async fn test_download_without_file_param() {
    let app = setup_test_app().await;

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "file query param not found");

    let response = app.client().get("/").add_query_param("file", "").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert_eq!(response.text(), "file query param not found");
}

#[tokio::test]
async fn test_download_rejects_traversal() {
    let app = setup_test_app().await;
    let outside = app
        .storage_root()
        .parent()
        .expect("temp dir has a parent")
        .to_path_buf();
    let secret_name = format!(
        "{}-secret.txt",
        app.storage_root()
            .file_name()
            .unwrap()
            .to_string_lossy()
    );
    std::fs::write(outside.join(&secret_name), b"secret").unwrap();

    for name in [
        format!("../{}", secret_name),
        "/etc/passwd".to_string(),
        "..".to_string(),
        "a/../../b".to_string(),
    ] {
        let response = app.client().get("/").add_query_param("file", &name).await;
        assert_eq!(
            response.status_code(),
            StatusCode::NOT_FOUND,
            "name {:?} should not resolve",
            name
        );
    }

    std::fs::remove_file(outside.join(&secret_name)).unwrap();
}

#[tokio::test]
async fn test_download_hidden_and_directory_names_are_not_found() {
    let app = setup_test_app().await;
    std::fs::write(app.storage_root().join(".upload-pending"), b"staged").unwrap();
    std::fs::create_dir(app.storage_root().join("subdir")).unwrap();

    for name in [".upload-pending", "subdir"] {
        let response = app.client().get("/").add_query_param("file", name).await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn test_other_methods_are_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .put("/")
        .bytes(Bytes::from_static(b"x"))
        .await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.text(), "Failure: 405 Method Not Allowed\r\n");

    let response = app.client().delete("/").await;
    assert_eq!(response.status_code(), StatusCode::METHOD_NOT_ALLOWED);
}
