use chrono::{TimeZone, Utc};
use http::{Method, StatusCode};
use netstorage_akamai::{Client, Operation, Response};
use netstorage_core::{Context, ErrorKind, Result};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::mock::{config, new_client, MockHttpSend};

const STAT_FILE: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<stat directory="/12345/dir">
<file type="file" name="file.txt" mtime="1462104000" size="11" md5="5eb63bbbe01eeed093cb22bb8f5acdc3"/>
</stat>"#;

const STAT_EMPTY: &str = r#"<?xml version="1.0" encoding="ISO-8859-1"?>
<stat directory="/12345/dir"></stat>"#;

#[tokio::test]
async fn test_operations_methods_and_actions() -> Result<()> {
    let (client, mock) = new_client(StatusCode::OK, "");

    client.download("/12345/file.txt").await?;
    client.stat("/12345/file.txt").await?;
    client.du("/12345").await?;
    client.dir("/12345").await?;
    client.delete("/12345/file.txt").await?;
    client.mkdir("/12345/dir").await?;
    client.rmdir("/12345/dir").await?;

    let seen: Vec<(Method, String)> = mock
        .requests()
        .into_iter()
        .map(|r| {
            let action = r.header("X-Akamai-ACS-Action").to_string();
            (r.method, action)
        })
        .collect();

    let expected: Vec<(Method, String)> = [
        (Method::GET, "download"),
        (Method::GET, "stat"),
        (Method::GET, "du"),
        (Method::GET, "dir"),
        (Method::PUT, "delete"),
        (Method::PUT, "mkdir"),
        (Method::PUT, "rmdir"),
    ]
    .into_iter()
    .map(|(m, a)| (m, format!("version=1&action={a}&format=xml")))
    .collect();

    assert_eq!(seen, expected);
    for req in mock.requests() {
        assert!(req.body.is_empty(), "{} must not send a body", req.method);
    }
    Ok(())
}

#[tokio::test]
async fn test_status_only_response() -> Result<()> {
    let (client, _) = new_client(StatusCode::OK, "OK");

    let resp = client.delete("/12345/file.txt").await?;
    assert_eq!(resp, Response::Status(StatusCode::OK));
    Ok(())
}

#[tokio::test]
async fn test_decoded_response() -> Result<()> {
    let (client, _) = new_client(StatusCode::OK, STAT_FILE);

    let resp = client.stat("/12345/dir/file.txt").await?;
    let decoded = resp.decoded().expect("stat must be decoded");
    assert_eq!(decoded["stat"]["file"]["_name"], json!("file.txt"));
    assert_eq!(decoded["stat"]["_directory"], json!("/12345/dir"));
    Ok(())
}

#[tokio::test]
async fn test_error_response() {
    let (client, _) = new_client(StatusCode::NOT_FOUND, "not found body");

    let err = client.download("/12345/missing.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    assert!(err.to_string().contains("404"));
    assert!(!err.to_string().contains("not found body"));
}

#[tokio::test]
async fn test_error_response_verbose() {
    let (client, _) = new_client(StatusCode::FORBIDDEN, "denied");
    client.set_config(json!({"verbose": true})).unwrap();

    let err = client.stat("/12345/file.txt").await.unwrap_err();
    assert_eq!(
        err.to_string(),
        "The server sent us the 403 code. Response: denied"
    );
}

#[tokio::test]
async fn test_decode_failed_response() {
    let (client, _) = new_client(StatusCode::OK, "<?xml version=\"1.0\"?><stat>");

    let err = client.stat("/12345/file.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeFailed);
}

#[tokio::test]
async fn test_file_exists() -> Result<()> {
    let (client, _) = new_client(StatusCode::OK, STAT_FILE);
    assert!(client.file_exists("/12345/dir/file.txt").await?);

    let (client, _) = new_client(StatusCode::NOT_FOUND, "");
    assert!(!client.file_exists("/12345/dir/file.txt").await?);

    let (client, _) = new_client(StatusCode::OK, STAT_EMPTY);
    assert!(!client.file_exists("/12345/dir/file.txt").await?);

    Ok(())
}

#[tokio::test]
async fn test_file_exists_propagates_other_errors() {
    let (client, _) = new_client(StatusCode::FORBIDDEN, "");
    let err = client.file_exists("/12345/file.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::HttpStatus);
    assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));

    let (client, _) = new_client(StatusCode::OK, "<?xml version=\"1.0\"?><stat>");
    let err = client.file_exists("/12345/file.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::DecodeFailed);
}

#[tokio::test]
async fn test_mtime_rejects_invalid_date_before_dispatch() {
    let (client, mock) = new_client(StatusCode::OK, "");

    let err = client
        .mtime(
            "/12345/file.txt",
            Utc.with_ymd_and_hms(1969, 7, 20, 20, 17, 0).unwrap(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::RequestInvalid);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_missing_credentials_fail_fast() {
    let mock = MockHttpSend::new(StatusCode::OK, "");
    let client = Client::new(Context::new().with_http_send(mock.clone()));
    client
        .set_config(json!({"host": "example-nsu.akamaihd.net"}))
        .unwrap();

    let err = client.stat("/12345/file.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigInvalid);
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn test_unavailable_transport() {
    let client = Client::new(Context::new()).with_config(config());

    let err = client.stat("/12345/file.txt").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TransportUnavailable);
}

#[tokio::test]
async fn test_set_config_applies_to_next_call() -> Result<()> {
    let (client, mock) = new_client(StatusCode::OK, "");

    client
        .set_config(json!({"ssl": true}))?
        .set_config(json!({"host": "other-nsu.akamaihd.net"}))?;
    assert!(client.config().ssl);

    client.send("/12345/dir", Operation::Dir).await?;
    assert_eq!(
        mock.last_request().uri,
        "https://other-nsu.akamaihd.net/12345/dir"
    );
    Ok(())
}
