use chrono::{TimeZone, Utc};
use http::{Method, StatusCode};
use netstorage_akamai::{
    sign_with_context, AuthContext, Credential, RequestSigner, StaticNonce,
};
use netstorage_core::Result;
use pretty_assertions::assert_eq;
use serde_json::{json, Map, Value};

use crate::mock::{new_client, NONCE, NOW};

const AUTH_DATA: &str = "5, 0.0.0.0, 0.0.0.0, 1462104000, 123456, upload";

#[tokio::test]
async fn test_upload_wire_headers() -> Result<()> {
    let (client, mock) = new_client(StatusCode::OK, "");
    client.upload("hello world", "/12345/dir/file.txt").await?;

    let req = mock.last_request();
    assert_eq!(req.method, Method::PUT);
    assert_eq!(req.uri, "http://example-nsu.akamaihd.net/12345/dir/file.txt");
    assert_eq!(
        req.header("X-Akamai-ACS-Action"),
        "version=1&action=upload&format=xml&upload-type=binary"
    );
    assert_eq!(req.header("X-Akamai-ACS-Auth-Data"), AUTH_DATA);
    assert_eq!(
        req.header("X-Akamai-ACS-Auth-Sign"),
        "X2LUqNPbBkywcDxaf2HPHpRpewmKo3OzlHoajk0X5fc="
    );
    assert_eq!(req.header("Accept"), "text/xml");
    assert_eq!(req.body.as_ref(), b"hello world");

    Ok(())
}

#[tokio::test]
async fn test_stat_strips_trailing_slash() -> Result<()> {
    let (client, mock) = new_client(StatusCode::OK, "");
    client.stat("/12345/dir/").await?;

    let req = mock.last_request();
    assert_eq!(req.method, Method::GET);
    assert_eq!(req.uri, "http://example-nsu.akamaihd.net/12345/dir");
    assert_eq!(
        req.header("X-Akamai-ACS-Auth-Sign"),
        "eMdy9aA8vte+TRDAX02iZvFlUQPyhnz3mhr5Jwk6Z/0="
    );
    assert!(req.body.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_rename_wire_headers() -> Result<()> {
    let (client, mock) = new_client(StatusCode::OK, "");
    client
        .rename("/12345/old.txt", "/12345/new name.txt")
        .await?;

    let req = mock.last_request();
    assert_eq!(req.method, Method::PUT);
    assert_eq!(
        req.header("X-Akamai-ACS-Action"),
        "version=1&action=rename&format=xml&destination=%2F12345%2Fnew%20name.txt"
    );
    assert_eq!(
        req.header("X-Akamai-ACS-Auth-Sign"),
        "2D7AzdUrINJWG6Dba1HMPJLdBmY1ta6ydVVXXZPx3tE="
    );
    assert!(req.body.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_mtime_wire_headers() -> Result<()> {
    let (client, mock) = new_client(StatusCode::OK, "");
    client
        .mtime(
            "/12345/file.txt",
            Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap(),
        )
        .await?;

    let req = mock.last_request();
    assert_eq!(
        req.header("X-Akamai-ACS-Action"),
        "version=1&action=mtime&format=xml&mtime=1462104000"
    );
    assert_eq!(
        req.header("X-Akamai-ACS-Auth-Sign"),
        "8KLZFY0eZwrsGVsNPXnH230B2dnEKPWJUG+/tuNWQBw="
    );

    Ok(())
}

#[tokio::test]
async fn test_symlink_wire_headers() -> Result<()> {
    let (client, mock) = new_client(StatusCode::OK, "");
    client.symlink("/12345/file.txt", "/12345/link").await?;

    let req = mock.last_request();
    assert_eq!(req.uri, "http://example-nsu.akamaihd.net/12345/link");
    assert_eq!(
        req.header("X-Akamai-ACS-Action"),
        "version=1&action=symlink&format=xml&target=%2F12345%2Ffile.txt"
    );
    assert_eq!(
        req.header("X-Akamai-ACS-Auth-Sign"),
        "uklkaH9qgtRro8SUAlSs6+crJ9JKvwoWa2/ERsFsC4M="
    );

    Ok(())
}

#[test]
fn test_signer_matches_pure_signing() -> Result<()> {
    let signer = RequestSigner::new()
        .with_time(Utc.timestamp_opt(NOW, 0).unwrap())
        .with_nonce(StaticNonce::new(NONCE));
    let cred = Credential::new("secret", "upload");
    let fields: Map<String, Value> = json!({"action": "dir"})
        .as_object()
        .cloned()
        .unwrap();

    let signed = signer.sign("/12345/dir", &fields, &cred)?;
    let pure = sign_with_context(
        "/12345/dir",
        &fields,
        "secret",
        &AuthContext::new(NOW as u64, NONCE, "upload"),
    );

    assert_eq!(signed, pure);
    assert_eq!(signed.auth_data, AUTH_DATA);
    Ok(())
}
