use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{TimeZone, Utc};
use http::{HeaderMap, Method, StatusCode};
use netstorage_akamai::{Client, Config, RequestSigner, StaticNonce};
use netstorage_core::{Context, HttpSend, Result};

pub const NOW: i64 = 1462104000;
pub const NONCE: &str = "123456";

/// A request seen by [`MockHttpSend`].
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: Method,
    pub uri: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl Recorded {
    pub fn header(&self, name: &str) -> &str {
        self.headers
            .get(name)
            .unwrap_or_else(|| panic!("header {name} must be set"))
            .to_str()
            .unwrap()
    }
}

/// MockHttpSend records every request and answers with a canned response.
#[derive(Debug, Clone)]
pub struct MockHttpSend {
    status: StatusCode,
    body: String,
    requests: Arc<Mutex<Vec<Recorded>>>,
}

impl MockHttpSend {
    pub fn new(status: StatusCode, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
            requests: Arc::default(),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> Recorded {
        self.requests().pop().expect("a request must be sent")
    }
}

#[async_trait]
impl HttpSend for MockHttpSend {
    async fn http_send(&self, req: http::Request<Bytes>) -> Result<http::Response<Bytes>> {
        let (parts, body) = req.into_parts();
        self.requests.lock().unwrap().push(Recorded {
            method: parts.method,
            uri: parts.uri.to_string(),
            headers: parts.headers,
            body,
        });

        Ok(http::Response::builder()
            .status(self.status)
            .body(Bytes::from(self.body.clone()))?)
    }
}

pub fn config() -> Config {
    Config::new()
        .with_key("secret")
        .with_key_name("upload")
        .with_host("example-nsu.akamaihd.net")
}

/// Build a client with a pinned clock and nonce answering `status` and `body`.
pub fn new_client(status: StatusCode, body: &str) -> (Client, MockHttpSend) {
    let _ = env_logger::builder().is_test(true).try_init();

    let mock = MockHttpSend::new(status, body);
    let ctx = Context::new().with_http_send(mock.clone());
    let client = Client::new(ctx).with_config(config()).with_signer(
        RequestSigner::new()
            .with_time(Utc.timestamp_opt(NOW, 0).unwrap())
            .with_nonce(StaticNonce::new(NONCE)),
    );

    (client, mock)
}
