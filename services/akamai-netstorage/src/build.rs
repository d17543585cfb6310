// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::str::FromStr;

use bytes::Bytes;
use http::header::{HeaderName, ACCEPT};
use http::{HeaderValue, Method, Uri};
use log::debug;
use netstorage_core::merge::merge;
use netstorage_core::utils::trim_slashes;
use netstorage_core::{Context, Error, Result, TransportKind};
use percent_encoding::utf8_percent_encode;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::constants::URI_PATH_ENCODE_SET;
use crate::sign_request::RequestSigner;

/// RequestParams describes one call before it is turned into a request.
///
/// - `request`: transport options, `method` and `headers` are understood,
///   `headers` are merged over the generated auth headers.
/// - `headers`: the action and its specific fields, signed into
///   `X-Akamai-ACS-Action`.
/// - `file`: raw payload of an upload.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestParams {
    /// Transport options.
    pub request: Map<String, Value>,
    /// Action fields.
    pub headers: Map<String, Value>,
    /// Upload payload.
    pub file: Option<Bytes>,
}

impl RequestParams {
    /// Create params for `action`.
    pub fn new(action: &str) -> Self {
        Self::default().with_field("action", action)
    }

    /// Set the http method.
    pub fn with_method(self, method: &str) -> Self {
        self.with_request_option("method", method)
    }

    /// Set a transport option.
    pub fn with_request_option(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.request.insert(key.to_string(), value.into());
        self
    }

    /// Set an action field.
    pub fn with_field(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.headers.insert(key.to_string(), value.into());
        self
    }

    /// Attach an upload payload.
    pub fn with_file(mut self, data: impl Into<Bytes>) -> Self {
        self.file = Some(data.into());
        self
    }
}

/// Build the request uri of `path`.
///
/// One leading and one trailing `/` are stripped from the path, bytes that
/// can't appear in a uri path are percent encoded.
///
/// ```
/// use netstorage_akamai::{uri, Config};
///
/// let config = Config::new().with_host("x.com");
/// assert_eq!(uri("foo/", &config).unwrap(), "http://x.com/foo");
/// ```
pub fn uri(path: &str, config: &Config) -> Result<String> {
    let host = config
        .host
        .as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| Error::config_invalid("host must be configured before sending requests"))?;
    let scheme = if config.ssl { "https" } else { "http" };

    Ok(format!(
        "{scheme}://{host}/{}",
        utf8_percent_encode(trim_slashes(path), &URI_PATH_ENCODE_SET)
    ))
}

/// RequestBuilder turns [`RequestParams`] into a signed http request.
#[derive(Debug, Clone, Default)]
pub struct RequestBuilder {
    signer: RequestSigner,
}

impl RequestBuilder {
    /// Create a builder signing with `signer`.
    pub fn new(signer: RequestSigner) -> Self {
        Self { signer }
    }

    /// Build the request of `params` on `path`.
    ///
    /// The transport options in `params.request` are merged over
    /// `{url, headers: <auth headers>}`, so an option wins over a generated
    /// value of the same name. The method defaults to `GET`. Only a `PUT`
    /// carrying a file sends a body, every other request is sent empty.
    pub fn build(
        &self,
        ctx: &Context,
        path: &str,
        params: RequestParams,
        config: &Config,
    ) -> Result<http::Request<Bytes>> {
        if ctx.transport_kind() == TransportKind::Unavailable {
            return Err(Error::transport_unavailable(
                "Unable to create request: no usable transport configured",
            ));
        }

        let cred = config.credential()?;
        let url = uri(path, config)?;
        let auth = self.signer.sign(path, &params.headers, &cred)?;

        let mut defaults = Map::with_capacity(2);
        defaults.insert("url".to_string(), Value::String(url));
        defaults.insert("headers".to_string(), auth.to_json());
        let options = merge(&Value::Object(defaults), &Value::Object(params.request));

        let method = match options.get("method") {
            None | Some(Value::Null) => Method::GET,
            Some(Value::String(m)) => Method::from_bytes(m.to_ascii_uppercase().as_bytes())?,
            Some(v) => {
                return Err(Error::request_invalid(format!(
                    "request method must be a string, got {v}"
                )))
            }
        };
        let url = options
            .get("url")
            .and_then(Value::as_str)
            .ok_or_else(|| Error::request_invalid("request url must be a string"))?;

        let body = match params.file {
            Some(data) if method == Method::PUT => data,
            _ => Bytes::new(),
        };

        debug!("build request: {method} {url}");
        let mut req = http::Request::builder()
            .method(method)
            .uri(Uri::from_str(url)?)
            .body(body)?;

        if let Some(headers) = options.get("headers") {
            let headers = headers
                .as_object()
                .ok_or_else(|| Error::request_invalid("request headers must be an object"))?;
            for (k, v) in headers {
                let name = HeaderName::from_bytes(k.as_bytes())?;
                let value = header_value(k, v)?;
                req.headers_mut().insert(name, value);
            }
        }
        req.headers_mut()
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static("text/xml"));

        Ok(req)
    }
}

fn header_value(name: &str, v: &Value) -> Result<HeaderValue> {
    let s = match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => {
            return Err(Error::request_invalid(format!(
                "header {name} must be a scalar value"
            )))
        }
    };
    Ok(HeaderValue::from_str(&s)?)
}
