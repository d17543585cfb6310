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

//! NetStorage request authentication.
//!
//! Every request carries three headers:
//!
//! - `X-Akamai-ACS-Action`: the url encoded action query
//! - `X-Akamai-ACS-Auth-Data`: the auth data tuple
//! - `X-Akamai-ACS-Auth-Sign`: base64 HMAC-SHA256 of the string to sign

use std::fmt::{Display, Formatter};
use std::sync::Arc;

use log::debug;
use netstorage_core::hash::base64_hmac_sha256;
use netstorage_core::merge::merge;
use netstorage_core::time::{now, unix_seconds, DateTime};
use netstorage_core::utils::trim_trailing_slash;
use netstorage_core::{Error, Result};
use percent_encoding::utf8_percent_encode;
use serde_json::{Map, Value};

use crate::config::Credential;
use crate::constants::*;
use crate::nonce::{GenerateNonce, RandomNonce};

/// RequestSigner builds the authentication headers of NetStorage requests.
#[derive(Debug, Clone)]
pub struct RequestSigner {
    time: Option<DateTime>,
    nonce: Arc<dyn GenerateNonce>,
}

impl Default for RequestSigner {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestSigner {
    /// Create a signer using the current time and random nonces.
    pub fn new() -> Self {
        Self {
            time: None,
            nonce: Arc::new(RandomNonce),
        }
    }

    /// Specify the signing time.
    ///
    /// # Note
    ///
    /// We should always take current time to sign requests.
    /// Only use this function for testing.
    pub fn with_time(mut self, time: DateTime) -> Self {
        self.time = Some(time);
        self
    }

    /// Replace the nonce generator.
    pub fn with_nonce(mut self, nonce: impl GenerateNonce) -> Self {
        self.nonce = Arc::new(nonce);
        self
    }

    /// Sign a request on `path` carrying the action `fields`.
    ///
    /// `fields` holds the action and its specific fields, for example
    /// `{"action": "rename", "destination": "/new/path"}`.
    pub fn sign(
        &self,
        path: &str,
        fields: &Map<String, Value>,
        cred: &Credential,
    ) -> Result<AuthHeaders> {
        let now = self.time.unwrap_or_else(now);
        let timestamp = unix_seconds(now).ok_or_else(|| {
            Error::request_invalid("signing time must not be before the unix epoch")
        })?;

        let auth = AuthContext::new(timestamp, self.nonce.next_nonce(), &cred.key_name);
        Ok(sign_with_context(path, fields, &cred.key, &auth))
    }
}

/// AuthContext is the auth data tuple of one request.
///
/// It must be fresh for every request: the timestamp and nonce are what
/// prevents a signature from being replayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Version of the auth data format.
    pub version: u32,
    /// Client ip, always unspecified.
    pub client_ip: String,
    /// Server ip, always unspecified.
    pub server_ip: String,
    /// Unix seconds of the signing time.
    pub timestamp: u64,
    /// Unique id of this request.
    pub nonce: String,
    /// Name of the signing key.
    pub key_name: String,
}

impl AuthContext {
    /// Create an auth context for `key_name` signed at `timestamp`.
    pub fn new(timestamp: u64, nonce: impl Into<String>, key_name: impl Into<String>) -> Self {
        Self {
            version: AUTH_DATA_VERSION,
            client_ip: UNSPECIFIED_IP.to_string(),
            server_ip: UNSPECIFIED_IP.to_string(),
            timestamp,
            nonce: nonce.into(),
            key_name: key_name.into(),
        }
    }
}

impl Display for AuthContext {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}, {}, {}, {}, {}, {}",
            self.version, self.client_ip, self.server_ip, self.timestamp, self.nonce, self.key_name
        )
    }
}

/// The three authentication header values of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeaders {
    /// Value of `X-Akamai-ACS-Action`.
    pub action: String,
    /// Value of `X-Akamai-ACS-Auth-Data`.
    pub auth_data: String,
    /// Value of `X-Akamai-ACS-Auth-Sign`.
    pub auth_sign: String,
}

impl AuthHeaders {
    /// Convert into a header map that can be merged with transport options.
    pub fn to_json(&self) -> Value {
        let mut m = Map::with_capacity(3);
        m.insert(X_AKAMAI_ACS_ACTION.to_string(), self.action.clone().into());
        m.insert(X_AKAMAI_ACS_AUTH_DATA.to_string(), self.auth_data.clone().into());
        m.insert(X_AKAMAI_ACS_AUTH_SIGN.to_string(), self.auth_sign.clone().into());
        Value::Object(m)
    }
}

/// Sign with a given auth context.
///
/// This is a pure function: the same path, fields, key and context always
/// yield the same headers.
pub fn sign_with_context(
    path: &str,
    fields: &Map<String, Value>,
    key: &str,
    auth: &AuthContext,
) -> AuthHeaders {
    let action = action_query(fields);
    let auth_data = auth.to_string();

    let s = string_to_sign(&auth_data, path, &action);
    debug!("string to sign: {}", &s);
    let auth_sign = base64_hmac_sha256(key.as_bytes(), s.as_bytes());

    AuthHeaders {
        action,
        auth_data,
        auth_sign,
    }
}

/// Construct string to sign
///
/// ## Format
///
/// ```text
/// AuthData + Path + "\n" +
/// "x-akamai-acs-action:" + ActionQuery + "\n"
/// ```
///
/// One trailing `/` is stripped from the path. This layout is matched
/// byte for byte by the server.
pub fn string_to_sign(auth_data: &str, path: &str, action: &str) -> String {
    format!(
        "{auth_data}{}\n{SIGNED_ACTION_HEADER}:{action}\n",
        trim_trailing_slash(path)
    )
}

/// Build the url encoded action query.
///
/// `fields` are merged over `{version: 1, action: "du", format: "xml"}`,
/// keys keep the order the merge produced them in. Arrays repeat their
/// key, objects and null are sent as empty values.
pub fn action_query(fields: &Map<String, Value>) -> String {
    let mut defaults = Map::with_capacity(3 + fields.len());
    defaults.insert("version".to_string(), ACTION_VERSION.into());
    defaults.insert("action".to_string(), "du".into());
    defaults.insert("format".to_string(), "xml".into());

    let merged = merge(&Value::Object(defaults), &Value::Object(fields.clone()));

    let mut pairs = Vec::new();
    if let Value::Object(m) = &merged {
        for (k, v) in m {
            match v {
                Value::Array(items) => {
                    pairs.extend(items.iter().map(|item| (k.as_str(), query_value(item))))
                }
                v => pairs.push((k.as_str(), query_value(v))),
            }
        }
    }

    pairs
        .into_iter()
        .map(|(k, v)| {
            format!(
                "{}={}",
                utf8_percent_encode(k, &ACTION_QUERY_ENCODE_SET),
                utf8_percent_encode(&v, &ACTION_QUERY_ENCODE_SET)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

fn query_value(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    }
}
