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

use http::StatusCode;
use log::debug;
use netstorage_core::{Error, Result};
use serde_json::Value;

use crate::xml::DecodeXml;

/// Response is the successful outcome of a NetStorage request.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    /// The server answered with an xml document.
    Decoded(Value),
    /// The server answered without an xml document, only the status code
    /// is kept.
    Status(StatusCode),
}

impl Response {
    /// Get the decoded document if this response carries one.
    pub fn decoded(&self) -> Option<&Value> {
        match self {
            Response::Decoded(v) => Some(v),
            Response::Status(_) => None,
        }
    }

    /// Get the status code if this response carries no document.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Response::Decoded(_) => None,
            Response::Status(status) => Some(*status),
        }
    }
}

/// Classify a completed request into exactly one result.
///
/// - status >= 300: [`ErrorKind::HttpStatus`](netstorage_core::ErrorKind::HttpStatus)
///   carrying the status, with the body appended to the message in verbose
///   mode.
/// - body without a leading xml declaration: [`Response::Status`].
/// - xml body: decoded by `decoder`, [`ErrorKind::DecodeFailed`](netstorage_core::ErrorKind::DecodeFailed)
///   if it can't be decoded.
pub fn classify(
    status: StatusCode,
    body: &str,
    verbose: bool,
    decoder: &dyn DecodeXml,
) -> Result<Response> {
    if status.as_u16() >= 300 {
        let mut msg = format!("The server sent us the {} code", status.as_u16());
        if verbose && !body.is_empty() {
            msg.push_str(". Response: ");
            msg.push_str(body);
        }
        return Err(Error::http_status(status, msg));
    }

    if !is_xml(body) {
        debug!("response carries no xml document, status: {status}");
        return Ok(Response::Status(status));
    }

    match decoder.decode(body) {
        Some(v) => Ok(Response::Decoded(v)),
        None => {
            let mut msg = "Unable to parse the response text".to_string();
            if verbose && !body.is_empty() {
                msg.push_str(". Data: ");
                msg.push_str(body);
            }
            Err(Error::decode_failed(msg))
        }
    }
}

/// Check if the body starts with an xml declaration: `<?xml` followed by
/// at least one whitespace.
fn is_xml(body: &str) -> bool {
    body.strip_prefix("<?xml")
        .and_then(|rest| rest.chars().next())
        .is_some_and(char::is_whitespace)
}
