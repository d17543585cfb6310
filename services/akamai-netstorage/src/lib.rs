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

//! Signing and sending requests to Akamai NetStorage.
//!
//! Requests are authenticated with the `X-Akamai-ACS-*` headers: the action
//! query, the auth data tuple (version, timestamp, nonce, key name) and a
//! base64 HMAC-SHA256 signature of both.
//!
//! Use [`Client`] for the high level operations, or [`RequestBuilder`] and
//! [`classify`] to drive requests with your own transport loop.

mod config;
pub use config::{Config, ConfigStore, Credential};

mod constants;
pub use constants::*;

mod nonce;
pub use nonce::{GenerateNonce, RandomNonce, StaticNonce};

mod sign_request;
pub use sign_request::{
    action_query, sign_with_context, string_to_sign, AuthContext, AuthHeaders, RequestSigner,
};

mod build;
pub use build::{uri, RequestBuilder, RequestParams};

mod xml;
pub use xml::{DecodeXml, XmlDecoder};

mod response;
pub use response::{classify, Response};

mod operation;
pub use operation::Operation;

mod client;
pub use client::Client;
