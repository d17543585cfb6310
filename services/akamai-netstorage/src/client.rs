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

use std::sync::Arc;

use bytes::Bytes;
use log::debug;
use netstorage_core::time::DateTime;
use netstorage_core::{Context, Result};
use serde::Serialize;

use crate::build::RequestBuilder;
use crate::config::{Config, ConfigStore};
use crate::operation::Operation;
use crate::response::{classify, Response};
use crate::sign_request::RequestSigner;
use crate::xml::{DecodeXml, XmlDecoder};

/// Client is the entry point of NetStorage operations.
///
/// Every operation signs and sends exactly one request, and ends with
/// exactly one result. Nothing is retried.
///
/// ## Example
///
/// ```no_run
/// use netstorage_akamai::{Client, Config};
/// use netstorage_core::{Context, OsEnv};
/// use netstorage_http_send_reqwest::ReqwestHttpSend;
///
/// # async fn example() -> netstorage_core::Result<()> {
/// let ctx = Context::new()
///     .with_http_send(ReqwestHttpSend::default())
///     .with_env(OsEnv);
/// let config = Config::new().from_env(&ctx);
/// let client = Client::new(ctx).with_config(config);
///
/// if !client.file_exists("/12345/file.txt").await? {
///     client.upload("hello world", "/12345/file.txt").await?;
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client {
    ctx: Context,
    config: ConfigStore,
    builder: RequestBuilder,
    decoder: Arc<dyn DecodeXml>,
}

impl Client {
    /// Create a new client with an empty config.
    pub fn new(ctx: Context) -> Self {
        Self {
            ctx,
            config: ConfigStore::default(),
            builder: RequestBuilder::default(),
            decoder: Arc::new(XmlDecoder),
        }
    }

    /// Replace the config.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = ConfigStore::new(config);
        self
    }

    /// Replace the request signer.
    pub fn with_signer(mut self, signer: RequestSigner) -> Self {
        self.builder = RequestBuilder::new(signer);
        self
    }

    /// Replace the xml decoder.
    pub fn with_decoder(mut self, decoder: impl DecodeXml) -> Self {
        self.decoder = Arc::new(decoder);
        self
    }

    /// Merge `partial` into the current config, see [`ConfigStore::set_config`].
    pub fn set_config(&self, partial: impl Serialize) -> Result<&Self> {
        self.config.set_config(partial)?;
        Ok(self)
    }

    /// Get a snapshot of the current config.
    pub fn config(&self) -> Config {
        self.config.config()
    }

    /// Sign and send `op` on `path`.
    pub async fn send(&self, path: &str, op: Operation) -> Result<Response> {
        let config = self.config.config();
        let req = self
            .builder
            .build(&self.ctx, path, op.into_params(), &config)?;

        debug!("send request: {} {}", req.method(), req.uri());
        let resp = self.ctx.http_send_as_string(req).await?;
        debug!("got response: {}", resp.status());

        classify(
            resp.status(),
            resp.body(),
            config.verbose,
            self.decoder.as_ref(),
        )
    }

    /// Upload `content` to `path`.
    pub async fn upload(&self, content: impl Into<Bytes>, path: &str) -> Result<Response> {
        let content = content.into();
        self.send(path, Operation::Upload { content }).await
    }

    /// Download the file at `path`.
    pub async fn download(&self, path: &str) -> Result<Response> {
        self.send(path, Operation::Download).await
    }

    /// Stat the file or directory at `path`.
    pub async fn stat(&self, path: &str) -> Result<Response> {
        self.send(path, Operation::Stat).await
    }

    /// Get the disk usage of the directory at `path`.
    pub async fn du(&self, path: &str) -> Result<Response> {
        self.send(path, Operation::Du).await
    }

    /// List the directory at `path`.
    pub async fn dir(&self, path: &str) -> Result<Response> {
        self.send(path, Operation::Dir).await
    }

    /// Delete the file at `path`.
    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.send(path, Operation::Delete).await
    }

    /// Create a directory at `path`.
    pub async fn mkdir(&self, path: &str) -> Result<Response> {
        self.send(path, Operation::Mkdir).await
    }

    /// Remove the empty directory at `path`.
    pub async fn rmdir(&self, path: &str) -> Result<Response> {
        self.send(path, Operation::Rmdir).await
    }

    /// Rename `path_from` to `path_to`.
    pub async fn rename(&self, path_from: &str, path_to: &str) -> Result<Response> {
        let destination = path_to.to_string();
        self.send(path_from, Operation::Rename { destination }).await
    }

    /// Create a symlink at `link_path` pointing to `target`.
    pub async fn symlink(&self, target: &str, link_path: &str) -> Result<Response> {
        let target = target.to_string();
        self.send(link_path, Operation::Symlink { target }).await
    }

    /// Set the modification time of `path` to `date`.
    ///
    /// Dates before the unix epoch are rejected before anything is sent.
    pub async fn mtime(&self, path: &str, date: DateTime) -> Result<Response> {
        let op = Operation::mtime(date)?;
        self.send(path, op).await
    }

    /// Check if a file exists at `path`.
    ///
    /// A `404` from stat means `false`, a stat result describing a file
    /// means `true`. Any other error is returned unchanged.
    pub async fn file_exists(&self, path: &str) -> Result<bool> {
        match self.stat(path).await {
            Ok(resp) => Ok(resp
                .decoded()
                .and_then(|v| v.get("stat"))
                .and_then(|v| v.get("file"))
                .is_some()),
            Err(err) if err.is_not_found() => Ok(false),
            Err(err) => Err(err),
        }
    }
}
