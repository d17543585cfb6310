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

use std::fmt::{Debug, Formatter};
use std::sync::RwLock;

use log::debug;
use netstorage_core::merge::merge;
use netstorage_core::utils::Redact;
use netstorage_core::{Context, Error, Result};
use serde::{Deserialize, Serialize};

use crate::constants::*;

/// Config carries all the settings of a NetStorage client.
///
/// The serialized field names (`key`, `keyName`, `host`, `ssl`, `verbose`)
/// are the ones accepted by [`ConfigStore::set_config`].
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// `key` is the shared secret used to sign requests, loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AKAMAI_NETSTORAGE_KEY`]
    pub key: Option<String>,
    /// `key_name` is the name of the upload account key, loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AKAMAI_NETSTORAGE_KEY_NAME`]
    pub key_name: Option<String>,
    /// `host` is the NetStorage host name, loaded from
    ///
    /// - this field if it's `is_some`
    /// - env value: [`AKAMAI_NETSTORAGE_HOST`]
    pub host: Option<String>,
    /// Send requests over https instead of http.
    pub ssl: bool,
    /// Embed raw response bodies in error messages.
    ///
    /// Bodies may carry sensitive data, keep this off when errors end up in
    /// untrusted logs.
    pub verbose: bool,
}

impl Config {
    /// Create a new Config
    pub fn new() -> Self {
        Self::default()
    }

    /// Set key
    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set key_name
    pub fn with_key_name(mut self, key_name: impl Into<String>) -> Self {
        self.key_name = Some(key_name.into());
        self
    }

    /// Set host
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set ssl
    pub fn with_ssl(mut self, ssl: bool) -> Self {
        self.ssl = ssl;
        self
    }

    /// Set verbose
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Load config from env.
    ///
    /// Fields that are already set win over env values. `ssl` and
    /// `verbose` are switched on by `true`, `1`, `yes` or `on`.
    pub fn from_env(mut self, ctx: &Context) -> Self {
        if let Some(v) = ctx.env_var(AKAMAI_NETSTORAGE_KEY) {
            self.key.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(AKAMAI_NETSTORAGE_KEY_NAME) {
            self.key_name.get_or_insert(v);
        }
        if let Some(v) = ctx.env_var(AKAMAI_NETSTORAGE_HOST) {
            self.host.get_or_insert(v);
        }
        if ctx.env_var(AKAMAI_NETSTORAGE_SSL).is_some_and(|v| is_enabled(&v)) {
            self.ssl = true;
        }
        if ctx
            .env_var(AKAMAI_NETSTORAGE_VERBOSE)
            .is_some_and(|v| is_enabled(&v))
        {
            self.verbose = true;
        }

        self
    }

    /// Build the signing credential out of this config.
    ///
    /// Both `key` and `key_name` must be set and non-empty, we never sign
    /// with empty values.
    pub fn credential(&self) -> Result<Credential> {
        match (self.key.as_deref(), self.key_name.as_deref()) {
            (Some(key), Some(key_name)) if !key.is_empty() && !key_name.is_empty() => {
                Ok(Credential::new(key, key_name))
            }
            (None, _) | (Some(""), _) => Err(Error::config_invalid(
                "key must be configured before signing requests",
            )),
            _ => Err(Error::config_invalid(
                "keyName must be configured before signing requests",
            )),
        }
    }
}

fn is_enabled(v: &str) -> bool {
    matches!(
        v.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes" | "on"
    )
}

impl Debug for Config {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("key", &self.key.as_ref().map(Redact::from))
            .field("key_name", &self.key_name)
            .field("host", &self.host)
            .field("ssl", &self.ssl)
            .field("verbose", &self.verbose)
            .finish()
    }
}

/// Credential used to sign requests.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// Shared secret key.
    pub key: String,
    /// Name of the key.
    pub key_name: String,
}

impl Credential {
    /// Create a new credential.
    pub fn new(key: impl Into<String>, key_name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_name: key_name.into(),
        }
    }
}

impl Debug for Credential {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("key", &Redact::from(&self.key))
            .field("key_name", &self.key_name)
            .finish()
    }
}

/// ConfigStore holds the current [`Config`] of a client.
///
/// The only way to change it is [`ConfigStore::set_config`], which merges a
/// partial config into the current one. Fields are overwritten, never
/// removed. Readers get a cloned snapshot; a reader racing an update may
/// observe either the old or the new config.
#[derive(Debug, Default)]
pub struct ConfigStore {
    config: RwLock<Config>,
}

impl ConfigStore {
    /// Create a store holding `config`.
    pub fn new(config: Config) -> Self {
        Self {
            config: RwLock::new(config),
        }
    }

    /// Merge `partial` into the current config.
    ///
    /// `partial` is anything that serializes into an object using the
    /// [`Config`] field names, for example `json!({"host": "example.com"})`.
    /// The current config is kept untouched if the merged result is not a
    /// valid config.
    pub fn set_config(&self, partial: impl Serialize) -> Result<&Self> {
        let partial = serde_json::to_value(partial)?;

        let mut config = self.config.write().expect("lock must be valid");
        let current = serde_json::to_value(&*config)?;
        let merged: Config = serde_json::from_value(merge(&current, &partial))?;
        debug!("config updated: {merged:?}");
        *config = merged;

        Ok(self)
    }

    /// Get a snapshot of the current config.
    pub fn config(&self) -> Config {
        self.config.read().expect("lock must be valid").clone()
    }
}
