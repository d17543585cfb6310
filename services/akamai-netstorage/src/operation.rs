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

use bytes::Bytes;
use http::Method;
use netstorage_core::time::{unix_seconds, DateTime};
use netstorage_core::{Error, Result};

use crate::build::RequestParams;

/// Operation is the closed set of NetStorage actions.
///
/// Each operation only contributes its method and action fields, the rest
/// of the request is built the same way for all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Upload `content` to the path.
    Upload {
        /// Raw file content.
        content: Bytes,
    },
    /// Download the file at the path.
    Download,
    /// Stat the file or directory at the path.
    Stat,
    /// Disk usage of the directory at the path.
    Du,
    /// List the directory at the path.
    Dir,
    /// Delete the file at the path.
    Delete,
    /// Create a directory at the path.
    Mkdir,
    /// Remove the empty directory at the path.
    Rmdir,
    /// Rename the path to `destination`.
    Rename {
        /// New path.
        destination: String,
    },
    /// Create a symlink at the path pointing to `target`.
    Symlink {
        /// Path the link points to.
        target: String,
    },
    /// Set the modification time of the path.
    Mtime {
        /// Unix seconds.
        mtime: u64,
    },
}

impl Operation {
    /// Build an [`Operation::Mtime`] out of a date.
    ///
    /// Dates before the unix epoch can't be expressed on the wire and are
    /// rejected before any request is built.
    pub fn mtime(date: DateTime) -> Result<Self> {
        let mtime = unix_seconds(date).ok_or_else(|| {
            Error::request_invalid(format!(
                "The date has to be at or after the unix epoch, got {date}"
            ))
        })?;
        Ok(Operation::Mtime { mtime })
    }

    /// Name of the action sent in `X-Akamai-ACS-Action`.
    pub fn action(&self) -> &'static str {
        match self {
            Operation::Upload { .. } => "upload",
            Operation::Download => "download",
            Operation::Stat => "stat",
            Operation::Du => "du",
            Operation::Dir => "dir",
            Operation::Delete => "delete",
            Operation::Mkdir => "mkdir",
            Operation::Rmdir => "rmdir",
            Operation::Rename { .. } => "rename",
            Operation::Symlink { .. } => "symlink",
            Operation::Mtime { .. } => "mtime",
        }
    }

    /// Http method of this operation.
    pub fn method(&self) -> Method {
        match self {
            Operation::Download | Operation::Stat | Operation::Du | Operation::Dir => Method::GET,
            _ => Method::PUT,
        }
    }

    /// Convert into request params.
    pub fn into_params(self) -> RequestParams {
        let params = RequestParams::new(self.action());
        let params = if self.method() == Method::GET {
            params
        } else {
            params.with_method(self.method().as_str())
        };

        match self {
            Operation::Upload { content } => {
                params.with_field("upload-type", "binary").with_file(content)
            }
            Operation::Rename { destination } => params.with_field("destination", destination),
            Operation::Symlink { target } => params.with_field("target", target),
            Operation::Mtime { mtime } => params.with_field("mtime", mtime),
            _ => params,
        }
    }
}
