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

//! Per request nonces.

use std::fmt::Debug;

use rand::rngs::OsRng;
use rand::RngCore;

/// Number of random bytes carried in a nonce.
const NONCE_BYTES: usize = 6;

/// GenerateNonce produces the unique id carried in the auth data of every
/// request, so that a signed request can't be replayed.
pub trait GenerateNonce: Debug + Send + Sync + 'static {
    /// Produce the next nonce.
    fn next_nonce(&self) -> String;
}

/// RandomNonce draws nonces from the operating system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomNonce;

impl GenerateNonce for RandomNonce {
    fn next_nonce(&self) -> String {
        render_nonce(|| OsRng.next_u32())
    }
}

/// StaticNonce always returns the same nonce.
///
/// # Note
///
/// A fixed nonce makes signatures replayable. Only use this for testing.
#[derive(Debug, Clone)]
pub struct StaticNonce(String);

impl StaticNonce {
    /// Create a StaticNonce returning `nonce`.
    pub fn new(nonce: impl Into<String>) -> Self {
        Self(nonce.into())
    }
}

impl GenerateNonce for StaticNonce {
    fn next_nonce(&self) -> String {
        self.0.clone()
    }
}

/// Render six bytes as concatenated decimal values, without separators or
/// padding. A new 32-bit word is drawn every four bytes and consumed from
/// its low byte up.
fn render_nonce(mut next_word: impl FnMut() -> u32) -> String {
    let mut word = 0;
    (0..NONCE_BYTES)
        .map(|i| {
            if i & 0x03 == 0 {
                word = next_word();
            }
            ((word >> ((i & 0x03) << 3)) & 0xff).to_string()
        })
        .collect()
}
