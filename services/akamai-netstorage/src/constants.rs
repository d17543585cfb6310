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

use percent_encoding::AsciiSet;
use percent_encoding::CONTROLS;
use percent_encoding::NON_ALPHANUMERIC;

// Headers used in netstorage requests.
pub const X_AKAMAI_ACS_ACTION: &str = "X-Akamai-ACS-Action";
pub const X_AKAMAI_ACS_AUTH_DATA: &str = "X-Akamai-ACS-Auth-Data";
pub const X_AKAMAI_ACS_AUTH_SIGN: &str = "X-Akamai-ACS-Auth-Sign";

// Env values used to configure the client.
pub const AKAMAI_NETSTORAGE_KEY: &str = "AKAMAI_NETSTORAGE_KEY";
pub const AKAMAI_NETSTORAGE_KEY_NAME: &str = "AKAMAI_NETSTORAGE_KEY_NAME";
pub const AKAMAI_NETSTORAGE_HOST: &str = "AKAMAI_NETSTORAGE_HOST";
pub const AKAMAI_NETSTORAGE_SSL: &str = "AKAMAI_NETSTORAGE_SSL";
pub const AKAMAI_NETSTORAGE_VERBOSE: &str = "AKAMAI_NETSTORAGE_VERBOSE";

/// Version of the auth data tuple.
pub const AUTH_DATA_VERSION: u32 = 5;
/// Version of the action query.
pub const ACTION_VERSION: u32 = 1;
/// Client and server ip placeholders carried in the auth data.
pub const UNSPECIFIED_IP: &str = "0.0.0.0";
/// Name of the signed action header inside the string to sign.
pub const SIGNED_ACTION_HEADER: &str = "x-akamai-acs-action";

/// AsciiSet for the action query.
///
/// Encode every byte except `A-Z a-z 0-9 - _ . ! ~ * ' ( )`, the same set a
/// browser leaves alone in `encodeURIComponent`.
pub static ACTION_QUERY_ENCODE_SET: AsciiSet = NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// AsciiSet for the path part of a request uri.
///
/// `/` is kept, so are all the bytes that are valid in a path.
pub static URI_PATH_ENCODE_SET: AsciiSet = CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');
