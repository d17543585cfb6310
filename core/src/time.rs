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

//! Time related utils.

use chrono::Utc;

/// DateTime is the alias for chrono's UTC date time.
pub type DateTime = chrono::DateTime<Utc>;

/// Create a DateTime of now.
pub fn now() -> DateTime {
    Utc::now()
}

/// Seconds since the unix epoch, `None` for times before it.
pub fn unix_seconds(t: DateTime) -> Option<u64> {
    u64::try_from(t.timestamp()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_unix_seconds() {
        let t = Utc.with_ymd_and_hms(2016, 5, 1, 12, 0, 0).unwrap();
        assert_eq!(unix_seconds(t), Some(1462104000));

        let t = Utc.with_ymd_and_hms(1969, 12, 31, 23, 59, 59).unwrap();
        assert_eq!(unix_seconds(t), None);
    }
}
