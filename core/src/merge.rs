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

//! Recursive structural merge of json values.
//!
//! Every place that combines two partial configurations (config updates,
//! default query fields, transport overrides on generated headers) goes
//! through [`merge`].

use serde_json::{Map, Value};

/// Merge `source` into `target` and return the result.
///
/// Neither input is modified.
///
/// ## Arrays
///
/// The result starts as a copy of `target`. For each element of `source` at
/// index `i`:
///
/// - when the result has no element at `i`, the element is appended;
/// - when the element is an array or an object, it is merged into the
///   element of `target` at `i`;
/// - when the element is a scalar already present in `target`, it is
///   skipped;
/// - otherwise it is appended.
///
/// ## Objects
///
/// The result starts as a copy of `target`. Scalar and null values of
/// `source` overwrite. Nested values are merged into the value of `target`
/// under the same key when that value is truthy, and are taken verbatim
/// otherwise. Key order follows `target` first, then new keys of `source`.
///
/// A `target` of the wrong shape (including a missing one during recursive
/// descent) is treated as empty. A scalar `source` replaces `target`.
///
/// Merging `{}` leaves an object unchanged, but the result always takes
/// the shape of `source`: merging `{}` into an array yields `{}`.
///
/// ```
/// use netstorage_core::merge::merge;
/// use serde_json::json;
///
/// let merged = merge(&json!({"a": 1, "b": {"c": 2}}), &json!({"b": {"d": 3}}));
/// assert_eq!(merged, json!({"a": 1, "b": {"c": 2, "d": 3}}));
/// ```
pub fn merge(target: &Value, source: &Value) -> Value {
    match source {
        Value::Array(src) => Value::Array(merge_array(target, src)),
        Value::Object(src) => Value::Object(merge_object(target, src)),
        scalar => scalar.clone(),
    }
}

fn merge_array(target: &Value, src: &[Value]) -> Vec<Value> {
    let target: &[Value] = match target {
        Value::Array(v) => v,
        _ => &[],
    };

    let mut dst = target.to_vec();
    for (i, e) in src.iter().enumerate() {
        if i >= dst.len() {
            dst.push(e.clone());
        } else if is_nested(e) {
            dst[i] = merge(target.get(i).unwrap_or(&Value::Null), e);
        } else if !target.contains(e) {
            dst.push(e.clone());
        }
    }
    dst
}

fn merge_object(target: &Value, src: &Map<String, Value>) -> Map<String, Value> {
    let target = target.as_object();

    let mut dst = target.cloned().unwrap_or_default();
    for (k, v) in src {
        let merged = match target.and_then(|t| t.get(k)) {
            Some(t) if is_nested(v) && is_truthy(t) => merge(t, v),
            _ => v.clone(),
        };
        dst.insert(k.clone(), merged);
    }
    dst
}

fn is_nested(v: &Value) -> bool {
    matches!(v, Value::Array(_) | Value::Object(_))
}

fn is_truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
