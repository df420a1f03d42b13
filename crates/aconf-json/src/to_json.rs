// Dweve AConf - Apache-style Configuration Language
//
// Copyright (c) 2025 Dweve IP B.V. and individual contributors.
//
// SPDX-License-Identifier: Apache-2.0
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License in the LICENSE file at the
// root of this repository or at: http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Value tree → JSON.

use crate::error::JsonResult;
use aconf_core::{ConfigMap, ConfigValue};
use serde_json::{Map, Value};

/// Convert a value tree to a `serde_json::Value`.
///
/// Scalars stay strings, lists become arrays, nested mappings become
/// objects in insertion order, and the null scalar becomes JSON `null`.
pub fn to_json_value(tree: &ConfigMap) -> Value {
    Value::Object(map_to_object(tree))
}

fn map_to_object(map: &ConfigMap) -> Map<String, Value> {
    map.iter()
        .map(|(key, value)| (key.clone(), value_to_json(value)))
        .collect()
}

fn value_to_json(value: &ConfigValue) -> Value {
    match value {
        ConfigValue::Null => Value::Null,
        ConfigValue::Str(s) => Value::String(s.clone()),
        ConfigValue::List(items) => Value::Array(items.iter().map(value_to_json).collect()),
        ConfigValue::Map(map) => Value::Object(map_to_object(map)),
    }
}

/// Serialize a value tree to a compact JSON string.
pub fn to_json(tree: &ConfigMap) -> JsonResult<String> {
    Ok(serde_json::to_string(&to_json_value(tree))?)
}

/// Serialize a value tree to a pretty-printed JSON string.
pub fn to_json_pretty(tree: &ConfigMap) -> JsonResult<String> {
    Ok(serde_json::to_string_pretty(&to_json_value(tree))?)
}
