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

//! JSON → value tree.

use crate::error::{JsonError, JsonResult};
use aconf_core::{ConfigMap, ConfigValue};
use serde_json::Value;

/// Convert a JSON value into a value tree.
///
/// The root must be an object. Numbers and booleans become their display
/// strings, `null` becomes the null scalar. Key order follows the JSON
/// document.
pub fn from_json_value(json: &Value) -> JsonResult<ConfigMap> {
    match json {
        Value::Object(object) => Ok(object
            .iter()
            .map(|(key, value)| (key.clone(), json_to_value(value)))
            .collect()),
        other => Err(JsonError::NonObjectRoot(json_type_name(other))),
    }
}

/// Parse a JSON string into a value tree.
pub fn from_json(text: &str) -> JsonResult<ConfigMap> {
    let json: Value = serde_json::from_str(text)?;
    from_json_value(&json)
}

fn json_to_value(json: &Value) -> ConfigValue {
    match json {
        Value::Null => ConfigValue::Null,
        Value::Bool(b) => ConfigValue::Str(b.to_string()),
        Value::Number(n) => ConfigValue::Str(n.to_string()),
        Value::String(s) => ConfigValue::Str(s.clone()),
        Value::Array(items) => ConfigValue::List(items.iter().map(json_to_value).collect()),
        Value::Object(object) => ConfigValue::Map(
            object
                .iter()
                .map(|(key, value)| (key.clone(), json_to_value(value)))
                .collect(),
        ),
    }
}

fn json_type_name(json: &Value) -> &'static str {
    match json {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_root() {
        let tree = from_json(r#"{"a": "1", "b": {"c": "2"}}"#).unwrap();
        assert_eq!(tree["a"], ConfigValue::Str("1".to_string()));
        assert_eq!(
            tree["b"].as_map().unwrap()["c"],
            ConfigValue::Str("2".to_string())
        );
    }

    #[test]
    fn test_scalar_coercion() {
        let tree = from_json(r#"{"n": 42, "f": 1.5, "t": true, "nil": null}"#).unwrap();
        assert_eq!(tree["n"], ConfigValue::Str("42".to_string()));
        assert_eq!(tree["f"], ConfigValue::Str("1.5".to_string()));
        assert_eq!(tree["t"], ConfigValue::Str("true".to_string()));
        assert_eq!(tree["nil"], ConfigValue::Null);
    }

    #[test]
    fn test_array() {
        let tree = from_json(r#"{"x": ["1", "2"]}"#).unwrap();
        assert_eq!(
            tree["x"],
            ConfigValue::List(vec![
                ConfigValue::Str("1".to_string()),
                ConfigValue::Str("2".to_string())
            ])
        );
    }

    #[test]
    fn test_non_object_root_rejected() {
        assert!(matches!(
            from_json("[1, 2]"),
            Err(JsonError::NonObjectRoot("array"))
        ));
        assert!(matches!(
            from_json("\"x\""),
            Err(JsonError::NonObjectRoot("string"))
        ));
    }

    #[test]
    fn test_invalid_json_rejected() {
        assert!(matches!(from_json("{"), Err(JsonError::Parse(_))));
    }
}
