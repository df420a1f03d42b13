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

//! JSON conversion for AConf value trees.
//!
//! Bridges the loaded value tree and JSON in both directions. Key order
//! is preserved (the `preserve_order` feature of `serde_json`), so a
//! tree → JSON → tree trip is the identity on structure and order.
//!
//! # Examples
//!
//! ```
//! use aconf_core::loads;
//! use aconf_json::{to_json, from_json};
//!
//! let tree = loads("a 1\n<b>\nc 2\n</b>\n").unwrap();
//! let json = to_json(&tree).unwrap();
//! assert_eq!(json, r#"{"a":"1","b":{"c":"2"}}"#);
//! assert_eq!(from_json(&json).unwrap(), tree);
//! ```

mod error;
mod from_json;
mod to_json;

pub use error::{JsonError, JsonResult};
pub use from_json::{from_json, from_json_value};
pub use to_json::{to_json, to_json_pretty, to_json_value};
