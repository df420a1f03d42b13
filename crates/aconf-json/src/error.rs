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

//! Error type for JSON conversion.

use thiserror::Error;

/// An error during value-tree ↔ JSON conversion.
#[derive(Debug, Error)]
pub enum JsonError {
    /// The input was not valid JSON.
    #[error("invalid JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// The JSON root must be an object to form a value tree.
    #[error("JSON root must be an object, got {0}")]
    NonObjectRoot(&'static str),
}

/// Result type for JSON conversion.
pub type JsonResult<T> = Result<T, JsonError>;
