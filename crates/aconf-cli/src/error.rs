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

//! Structured error types for the AConf CLI.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// File read failed.
    #[error("I/O error for '{path}': {message}")]
    Io {
        /// The file path that caused the error.
        path: PathBuf,
        /// The error message.
        message: String,
    },

    /// Loading a configuration file failed.
    #[error("failed to parse {path}: {message}")]
    Load {
        /// The configuration file being loaded.
        path: PathBuf,
        /// The loader's diagnostic.
        message: String,
    },

    /// The `--flagbits` argument was not the expected JSON shape.
    #[error("malformed flagbits {raw}: {message}")]
    MalformedFlagBits {
        /// The raw argument text.
        raw: String,
        /// What was wrong with it.
        message: String,
    },

    /// The `--defaultconfig` argument was not the expected JSON shape.
    #[error("malformed defaultconfig {raw}: {message}")]
    MalformedDefaultConfig {
        /// The raw argument text.
        raw: String,
        /// What was wrong with it.
        message: String,
    },

    /// JSON input could not be converted to a value tree.
    #[error("JSON conversion error: {0}")]
    JsonConversion(String),

    /// Re-serialization to configuration text failed.
    #[error("dump error: {0}")]
    Dump(String),
}

impl CliError {
    /// Wrap a `std::io::Error` with its path.
    pub fn io_error(path: impl Into<PathBuf>, error: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: error.to_string(),
        }
    }
}
