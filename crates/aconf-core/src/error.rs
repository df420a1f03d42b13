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

//! Error types for AConf parsing and loading.

use std::fmt;
use thiserror::Error;

/// The kind of error that occurred while processing a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AconfErrorKind {
    /// Lexical violation (unterminated string, bad tag bracket, etc).
    Lex,
    /// Grammar violation (unexpected or missing token).
    Parse,
    /// An included file could not be opened or read.
    IncludeIo,
    /// An include directive could not be resolved.
    Include,
    /// Duplicate key prohibited by the active options.
    DuplicateKey,
    /// Undefined variable referenced during interpolation.
    UndefinedVariable,
    /// Invalid option combination.
    Options,
}

impl fmt::Display for AconfErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Lex => write!(f, "LexError"),
            Self::Parse => write!(f, "ParseError"),
            Self::IncludeIo => write!(f, "IncludeIOError"),
            Self::Include => write!(f, "IncludeError"),
            Self::DuplicateKey => write!(f, "DuplicateKeyError"),
            Self::UndefinedVariable => write!(f, "UndefinedVariableError"),
            Self::Options => write!(f, "OptionsError"),
        }
    }
}

/// An error raised while loading or dumping a configuration.
///
/// Carries the source identifier (file path or `<string>` for in-memory
/// loads) and a 1-based line number when one applies; line 0 means the
/// error is not tied to a particular line.
#[derive(Debug, Clone, Error)]
#[error("{kind} at line {line}: {message}")]
pub struct AconfError {
    /// The kind of error.
    pub kind: AconfErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Line number (1-based, 0 when not applicable).
    pub line: usize,
    /// Identifier of the source being processed, if known.
    pub source_name: Option<String>,
}

impl AconfError {
    /// Create a new error.
    pub fn new(kind: AconfErrorKind, message: impl Into<String>, line: usize) -> Self {
        Self {
            kind,
            message: message.into(),
            line,
            source_name: None,
        }
    }

    /// Attach the identifier of the source being processed.
    pub fn with_source_name(mut self, source: impl Into<String>) -> Self {
        if self.source_name.is_none() {
            self.source_name = Some(source.into());
        }
        self
    }

    // Convenience constructors for each error kind

    pub fn lex(message: impl Into<String>, line: usize) -> Self {
        Self::new(AconfErrorKind::Lex, message, line)
    }

    pub fn parse(message: impl Into<String>, line: usize) -> Self {
        Self::new(AconfErrorKind::Parse, message, line)
    }

    pub fn include_io(message: impl Into<String>) -> Self {
        Self::new(AconfErrorKind::IncludeIo, message, 0)
    }

    pub fn include(message: impl Into<String>, line: usize) -> Self {
        Self::new(AconfErrorKind::Include, message, line)
    }

    pub fn duplicate_key(key: &str, line: usize) -> Self {
        Self::new(
            AconfErrorKind::DuplicateKey,
            format!("duplicate option \"{}\" prohibited", key),
            line,
        )
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(
            AconfErrorKind::UndefinedVariable,
            format!("undefined variable \"${{{}}}\" referenced", name),
            0,
        )
    }

    pub fn options(message: impl Into<String>) -> Self {
        Self::new(AconfErrorKind::Options, message, 0)
    }
}

/// Result type for AConf operations.
pub type AconfResult<T> = Result<T, AconfError>;
