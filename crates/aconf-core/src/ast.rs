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

//! Abstract syntax tree produced by the parser.
//!
//! The AST is a faithful record of the source: names keep their original
//! spelling and values their quoting, so diagnostics and re-rendering see
//! what was written. Case folding and value materialization happen in the
//! loader.

/// Separator between an option name and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    Whitespace,
    Equals,
    Colon,
}

/// Quote style of a quoted value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteStyle {
    Single,
    Double,
}

/// Comment style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentStyle {
    Hash,
    C,
}

/// Right-hand side of an option statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// Unquoted text, heredoc bodies included.
    Bare(String),
    /// Quoted text with the quotes stripped; `raw` keeps the escapes.
    Quoted { style: QuoteStyle, raw: String },
    /// Bracketed `[a b c]` value.
    Array(Vec<OptionValue>),
    /// No value at all (`key` or `key:` followed by a newline).
    Empty,
}

/// A single statement in a configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// `name value` pair.
    Option {
        name: String,
        value: OptionValue,
        separator: Separator,
        line: usize,
    },
    /// `<tag [name]> ... </tag>` block; self-closing blocks have no children.
    Block {
        tag: String,
        name: Option<String>,
        quoted: bool,
        children: Vec<Statement>,
        line: usize,
    },
    /// `# ...` or `/* ... */` comment.
    Comment {
        text: String,
        style: CommentStyle,
        line: usize,
    },
    /// Include directive, resolved by the loader.
    Include {
        path: String,
        apache: bool,
        optional: bool,
        line: usize,
    },
}

impl Statement {
    /// Source line the statement started on.
    pub fn line(&self) -> usize {
        match self {
            Self::Option { line, .. }
            | Self::Block { line, .. }
            | Self::Comment { line, .. }
            | Self::Include { line, .. } => *line,
        }
    }
}

/// A parsed configuration: an ordered sequence of statements.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Config {
    pub children: Vec<Statement>,
}

/// Split a raw option-value lexeme into its separator and value text.
///
/// The lexeme starts right after the option name, so the separator prefix
/// (whitespace, `=` or `:`) is still present. The value text keeps its
/// right-hand whitespace.
pub fn split_separator(raw: &str) -> (Separator, &str) {
    let after_ws = raw.trim_start_matches([' ', '\t']);
    if let Some(rest) = after_ws.strip_prefix('=') {
        (Separator::Equals, rest.trim_start_matches([' ', '\t']))
    } else if let Some(rest) = after_ws.strip_prefix(':') {
        (Separator::Colon, rest.trim_start_matches([' ', '\t']))
    } else {
        (Separator::Whitespace, after_ws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== split_separator tests ====================

    #[test]
    fn test_split_whitespace() {
        assert_eq!(split_separator(" value"), (Separator::Whitespace, "value"));
    }

    #[test]
    fn test_split_equals() {
        assert_eq!(split_separator(" = value"), (Separator::Equals, "value"));
        assert_eq!(split_separator("=value"), (Separator::Equals, "value"));
    }

    #[test]
    fn test_split_colon() {
        assert_eq!(split_separator(": value"), (Separator::Colon, "value"));
    }

    #[test]
    fn test_split_empty_value() {
        assert_eq!(split_separator(":"), (Separator::Colon, ""));
        assert_eq!(split_separator(""), (Separator::Whitespace, ""));
    }

    #[test]
    fn test_split_preserves_trailing_whitespace() {
        assert_eq!(split_separator(" = b  "), (Separator::Equals, "b  "));
    }

    #[test]
    fn test_split_second_equals_is_value() {
        assert_eq!(split_separator(" = a=b"), (Separator::Equals, "a=b"));
    }

    // ==================== Statement tests ====================

    #[test]
    fn test_statement_line() {
        let stmt = Statement::Option {
            name: "a".to_string(),
            value: OptionValue::Empty,
            separator: Separator::Whitespace,
            line: 7,
        };
        assert_eq!(stmt.line(), 7);
    }

    #[test]
    fn test_config_default_is_empty() {
        assert!(Config::default().children.is_empty());
    }
}
