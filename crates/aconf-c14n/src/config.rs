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

//! Dump configuration.

/// Quoting strategy for scalar values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[non_exhaustive]
pub enum QuotingStrategy {
    /// Quote only when the value would not survive re-parsing bare:
    /// empty strings, whitespace, quotes, `#`, `$`, backslashes and
    /// bracketed text.
    #[default]
    Minimal,
    /// Quote every scalar unconditionally.
    Always,
}

/// Configuration for the dumper.
///
/// # Examples
///
/// ```
/// use aconf_c14n::{DumpConfig, QuotingStrategy};
///
/// let config = DumpConfig::new()
///     .with_quoting(QuotingStrategy::Always)
///     .with_collapse_named(true);
/// assert_eq!(config.indent_width, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DumpConfig {
    /// Spaces per nesting depth.
    pub indent_width: usize,
    /// Quoting strategy for scalar values.
    pub quoting: QuotingStrategy,
    /// Render a mapping whose single entry holds a further mapping as a
    /// named block `<tag name>` instead of two nested blocks.
    pub collapse_named: bool,
    /// Render all-scalar lists as `key [a b c]` instead of repeated lines.
    pub bracket_lists: bool,
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self {
            indent_width: 2,
            quoting: QuotingStrategy::Minimal,
            collapse_named: false,
            bracket_lists: false,
        }
    }
}

impl DumpConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation width.
    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    /// Set the quoting strategy.
    pub fn with_quoting(mut self, quoting: QuotingStrategy) -> Self {
        self.quoting = quoting;
        self
    }

    /// Set whether single-entry mappings collapse to named blocks.
    pub fn with_collapse_named(mut self, on: bool) -> Self {
        self.collapse_named = on;
        self
    }

    /// Set whether all-scalar lists render bracketed.
    pub fn with_bracket_lists(mut self, on: bool) -> Self {
        self.bracket_lists = on;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DumpConfig::default();
        assert_eq!(config.indent_width, 2);
        assert_eq!(config.quoting, QuotingStrategy::Minimal);
        assert!(!config.collapse_named);
        assert!(!config.bracket_lists);
    }

    #[test]
    fn test_fluent_construction() {
        let config = DumpConfig::new()
            .with_indent_width(4)
            .with_quoting(QuotingStrategy::Always)
            .with_collapse_named(true)
            .with_bracket_lists(true);
        assert_eq!(config.indent_width, 4);
        assert_eq!(config.quoting, QuotingStrategy::Always);
        assert!(config.collapse_named);
        assert!(config.bracket_lists);
    }
}
