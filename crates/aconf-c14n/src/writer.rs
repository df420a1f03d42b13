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

//! Writer serializing a value tree back to Apache-style text.
//!
//! Mappings render in insertion order, nested mappings as `<tag>` blocks,
//! lists as repeated lines and multi-line scalars as heredocs, so parsing
//! the output with the same options reproduces the tree.

use crate::config::{DumpConfig, QuotingStrategy};
use aconf_core::{AconfError, AconfErrorKind, AconfResult, ConfigMap, ConfigValue};

/// Initial capacity of the output buffer.
const INITIAL_OUTPUT_CAPACITY: usize = 4096;

/// Maximum nesting depth before the writer refuses to recurse further.
const MAX_NESTING_DEPTH: usize = 1000;

/// Writer for Apache-style configuration output.
pub struct DumpWriter {
    config: DumpConfig,
    output: String,
}

impl DumpWriter {
    /// Create a writer with the given configuration.
    pub fn new(config: DumpConfig) -> Self {
        Self {
            config,
            output: String::with_capacity(INITIAL_OUTPUT_CAPACITY),
        }
    }

    /// Serialize a value tree to text.
    pub fn write_tree(&mut self, tree: &ConfigMap) -> AconfResult<String> {
        self.write_map(tree, 0)?;
        Ok(std::mem::take(&mut self.output))
    }

    fn indent(&self, depth: usize) -> String {
        " ".repeat(depth * self.config.indent_width)
    }

    fn write_map(&mut self, map: &ConfigMap, depth: usize) -> AconfResult<()> {
        if depth > MAX_NESTING_DEPTH {
            return Err(AconfError::new(
                AconfErrorKind::Options,
                format!("tree nesting exceeds maximum depth {}", MAX_NESTING_DEPTH),
                0,
            ));
        }
        for (key, value) in map {
            self.write_entry(key, value, depth)?;
        }
        Ok(())
    }

    fn write_entry(&mut self, key: &str, value: &ConfigValue, depth: usize) -> AconfResult<()> {
        match value {
            ConfigValue::Null => {
                self.output.push_str(&self.indent(depth));
                self.output.push_str(key);
                self.output.push('\n');
                Ok(())
            }
            ConfigValue::Str(text) => {
                if text.contains('\n') {
                    self.write_heredoc(key, text, depth);
                } else {
                    self.output.push_str(&self.indent(depth));
                    self.output.push_str(key);
                    self.output.push(' ');
                    let formatted = self.format_scalar(text);
                    self.output.push_str(&formatted);
                    self.output.push('\n');
                }
                Ok(())
            }
            ConfigValue::List(items) => self.write_list(key, items, depth),
            ConfigValue::Map(inner) => self.write_block(key, inner, depth),
        }
    }

    fn write_list(
        &mut self,
        key: &str,
        items: &[ConfigValue],
        depth: usize,
    ) -> AconfResult<()> {
        let all_scalars = items
            .iter()
            .all(|item| matches!(item, ConfigValue::Str(s) if !s.contains('\n')));
        if self.config.bracket_lists && all_scalars {
            self.output.push_str(&self.indent(depth));
            self.output.push_str(key);
            self.output.push_str(" [");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    self.output.push(' ');
                }
                if let ConfigValue::Str(s) = item {
                    let formatted = self.format_scalar(s);
                    self.output.push_str(&formatted);
                }
            }
            self.output.push_str("]\n");
            return Ok(());
        }
        for item in items {
            self.write_entry(key, item, depth)?;
        }
        Ok(())
    }

    fn write_block(&mut self, key: &str, inner: &ConfigMap, depth: usize) -> AconfResult<()> {
        if self.config.collapse_named {
            if let Some((name, ConfigValue::Map(body))) = single_entry(inner) {
                if is_bare_tag(key) && is_bare_tag(name) {
                    self.output.push_str(&self.indent(depth));
                    self.output.push('<');
                    self.output.push_str(key);
                    self.output.push(' ');
                    self.output.push_str(name);
                    self.output.push_str(">\n");
                    self.write_map(body, depth + 1)?;
                    self.output.push_str(&self.indent(depth));
                    self.output.push_str("</");
                    self.output.push_str(key);
                    self.output.push_str(">\n");
                    return Ok(());
                }
            }
        }

        let tag = render_tag(key);
        self.output.push_str(&self.indent(depth));
        self.output.push('<');
        self.output.push_str(&tag);
        self.output.push_str(">\n");
        self.write_map(inner, depth + 1)?;
        self.output.push_str(&self.indent(depth));
        self.output.push_str("</");
        self.output.push_str(&tag);
        self.output.push_str(">\n");
        Ok(())
    }

    fn write_heredoc(&mut self, key: &str, text: &str, depth: usize) {
        let anchor = pick_anchor(text);
        self.output.push_str(&self.indent(depth));
        self.output.push_str(key);
        self.output.push_str(" <<");
        self.output.push_str(&anchor);
        self.output.push('\n');
        for line in text.lines() {
            self.output.push_str(line);
            self.output.push('\n');
        }
        self.output.push_str(&self.indent(depth));
        self.output.push_str(&anchor);
        self.output.push('\n');
    }

    fn format_scalar(&self, text: &str) -> String {
        let quote = match self.config.quoting {
            QuotingStrategy::Always => true,
            QuotingStrategy::Minimal => needs_quoting(text),
        };
        if !quote {
            return text.to_string();
        }
        let mut out = String::with_capacity(text.len() + 2);
        out.push('"');
        for c in text.chars() {
            match c {
                '"' => out.push_str("\\\""),
                '\\' => out.push_str("\\\\"),
                '#' => out.push_str("\\#"),
                '$' => out.push_str("\\$"),
                c => out.push(c),
            }
        }
        out.push('"');
        out
    }
}

/// Whether a bare rendition of the scalar would survive re-parsing.
fn needs_quoting(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    if text.chars().any(|c| {
        c.is_whitespace() || matches!(c, '"' | '\'' | '#' | '$' | '\\' | '<' | '>')
    }) {
        return true;
    }
    // A leading separator character would be eaten on re-parse.
    if text.starts_with(['=', ':']) {
        return true;
    }
    text.starts_with('[') && text.ends_with(']')
}

/// Tags with characters a bare payload cannot carry render quoted.
fn is_bare_tag(tag: &str) -> bool {
    !tag.is_empty()
        && !tag
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '<' | '>' | '"' | '\'' | '#' | '/'))
}

fn render_tag(key: &str) -> String {
    if is_bare_tag(key) {
        key.to_string()
    } else {
        format!("\"{}\"", key)
    }
}

fn single_entry(map: &ConfigMap) -> Option<(&str, &ConfigValue)> {
    if map.len() == 1 {
        map.iter().next().map(|(k, v)| (k.as_str(), v))
    } else {
        None
    }
}

/// Heredoc anchor that collides with no body line.
fn pick_anchor(text: &str) -> String {
    let mut anchor = "EOT".to_string();
    let mut counter = 0usize;
    while text.lines().any(|line| line.trim() == anchor) {
        counter += 1;
        anchor = format!("EOT{}", counter);
    }
    anchor
}
