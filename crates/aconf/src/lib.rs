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

//! # AConf - Apache-style Configuration Language
//!
//! AConf reads the hierarchical configuration dialect of Apache httpd and
//! Perl's Config::General: key/value options, nested `<tag>` blocks,
//! include directives, heredocs, quoted strings and optional variable
//! interpolation. Loading yields an ordered tree of mappings, lists and
//! strings; dumping renders an equivalent tree back to text.
//!
//! ## Quick Start
//!
//! ```rust
//! use aconf::{loads, dumps, to_json};
//!
//! let config = loads("<server web>\n  port 8080\n</server>\n").unwrap();
//!
//! let server = config["server"].as_map().unwrap();
//! assert!(server.contains_key("web"));
//!
//! // Render the tree back to configuration text.
//! let text = dumps(&config).unwrap();
//! assert!(text.contains("port 8080"));
//!
//! // Or as JSON.
//! let json = to_json(&config).unwrap();
//! assert_eq!(json, r#"{"server":{"web":{"port":"8080"}}}"#);
//! ```
//!
//! ## Options
//!
//! Behavior is tuned through [`Options`]: duplicate-key collection,
//! Apache-style includes, interpolation, autotrue coercion, flag bit
//! tables and more. See the [`Options`] documentation for the full list.
//!
//! ## Modules
//!
//! - [`mod@core`]: parsing, loading and the value tree
//! - [`mod@c14n`]: re-serialization to configuration text
//! - [`mod@json`]: JSON conversion

// Re-export core types
pub use aconf_core::{
    // Errors
    AconfError,
    AconfErrorKind,
    AconfResult,
    // Value tree
    ConfigMap,
    ConfigValue,
    // Options
    FlagTable,
    Hooks,
    // Loader
    Loader,
    LocalReader,
    Options,
    OptionsBuilder,
    PreOpenHook,
    PreReadHook,
    Reader,
};

// Re-export dump configuration
pub use aconf_c14n::{DumpConfig, QuotingStrategy};

/// Core parsing utilities
pub mod core {
    pub use aconf_core::ast::{
        CommentStyle, Config, OptionValue, QuoteStyle, Separator, Statement,
    };
    pub use aconf_core::lex::{tokenize, Token, TokenKind};
    pub use aconf_core::parse;
}

/// Re-serialization utilities
pub mod c14n {
    pub use aconf_c14n::{dump, dump_with_config, DumpConfig, DumpWriter, QuotingStrategy};
}

/// JSON conversion utilities
pub mod json {
    pub use aconf_json::{
        from_json, from_json_value, to_json, to_json_pretty, to_json_value, JsonError, JsonResult,
    };
}

// Convenience functions at crate root

use std::path::Path;

/// Load a configuration file with default options.
#[inline]
pub fn load(path: impl AsRef<Path>) -> AconfResult<ConfigMap> {
    aconf_core::load(path)
}

/// Load a configuration file with the given options.
#[inline]
pub fn load_with_options(path: impl AsRef<Path>, options: Options) -> AconfResult<ConfigMap> {
    aconf_core::load_with_options(path, options)
}

/// Parse in-memory configuration text with default options.
#[inline]
pub fn loads(text: &str) -> AconfResult<ConfigMap> {
    aconf_core::loads(text)
}

/// Parse in-memory configuration text with the given options.
#[inline]
pub fn loads_with_options(text: &str, options: Options) -> AconfResult<ConfigMap> {
    aconf_core::loads_with_options(text, options)
}

/// Render a value tree to configuration text with default settings.
#[inline]
pub fn dumps(tree: &ConfigMap) -> AconfResult<String> {
    aconf_c14n::dump(tree)
}

/// Render a value tree to configuration text. Alias of [`dumps`].
#[inline]
pub fn dump(tree: &ConfigMap) -> AconfResult<String> {
    aconf_c14n::dump(tree)
}

/// Render a value tree and write it to a file.
pub fn dump_to_file(path: impl AsRef<Path>, tree: &ConfigMap) -> AconfResult<()> {
    let text = aconf_c14n::dump(tree)?;
    std::fs::write(path.as_ref(), text).map_err(|e| {
        AconfError::include_io(format!(
            "file {} can't be written: {}",
            path.as_ref().display(),
            e
        ))
    })
}

/// Render a value tree with custom dump settings.
#[inline]
pub fn dumps_with_config(tree: &ConfigMap, config: &DumpConfig) -> AconfResult<String> {
    aconf_c14n::dump_with_config(tree, config)
}

/// Convert a value tree to a compact JSON string.
#[inline]
pub fn to_json(tree: &ConfigMap) -> AconfResult<String> {
    aconf_json::to_json(tree)
        .map_err(|e| AconfError::options(format!("JSON conversion error: {}", e)))
}

/// Convert a JSON string to a value tree.
#[inline]
pub fn from_json(text: &str) -> AconfResult<ConfigMap> {
    aconf_json::from_json(text)
        .map_err(|e| AconfError::options(format!("JSON conversion error: {}", e)))
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
