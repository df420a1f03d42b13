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

//! The option bag threaded through lexing, parsing, loading and dumping.
//!
//! A single immutable [`Options`] record is shared by every layer; tests
//! inject alternative instances instead of mutating global state. The
//! recognized toggles match Config::General's option set.

use crate::error::{AconfError, AconfResult};
use crate::value::ConfigMap;
use indexmap::IndexMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Hook deciding whether (and as what) a file may be opened.
///
/// Receives the file name and its base directory; returns the proceed flag
/// plus possibly rewritten name and base.
pub type PreOpenHook = Arc<dyn Fn(&str, &Path) -> (bool, String, PathBuf) + Send + Sync>;

/// Hook deciding whether (and as what) source text is parsed.
///
/// Receives the source identifier and the raw text; returns the proceed
/// flag plus possibly rewritten identifier and text.
pub type PreReadHook = Arc<dyn Fn(&str, &str) -> (bool, String, String) + Send + Sync>;

/// Stateless plugin hooks stored in [`Options`].
#[derive(Default, Clone)]
pub struct Hooks {
    /// Invoked before any file is opened.
    pub pre_open: Option<PreOpenHook>,
    /// Invoked before any source text is handed to the parser.
    pub pre_read: Option<PreReadHook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("pre_open", &self.pre_open.is_some())
            .field("pre_read", &self.pre_read.is_some())
            .finish()
    }
}

/// Flag table for one `flagbits` option: flag name to flag value.
pub type FlagTable = IndexMap<String, String>;

/// Options recognized by the loader, lexer, parser and dumper.
///
/// Construct with [`Options::default`] or through [`Options::builder`].
/// Defaults follow Config::General: duplicate options collect into lists,
/// Apache `Include` directives are honored, C-style comments are parsed,
/// undefined interpolation variables are an error.
#[derive(Debug, Clone)]
pub struct Options {
    /// Collect duplicate option keys into an ordered list.
    pub allow_multi_options: bool,
    /// Parse `[a b c]` values into lists.
    pub force_array: bool,
    /// Fold option and block names to lowercase (values untouched).
    pub lowercase_names: bool,
    /// Recognize `Include`/`IncludeOptional` directives (case-insensitive).
    pub use_apache_include: bool,
    /// Allow re-including the same file; otherwise a repeat is a no-op.
    pub include_again: bool,
    /// Probe the including file's directory first for relative includes.
    pub include_relative: bool,
    /// An include naming a directory loads every file inside, ASCII order.
    pub include_directories: bool,
    /// An include containing wildcards expands; zero matches succeed.
    pub include_glob: bool,
    /// Ordered list of base directories searched for relative includes.
    pub config_path: Vec<PathBuf>,
    /// Merge sibling blocks with an identical tag (and name) into one.
    pub merge_duplicate_blocks: bool,
    /// A later duplicate option overwrites the earlier one.
    pub merge_duplicate_options: bool,
    /// Coerce yes/on/true to "1" and no/off/false to "0" at leaf values.
    pub auto_true: bool,
    /// Named bit tables: option name to flag-name/flag-value table.
    pub flag_bits: IndexMap<String, FlagTable>,
    /// Value tree merged underneath the parsed result (existing keys win).
    pub default_config: Option<ConfigMap>,
    /// Substitute `$name` and `${name}` from enclosing scopes.
    pub interpolate_vars: bool,
    /// Also consult the process environment; implies `interpolate_vars`.
    pub interpolate_env: bool,
    /// Interpolate single-quoted values too; implies `interpolate_vars`.
    pub allow_single_quote_interpolation: bool,
    /// Fail on an undefined variable reference; otherwise keep the literal.
    pub strict_vars: bool,
    /// Recognize `/* ... */` comments.
    pub c_comments: bool,
    /// Retain right-hand whitespace of bare values.
    pub no_strip_values: bool,
    /// Treat backslash escapes as literal characters.
    pub no_escape: bool,
    /// Split the first whitespace of an opening tag into (tag, name).
    pub named_blocks: bool,
    /// Plugin hooks.
    pub hooks: Hooks,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            allow_multi_options: true,
            force_array: false,
            lowercase_names: false,
            use_apache_include: true,
            include_again: false,
            include_relative: false,
            include_directories: false,
            include_glob: false,
            config_path: Vec::new(),
            merge_duplicate_blocks: false,
            merge_duplicate_options: false,
            auto_true: false,
            flag_bits: IndexMap::new(),
            default_config: None,
            interpolate_vars: false,
            interpolate_env: false,
            allow_single_quote_interpolation: false,
            strict_vars: true,
            c_comments: true,
            no_strip_values: true,
            no_escape: false,
            named_blocks: true,
            hooks: Hooks::default(),
        }
    }
}

impl Options {
    /// Create a new builder with default options.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }

    /// True when any form of variable interpolation is requested.
    ///
    /// `interpolate_env` and `allow_single_quote_interpolation` imply
    /// `interpolate_vars`.
    pub fn interpolation_enabled(&self) -> bool {
        self.interpolate_vars || self.interpolate_env || self.allow_single_quote_interpolation
    }

    /// Check the record for contradictory or meaningless settings.
    pub fn validate(&self) -> AconfResult<()> {
        for (option, table) in &self.flag_bits {
            if option.is_empty() {
                return Err(AconfError::options("flagbits option name must not be empty"));
            }
            if table.is_empty() {
                return Err(AconfError::options(format!(
                    "flagbits table for \"{}\" must define at least one flag",
                    option
                )));
            }
        }
        Ok(())
    }
}

/// Builder for ergonomic construction of [`Options`].
#[derive(Debug, Clone, Default)]
pub struct OptionsBuilder {
    options: Options,
}

impl OptionsBuilder {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            options: Options::default(),
        }
    }

    /// Collect duplicate option keys into an ordered list.
    pub fn allow_multi_options(mut self, on: bool) -> Self {
        self.options.allow_multi_options = on;
        self
    }

    /// Parse `[a b c]` values into lists.
    pub fn force_array(mut self, on: bool) -> Self {
        self.options.force_array = on;
        self
    }

    /// Fold option and block names to lowercase.
    pub fn lowercase_names(mut self, on: bool) -> Self {
        self.options.lowercase_names = on;
        self
    }

    /// Recognize `Include`/`IncludeOptional` directives.
    pub fn use_apache_include(mut self, on: bool) -> Self {
        self.options.use_apache_include = on;
        self
    }

    /// Allow re-including the same file.
    pub fn include_again(mut self, on: bool) -> Self {
        self.options.include_again = on;
        self
    }

    /// Probe the including file's directory first for relative includes.
    pub fn include_relative(mut self, on: bool) -> Self {
        self.options.include_relative = on;
        self
    }

    /// Allow includes naming a directory.
    pub fn include_directories(mut self, on: bool) -> Self {
        self.options.include_directories = on;
        self
    }

    /// Expand wildcard include patterns.
    pub fn include_glob(mut self, on: bool) -> Self {
        self.options.include_glob = on;
        self
    }

    /// Append a directory to the include search path.
    pub fn config_path(mut self, dir: impl Into<PathBuf>) -> Self {
        self.options.config_path.push(dir.into());
        self
    }

    /// Merge sibling blocks with an identical tag into one.
    pub fn merge_duplicate_blocks(mut self, on: bool) -> Self {
        self.options.merge_duplicate_blocks = on;
        self
    }

    /// Let a later duplicate option overwrite the earlier one.
    pub fn merge_duplicate_options(mut self, on: bool) -> Self {
        self.options.merge_duplicate_options = on;
        self
    }

    /// Coerce binary words to "1"/"0".
    pub fn auto_true(mut self, on: bool) -> Self {
        self.options.auto_true = on;
        self
    }

    /// Register a named bit table for one option.
    pub fn flag_bits(mut self, option: impl Into<String>, table: FlagTable) -> Self {
        self.options.flag_bits.insert(option.into(), table);
        self
    }

    /// Value tree merged underneath the parsed result.
    pub fn default_config(mut self, defaults: ConfigMap) -> Self {
        self.options.default_config = Some(defaults);
        self
    }

    /// Substitute `$name` and `${name}` in values.
    pub fn interpolate_vars(mut self, on: bool) -> Self {
        self.options.interpolate_vars = on;
        self
    }

    /// Also consult the process environment during interpolation.
    pub fn interpolate_env(mut self, on: bool) -> Self {
        self.options.interpolate_env = on;
        self
    }

    /// Interpolate single-quoted values too.
    pub fn allow_single_quote_interpolation(mut self, on: bool) -> Self {
        self.options.allow_single_quote_interpolation = on;
        self
    }

    /// Fail on an undefined variable reference.
    pub fn strict_vars(mut self, on: bool) -> Self {
        self.options.strict_vars = on;
        self
    }

    /// Recognize `/* ... */` comments.
    pub fn c_comments(mut self, on: bool) -> Self {
        self.options.c_comments = on;
        self
    }

    /// Retain right-hand whitespace of bare values.
    pub fn no_strip_values(mut self, on: bool) -> Self {
        self.options.no_strip_values = on;
        self
    }

    /// Treat backslash escapes as literal characters.
    pub fn no_escape(mut self, on: bool) -> Self {
        self.options.no_escape = on;
        self
    }

    /// Split the first whitespace of an opening tag into (tag, name).
    pub fn named_blocks(mut self, on: bool) -> Self {
        self.options.named_blocks = on;
        self
    }

    /// Install the pre-open hook.
    pub fn pre_open(mut self, hook: PreOpenHook) -> Self {
        self.options.hooks.pre_open = Some(hook);
        self
    }

    /// Install the pre-read hook.
    pub fn pre_read(mut self, hook: PreReadHook) -> Self {
        self.options.hooks.pre_read = Some(hook);
        self
    }

    /// Build the options record.
    pub fn build(self) -> Options {
        self.options
    }
}
