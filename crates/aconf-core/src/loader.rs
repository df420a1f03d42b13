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

//! Loader turning an AST into the final value tree.
//!
//! The loader walks statements in document order, maintaining a stack of
//! in-progress mappings that doubles as the interpolation scope chain.
//! Includes recurse through the reader, lexer and parser; parsed ASTs are
//! memoized per canonical source id for the duration of one load.

use crate::ast::{Config, OptionValue, QuoteStyle, Statement};
use crate::error::{AconfError, AconfErrorKind, AconfResult};
use crate::lex::lexer::tokenize;
use crate::lex::strings::unescape;
use crate::options::Options;
use crate::parser;
use crate::reader::{LocalReader, Reader};
use crate::value::{ConfigMap, ConfigValue};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Load a configuration file with default options.
pub fn load(path: impl AsRef<Path>) -> AconfResult<ConfigMap> {
    Loader::new(Options::default()).load(path)
}

/// Load a configuration file with the given options.
pub fn load_with_options(path: impl AsRef<Path>, options: Options) -> AconfResult<ConfigMap> {
    Loader::new(options).load(path)
}

/// Parse in-memory configuration text with default options.
///
/// Relative includes resolve against the process working directory.
pub fn loads(text: &str) -> AconfResult<ConfigMap> {
    Loader::new(Options::default()).loads(text)
}

/// Parse in-memory configuration text with the given options.
pub fn loads_with_options(text: &str, options: Options) -> AconfResult<ConfigMap> {
    Loader::new(options).loads(text)
}

/// Stateful loader bound to one [`Options`] record and one [`Reader`].
///
/// The AST cache and the visited-source set are scoped to a single
/// `load`/`loads` call and reset on entry.
pub struct Loader {
    options: Options,
    reader: Box<dyn Reader>,
    cache: HashMap<String, Rc<Config>>,
    visited: HashSet<String>,
}

impl Loader {
    /// Create a loader over the local filesystem.
    pub fn new(options: Options) -> Self {
        Self::with_reader(options, Box::new(LocalReader))
    }

    /// Create a loader with an injected reader.
    pub fn with_reader(options: Options, reader: Box<dyn Reader>) -> Self {
        Self {
            options,
            reader,
            cache: HashMap::new(),
            visited: HashSet::new(),
        }
    }

    /// The options this loader was built with.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Load a configuration file into a value tree.
    pub fn load(&mut self, path: impl AsRef<Path>) -> AconfResult<ConfigMap> {
        self.options.validate()?;
        self.cache.clear();
        self.visited.clear();

        let mut scope = vec![ConfigMap::new()];
        self.load_file(path.as_ref(), &mut scope)?;
        let mut root = scope.pop().unwrap_or_default();
        self.apply_defaults(&mut root);
        Ok(root)
    }

    /// Parse in-memory text into a value tree.
    pub fn loads(&mut self, text: &str) -> AconfResult<ConfigMap> {
        self.options.validate()?;
        self.cache.clear();
        self.visited.clear();

        let mut source = "<string>".to_string();
        let mut text = text.to_string();
        if let Some(pre_read) = self.options.hooks.pre_read.clone() {
            let (proceed, new_source, new_text) = pre_read(&source, &text);
            if !proceed {
                return Ok(ConfigMap::new());
            }
            source = new_source;
            text = new_text;
        }

        let ast = self.parse_text(&text, &source)?;
        let mut scope = vec![ConfigMap::new()];
        self.eval_into(&ast.children, None, &mut scope)?;
        let mut root = scope.pop().unwrap_or_default();
        self.apply_defaults(&mut root);
        Ok(root)
    }

    fn parse_text(&self, text: &str, source: &str) -> AconfResult<Config> {
        let tokens = tokenize(text, &self.options).map_err(|e| e.with_source_name(source))?;
        parser::parse(&tokens, &self.options).map_err(|e| e.with_source_name(source))
    }

    /// Read, parse (through the cache) and evaluate one file into the
    /// current scope frame.
    fn load_file(&mut self, path: &Path, scope: &mut Vec<ConfigMap>) -> AconfResult<()> {
        let path = match self.options.hooks.pre_open.clone() {
            Some(pre_open) => {
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let base = path.parent().unwrap_or(Path::new("")).to_path_buf();
                let (proceed, new_name, new_base) = pre_open(&file_name, &base);
                if !proceed {
                    return Ok(());
                }
                if new_base.as_os_str().is_empty() {
                    PathBuf::from(new_name)
                } else {
                    new_base.join(new_name)
                }
            }
            None => path.to_path_buf(),
        };

        let id = self.reader.canonical_id(&path);
        if self.visited.contains(&id) && !self.options.include_again {
            return Ok(());
        }
        self.visited.insert(id.clone());

        let ast = match self.cache.get(&id) {
            Some(ast) => Rc::clone(ast),
            None => {
                let mut source = path.to_string_lossy().into_owned();
                let mut text = self
                    .reader
                    .read(&path)
                    .map_err(|e| e.with_source_name(source.clone()))?;
                if let Some(pre_read) = self.options.hooks.pre_read.clone() {
                    let (proceed, new_source, new_text) = pre_read(&source, &text);
                    if !proceed {
                        return Ok(());
                    }
                    source = new_source;
                    text = new_text;
                }
                let ast = Rc::new(self.parse_text(&text, &source)?);
                self.cache.insert(id, Rc::clone(&ast));
                ast
            }
        };

        let base = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Some(parent.to_path_buf()),
            _ => None,
        };
        self.eval_into(&ast.children, base.as_deref(), scope)
    }

    /// Evaluate statements into the innermost scope frame.
    fn eval_into(
        &mut self,
        statements: &[Statement],
        base: Option<&Path>,
        scope: &mut Vec<ConfigMap>,
    ) -> AconfResult<()> {
        for statement in statements {
            match statement {
                Statement::Comment { .. } => {}
                Statement::Option {
                    name, value, line, ..
                } => {
                    let key = self.fold_name(name);
                    let materialized = self.materialize(value, scope)?;
                    let coerced = self.apply_coercions(&key, materialized);
                    insert_scoped(&self.options, scope, key, coerced, *line)?;
                }
                Statement::Block {
                    tag,
                    name,
                    children,
                    line,
                    ..
                } => {
                    let inner = self.eval_block(children, base, scope)?;
                    let tag_key = self.fold_name(tag);
                    let value = match name {
                        Some(block_name) => {
                            let mut wrapper = ConfigMap::new();
                            wrapper.insert(self.fold_name(block_name), ConfigValue::Map(inner));
                            ConfigValue::Map(wrapper)
                        }
                        None => ConfigValue::Map(inner),
                    };
                    insert_scoped(&self.options, scope, tag_key, value, *line)?;
                }
                Statement::Include {
                    path,
                    optional,
                    line,
                    ..
                } => {
                    match self.eval_include(path, base, scope, *line) {
                        Err(e)
                            if *optional
                                && matches!(
                                    e.kind,
                                    AconfErrorKind::IncludeIo | AconfErrorKind::Include
                                ) => {}
                        other => other?,
                    }
                }
            }
        }
        Ok(())
    }

    /// Evaluate a block's children in a fresh scope frame.
    fn eval_block(
        &mut self,
        statements: &[Statement],
        base: Option<&Path>,
        scope: &mut Vec<ConfigMap>,
    ) -> AconfResult<ConfigMap> {
        scope.push(ConfigMap::new());
        let result = self.eval_into(statements, base, scope);
        let frame = scope.pop().unwrap_or_default();
        result?;
        Ok(frame)
    }

    fn eval_include(
        &mut self,
        pattern: &str,
        base: Option<&Path>,
        scope: &mut Vec<ConfigMap>,
        line: usize,
    ) -> AconfResult<()> {
        let path = Path::new(pattern);
        let wildcard = self.options.include_glob && pattern.contains(['*', '?', '[']);

        if path.is_absolute() {
            if wildcard {
                return self.load_glob(pattern, scope, line);
            }
            if self.options.include_directories && self.reader.is_dir(path) {
                return self.load_directory(path, scope);
            }
            return self.load_file(path, scope);
        }

        for dir in self.search_dirs(base) {
            let candidate = dir.join(path);
            if wildcard {
                let pattern = candidate.to_string_lossy().into_owned();
                if glob_has_match(&pattern, line)? {
                    return self.load_glob(&pattern, scope, line);
                }
                continue;
            }
            if self.options.include_directories && self.reader.is_dir(&candidate) {
                return self.load_directory(&candidate, scope);
            }
            if self.reader.exists(&candidate) {
                return self.load_file(&candidate, scope);
            }
        }

        if wildcard {
            // A glob with no matches anywhere is a silent success.
            return Ok(());
        }
        Err(AconfError::include(
            format!("config file \"{}\" not found in search path", pattern),
            line,
        ))
    }

    /// Directories probed for a relative include, in order.
    fn search_dirs(&self, base: Option<&Path>) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        if self.options.include_relative {
            if let Some(base) = base {
                dirs.push(base.to_path_buf());
            }
        }
        dirs.extend(self.options.config_path.iter().cloned());
        dirs.push(PathBuf::from("."));
        dirs
    }

    fn load_glob(
        &mut self,
        pattern: &str,
        scope: &mut Vec<ConfigMap>,
        line: usize,
    ) -> AconfResult<()> {
        let mut matches: Vec<PathBuf> = glob::glob(pattern)
            .map_err(|e| {
                AconfError::include(format!("bad glob pattern \"{}\": {}", pattern, e), line)
            })?
            .filter_map(Result::ok)
            .collect();
        matches.sort();
        for path in matches {
            if self.reader.is_dir(&path) {
                continue;
            }
            self.load_file(&path, scope)?;
        }
        Ok(())
    }

    fn load_directory(&mut self, dir: &Path, scope: &mut Vec<ConfigMap>) -> AconfResult<()> {
        for name in self.reader.list_dir(dir)? {
            self.load_file(&dir.join(name), scope)?;
        }
        Ok(())
    }

    fn fold_name(&self, name: &str) -> String {
        if self.options.lowercase_names {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }

    /// Turn an AST value into a tree value: strip, interpolate, unescape.
    fn materialize(&self, value: &OptionValue, scope: &[ConfigMap]) -> AconfResult<ConfigValue> {
        match value {
            OptionValue::Empty => Ok(ConfigValue::Str(String::new())),
            OptionValue::Bare(text) => {
                let text = if self.options.no_strip_values {
                    text.as_str()
                } else {
                    text.trim_end()
                };
                let text = self.interpolate_if_enabled(text, scope)?;
                Ok(ConfigValue::Str(self.unescape_if_enabled(&text, false)))
            }
            OptionValue::Quoted {
                style: QuoteStyle::Double,
                raw,
            } => {
                let text = self.interpolate_if_enabled(raw, scope)?;
                Ok(ConfigValue::Str(self.unescape_if_enabled(&text, true)))
            }
            OptionValue::Quoted {
                style: QuoteStyle::Single,
                raw,
            } => {
                let text = if self.options.allow_single_quote_interpolation {
                    self.interpolate(raw, scope)?
                } else {
                    raw.clone()
                };
                Ok(ConfigValue::Str(self.unescape_if_enabled(&text, true)))
            }
            OptionValue::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.materialize(item, scope)?);
                }
                Ok(ConfigValue::List(out))
            }
        }
    }

    fn interpolate_if_enabled(&self, text: &str, scope: &[ConfigMap]) -> AconfResult<String> {
        if self.options.interpolation_enabled() {
            self.interpolate(text, scope)
        } else {
            Ok(text.to_string())
        }
    }

    fn unescape_if_enabled(&self, text: &str, quoted: bool) -> String {
        if self.options.no_escape {
            text.to_string()
        } else {
            unescape(text, quoted)
        }
    }

    /// Substitute `$name` and `${name}` from the scope chain.
    ///
    /// Runs before escape removal, so `\$` still protects a literal dollar.
    fn interpolate(&self, text: &str, scope: &[ConfigMap]) -> AconfResult<String> {
        let chars: Vec<char> = text.chars().collect();
        let mut out = String::with_capacity(text.len());
        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];
            if c == '\\' && i + 1 < chars.len() && chars[i + 1] == '$' {
                out.push('\\');
                out.push('$');
                i += 2;
                continue;
            }
            if c != '$' {
                out.push(c);
                i += 1;
                continue;
            }
            if i + 1 < chars.len() && chars[i + 1] == '{' {
                if let Some(close) = chars[i + 2..].iter().position(|&c| c == '}') {
                    let name: String = chars[i + 2..i + 2 + close].iter().collect();
                    match self.lookup(&name, scope) {
                        Some(value) => out.push_str(&value),
                        None if self.options.strict_vars => {
                            return Err(AconfError::undefined_variable(&name));
                        }
                        None => {
                            out.push_str("${");
                            out.push_str(&name);
                            out.push('}');
                        }
                    }
                    i += 2 + close + 1;
                    continue;
                }
                out.push('$');
                i += 1;
                continue;
            }
            let mut end = i + 1;
            while end < chars.len() && (chars[end].is_alphanumeric() || chars[end] == '_') {
                end += 1;
            }
            if end == i + 1 {
                out.push('$');
                i += 1;
                continue;
            }
            let name: String = chars[i + 1..end].iter().collect();
            match self.lookup(&name, scope) {
                Some(value) => out.push_str(&value),
                None if self.options.strict_vars => {
                    return Err(AconfError::undefined_variable(&name));
                }
                None => {
                    out.push('$');
                    out.push_str(&name);
                }
            }
            i = end;
        }
        Ok(out)
    }

    /// Scope-chain lookup, innermost first, environment as final fallback.
    fn lookup(&self, name: &str, scope: &[ConfigMap]) -> Option<String> {
        for frame in scope.iter().rev() {
            if let Some(ConfigValue::Str(s)) = frame.get(name) {
                return Some(s.clone());
            }
        }
        if self.options.interpolate_env {
            return self.reader.env_var(name);
        }
        None
    }

    /// Apply flagbits rewriting, then autotrue coercion.
    fn apply_coercions(&self, key: &str, value: ConfigValue) -> ConfigValue {
        if let Some(table) = self.options.flag_bits.get(key) {
            if let ConfigValue::Str(raw) = &value {
                let mut flags = ConfigMap::new();
                for flag in table.keys() {
                    flags.insert(flag.clone(), ConfigValue::Null);
                }
                for token in raw.split('|') {
                    let token = token.trim();
                    if let Some(flag_value) = table.get(token) {
                        flags.insert(token.to_string(), ConfigValue::Str(flag_value.clone()));
                    }
                }
                return ConfigValue::Map(flags);
            }
        }
        if self.options.auto_true {
            return auto_true(value);
        }
        value
    }

    fn apply_defaults(&self, map: &mut ConfigMap) {
        if let Some(defaults) = &self.options.default_config {
            merge_defaults(map, defaults);
        }
    }
}

fn glob_has_match(pattern: &str, line: usize) -> AconfResult<bool> {
    let paths = glob::glob(pattern).map_err(|e| {
        AconfError::include(format!("bad glob pattern \"{}\": {}", pattern, e), line)
    })?;
    Ok(paths.filter_map(Result::ok).next().is_some())
}

/// Coerce binary words to "1"/"0" at leaf values.
fn auto_true(value: ConfigValue) -> ConfigValue {
    match value {
        ConfigValue::Str(s) => match s.to_lowercase().as_str() {
            "yes" | "on" | "true" => ConfigValue::Str("1".to_string()),
            "no" | "off" | "false" => ConfigValue::Str("0".to_string()),
            _ => ConfigValue::Str(s),
        },
        ConfigValue::List(items) => {
            ConfigValue::List(items.into_iter().map(auto_true).collect())
        }
        other => other,
    }
}

fn insert_scoped(
    options: &Options,
    scope: &mut Vec<ConfigMap>,
    key: String,
    value: ConfigValue,
    line: usize,
) -> AconfResult<()> {
    match scope.last_mut() {
        Some(frame) => insert_value(options, frame, key, value, line),
        None => Ok(()),
    }
}

/// Insert a key per the collection policy.
fn insert_value(
    options: &Options,
    map: &mut ConfigMap,
    key: String,
    value: ConfigValue,
    line: usize,
) -> AconfResult<()> {
    let Some(existing) = map.get_mut(&key) else {
        map.insert(key, value);
        return Ok(());
    };
    let both_maps = existing.is_map() && value.is_map();

    if both_maps && options.merge_duplicate_blocks {
        let src = match value {
            ConfigValue::Map(src) => src,
            _ => return Ok(()),
        };
        if let ConfigValue::Map(dst) = existing {
            return deep_merge(options, dst, src, line);
        }
        return Ok(());
    }
    if !both_maps && options.merge_duplicate_options {
        *existing = value;
        return Ok(());
    }
    if options.allow_multi_options {
        hoist_append(existing, value);
        return Ok(());
    }
    Err(AconfError::duplicate_key(&key, line))
}

/// Deep-merge two mappings: keys recurse through the collection policy.
fn deep_merge(
    options: &Options,
    dst: &mut ConfigMap,
    src: ConfigMap,
    line: usize,
) -> AconfResult<()> {
    for (key, value) in src {
        insert_value(options, dst, key, value, line)?;
    }
    Ok(())
}

/// Hoist an existing entry to a list and append the new value.
fn hoist_append(existing: &mut ConfigValue, value: ConfigValue) {
    if !existing.is_list() {
        let old = std::mem::replace(existing, ConfigValue::List(Vec::new()));
        if let ConfigValue::List(items) = existing {
            items.push(old);
        }
    }
    if let ConfigValue::List(items) = existing {
        match value {
            ConfigValue::List(new_items) => items.extend(new_items),
            other => items.push(other),
        }
    }
}

/// Merge defaults underneath a tree: existing keys win, maps recurse.
fn merge_defaults(map: &mut ConfigMap, defaults: &ConfigMap) {
    for (key, default_value) in defaults {
        match map.get_mut(key) {
            None => {
                map.insert(key.clone(), default_value.clone());
            }
            Some(ConfigValue::Map(existing)) => {
                if let ConfigValue::Map(default_map) = default_value {
                    merge_defaults(existing, default_map);
                }
            }
            Some(_) => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn str_value(s: &str) -> ConfigValue {
        ConfigValue::Str(s.to_string())
    }

    // ==================== Collection policy tests ====================

    #[test]
    fn test_insert_new_key() {
        let options = Options::default();
        let mut map = ConfigMap::new();
        insert_value(&options, &mut map, "a".to_string(), str_value("1"), 1).unwrap();
        assert_eq!(map["a"], str_value("1"));
    }

    #[test]
    fn test_insert_duplicate_hoists_list() {
        let options = Options::default();
        let mut map = ConfigMap::new();
        insert_value(&options, &mut map, "a".to_string(), str_value("1"), 1).unwrap();
        insert_value(&options, &mut map, "a".to_string(), str_value("2"), 2).unwrap();
        insert_value(&options, &mut map, "a".to_string(), str_value("3"), 3).unwrap();
        assert_eq!(
            map["a"],
            ConfigValue::List(vec![str_value("1"), str_value("2"), str_value("3")])
        );
    }

    #[test]
    fn test_insert_duplicate_overwrite() {
        let options = Options::builder().merge_duplicate_options(true).build();
        let mut map = ConfigMap::new();
        insert_value(&options, &mut map, "a".to_string(), str_value("1"), 1).unwrap();
        insert_value(&options, &mut map, "a".to_string(), str_value("2"), 2).unwrap();
        assert_eq!(map["a"], str_value("2"));
    }

    #[test]
    fn test_insert_duplicate_denied() {
        let options = Options::builder().allow_multi_options(false).build();
        let mut map = ConfigMap::new();
        insert_value(&options, &mut map, "a".to_string(), str_value("1"), 1).unwrap();
        let err = insert_value(&options, &mut map, "a".to_string(), str_value("2"), 2).unwrap_err();
        assert_eq!(err.kind, AconfErrorKind::DuplicateKey);
        assert_eq!(err.line, 2);
    }

    #[test]
    fn test_deep_merge_blocks() {
        let options = Options::builder().merge_duplicate_blocks(true).build();
        let mut map = ConfigMap::new();
        let mut first = ConfigMap::new();
        first.insert("b".to_string(), str_value("1"));
        let mut second = ConfigMap::new();
        second.insert("b".to_string(), str_value("2"));
        insert_value(
            &options,
            &mut map,
            "a".to_string(),
            ConfigValue::Map(first),
            1,
        )
        .unwrap();
        insert_value(
            &options,
            &mut map,
            "a".to_string(),
            ConfigValue::Map(second),
            4,
        )
        .unwrap();
        let inner = map["a"].as_map().unwrap();
        assert_eq!(
            inner["b"],
            ConfigValue::List(vec![str_value("1"), str_value("2")])
        );
    }

    // ==================== auto_true tests ====================

    #[test]
    fn test_auto_true_scalars() {
        assert_eq!(auto_true(str_value("yes")), str_value("1"));
        assert_eq!(auto_true(str_value("On")), str_value("1"));
        assert_eq!(auto_true(str_value("TRUE")), str_value("1"));
        assert_eq!(auto_true(str_value("no")), str_value("0"));
        assert_eq!(auto_true(str_value("off")), str_value("0"));
        assert_eq!(auto_true(str_value("False")), str_value("0"));
        assert_eq!(auto_true(str_value("maybe")), str_value("maybe"));
    }

    #[test]
    fn test_auto_true_list() {
        let coerced = auto_true(ConfigValue::List(vec![str_value("on"), str_value("x")]));
        assert_eq!(
            coerced,
            ConfigValue::List(vec![str_value("1"), str_value("x")])
        );
    }

    // ==================== merge_defaults tests ====================

    #[test]
    fn test_merge_defaults_existing_wins() {
        let mut map = ConfigMap::new();
        map.insert("b".to_string(), str_value("2"));
        let mut defaults = ConfigMap::new();
        defaults.insert("b".to_string(), str_value("4"));
        defaults.insert("c".to_string(), str_value("3"));
        merge_defaults(&mut map, &defaults);
        assert_eq!(map["b"], str_value("2"));
        assert_eq!(map["c"], str_value("3"));
    }

    #[test]
    fn test_merge_defaults_recurses_into_maps() {
        let mut inner = ConfigMap::new();
        inner.insert("x".to_string(), str_value("1"));
        let mut map = ConfigMap::new();
        map.insert("block".to_string(), ConfigValue::Map(inner));

        let mut default_inner = ConfigMap::new();
        default_inner.insert("x".to_string(), str_value("9"));
        default_inner.insert("y".to_string(), str_value("2"));
        let mut defaults = ConfigMap::new();
        defaults.insert("block".to_string(), ConfigValue::Map(default_inner));

        merge_defaults(&mut map, &defaults);
        let block = map["block"].as_map().unwrap();
        assert_eq!(block["x"], str_value("1"));
        assert_eq!(block["y"], str_value("2"));
    }

    // ==================== hoist_append tests ====================

    #[test]
    fn test_hoist_append_flattens_lists() {
        let mut existing = ConfigValue::List(vec![str_value("1")]);
        hoist_append(&mut existing, ConfigValue::List(vec![str_value("2")]));
        assert_eq!(
            existing,
            ConfigValue::List(vec![str_value("1"), str_value("2")])
        );
    }
}
