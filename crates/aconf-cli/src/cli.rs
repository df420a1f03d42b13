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

//! Argument model and command execution.
//!
//! Every loader option is exposed as a long flag of the same lowercase
//! name. Options that default to on (`allowmultioptions`, `strictvars`,
//! `ccomments`, `nostripvalues`, `namedblocks`) are toggled OFF by their
//! flag; the rest are toggled on. `--useapacheinclude` is additive too:
//! the tool leaves Apache-style `Include` directives off unless asked,
//! although the library option defaults to on.

use crate::error::CliError;
use aconf_c14n::{dump_with_config, DumpConfig};
use aconf_core::{FlagTable, Loader, Options};
use aconf_json::{from_json, to_json_pretty};
use clap::Parser;
use std::fs;
use std::path::PathBuf;

/// Dump Apache-style config files into JSON.
#[derive(Debug, Parser)]
#[command(name = "aconf", version, about = "Dump Apache-style config files into JSON")]
pub struct Cli {
    /// Path to the configuration file to dump. Repeatable.
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Do not collect multiple identical options into a list
    #[arg(long)]
    pub allowmultioptions: bool,

    /// Parse values surrounded by [] into single-element lists
    #[arg(long)]
    pub forcearray: bool,

    /// Convert all option and block names to lowercase
    #[arg(long)]
    pub lowercasenames: bool,

    /// Consider "Include ..." a valid include statement
    #[arg(long)]
    pub useapacheinclude: bool,

    /// Allow including sub-configfiles multiple times
    #[arg(long)]
    pub includeagain: bool,

    /// Open included files relative to the including configuration file
    #[arg(long)]
    pub includerelative: bool,

    /// Let an include statement point to a directory, loading every file
    /// inside in ASCII order
    #[arg(long)]
    pub includedirectories: bool,

    /// Let an include statement point to a glob pattern
    #[arg(long)]
    pub includeglob: bool,

    /// Merge duplicate blocks and named blocks into a single one
    #[arg(long)]
    pub mergeduplicateblocks: bool,

    /// Keep only the last occurrence of a repeated option
    #[arg(long)]
    pub mergeduplicateoptions: bool,

    /// Turn binary words (yes/no, on/off, true/false) into "1" and "0"
    #[arg(long)]
    pub autotrue: bool,

    /// Enable variable interpolation
    #[arg(long)]
    pub interpolatevars: bool,

    /// Enable process environment variable interpolation
    #[arg(long)]
    pub interpolateenv: bool,

    /// Perform variable interpolation inside single quotes too
    #[arg(long)]
    pub allowsinglequoteinterpolation: bool,

    /// Do not fail on an undefined variable during interpolation
    #[arg(long)]
    pub strictvars: bool,

    /// Do not parse C-style comments
    #[arg(long)]
    pub ccomments: bool,

    /// Right-trim bare option values
    #[arg(long)]
    pub nostripvalues: bool,

    /// Treat backslash escapes as literal characters
    #[arg(long)]
    pub noescape: bool,

    /// Keep the whole opening-tag payload as one block name
    #[arg(long)]
    pub namedblocks: bool,

    /// Search path for included configuration files. Repeatable.
    #[arg(long, value_name = "PATH")]
    pub configpath: Vec<PathBuf>,

    /// Named bits for an option as a JSON object
    /// {"OPTION": {"NAME": "VALUE"}}
    #[arg(long, value_name = "JSON")]
    pub flagbits: Option<String>,

    /// Default values for the parsed configuration as a JSON object
    #[arg(long, value_name = "JSON")]
    pub defaultconfig: Option<String>,

    /// Read each FILE as JSON and print configuration text instead
    #[arg(long)]
    pub json_input: bool,
}

impl Cli {
    /// Translate the flags into a loader [`Options`] record.
    pub fn build_options(&self) -> Result<Options, CliError> {
        let mut builder = Options::builder()
            .allow_multi_options(!self.allowmultioptions)
            .force_array(self.forcearray)
            .lowercase_names(self.lowercasenames)
            .use_apache_include(self.useapacheinclude)
            .include_again(self.includeagain)
            .include_relative(self.includerelative)
            .include_directories(self.includedirectories)
            .include_glob(self.includeglob)
            .merge_duplicate_blocks(self.mergeduplicateblocks)
            .merge_duplicate_options(self.mergeduplicateoptions)
            .auto_true(self.autotrue)
            .interpolate_vars(self.interpolatevars)
            .interpolate_env(self.interpolateenv)
            .allow_single_quote_interpolation(self.allowsinglequoteinterpolation)
            .strict_vars(!self.strictvars)
            .c_comments(!self.ccomments)
            .no_strip_values(!self.nostripvalues)
            .no_escape(self.noescape)
            .named_blocks(!self.namedblocks);

        for dir in &self.configpath {
            builder = builder.config_path(dir);
        }

        if let Some(raw) = &self.flagbits {
            for (option, table) in parse_flag_bits(raw)? {
                builder = builder.flag_bits(option, table);
            }
        }

        if let Some(raw) = &self.defaultconfig {
            let defaults = from_json(raw).map_err(|e| CliError::MalformedDefaultConfig {
                raw: raw.clone(),
                message: e.to_string(),
            })?;
            builder = builder.default_config(defaults);
        }

        Ok(builder.build())
    }

    /// Run the tool over all given files.
    pub fn execute(&self) -> Result<(), CliError> {
        let options = self.build_options()?;

        for file in &self.files {
            if self.json_input {
                let text =
                    fs::read_to_string(file).map_err(|e| CliError::io_error(file.clone(), e))?;
                let tree =
                    from_json(&text).map_err(|e| CliError::JsonConversion(e.to_string()))?;
                let dump_config = DumpConfig::new().with_collapse_named(!self.namedblocks);
                let rendered = dump_with_config(&tree, &dump_config)
                    .map_err(|e| CliError::Dump(e.to_string()))?;
                print!("{}", rendered);
            } else {
                let tree = Loader::new(options.clone())
                    .load(file)
                    .map_err(|e| CliError::Load {
                        path: file.clone(),
                        message: e.to_string(),
                    })?;
                let json = to_json_pretty(&tree)
                    .map_err(|e| CliError::JsonConversion(e.to_string()))?;
                println!("{}", json);
            }
        }
        Ok(())
    }
}

/// Parse the `--flagbits` JSON argument into flag tables.
fn parse_flag_bits(raw: &str) -> Result<Vec<(String, FlagTable)>, CliError> {
    let malformed = |message: String| CliError::MalformedFlagBits {
        raw: raw.to_string(),
        message,
    };

    let json: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| malformed(e.to_string()))?;
    let serde_json::Value::Object(object) = json else {
        return Err(malformed("expected a JSON object".to_string()));
    };

    let mut tables = Vec::with_capacity(object.len());
    for (option, table_json) in object {
        let serde_json::Value::Object(table_object) = table_json else {
            return Err(malformed(format!(
                "expected a JSON object of flags for \"{}\"",
                option
            )));
        };
        let mut table = FlagTable::new();
        for (flag, value) in table_object {
            let value = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                other => {
                    return Err(malformed(format!(
                        "flag \"{}\" must map to a scalar, got {}",
                        flag, other
                    )));
                }
            };
            table.insert(flag, value);
        }
        tables.push((option, table));
    }
    Ok(tables)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_args(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    // ==================== Flag mapping tests ====================

    #[test]
    fn test_default_flags_map_to_default_options() {
        let cli = parse_args(&["aconf", "f.conf"]);
        let options = cli.build_options().unwrap();
        assert!(options.allow_multi_options);
        assert!(options.strict_vars);
        assert!(options.c_comments);
        assert!(options.no_strip_values);
        assert!(options.named_blocks);
        assert!(!options.force_array);
        // Apache-style includes are opt-in at the tool level.
        assert!(!options.use_apache_include);
    }

    #[test]
    fn test_default_on_flags_toggle_off() {
        let cli = parse_args(&[
            "aconf",
            "--allowmultioptions",
            "--strictvars",
            "--ccomments",
            "--nostripvalues",
            "--namedblocks",
            "f.conf",
        ]);
        let options = cli.build_options().unwrap();
        assert!(!options.allow_multi_options);
        assert!(!options.strict_vars);
        assert!(!options.c_comments);
        assert!(!options.no_strip_values);
        assert!(!options.named_blocks);
    }

    #[test]
    fn test_default_off_flags_toggle_on() {
        let cli = parse_args(&[
            "aconf",
            "--forcearray",
            "--lowercasenames",
            "--autotrue",
            "--interpolatevars",
            "--useapacheinclude",
            "f.conf",
        ]);
        let options = cli.build_options().unwrap();
        assert!(options.force_array);
        assert!(options.lowercase_names);
        assert!(options.auto_true);
        assert!(options.interpolate_vars);
        assert!(options.use_apache_include);
    }

    #[test]
    fn test_configpath_repeatable() {
        let cli = parse_args(&[
            "aconf",
            "--configpath",
            "/etc/a",
            "--configpath",
            "/etc/b",
            "f.conf",
        ]);
        let options = cli.build_options().unwrap();
        assert_eq!(options.config_path.len(), 2);
        assert_eq!(options.config_path[0], PathBuf::from("/etc/a"));
    }

    // ==================== JSON argument tests ====================

    #[test]
    fn test_flagbits_json() {
        let cli = parse_args(&[
            "aconf",
            "--flagbits",
            r#"{"mode": {"CLEAR": 1, "UNSECURE": "32bit"}}"#,
            "f.conf",
        ]);
        let options = cli.build_options().unwrap();
        let table = &options.flag_bits["mode"];
        assert_eq!(table["CLEAR"], "1");
        assert_eq!(table["UNSECURE"], "32bit");
    }

    #[test]
    fn test_malformed_flagbits() {
        let cli = parse_args(&["aconf", "--flagbits", "[1]", "f.conf"]);
        assert!(matches!(
            cli.build_options(),
            Err(CliError::MalformedFlagBits { .. })
        ));
    }

    #[test]
    fn test_defaultconfig_json() {
        let cli = parse_args(&[
            "aconf",
            "--defaultconfig",
            r#"{"b": "4", "c": "3"}"#,
            "f.conf",
        ]);
        let options = cli.build_options().unwrap();
        let defaults = options.default_config.unwrap();
        assert_eq!(defaults["c"], aconf_core::ConfigValue::Str("3".to_string()));
    }

    #[test]
    fn test_malformed_defaultconfig() {
        let cli = parse_args(&["aconf", "--defaultconfig", "not json", "f.conf"]);
        assert!(matches!(
            cli.build_options(),
            Err(CliError::MalformedDefaultConfig { .. })
        ));
    }

    // ==================== Argument shape tests ====================

    #[test]
    fn test_file_argument_required() {
        assert!(Cli::try_parse_from(["aconf"]).is_err());
    }

    #[test]
    fn test_multiple_files() {
        let cli = parse_args(&["aconf", "a.conf", "b.conf"]);
        assert_eq!(cli.files.len(), 2);
    }
}
