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

//! Core parser and loader for Apache-style configuration files.
//!
//! This crate parses the hierarchical configuration dialect made popular
//! by Apache httpd and Perl's Config::General: key/value options, nested
//! `<tag>` blocks, include directives, heredocs, quoted strings and
//! optional variable interpolation. Loading produces an ordered tree of
//! nested mappings, lists and scalar strings.
//!
//! # Quick Start
//!
//! ```
//! use aconf_core::loads;
//!
//! let config = loads("<server web>\n  port 8080\n</server>\n").unwrap();
//! let server = config["server"].as_map().unwrap();
//! let web = server["web"].as_map().unwrap();
//! assert_eq!(web["port"].as_str(), Some("8080"));
//! ```
//!
//! Behavior is tuned through [`Options`]; see its documentation for the
//! recognized toggles.

pub mod ast;
mod error;
pub mod lex;
mod loader;
mod options;
mod parser;
mod reader;
mod value;

pub use ast::{CommentStyle, Config, OptionValue, QuoteStyle, Separator, Statement};
pub use error::{AconfError, AconfErrorKind, AconfResult};
pub use loader::{load, load_with_options, loads, loads_with_options, Loader};
pub use options::{FlagTable, Hooks, Options, OptionsBuilder, PreOpenHook, PreReadHook};
pub use parser::parse;
pub use reader::{LocalReader, Reader};
pub use value::{ConfigMap, ConfigValue};
