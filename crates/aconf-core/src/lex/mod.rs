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

//! Lexical analysis subsystem.
//!
//! - [`tokens`] - token model ([`Token`], [`TokenKind`])
//! - [`lexer`] - the mode-sensitive scanner ([`tokenize`])
//! - [`strings`] - quote classification, escape removal, quoted splitting
//!
//! # Examples
//!
//! ```
//! use aconf_core::lex::{tokenize, TokenKind};
//! use aconf_core::Options;
//!
//! let tokens = tokenize("<vhost>\n  port 8080\n</vhost>\n", &Options::default()).unwrap();
//! assert_eq!(tokens[0].kind, TokenKind::OpenTag);
//! assert_eq!(tokens[0].lexeme, "vhost");
//! ```

pub mod lexer;
pub mod strings;
pub mod tokens;

pub use lexer::tokenize;
pub use strings::{quote_char, split_respecting_quotes, unescape};
pub use tokens::{Token, TokenKind};
