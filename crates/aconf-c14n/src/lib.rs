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

//! Dumper for AConf value trees.
//!
//! Re-serializes a loaded value tree to Apache-style configuration text.
//! The output is deterministic and round-trips: parsing it with the same
//! options yields a semantically equal tree (byte-exactness is not a
//! goal; quoting and block forms may be normalized).
//!
//! # Examples
//!
//! ```
//! use aconf_c14n::{dump, DumpConfig, QuotingStrategy};
//! use aconf_core::loads;
//!
//! let tree = loads("<server>\n  port 8080\n</server>\n").unwrap();
//! let text = dump(&tree).unwrap();
//! assert_eq!(text, "<server>\n  port 8080\n</server>\n");
//!
//! let config = DumpConfig::new().with_quoting(QuotingStrategy::Always);
//! let quoted = aconf_c14n::dump_with_config(&tree, &config).unwrap();
//! assert!(quoted.contains("port \"8080\""));
//! ```

mod config;
mod writer;

pub use config::{DumpConfig, QuotingStrategy};
pub use writer::DumpWriter;

use aconf_core::{AconfResult, ConfigMap};

/// Dump a value tree to configuration text with default settings.
pub fn dump(tree: &ConfigMap) -> AconfResult<String> {
    dump_with_config(tree, &DumpConfig::default())
}

/// Dump a value tree with custom settings.
pub fn dump_with_config(tree: &ConfigMap, config: &DumpConfig) -> AconfResult<String> {
    let mut writer = DumpWriter::new(config.clone());
    writer.write_tree(tree)
}
