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

//! Pluggable text-source abstraction.
//!
//! The loader reaches the filesystem and the process environment only
//! through this trait, so tests can substitute an in-memory source and the
//! environment table stays injectable.

use crate::error::{AconfError, AconfResult};
use std::env;
use std::fs;
use std::path::Path;

/// Source of configuration text and environment variables.
pub trait Reader {
    /// Canonical identifier for a source, used as the AST-cache key.
    ///
    /// Two paths naming the same underlying source must yield the same id.
    fn canonical_id(&self, path: &Path) -> String;

    /// Read the entire text of a source.
    fn read(&self, path: &Path) -> AconfResult<String>;

    /// True when the path names an existing source.
    fn exists(&self, path: &Path) -> bool;

    /// True when the path names a directory.
    fn is_dir(&self, path: &Path) -> bool;

    /// File names of the directory's regular files, ASCII order.
    fn list_dir(&self, path: &Path) -> AconfResult<Vec<String>>;

    /// Look up an environment variable.
    fn env_var(&self, name: &str) -> Option<String>;
}

/// Default [`Reader`] over the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalReader;

impl Reader for LocalReader {
    fn canonical_id(&self, path: &Path) -> String {
        match fs::canonicalize(path) {
            Ok(abs) => abs.to_string_lossy().into_owned(),
            // Sources that do not exist yet still need a stable id.
            Err(_) => {
                if path.is_absolute() {
                    path.to_string_lossy().into_owned()
                } else {
                    match env::current_dir() {
                        Ok(cwd) => cwd.join(path).to_string_lossy().into_owned(),
                        Err(_) => path.to_string_lossy().into_owned(),
                    }
                }
            }
        }
    }

    fn read(&self, path: &Path) -> AconfResult<String> {
        fs::read_to_string(path).map_err(|e| {
            AconfError::include_io(format!("file {} can't be opened: {}", path.display(), e))
        })
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn list_dir(&self, path: &Path) -> AconfResult<Vec<String>> {
        let entries = fs::read_dir(path).map_err(|e| {
            AconfError::include_io(format!("directory {} can't be read: {}", path.display(), e))
        })?;

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| {
                AconfError::include_io(format!(
                    "directory {} can't be read: {}",
                    path.display(),
                    e
                ))
            })?;
            if entry.path().is_file() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();
        Ok(names)
    }

    fn env_var(&self, name: &str) -> Option<String> {
        env::var(name).ok()
    }
}
