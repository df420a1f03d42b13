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

//! Include machinery tests against real temporary directories.

use aconf_core::{ConfigValue, Loader, Options};
use std::fs;
use std::path::Path;
use std::sync::Arc;
use tempfile::tempdir;

fn s(text: &str) -> ConfigValue {
    ConfigValue::Str(text.to_string())
}

fn write(dir: &Path, name: &str, text: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, text).unwrap();
    path
}

// ==================== Basic include tests ====================

#[test]
fn test_include_absolute_path() {
    let dir = tempdir().unwrap();
    let sub = write(dir.path(), "sub.conf", "b 2\n");
    let main = write(
        dir.path(),
        "main.conf",
        &format!("a 1\ninclude {}\n", sub.display()),
    );

    let config = Loader::new(Options::default()).load(&main).unwrap();
    assert_eq!(config["a"], s("1"));
    assert_eq!(config["b"], s("2"));
}

#[test]
fn test_include_relative_to_including_file() {
    let dir = tempdir().unwrap();
    write(dir.path(), "sub.conf", "b 2\n");
    let main = write(dir.path(), "main.conf", "a 1\ninclude sub.conf\n");

    let options = Options::builder().include_relative(true).build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["b"], s("2"));
}

#[test]
fn test_include_nested_relative() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("conf.d")).unwrap();
    write(dir.path(), "conf.d/inner.conf", "c 3\n");
    write(dir.path(), "conf.d/outer.conf", "b 2\ninclude inner.conf\n");
    let main = write(dir.path(), "main.conf", "a 1\ninclude conf.d/outer.conf\n");

    let options = Options::builder().include_relative(true).build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["a"], s("1"));
    assert_eq!(config["b"], s("2"));
    // inner.conf resolves against conf.d, the directory of its includer.
    assert_eq!(config["c"], s("3"));
}

#[test]
fn test_config_path_search_order() {
    let first = tempdir().unwrap();
    let second = tempdir().unwrap();
    write(second.path(), "t.conf", "from second\n");
    let dir = tempdir().unwrap();
    let main = write(dir.path(), "main.conf", "include t.conf\n");

    let options = Options::builder()
        .config_path(first.path())
        .config_path(second.path())
        .build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["from"], s("second"));
}

#[test]
fn test_native_include_directive() {
    let dir = tempdir().unwrap();
    let sub = write(dir.path(), "sub.conf", "b 2\n");
    let main = write(
        dir.path(),
        "main.conf",
        &format!("<<include {}>>\n", sub.display()),
    );

    let config = Loader::new(Options::default()).load(&main).unwrap();
    assert_eq!(config["b"], s("2"));
}

#[test]
fn test_include_merges_into_enclosing_block() {
    let dir = tempdir().unwrap();
    write(dir.path(), "sub.conf", "port 8080\n");
    let main = write(
        dir.path(),
        "main.conf",
        "<server>\ninclude sub.conf\nhost web\n</server>\n",
    );

    let options = Options::builder().include_relative(true).build();
    let config = Loader::new(options).load(&main).unwrap();
    let server = config["server"].as_map().unwrap();
    assert_eq!(server["port"], s("8080"));
    assert_eq!(server["host"], s("web"));
}

// ==================== Re-inclusion tests ====================

#[test]
fn test_repeated_include_is_noop() {
    let dir = tempdir().unwrap();
    write(dir.path(), "sub.conf", "x 1\n");
    let main = write(dir.path(), "main.conf", "include sub.conf\ninclude sub.conf\n");

    let options = Options::builder().include_relative(true).build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["x"], s("1"));
}

#[test]
fn test_include_again_re_walks() {
    let dir = tempdir().unwrap();
    write(dir.path(), "sub.conf", "x 1\n");
    let main = write(dir.path(), "main.conf", "include sub.conf\ninclude sub.conf\n");

    let options = Options::builder()
        .include_relative(true)
        .include_again(true)
        .build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["x"], ConfigValue::List(vec![s("1"), s("1")]));
}

// ==================== Directory and glob tests ====================

#[test]
fn test_include_directories() {
    let dir = tempdir().unwrap();
    let conf_d = dir.path().join("conf.d");
    fs::create_dir(&conf_d).unwrap();
    write(&conf_d, "01.conf", "a 1\n");
    write(&conf_d, "02.conf", "a 2\n");
    let main = write(
        dir.path(),
        "main.conf",
        &format!("include {}\n", conf_d.display()),
    );

    let options = Options::builder().include_directories(true).build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["a"], ConfigValue::List(vec![s("1"), s("2")]));
}

#[test]
fn test_include_glob() {
    let dir = tempdir().unwrap();
    write(dir.path(), "glob-a.conf", "x 1\n");
    write(dir.path(), "glob-b.conf", "x 2\n");
    write(dir.path(), "other.txt", "x 3\n");
    let main = write(
        dir.path(),
        "main.conf",
        &format!("include {}\n", dir.path().join("glob-*.conf").display()),
    );

    let options = Options::builder().include_glob(true).build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["x"], ConfigValue::List(vec![s("1"), s("2")]));
}

#[test]
fn test_include_glob_no_matches_is_silent() {
    let dir = tempdir().unwrap();
    let main = write(
        dir.path(),
        "main.conf",
        &format!("a 1\ninclude {}\n", dir.path().join("none-*.conf").display()),
    );

    let options = Options::builder().include_glob(true).build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["a"], s("1"));
    assert_eq!(config.len(), 1);
}

// ==================== Failure tests ====================

#[test]
fn test_missing_include_fails() {
    let dir = tempdir().unwrap();
    let main = write(dir.path(), "main.conf", "include missing.conf\n");

    let options = Options::builder().include_relative(true).build();
    let err = Loader::new(options).load(&main).unwrap_err();
    assert_eq!(err.kind, aconf_core::AconfErrorKind::Include);
}

#[test]
fn test_include_optional_missing_succeeds() {
    let dir = tempdir().unwrap();
    let main = write(
        dir.path(),
        "main.conf",
        "a 1\nIncludeOptional missing.conf\n",
    );

    let options = Options::builder().include_relative(true).build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["a"], s("1"));
}

#[test]
fn test_top_level_missing_file_fails() {
    let err = Loader::new(Options::default())
        .load("/nonexistent/aconf-top.conf")
        .unwrap_err();
    assert_eq!(err.kind, aconf_core::AconfErrorKind::IncludeIo);
}

// ==================== Interpolation across includes ====================

#[test]
fn test_included_file_sees_enclosing_scope() {
    let dir = tempdir().unwrap();
    write(dir.path(), "sub.conf", "path ${root}/logs\n");
    let main = write(dir.path(), "main.conf", "root /srv\ninclude sub.conf\n");

    let options = Options::builder()
        .include_relative(true)
        .interpolate_vars(true)
        .build();
    let config = Loader::new(options).load(&main).unwrap();
    assert_eq!(config["path"], s("/srv/logs"));
}

// ==================== Hook tests ====================

#[test]
fn test_pre_open_veto() {
    let options = Options::builder()
        .pre_open(Arc::new(|name: &str, base: &Path| {
            (name.contains("blah"), name.to_string(), base.to_path_buf())
        }))
        .build();

    let config = Loader::new(options.clone()).load("halb.conf").unwrap();
    assert!(config.is_empty());

    // The hook lets this one through, so the missing file surfaces.
    assert!(Loader::new(options).load("blah.conf").is_err());
}

#[test]
fn test_pre_read_substitution() {
    let options = Options::builder()
        .pre_read(Arc::new(|source: &str, text: &str| {
            (text.contains("blah"), source.to_string(), "a 1\n".to_string())
        }))
        .build();

    let config = Loader::new(options).loads("blah 1\n").unwrap();
    assert_eq!(config["a"], s("1"));
}

#[test]
fn test_pre_read_veto() {
    let options = Options::builder()
        .pre_read(Arc::new(|source: &str, text: &str| {
            (text.contains("blah"), source.to_string(), text.to_string())
        }))
        .build();

    let config = Loader::new(options).loads("other 1\n").unwrap();
    assert!(config.is_empty());
}
