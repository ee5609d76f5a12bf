//! 以真实二进制运行 swatch，用 sh 脚本代替 Dart Sass

#![cfg(unix)]

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};
use tempfile::TempDir;

/// 记录参数到 calls.log；输入路径含 "flatly" 时写出半成品并失败
const FAKE_SASS: &str = r#"#!/bin/sh
echo "$@" >> "$(dirname "$0")/calls.log"
case "$1" in
  *flatly*) printf 'partial' > "$2"; exit 1 ;;
esac
printf 'body{color:red}' > "$2"
"#;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("fake-sass.sh"), FAKE_SASS).unwrap();
        fs::create_dir_all(dir.path().join("new_themes")).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn theme(&self, name: &str, with_entry: bool) -> &Self {
        let d = self.root().join("new_themes").join(name);
        fs::create_dir_all(&d).unwrap();
        if with_entry {
            fs::write(d.join("bulmaswatch.scss"), "@use 'bulma';").unwrap();
        }
        self
    }

    fn css(&self, name: &str) -> PathBuf {
        self.root().join("dist/css").join(format!("{name}.css"))
    }

    fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.root().join("calls.log"))
            .map(|s| s.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn run(&self, args: &[&str]) -> Output {
        let compiler = format!("sh {}", self.root().join("fake-sass.sh").display());
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_swatch"));
        cmd.current_dir(self.root()).args(args);
        if matches!(args.first(), Some(&"build")) {
            cmd.args(["--compiler", compiler.as_str()]);
        }
        for key in [
            "SWATCH_CONFIG",
            "SWATCH_THEMES_DIR",
            "SWATCH_OUT",
            "SWATCH_UTILITIES",
            "SWATCH_ENTRY",
            "SWATCH_COMPILER",
            "SWATCH_STYLE",
            "SWATCH_SOURCE_MAP",
        ] {
            cmd.env_remove(key);
        }
        cmd.output().unwrap()
    }
}

#[test]
fn mixed_themes_exit_with_failure() {
    let ws = Workspace::new();
    ws.theme("dark", true).theme("broken", false).theme("utilities", true);

    let out = ws.run(&["build"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(ws.css("dark").is_file());
    assert!(!ws.css("broken").exists());
    assert!(!ws.css("utilities").exists());

    let calls = ws.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(
        calls[0],
        "new_themes/dark/bulmaswatch.scss dist/css/dark.css --no-source-map --style=compressed \
         --load-path=node_modules --load-path=new_themes/utilities"
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("编译成功: 1 个主题"));
    assert!(stdout.contains("编译失败: 1 个主题"));
}

#[test]
fn zero_themes_exit_cleanly() {
    let ws = Workspace::new();
    ws.theme("utilities", true);

    let out = ws.run(&["build"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(ws.calls().is_empty());
    assert!(ws.root().join("dist/css").is_dir());
}

#[test]
fn all_themes_compiled() {
    let ws = Workspace::new();
    ws.theme("cosmo", true).theme("darkly", true);

    let out = ws.run(&["build", "--style", "expanded"]);
    assert_eq!(out.status.code(), Some(0));
    assert_eq!(fs::read_to_string(ws.css("cosmo")).unwrap(), "body{color:red}");
    assert!(ws.css("darkly").is_file());
    assert!(ws.calls().iter().all(|c| c.contains("--style=expanded")));
}

#[test]
fn failed_theme_output_is_removed() {
    let ws = Workspace::new();
    ws.theme("flatly", true).theme("lux", true);

    let out = ws.run(&["build"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(!ws.css("flatly").exists());
    assert!(ws.css("lux").is_file());
    assert_eq!(ws.calls().len(), 2);
}

#[test]
fn config_file_is_honoured() {
    let ws = Workspace::new();
    fs::rename(ws.root().join("new_themes"), ws.root().join("themes")).unwrap();
    fs::create_dir_all(ws.root().join("themes/solar")).unwrap();
    fs::write(ws.root().join("themes/solar/main.scss"), "").unwrap();
    fs::write(
        ws.root().join("swatch.yaml"),
        "themes_dir: themes\nout_dir: public\nentry: main.scss\nload_paths: [vendor]\n",
    )
    .unwrap();

    let out = ws.run(&["build"]);
    assert_eq!(out.status.code(), Some(0));
    assert!(ws.root().join("public/solar.css").is_file());
    assert!(ws.calls()[0].ends_with("--load-path=vendor --load-path=themes/utilities"));
}

#[test]
fn unreadable_themes_root_is_fatal() {
    let ws = Workspace::new();
    fs::remove_dir_all(ws.root().join("new_themes")).unwrap();

    let out = ws.run(&["build"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&out.stderr).contains("读取主题目录失败"));
    assert!(ws.calls().is_empty());
}

#[test]
fn list_marks_missing_entries() {
    let ws = Workspace::new();
    ws.theme("dark", true).theme("broken", false).theme("utilities", true);

    let out = ws.run(&["list"]);
    assert_eq!(out.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("✗ broken\n✓ dark\n"));
    assert!(!stdout.contains("utilities\n"));
    assert!(!ws.root().join("dist").exists());
}
