#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway data directory for driving the `motiva` binary.
pub struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn data_file(&self) -> PathBuf {
        self.dir.path().join("motiva_data.json")
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.dir.path().join("backups")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("create parent");
        }
        fs::write(&path, contents).expect("write file");
        path
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        self.write_file("motiva.toml", contents)
    }

    pub fn cmd(&self) -> Command {
        let mut cmd = motiva_cmd();
        cmd.env("MOTIVA_DATA_DIR", self.dir.path());
        cmd
    }

    /// Run a command with `--json` and return the parsed success envelope.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("json output");
        assert_eq!(value["status"], "success", "unexpected envelope: {value}");
        value
    }

    /// Run a command with `--json`, expect it to fail with `code`, and return
    /// the parsed error envelope.
    pub fn json_error(&self, args: &[&str], code: i32) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        let value: Value = serde_json::from_slice(&output).expect("json error output");
        assert_eq!(value["status"], "error", "unexpected envelope: {value}");
        value
    }

    /// Add a task and return its full id.
    pub fn add(&self, args: &[&str]) -> String {
        let mut full = vec!["add"];
        full.extend_from_slice(args);
        let value = self.json(&full);
        value["data"]["task"]["id"]
            .as_str()
            .expect("task id")
            .to_string()
    }
}

pub fn motiva_cmd() -> Command {
    let mut cmd = Command::cargo_bin("motiva").expect("binary");
    cmd.env_remove("MOTIVA_CONFIG");
    cmd.env_remove("RUST_LOG");
    cmd
}
