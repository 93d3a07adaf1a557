#![allow(dead_code)]

pub mod mock_api;

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Unreachable base URL: nothing listens on the discard port locally
pub const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

/// Helper struct to run heartflow-admin commands with an isolated config file
pub struct AdminTest {
    pub temp_dir: TempDir,
    binary_path: String,
    base_url: Option<String>,
}

impl AdminTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");

        AdminTest {
            temp_dir,
            binary_path: env!("CARGO_BIN_EXE_heartflow-admin").to_string(),
            base_url: None,
        }
    }

    /// Point the admin API at `url` through the environment
    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = Some(url.to_string());
        self
    }

    pub fn config_path(&self) -> PathBuf {
        self.temp_dir.path().join("config.yaml")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(&self.binary_path);
        command
            .arg("--config")
            .arg(self.config_path())
            .args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("HEARTFLOW_ADMIN_CONFIG")
            .env_remove("HEARTFLOW_API_BASE_URL")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");

        if let Some(url) = &self.base_url {
            command.env("HEARTFLOW_API_BASE_URL", url);
        }

        command.output().expect("Failed to execute heartflow-admin")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        fs::write(self.config_path(), content).expect("Failed to write config file");
    }

    pub fn read_config(&self) -> String {
        fs::read_to_string(self.config_path()).expect("Failed to read config file")
    }
}
