#![allow(dead_code)]

use std::fs;
use std::path::PathBuf;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Collections served by `--fixtures` in binary tests
pub const FIXTURES: &str = r#"{
    "students": [
        {"id": 1, "name": "Ana Silva", "email": "ana@example.com", "stage": "offer", "nationality": "Brazil", "agent_id": 1, "university_id": 2},
        {"id": 2, "name": "Li Wei", "email": "li.wei@example.com", "stage": "visa", "nationality": "China", "agent_id": 7},
        {"id": 3, "name": "Amina Yusuf", "email": "amina@example.com", "stage": "inquiry", "nationality": "Nigeria"},
        {"id": 4, "name": "Jonas Berg", "email": "jonas@example.com", "stage": "offer", "nationality": "Norway"}
    ],
    "agents": [
        {"id": 1, "name": "Global Pathways", "email": "hello@globalpathways.com", "country": "Brazil", "status": "active"},
        {"id": 2, "name": "Study Bridge", "email": "team@studybridge.io", "status": "pending"}
    ],
    "universities": [
        {"id": 2, "name": "University of Leeds", "country": "United Kingdom", "partnership": "premium"}
    ],
    "staff": [
        {"id": 1, "name": "Nadia Rahman", "email": "nadia@intered.io", "role": "admin"}
    ]
}"#;

pub fn intered_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_intered"))
}

/// Helper struct to run intered commands in an isolated temp directory
pub struct InterEdTest {
    pub temp_dir: TempDir,
}

impl InterEdTest {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        InterEdTest { temp_dir }
    }

    /// A test directory with `fixtures.json` written to it
    pub fn with_fixtures() -> Self {
        let test = Self::new();
        fs::write(test.fixtures_path(), FIXTURES).expect("Failed to write fixtures");
        test
    }

    pub fn fixtures_path(&self) -> PathBuf {
        self.temp_dir.path().join("fixtures.json")
    }

    pub fn state_dir(&self) -> PathBuf {
        self.temp_dir.path().join(".intered")
    }

    pub fn run(&self, args: &[&str]) -> Output {
        Command::new(intered_binary())
            .args(args)
            .current_dir(self.temp_dir.path())
            .env("INTERED_ROOT", self.state_dir())
            .env_remove("INTERED_API_URL")
            .env_remove("INTERED_API_TOKEN")
            .env_remove("INTERED_FIXTURES")
            .env_remove("RUST_LOG")
            .output()
            .expect("Failed to execute intered command")
    }

    /// Run against the fixtures file
    pub fn run_offline(&self, args: &[&str]) -> Output {
        let fixtures = self.fixtures_path();
        let mut full = vec!["--fixtures", fixtures.to_str().expect("utf-8 temp path")];
        full.extend_from_slice(args);
        self.run(&full)
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert_success(args, &output);
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_offline_success(&self, args: &[&str]) -> String {
        let output = self.run_offline(args);
        assert_success(args, &output);
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert_failure(args, &output);
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_offline_failure(&self, args: &[&str]) -> String {
        let output = self.run_offline(args);
        assert_failure(args, &output);
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn write_config(&self, content: &str) {
        fs::create_dir_all(self.state_dir()).expect("Failed to create .intered directory");
        fs::write(self.state_dir().join("config.yaml"), content)
            .expect("Failed to write config file");
    }

    pub fn read_config(&self) -> Option<String> {
        fs::read_to_string(self.state_dir().join("config.yaml")).ok()
    }

    pub fn read_events(&self) -> Option<String> {
        fs::read_to_string(self.state_dir().join("events.ndjson")).ok()
    }
}

fn assert_success(args: &[&str], output: &Output) {
    if !output.status.success() {
        panic!(
            "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

fn assert_failure(args: &[&str], output: &Output) {
    assert!(
        !output.status.success(),
        "Expected command {:?} to fail, but it succeeded\nstdout: {}",
        args,
        String::from_utf8_lossy(&output.stdout)
    );
}
