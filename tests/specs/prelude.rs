//! Test helpers for behavioral specifications.

use assert_cmd::Command;
use std::path::{Path, PathBuf};

pub const JOB: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

/// Executor configuration with a license and a secret scan executor
pub const SCAN_CONFIG: &str = r#"
[resilience]
max_retries = 1
retry_wait = "10ms"

[poller]
interval = "50ms"
timeout = "500ms"

[[executors]]
id = "pds-license"
product = "PDS_LICENSESCAN"
priority = 1
setup = { base_url = "https://pds.example.org", user = "env:PDS_USER", password = "env:PDS_TOKEN" }
parameters = { "pds.config.productidentifier" = "PDS_SCANCODE" }

[[executors]]
id = "pds-secrets"
product = "PDS_SECRETSCAN"
priority = 2
setup = { base_url = "https://pds.example.org", user = "env:PDS_USER", password = "env:PDS_TOKEN" }
parameters = { "pds.config.productidentifier" = "PDS_GITLEAKS" }
"#;

/// Temporary working directory for one spec
pub struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    pub fn empty() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the project root
    pub fn file(&self, rel: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, content).unwrap();
        path
    }

    /// `sechub` running in the project root with a clean SecHub environment
    pub fn sechub(&self) -> CliBuilder {
        let mut cmd = Command::new(assert_cmd::cargo::cargo_bin("sechub"));
        cmd.current_dir(self.dir.path())
            .env_remove("SECHUB_SERVER")
            .env_remove("SECHUB_USERID")
            .env_remove("SECHUB_APITOKEN")
            .env_remove("SECHUB_POLL_INTERVAL_MS")
            .env_remove("SECHUB_TIMEOUT_MS")
            .env_remove("PDS_USER")
            .env_remove("PDS_TOKEN")
            .env_remove("RUST_LOG");
        CliBuilder { cmd }
    }
}

pub struct CliBuilder {
    cmd: Command,
}

impl CliBuilder {
    pub fn args(mut self, args: &[&str]) -> Self {
        self.cmd.args(args);
        self
    }

    pub fn env(mut self, key: &str, value: &str) -> Self {
        self.cmd.env(key, value);
        self
    }

    /// Environment of a scanner with PDS credentials
    pub fn with_pds_credentials(self) -> Self {
        self.env("PDS_USER", "scanner").env("PDS_TOKEN", "s3cret")
    }

    /// Point the client at a server with valid credentials
    pub fn with_server(self, url: &str) -> Self {
        self.env("SECHUB_SERVER", url)
            .env("SECHUB_USERID", "alice")
            .env("SECHUB_APITOKEN", "t0ken")
    }

    pub fn passes(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert!(
            run.output.status.success(),
            "expected success, got {:?}\nstdout:\n{}\nstderr:\n{}",
            run.output.status,
            run.stdout(),
            run.stderr()
        );
        run
    }

    pub fn fails(mut self) -> RunAssert {
        let output = self.cmd.output().unwrap();
        let run = RunAssert { output };
        assert!(
            !run.output.status.success(),
            "expected failure\nstdout:\n{}\nstderr:\n{}",
            run.stdout(),
            run.stderr()
        );
        run
    }
}

pub struct RunAssert {
    output: std::process::Output,
}

impl RunAssert {
    pub fn stdout(&self) -> String {
        String::from_utf8_lossy(&self.output.stdout).into_owned()
    }

    pub fn stderr(&self) -> String {
        String::from_utf8_lossy(&self.output.stderr).into_owned()
    }

    pub fn code(&self) -> Option<i32> {
        self.output.status.code()
    }

    pub fn stdout_eq(self, expected: &str) -> Self {
        similar_asserts::assert_eq!(self.stdout(), expected);
        self
    }

    pub fn stdout_has(self, expected: &str) -> Self {
        let stdout = self.stdout();
        assert!(stdout.contains(expected), "stdout lacks {expected:?}:\n{stdout}");
        self
    }

    pub fn stdout_lacks(self, unexpected: &str) -> Self {
        let stdout = self.stdout();
        assert!(!stdout.contains(unexpected), "stdout has {unexpected:?}:\n{stdout}");
        self
    }

    pub fn stderr_has(self, expected: &str) -> Self {
        let stderr = self.stderr();
        assert!(stderr.contains(expected), "stderr lacks {expected:?}:\n{stderr}");
        self
    }

    pub fn stderr_lacks(self, unexpected: &str) -> Self {
        let stderr = self.stderr();
        assert!(!stderr.contains(unexpected), "stderr has {unexpected:?}:\n{stderr}");
        self
    }
}

/// Mock SecHub server for the status endpoint of [`JOB`] in project p1
///
/// Endpoints only answer requests carrying the credentials set by
/// [`CliBuilder::with_server`]; anything else gets mockito's 501.
pub struct StatusServer {
    server: mockito::ServerGuard,
}

impl StatusServer {
    pub fn new() -> Self {
        Self {
            server: mockito::Server::new(),
        }
    }

    pub fn url(&self) -> String {
        self.server.url()
    }

    /// Endpoint answering with `status` and `body`; call `create` to arm it
    pub fn respond(&mut self, status: usize, body: &str) -> mockito::Mock {
        self.server
            .mock("GET", format!("/api/project/p1/job/{JOB}").as_str())
            .match_header("authorization", "Basic YWxpY2U6dDBrZW4=")
            .with_status(status)
            .with_header("content-type", "application/json")
            .with_body(body)
    }

    /// Endpoint serving the status document of a job in the given state
    pub fn job(&mut self, state: &str, result: &str) -> mockito::Mock {
        self.respond(
            200,
            &format!(
                r#"{{"jobUUID":"{JOB}","projectId":"p1","executionState":"{state}","executionResult":"{result}","created":"2024-05-01T12:00:00Z"}}"#
            ),
        )
    }

    pub fn not_found(&mut self) -> mockito::Mock {
        self.respond(404, r#"{"message":"not found"}"#)
    }
}
