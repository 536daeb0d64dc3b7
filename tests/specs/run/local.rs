//! Local run specs
//!
//! Verify the executor chain end to end with no-op products.

use crate::prelude::*;

fn job_uuid(stdout: &str) -> String {
    let doc: serde_json::Value = serde_json::from_str(stdout).unwrap();
    doc["jobUUID"].as_str().unwrap().to_string()
}

#[test]
fn secret_scan_runs_without_uploads() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);

    temp.sechub()
        .args(&["run", "--config", "sechub.toml", "--project", "p1", "--scan-type", "secretScan"])
        .with_pds_credentials()
        .passes()
        .stdout_has("State: ENDED")
        .stdout_has("Result: OK")
        .stdout_has("Product results: 1");
}

#[test]
fn license_scan_without_source_fails() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);

    temp.sechub()
        .args(&["run", "--config", "sechub.toml", "--project", "p1", "--scan-type", "licenseScan"])
        .with_pds_credentials()
        .fails()
        .stdout_has("Result: FAILED")
        .stdout_has("Product results: 0")
        .stderr_has("licenseScan needs a source zip or binaries tar");
}

#[test]
fn license_scan_with_source_zip_passes() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);
    temp.file("source.zip", "PK fake archive");

    temp.sechub()
        .args(&["run", "--config", "sechub.toml", "--project", "p1"])
        .args(&["--scan-type", "licenseScan,secretScan", "--source-zip", "source.zip"])
        .with_pds_credentials()
        .passes()
        .stdout_has("Result: OK")
        .stdout_has("Product results: 2");
}

#[test]
fn missing_credentials_fail_the_job() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);

    temp.sechub()
        .args(&["run", "--config", "sechub.toml", "--project", "p1", "--scan-type", "secretScan"])
        .fails()
        .stdout_has("Result: FAILED")
        .stdout_has("Error: invalid configuration: executor pds-secrets: environment variable PDS_USER is not set");
}

#[test]
fn unmatched_scan_type_ends_ok() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);

    temp.sechub()
        .args(&["run", "--config", "sechub.toml", "--project", "p1", "--scan-type", "webScan"])
        .passes()
        .stdout_has("Result: OK")
        .stdout_has("Product results: 0");
}

#[test]
fn trace_logging_goes_to_stderr_without_secrets() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);

    let run = temp
        .sechub()
        .args(&["run", "--config", "sechub.toml", "--project", "p1", "--scan-type", "secretScan"])
        .args(&["--output", "json"])
        .with_pds_credentials()
        .env("RUST_LOG", "info")
        .passes()
        .stderr_has("metadata notice")
        .stderr_lacks("s3cret");

    let uuid = job_uuid(&run.stdout());
    assert!(run.stderr().contains(&format!("sechub-{uuid}-PDS_SECRETSCAN")));
}

#[test]
fn job_log_is_readable_by_status() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);

    let run = temp
        .sechub()
        .args(&["run", "--config", "sechub.toml", "--project", "p1", "--scan-type", "secretScan"])
        .args(&["--store", "jobs.wal", "--output", "json"])
        .with_pds_credentials()
        .passes();
    let uuid = job_uuid(&run.stdout());

    temp.sechub()
        .args(&["job", "status", "--project", "p1", &uuid, "--store", "jobs.wal"])
        .passes()
        .stdout_has("State: ENDED")
        .stdout_has("Result: OK");

    temp.sechub()
        .args(&["job", "await", "--project", "p1", &uuid, "--store", "jobs.wal"])
        .args(&["--state", "ENDED", "--result", "OK"])
        .passes();

    // Other projects cannot see the job
    temp.sechub()
        .args(&["job", "status", "--project", "p2", &uuid, "--store", "jobs.wal"])
        .passes()
        .stdout_eq(&format!("Job not found: {uuid}\n"));
}
