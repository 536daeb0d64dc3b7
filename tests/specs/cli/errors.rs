//! CLI error specs
//!
//! Verify usage errors and missing connection settings are reported.

use crate::prelude::*;

#[test]
fn missing_subcommand_is_a_usage_error() {
    let temp = Project::empty();

    let run = temp.sechub().fails();

    assert_eq!(run.code(), Some(2));
}

#[test]
fn malformed_job_uuid_is_rejected() {
    let temp = Project::empty();

    temp.sechub()
        .args(&["job", "status", "--project", "p1", "not-a-uuid"])
        .fails()
        .stderr_has("not-a-uuid");
}

#[test]
fn status_without_server_names_the_variable() {
    let temp = Project::empty();

    temp.sechub()
        .args(&["job", "status", "--project", "p1", JOB])
        .fails()
        .stderr_has("SECHUB_SERVER");
}

#[test]
fn status_without_token_names_the_variables() {
    let temp = Project::empty();

    temp.sechub()
        .args(&["job", "status", "--project", "p1", JOB])
        .env("SECHUB_SERVER", "https://sechub.example.org")
        .env("SECHUB_USERID", "alice")
        .fails()
        .stderr_has("SECHUB_APITOKEN");
}

#[test]
fn unreachable_server_fails_without_waiting() {
    let temp = Project::empty();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB])
        .with_server("http://127.0.0.1:1")
        .fails()
        .stderr_has("HTTP request failed");
}
