//! Job await specs
//!
//! Verify the poller against a SecHub status endpoint.

use crate::prelude::*;

#[test]
fn ended_job_satisfies_state_and_result() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let endpoint = server.job("ENDED", "OK").expect(1).create();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB, "--state", "ENDED", "--result", "OK"])
        .with_server(&server.url())
        .passes()
        .stdout_eq(&format!("Job {JOB} found\n"));

    endpoint.assert();
}

#[test]
fn any_of_several_states_is_accepted() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let _endpoint = server.job("STARTED", "NONE").create();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB])
        .args(&["--state", "READY_TO_START", "--state", "STARTED"])
        .with_server(&server.url())
        .passes();
}

#[test]
fn wrong_state_reports_expected_and_document() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let _endpoint = server.job("STARTED", "NONE").create();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB, "--state", "ENDED"])
        .with_server(&server.url())
        .fails()
        .stderr_has("job data contains not [ENDED] but:")
        .stderr_has(r#""executionState":"STARTED""#);
}

#[test]
fn wrong_result_is_reported() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let _endpoint = server.job("ENDED", "FAILED").create();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB, "--result", "OK"])
        .with_server(&server.url())
        .fails()
        .stderr_has("job data contains not OK but:");
}

#[test]
fn missing_job_times_out() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let endpoint = server.not_found().expect_at_least(2).create();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB, "--timeout-ms", "300"])
        .env("SECHUB_POLL_INTERVAL_MS", "50")
        .with_server(&server.url())
        .fails()
        .stderr_has(&format!("job {JOB} was not found after waiting"))
        .stderr_has("<nothing>");

    endpoint.assert();
}

#[test]
fn absent_job_satisfies_absent() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let endpoint = server.not_found().expect(1).create();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB, "--absent"])
        .with_server(&server.url())
        .passes()
        .stdout_eq(&format!("Job {JOB} is gone\n"));

    endpoint.assert();
}

#[test]
fn other_job_with_shared_prefix_is_not_a_match() {
    let temp = Project::empty();
    let other = "3fa85f64-5717-4562-b3fc-2c963f66afa7";
    let mut server = StatusServer::new();
    let _endpoint = server
        .respond(
            200,
            &format!(r#"{{"jobUUID":"{other}","executionState":"ENDED","executionResult":"OK"}}"#),
        )
        .create();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB, "--absent"])
        .with_server(&server.url())
        .passes();
}

#[test]
fn timeout_comes_from_configuration() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);
    let mut server = StatusServer::new();
    let endpoint = server.job("ENDED", "OK").expect_at_least(5).create();

    // poller.timeout = 500ms, interval = 50ms
    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB, "--absent", "--config", "sechub.toml"])
        .with_server(&server.url())
        .fails()
        .stderr_has("still found after waiting");

    endpoint.assert();
}

#[test]
fn server_error_aborts_immediately() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let endpoint = server.respond(503, "{}").expect(1).create();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB])
        .with_server(&server.url())
        .fails()
        .stderr_has("status source failed");

    endpoint.assert();
}

#[test]
fn wrong_credentials_never_reach_the_status_endpoint() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let endpoint = server.job("ENDED", "OK").expect(0).create();

    temp.sechub()
        .args(&["job", "await", "--project", "p1", JOB])
        .with_server(&server.url())
        .env("SECHUB_APITOKEN", "wrong")
        .fails()
        .stderr_has("status source failed");

    endpoint.assert();
}
