//! Job status specs
//!
//! Verify status display from the server and from a local job log.

use crate::prelude::*;

#[test]
fn status_from_server_as_text() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let endpoint = server.job("ENDED", "OK").expect(1).create();

    temp.sechub()
        .args(&["job", "status", "--project", "p1", JOB])
        .with_server(&server.url())
        .passes()
        .stdout_eq(&format!(
            "Job: {JOB}\n\
             Project: p1\n\
             State: ENDED\n\
             Result: OK\n\
             Created: 2024-05-01T12:00:00+00:00\n\
             Product results: 0\n"
        ));

    endpoint.assert();
}

#[test]
fn status_from_server_as_json() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let _endpoint = server.job("STARTED", "NONE").create();

    let run = temp
        .sechub()
        .args(&["job", "status", "--project", "p1", JOB, "--output", "json"])
        .with_server(&server.url())
        .passes();

    let doc: serde_json::Value = serde_json::from_str(&run.stdout()).unwrap();
    assert_eq!(doc["jobUUID"], JOB);
    assert_eq!(doc["executionState"], "STARTED");
}

#[test]
fn unknown_job_is_reported() {
    let temp = Project::empty();
    let mut server = StatusServer::new();
    let _endpoint = server.not_found().create();

    temp.sechub()
        .args(&["job", "status", "--project", "p1", JOB])
        .with_server(&server.url())
        .passes()
        .stdout_eq(&format!("Job not found: {JOB}\n"));
}

#[test]
fn missing_job_log_is_an_error() {
    let temp = Project::empty();

    temp.sechub()
        .args(&["job", "status", "--project", "p1", JOB, "--store", "jobs.wal"])
        .fails()
        .stderr_has("no job log at jobs.wal");

    assert!(!temp.path().join("jobs.wal").exists());
}
