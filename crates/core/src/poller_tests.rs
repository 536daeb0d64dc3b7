// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

const JOB: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

fn job() -> JobUuid {
    JOB.parse().unwrap()
}

fn doc(uuid: &str, state: &str, result: &str) -> Option<String> {
    Some(format!(
        r#"{{"jobUUID":"{uuid}","projectId":"p1","executionState":"{state}","executionResult":"{result}","created":"2024-05-01T12:00:00Z"}}"#
    ))
}

/// Replays scripted documents; the last one repeats forever
struct ScriptedSource {
    responses: Mutex<VecDeque<Result<Option<String>, String>>>,
    last: Mutex<Option<String>>,
    fetches: AtomicUsize,
}

impl ScriptedSource {
    fn new(responses: Vec<Option<String>>) -> Self {
        Self {
            responses: Mutex::new(responses.into_iter().map(Ok).collect()),
            last: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from([Err(message.to_string())])),
            last: Mutex::new(None),
            fetches: AtomicUsize::new(0),
        }
    }

    fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StatusSource for ScriptedSource {
    async fn fetch(
        &self,
        project_id: &str,
        _job_uuid: &JobUuid,
    ) -> Result<Option<String>, SourceError> {
        assert_eq!(project_id, "p1");
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.responses.lock().unwrap().pop_front();
        match next {
            Some(Ok(json)) => {
                *self.last.lock().unwrap() = json.clone();
                Ok(json)
            }
            Some(Err(message)) => Err(SourceError(message)),
            None => Ok(self.last.lock().unwrap().clone()),
        }
    }
}

fn poller(source: ScriptedSource) -> JobStatusPoller<std::sync::Arc<ScriptedSource>> {
    JobStatusPoller::new(std::sync::Arc::new(source), "p1")
}

#[tokio::test(start_paused = true)]
async fn finds_existing_job_on_first_fetch() {
    let source = std::sync::Arc::new(ScriptedSource::new(vec![doc(JOB, "STARTED", "NONE")]));
    let poller = JobStatusPoller::new(source.clone(), "p1");

    let observation = poller.can_find_job(&job()).await.unwrap();

    assert_eq!(source.fetches(), 1);
    assert_eq!(observation.job_uuid(), &job());
    observation.has_state(ExecutionState::Started).unwrap();
}

#[tokio::test(start_paused = true)]
async fn waits_one_interval_per_miss() {
    let source = std::sync::Arc::new(ScriptedSource::new(vec![
        None,
        None,
        doc(JOB, "INITIALIZING", "NONE"),
    ]));
    let poller = JobStatusPoller::new(source.clone(), "p1");
    let start = Instant::now();

    poller.can_find_job(&job()).await.unwrap();

    assert_eq!(source.fetches(), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= DEFAULT_INTERVAL * 2 && elapsed < DEFAULT_INTERVAL * 3);
}

#[tokio::test(start_paused = true)]
async fn missing_job_times_out_with_last_document() {
    let poller = poller(ScriptedSource::new(vec![None]));

    let err = poller
        .await_state(&job(), true, Duration::from_millis(2000))
        .await
        .unwrap_err();

    match err {
        PollError::Timeout {
            want_present,
            waited,
            last_seen,
            ..
        } => {
            assert!(want_present);
            assert!(waited > Duration::from_millis(2000));
            assert_eq!(last_seen, None);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn job_that_never_disappears_times_out_with_its_json() {
    let json = doc(JOB, "ENDED", "OK");
    let poller = poller(ScriptedSource::new(vec![json.clone()]));

    let err = poller.can_not_find_job(&job()).await.unwrap_err();

    let message = err.to_string();
    assert!(message.contains("still found"), "{message}");
    match err {
        PollError::Timeout {
            waited, last_seen, ..
        } => {
            assert!(waited > DEFAULT_TIMEOUT);
            assert_eq!(last_seen, json);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test(start_paused = true)]
async fn absent_job_satisfies_can_not_find() {
    let poller = poller(ScriptedSource::new(vec![None]));

    let observation = poller.can_not_find_job(&job()).await.unwrap();

    assert!(observation.json().is_none());
}

#[tokio::test(start_paused = true)]
async fn uuid_prefix_of_another_job_is_not_a_match() {
    // Same leading characters, different job
    let other = "3fa85f64-5717-4562-b3fc-2c963f66afa7";
    let poller = poller(ScriptedSource::new(vec![doc(other, "STARTED", "NONE")]));

    let result = poller
        .await_state(&job(), true, Duration::from_millis(1000))
        .await;

    assert!(matches!(result, Err(PollError::Timeout { .. })));
}

#[tokio::test(start_paused = true)]
async fn non_json_body_counts_as_absent() {
    let poller = poller(ScriptedSource::new(vec![Some(format!("<html>{JOB}</html>"))]));

    let observation = poller.can_not_find_job(&job()).await.unwrap();

    assert!(observation.has_state(ExecutionState::Started).is_err());
}

#[tokio::test(start_paused = true)]
async fn source_failure_aborts_wait() {
    let poller = poller(ScriptedSource::failing("connection refused"));

    let err = poller.can_find_job(&job()).await.unwrap_err();

    assert!(matches!(err, PollError::Source(_)));
    assert!(err.to_string().contains("connection refused"));
}

#[tokio::test(start_paused = true)]
async fn point_in_time_checks_are_repeatable() {
    let poller = poller(ScriptedSource::new(vec![doc(JOB, "ENDED", "OK")]));
    let observation = poller.can_find_job(&job()).await.unwrap();

    let first = observation.has_state(ExecutionState::Ended).is_ok();
    let second = observation.has_state(ExecutionState::Ended).is_ok();

    assert!(first);
    assert_eq!(first, second);
    observation
        .has_result(ExecutionResult::Ok)
        .and_then(|o| o.has_one_of_states(&[ExecutionState::Started, ExecutionState::Ended]))
        .unwrap();
    assert_eq!(
        observation.status().map(|s| s.execution_result),
        Some(ExecutionResult::Ok)
    );
}

#[tokio::test(start_paused = true)]
async fn mismatching_state_reports_expected_names() {
    let poller = poller(ScriptedSource::new(vec![doc(JOB, "STARTED", "NONE")]));
    let observation = poller.can_find_job(&job()).await.unwrap();

    let err = observation
        .has_one_of_states(&[ExecutionState::Ended, ExecutionState::CancelRequested])
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("[ENDED, CANCEL_REQUESTED]"), "{message}");
    assert!(message.contains(JOB), "{message}");
    assert!(observation.has_result(ExecutionResult::Failed).is_err());
}

#[tokio::test(start_paused = true)]
async fn missing_field_fails_immediately() {
    let json = Some(format!(r#"{{"jobUUID":"{JOB}"}}"#));
    let source = std::sync::Arc::new(ScriptedSource::new(vec![json]));
    let poller = JobStatusPoller::new(source.clone(), "p1");
    let observation = poller.can_find_job(&job()).await.unwrap();

    let err = observation.has_result(ExecutionResult::Ok).unwrap_err();

    assert!(matches!(
        err,
        AssertionError::MissingField {
            field: "executionResult",
            ..
        }
    ));
    assert_eq!(source.fetches(), 1);
}
