//! CLI help specs
//!
//! Verify the command tree is discoverable from --help.

use crate::prelude::*;

#[test]
fn top_level_help_lists_commands() {
    let temp = Project::empty();

    temp.sechub()
        .args(&["--help"])
        .passes()
        .stdout_has("job")
        .stdout_has("config")
        .stdout_has("run");
}

#[test]
fn job_help_lists_status_and_await() {
    let temp = Project::empty();

    temp.sechub()
        .args(&["job", "--help"])
        .passes()
        .stdout_has("status")
        .stdout_has("await");
}

#[test]
fn await_help_documents_environment_fallbacks() {
    let temp = Project::empty();

    temp.sechub()
        .args(&["job", "await", "--help"])
        .passes()
        .stdout_has("--absent")
        .stdout_has("SECHUB_SERVER")
        .stdout_has("SECHUB_TIMEOUT_MS");
}
