//! Config check specs
//!
//! Verify executor configuration is validated against the environment.

use crate::prelude::*;

#[test]
fn valid_configuration_lists_executors() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);

    temp.sechub()
        .args(&["config", "check", "sechub.toml"])
        .with_pds_credentials()
        .passes()
        .stdout_eq(
            "EXECUTOR             PRODUCT            PRIORITY ENABLED\n\
             pds-license          PDS_LICENSESCAN           1 yes\n\
             pds-secrets          PDS_SECRETSCAN            2 yes\n",
        );
}

#[test]
fn missing_environment_variable_fails() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);

    temp.sechub()
        .args(&["config", "check", "sechub.toml"])
        .env("PDS_USER", "scanner")
        .fails()
        .stderr_has("executor pds-license: environment variable PDS_TOKEN is not set")
        .stderr_has("executor pds-secrets: environment variable PDS_TOKEN is not set")
        .stderr_has("2 invalid executor configuration(s)");
}

#[test]
fn secret_values_are_never_printed() {
    let temp = Project::empty();
    temp.file("sechub.toml", SCAN_CONFIG);

    temp.sechub()
        .args(&["config", "check", "sechub.toml"])
        .with_pds_credentials()
        .passes()
        .stdout_lacks("s3cret");
}

#[test]
fn unknown_product_is_a_parse_error() {
    let temp = Project::empty();
    temp.file(
        "sechub.toml",
        r#"
[[executors]]
id = "nessus"
product = "NESSUS"
setup = { base_url = "https://nessus.example.org", user = "u", password = "p" }
"#,
    );

    temp.sechub()
        .args(&["config", "check", "sechub.toml"])
        .fails()
        .stderr_has("TOML parse error");
}

#[test]
fn missing_file_is_reported() {
    let temp = Project::empty();

    temp.sechub()
        .args(&["config", "check", "absent.toml"])
        .fails()
        .stderr_has("cannot read absent.toml");
}

#[test]
fn empty_configuration_is_valid() {
    let temp = Project::empty();
    temp.file("sechub.toml", "");

    temp.sechub()
        .args(&["config", "check", "sechub.toml"])
        .passes()
        .stdout_eq("No executors configured\n");
}
