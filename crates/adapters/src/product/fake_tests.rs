// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::content::ContentStream;
use sechub_core::{
    ExecutorSetup, IdGen, ProductExecutorConfig, SequentialIdGen, SystemEnvironment,
};

fn request(source_zip: Option<&'static [u8]>) -> AdapterRequest {
    let config = ProductExecutorConfig {
        id: "pds-license".to_string(),
        product: ProductIdentifier::PdsLicenseScan,
        priority: 0,
        enabled: true,
        setup: ExecutorSetup {
            base_url: "https://pds.example.org".to_string(),
            user: "admin".to_string(),
            password: "secret".to_string(),
        },
        parameters: [(
            sechub_core::config::PARAM_PRODUCT_IDENTIFIER.to_string(),
            "PDS_SCANCODE".to_string(),
        )]
        .into(),
    }
    .validate(&SystemEnvironment::default())
    .unwrap();

    AdapterRequest {
        trace_id: "sechub-test".to_string(),
        job_uuid: SequentialIdGen::new().next_job(),
        project_id: "p1".to_string(),
        product: ProductIdentifier::PdsLicenseScan,
        config,
        source_zip: source_zip.map(|bytes| ContentStream::new("sourcecode.zip", bytes)),
        binaries_tar: None,
    }
}

#[tokio::test]
async fn fake_adapter_records_calls_and_content() {
    let adapter = FakeProductAdapter::new().with_payload("report");
    let meta = AdapterMetaData::new();

    let payload = adapter.start(request(Some(b"zip")), &meta).await.unwrap();

    assert_eq!(payload, "report");
    let calls = adapter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].trace_id, "sechub-test");
    assert_eq!(calls[0].executor, "pds-license");
    assert_eq!(calls[0].source_zip.as_deref(), Some(&b"zip"[..]));
    assert_eq!(calls[0].binaries_tar, None);
}

#[tokio::test]
async fn fake_adapter_replays_failures_before_succeeding() {
    let adapter = FakeProductAdapter::new();
    adapter.fail_times(2, || AdapterError::Unreachable("connection refused".to_string()));
    let meta = AdapterMetaData::new();

    assert!(adapter.start(request(None), &meta).await.is_err());
    assert!(adapter.start(request(None), &meta).await.is_err());
    assert!(adapter.start(request(None), &meta).await.is_ok());
    assert_eq!(adapter.calls().len(), 3);
}

#[tokio::test]
async fn fake_adapter_writes_metadata() {
    let adapter = FakeProductAdapter::new().with_metadata("pds.job.uuid", "remote-1");
    let meta = AdapterMetaData::new();

    adapter.start(request(None), &meta).await.unwrap();

    assert_eq!(meta.get("pds.job.uuid").as_deref(), Some("remote-1"));
}

#[test]
fn http_status_is_exposed() {
    let err = AdapterError::Http {
        status: 503,
        message: "maintenance".to_string(),
    };
    assert_eq!(err.status(), Some(503));
    assert_eq!(AdapterError::Failed("x".to_string()).status(), None);
}
