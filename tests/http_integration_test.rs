use bastion::{
    Bastion, BastionConfig, BastionFactory, CallOutcome, GeneralRequest, HttpMethod,
    JsonRequest, JsonResponseAssertions, OutcomeRecorder, StatusCodeAssertions,
    StringModelConverter,
};
use httpmock::prelude::*;
use serde::Deserialize;
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Deserialize)]
struct User {
    id: u64,
    name: String,
}

#[test]
fn test_end_to_end_json_call_passes() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET).path("/users/42").query_param("expand", "none");
        then.status(200)
            .header("Content-Type", "application/json")
            .json_body(serde_json::json!({"id": 42, "name": "sally"}));
    });

    let request = GeneralRequest::get(server.url("/users/{id}"))
        .with_name("Get user")
        .add_route_param("id", "42")
        .add_query_param("expand", "none");
    let recorder = Arc::new(OutcomeRecorder::new());

    let mut bastion = Bastion::api("existing user", &request)
        .bind::<User>()
        .with_default_converters()
        .with_assertions(
            JsonResponseAssertions::with_expected(serde_json::json!({"id": 42, "name": "sally"})),
        );
    bastion.register_listener(recorder.clone());
    bastion.call();

    api_mock.assert();
    assert_eq!(recorder.outcome(), Some(CallOutcome::Passed));
}

#[test]
fn test_end_to_end_status_mismatch_fails() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path("/users");
        then.status(409)
            .header("Content-Type", "application/json")
            .body(r#"{"error":"exists"}"#);
    });

    let request = JsonRequest::post_from_value(
        server.url("/users"),
        &serde_json::json!({"name": "sally"}),
    )
    .unwrap();
    let recorder = Arc::new(OutcomeRecorder::new());

    let mut bastion = Bastion::api("", &request)
        .bind::<serde_json::Value>()
        .with_default_converters()
        .with_assertions(StatusCodeAssertions::expecting([201]));
    bastion.register_listener(recorder.clone());
    bastion.call();

    match recorder.outcome() {
        Some(CallOutcome::Failed(reason)) => assert!(reason.contains("409")),
        other => panic!("expected a failure, got {:?}", other),
    }
}

#[test]
fn test_unreachable_server_is_an_error() {
    let request = GeneralRequest::new(HttpMethod::GET, "http://127.0.0.1:9/unreachable");
    let recorder = Arc::new(OutcomeRecorder::new());

    let mut bastion = Bastion::api("", &request).bind::<String>();
    bastion.register_model_converter(StringModelConverter);
    bastion.register_listener(recorder.clone());
    bastion.call();

    assert!(matches!(recorder.outcome(), Some(CallOutcome::Errored(_))));
}

#[test]
fn test_factory_from_config_file() {
    let server = MockServer::start();
    let api_mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/health")
            .header("x-api-key", "from-config");
        then.status(503).body("down for maintenance");
    });

    let mut config_file = NamedTempFile::new().unwrap();
    write!(
        config_file,
        r#"
[http]
base_url = "{}"
timeout_seconds = 5
default_headers = {{ "X-Api-Key" = "from-config" }}

[execution]
suppress_assertions = true
"#,
        server.url("/api/")
    )
    .unwrap();

    let config = BastionConfig::from_file(config_file.path()).unwrap();
    let recorder = Arc::new(OutcomeRecorder::new());
    let factory = BastionFactory::from_config(&config)
        .unwrap()
        .with_shared_listener(recorder.clone());
    assert_eq!(factory.listener_count(), 2);

    let request = GeneralRequest::get("health");
    let mut bastion = factory
        .api("suppressed", &request)
        .bind::<String>()
        .with_assertions(StatusCodeAssertions::expecting([200]));
    bastion.register_model_converter(StringModelConverter);
    assert!(bastion.suppress_assertions());
    bastion.call();

    api_mock.assert();
    assert_eq!(recorder.outcome(), Some(CallOutcome::Passed));
}
