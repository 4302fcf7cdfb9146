use async_trait::async_trait;
use serde_json::{Map, Value, json};
use std::sync::{Arc, Mutex};
use strato::build_registry;
use strato_engine::{
    Engine, MemoryBackend, MemorySink, MemoryTelemetry, ServiceClient, ServiceError,
    SettingsStore, StaticPrompt,
};
use strato_types::Error;

/// Scripted service client: responds by URL substring, records every
/// call in order.
#[derive(Default)]
struct MockClient {
    calls: Mutex<Vec<String>>,
    routes: Mutex<Vec<(String, Result<Value, Value>)>>,
}

impl MockClient {
    fn respond(&self, needle: &str, body: Value) {
        self.routes
            .lock()
            .unwrap()
            .push((needle.to_string(), Ok(body)));
    }

    fn fail(&self, needle: &str, error_body: Value) {
        self.routes
            .lock()
            .unwrap()
            .push((needle.to_string(), Err(error_body)));
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn handle(&self, method: &str, url: &str) -> Result<Value, ServiceError> {
        self.calls.lock().unwrap().push(format!("{} {}", method, url));
        for (needle, result) in self.routes.lock().unwrap().iter() {
            if url.contains(needle.as_str()) {
                return match result {
                    Ok(body) => Ok(body.clone()),
                    Err(body) => Err(ServiceError {
                        status: Some(400),
                        body: body.clone(),
                    }),
                };
            }
        }
        Ok(Value::Null)
    }
}

#[async_trait]
impl ServiceClient for MockClient {
    async fn get(&self, url: &str) -> Result<Value, ServiceError> {
        self.handle("GET", url)
    }

    async fn post(&self, url: &str, _body: Option<Value>) -> Result<Value, ServiceError> {
        self.handle("POST", url)
    }

    async fn delete(&self, url: &str) -> Result<Value, ServiceError> {
        self.handle("DELETE", url)
    }
}

struct World {
    engine: Engine,
    client: Arc<MockClient>,
    telemetry: Arc<MemoryTelemetry>,
}

fn world(prompt_answer: bool) -> World {
    let client = Arc::new(MockClient::default());
    let telemetry = Arc::new(MemoryTelemetry::new());
    let engine = Engine::new(
        build_registry().unwrap(),
        SettingsStore::open(Box::new(MemoryBackend::new())).unwrap(),
        Box::new(telemetry.clone()),
        Box::new(StaticPrompt {
            answer: prompt_answer,
        }),
        Box::new(client.clone()),
    );
    World {
        engine,
        client,
        telemetry,
    }
}

fn options(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => unreachable!("test options must be an object"),
    }
}

#[tokio::test]
async fn plan_remove_by_title_resolves_and_deletes_exactly_once() {
    let w = world(false);
    w.client.respond(
        "/v1/plans?title=My%20Planner%20Plan",
        json!({ "value": [{ "id": "P1", "title": "My Planner Plan" }] }),
    );
    let sink = MemorySink::new();

    w.engine
        .invoke(
            "plan remove",
            options(json!({ "title": "My Planner Plan", "confirm": true })),
            &sink,
        )
        .await
        .unwrap();

    let calls = w.client.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls[0].starts_with("GET "), "first call resolves the title");
    assert_eq!(calls[1], "DELETE https://api.strato.cloud/v1/plans/P1");

    let records = w.telemetry.records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].command_name, "plan remove");
    assert_eq!(records[0].properties["title"], json!(true));
    assert_eq!(records[0].properties["id"], json!(false));
}

#[tokio::test]
async fn plan_remove_fails_for_an_unknown_title() {
    let w = world(true);
    w.client.respond("/v1/plans?title=", json!({ "value": [] }));
    let sink = MemorySink::new();

    let err = w
        .engine
        .invoke("plan remove", options(json!({ "title": "Ghost" })), &sink)
        .await
        .unwrap_err();

    match err {
        Error::Command(message) => {
            assert_eq!(message, "The specified plan 'Ghost' does not exist.");
        }
        other => panic!("expected a command error, got {:?}", other),
    }
    assert!(
        !w.client.calls().iter().any(|call| call.starts_with("DELETE")),
        "nothing may be deleted on a failed lookup"
    );
}

#[tokio::test]
async fn plan_remove_fails_for_an_ambiguous_title() {
    let w = world(true);
    w.client.respond(
        "/v1/plans?title=",
        json!({ "value": [
            { "id": "P1", "title": "Roadmap" },
            { "id": "P2", "title": "roadmap" }
        ] }),
    );
    let sink = MemorySink::new();

    let err = w
        .engine
        .invoke("plan remove", options(json!({ "title": "Roadmap" })), &sink)
        .await
        .unwrap_err();

    match err {
        Error::Command(message) => {
            assert_eq!(message, "Multiple plans with title 'Roadmap' found: P1, P2.");
        }
        other => panic!("expected a command error, got {:?}", other),
    }
}

#[tokio::test]
async fn plan_remove_without_confirmation_is_gated_by_the_prompt() {
    let w = world(false);
    let sink = MemorySink::new();

    w.engine
        .invoke("plan remove", options(json!({ "id": "P1" })), &sink)
        .await
        .unwrap();

    assert!(w.client.calls().is_empty(), "abort must precede any call");
}

#[tokio::test]
async fn plan_list_resolves_the_owner_group_by_name() {
    let w = world(false);
    w.client.respond(
        "/v1/groups?displayName=Design",
        json!({ "value": [{ "id": "a993e045-27e7-4d5c-b087-b6bf80fa1a7b", "displayName": "Design" }] }),
    );
    w.client.respond(
        "/plans",
        json!({ "value": [
            { "id": "P1", "title": "Roadmap", "createdDateTime": "2026-01-12T09:30:00Z", "owner": "g1", "internal": "x" }
        ] }),
    );
    let sink = MemorySink::new();

    w.engine
        .invoke(
            "plan list",
            options(json!({ "ownerGroupName": "Design", "output": "json" })),
            &sink,
        )
        .await
        .unwrap();

    let stdout = sink.stdout_lines().join("\n");
    assert!(stdout.contains("Roadmap"));
    assert!(
        stdout.contains("internal"),
        "json mode must not project: {}",
        stdout
    );
}

#[tokio::test]
async fn plan_list_projects_default_properties_in_text_mode() {
    let w = world(false);
    w.client.respond(
        "/plans",
        json!({ "value": [
            { "id": "P1", "title": "Roadmap", "createdDateTime": "2026-01-12T09:30:00Z", "owner": "g1", "internal": "x" }
        ] }),
    );
    let sink = MemorySink::new();

    w.engine
        .invoke(
            "plan list",
            options(json!({
                "ownerGroupId": "a993e045-27e7-4d5c-b087-b6bf80fa1a7b",
                "output": "text"
            })),
            &sink,
        )
        .await
        .unwrap();

    let stdout = sink.stdout_lines().join("\n");
    assert!(stdout.contains("TITLE"));
    assert!(stdout.contains("Roadmap"));
    assert!(!stdout.contains("internal"), "text mode must project");
}

#[tokio::test]
async fn file_rename_with_force_continues_when_the_target_is_missing() {
    let w = world(false);
    w.client.fail(
        "/recycle",
        json!({ "error": { "message": "File does not exist" } }),
    );
    w.client.respond("/rename", json!({ "name": "def.pdf" }));
    let sink = MemorySink::new();

    w.engine
        .invoke(
            "file rename",
            options(json!({
                "webUrl": "https://acme.stratohq.io",
                "sourceUrl": "/Shared Documents/abc.pdf",
                "targetFileName": "def.pdf",
                "force": true,
                "output": "json"
            })),
            &sink,
        )
        .await
        .unwrap();

    let calls = w.client.calls();
    assert!(calls.iter().any(|call| call.contains("/recycle")));
    assert!(calls.iter().any(|call| call.contains("/rename")));
    assert!(sink.stdout_lines().join("\n").contains("def.pdf"));
}

#[tokio::test]
async fn file_rename_with_force_propagates_other_nested_failures_verbatim() {
    let w = world(false);
    w.client
        .fail("/recycle", json!({ "error": { "message": "Locked for use" } }));
    let sink = MemorySink::new();

    let err = w
        .engine
        .invoke(
            "file rename",
            options(json!({
                "webUrl": "https://acme.stratohq.io",
                "sourceUrl": "/Shared Documents/abc.pdf",
                "targetFileName": "def.pdf",
                "force": true
            })),
            &sink,
        )
        .await
        .unwrap_err();

    match err {
        Error::Command(message) => assert_eq!(message, "Locked for use"),
        other => panic!("expected the nested message verbatim, got {:?}", other),
    }
    assert!(
        !w.client.calls().iter().any(|call| call.contains("/rename")),
        "rename must not run after a real nested failure"
    );
}

#[tokio::test]
async fn file_remove_recycle_posts_to_the_recycle_endpoint() {
    let w = world(true);
    let sink = MemorySink::new();

    w.engine
        .invoke(
            "file remove",
            options(json!({
                "webUrl": "https://acme.stratohq.io",
                "url": "/Shared Documents/report.pdf",
                "recycle": true
            })),
            &sink,
        )
        .await
        .unwrap();

    assert_eq!(
        w.client.calls(),
        vec![
            "POST https://acme.stratohq.io/v1/files/by-path/Shared Documents/report.pdf/recycle"
                .to_string()
        ]
    );
}

#[tokio::test]
async fn config_set_round_trips_through_the_settings_store() {
    let w = world(false);
    let sink = MemorySink::new();

    w.engine
        .invoke(
            "config set",
            options(json!({ "key": "output", "value": "md" })),
            &sink,
        )
        .await
        .unwrap();
    w.engine
        .invoke("config get", options(json!({ "key": "output" })), &sink)
        .await
        .unwrap();

    // The new output setting already applies to the get: md renders the
    // scalar bare.
    assert_eq!(sink.stdout_lines(), vec!["md".to_string()]);
}

#[tokio::test]
async fn config_set_coerces_boolean_settings() {
    let w = world(false);
    let sink = MemorySink::new();

    w.engine
        .invoke(
            "config set",
            options(json!({ "key": "autoConfirm", "value": "true" })),
            &sink,
        )
        .await
        .unwrap();

    assert_eq!(
        w.engine.settings().get(strato_types::SettingKey::AutoConfirm),
        Some(json!(true)),
        "the stored value must be boolean true, not the string"
    );
}

#[tokio::test]
async fn each_invocation_records_exactly_one_telemetry_entry() {
    let w = world(false);
    let sink = MemorySink::new();

    w.engine
        .invoke(
            "config set",
            options(json!({ "key": "output", "value": "json" })),
            &sink,
        )
        .await
        .unwrap();
    let _ = w
        .engine
        .invoke(
            "config set",
            options(json!({ "key": "bogus", "value": "x" })),
            &sink,
        )
        .await;

    let records = w.telemetry.records();
    assert_eq!(records.len(), 2, "one record per attempt, pass or fail");
}
