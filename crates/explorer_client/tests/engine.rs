use std::time::Duration;

use explorer_client::{ClientEvent, ClientSettings, EngineHandle, FailureKind};
use explorer_core::{update, AppState, Effect, ManifestId, Msg, TagSet};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const WAIT: Duration = Duration::from_secs(5);

fn tags(pairs: &[(&str, &str)]) -> TagSet {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn numbered(key: &str, id: u64) -> TagSet {
    TagSet::from([(key.to_string(), id.to_string())])
}

fn engine_for(server: &MockServer) -> EngineHandle {
    EngineHandle::new(ClientSettings {
        base_url: server.uri(),
        ..ClientSettings::default()
    })
    .expect("engine")
}

fn run_effects(engine: &EngineHandle, effects: Vec<Effect>) -> usize {
    let mut issued = 0;
    for effect in effects {
        match effect {
            Effect::QueryManifests { generation, query } => engine.query(generation, query),
            Effect::SuggestTags { generation, id } => engine.suggest(generation, id),
            Effect::FetchManifest { generation, id } => engine.fetch_manifest(generation, id),
            Effect::CancelPending => {
                engine.cancel_pending();
                continue;
            }
        }
        issued += 1;
    }
    issued
}

/// Pumps engine events through `update` until `expected` completions arrived.
fn settle(engine: &EngineHandle, mut state: AppState, mut expected: usize) -> AppState {
    while expected > 0 {
        let event = engine.recv_timeout(WAIT).expect("engine event");
        expected -= 1;
        let (next, effects) = update(state, event.into_msg());
        expected += run_effects(engine, effects);
        state = next;
    }
    state
}

fn mount_manifest_list(server: &MockServer, rt: &tokio::runtime::Runtime, ids: &[u64]) {
    let manifests: Vec<_> = ids
        .iter()
        .map(|id| json!({ "id": id, "tags": { "own": id.to_string() } }))
        .collect();
    rt.block_on(
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(json!({ "manifests": manifests })),
            )
            .mount(server),
    );
}

#[test]
fn suggestions_are_merged_by_id_regardless_of_arrival() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(method("POST"))
            .and(path("/query"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "manifests": [
                    { "id": 1, "tags": { "color": "red" } },
                    { "id": 2, "tags": { "color": "blue" } }
                ]
            })))
            .mount(&server)
            .await;
        // Id 1 answers last.
        Mock::given(method("GET"))
            .and(path("/suggest/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(150))
                    .set_body_json(json!({ "size": "small" })),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/suggest/2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "size": "large" })))
            .mount(&server)
            .await;
    });

    let engine = engine_for(&server);
    let (state, effects) = update(AppState::new(), Msg::Started);
    let issued = run_effects(&engine, effects);
    let state = settle(&engine, state, issued);

    let first = state.manifest(ManifestId(1)).unwrap();
    let second = state.manifest(ManifestId(2)).unwrap();
    assert_eq!(first.tags, tags(&[("color", "red")]));
    assert_eq!(first.suggested_tags, Some(tags(&[("size", "small")])));
    assert_eq!(second.tags, tags(&[("color", "blue")]));
    assert_eq!(second.suggested_tags, Some(tags(&[("size", "large")])));
}

#[test]
fn one_failing_suggestion_is_isolated() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    mount_manifest_list(&server, &rt, &[1, 2, 3, 4]);
    rt.block_on(async {
        Mock::given(method("GET"))
            .and(path("/suggest/3"))
            .respond_with(ResponseTemplate::new(500).set_body_string("error: tagger crashed"))
            .mount(&server)
            .await;
        for id in [1, 2, 4] {
            Mock::given(method("GET"))
                .and(path(format!("/suggest/{id}")))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(json!({ "suggested": id.to_string() })),
                )
                .mount(&server)
                .await;
        }
    });

    let engine = engine_for(&server);
    let (state, effects) = update(AppState::new(), Msg::Started);
    let issued = run_effects(&engine, effects);
    let state = settle(&engine, state, issued);

    for id in [1u64, 2, 4] {
        let manifest = state.manifest(ManifestId(id)).unwrap();
        assert_eq!(
            manifest.suggested_tags,
            Some(numbered("suggested", id))
        );
    }
    assert_eq!(state.manifest(ManifestId(3)).unwrap().suggested_tags, None);
    assert_eq!(state.manifests().len(), 4);
}

#[test]
fn failed_suggestion_event_carries_status() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/suggest/5"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server),
    );

    let engine = engine_for(&server);
    engine.suggest(4, ManifestId(5));

    match engine.recv_timeout(WAIT).expect("engine event") {
        ClientEvent::SuggestionCompleted {
            generation,
            id,
            result,
        } => {
            assert_eq!(generation, 4);
            assert_eq!(id, ManifestId(5));
            assert_eq!(result.unwrap_err().kind, FailureKind::HttpStatus(503));
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[test]
fn cancelled_requests_produce_no_events() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/suggest/1"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(Duration::from_millis(300))
                    .set_body_json(json!({ "size": "small" })),
            )
            .mount(&server),
    );

    let engine = engine_for(&server);
    engine.suggest(1, ManifestId(1));
    engine.cancel_pending();

    assert!(engine.recv_timeout(Duration::from_millis(800)).is_none());

    // Requests issued after the cancel still complete.
    engine.suggest(2, ManifestId(1));
    let event = engine.recv_timeout(WAIT).expect("engine event");
    assert!(matches!(
        event,
        ClientEvent::SuggestionCompleted { generation: 2, .. }
    ));
}

#[test]
fn unreachable_backend_fails_query_without_touching_list() {
    // Nothing listens on port 9 on test machines.
    let engine = EngineHandle::new(ClientSettings {
        base_url: "http://127.0.0.1:9/".to_string(),
        connect_timeout: Duration::from_millis(500),
        ..ClientSettings::default()
    })
    .expect("engine");

    let (state, effects) = update(AppState::new(), Msg::Started);
    let issued = run_effects(&engine, effects);
    let state = settle(&engine, state, issued);

    assert!(state.manifests().is_empty());
    assert!(matches!(
        state.status(),
        explorer_core::ListStatus::Failed(_)
    ));
}
