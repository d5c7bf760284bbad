use explorer_client::{ClientEvent, ClientSettings, EngineError, EngineHandle};
use explorer_core::{Effect, Msg};
use explorer_logging::{explorer_debug, explorer_info, explorer_trace, explorer_warn};

pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::QueryManifests { generation, query } => {
                    explorer_info!(
                        "QueryManifests generation={} limit={} filters={}",
                        generation,
                        query.limit,
                        query.query.len()
                    );
                    self.engine.query(generation, query);
                }
                Effect::SuggestTags { generation, id } => {
                    explorer_trace!("SuggestTags generation={} id={}", generation, id);
                    self.engine.suggest(generation, id);
                }
                Effect::FetchManifest { generation, id } => {
                    explorer_debug!("FetchManifest generation={} id={}", generation, id);
                    self.engine.fetch_manifest(generation, id);
                }
                Effect::CancelPending => self.engine.cancel_pending(),
            }
        }
    }

    /// Collects finished requests as messages for the update loop.
    pub fn drain_events(&self) -> Vec<Msg> {
        let mut inbox = Vec::new();
        while let Some(event) = self.engine.try_recv() {
            log_event(&event);
            inbox.push(event.into_msg());
        }
        inbox
    }
}

// Query failures are reported; suggestion failures stay quiet.
fn log_event(event: &ClientEvent) {
    match event {
        ClientEvent::QueryCompleted {
            generation,
            result: Err(err),
        } => {
            explorer_warn!("Query generation={} failed: {}", generation, err);
            if let Some(body) = &err.body {
                explorer_warn!("Query response body: {}", body);
            }
        }
        ClientEvent::QueryCompleted {
            generation,
            result: Ok(response),
        } => {
            explorer_info!(
                "Query generation={} returned {} manifests",
                generation,
                response.manifests.len()
            );
        }
        ClientEvent::SuggestionCompleted {
            id,
            result: Err(err),
            ..
        } => {
            explorer_trace!("Suggestion for {} failed: {}", id, err);
        }
        ClientEvent::ManifestFetched {
            id,
            result: Err(err),
            ..
        } => {
            explorer_warn!("Fetching manifest {} failed: {}", id, err);
        }
        _ => {}
    }
}
