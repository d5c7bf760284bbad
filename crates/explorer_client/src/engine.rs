use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use explorer_core::{Generation, ManifestId, ManifestQuery};
use explorer_logging::{explorer_debug, explorer_trace};
use tokio_util::sync::CancellationToken;

use crate::api::{ApiClient, ClientSettings, ManifestApi};
use crate::{ClientEvent, EngineError};

enum EngineCommand {
    Query {
        generation: Generation,
        query: ManifestQuery,
    },
    Suggest {
        generation: Generation,
        id: ManifestId,
    },
    FetchManifest {
        generation: Generation,
        id: ManifestId,
    },
    CancelPending,
}

/// Runs API requests on a background tokio runtime.
///
/// Every command becomes its own task, so requests are concurrent and
/// unbounded. Results come back as [`ClientEvent`]s in completion order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<ClientEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, EngineError> {
        let api = ApiClient::new(settings)?;
        Self::with_api(Arc::new(api))
    }

    pub fn with_api(api: Arc<dyn ManifestApi>) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Runtime::new().map_err(EngineError::Runtime)?;

        thread::spawn(move || {
            let mut cancel = CancellationToken::new();
            while let Ok(command) = cmd_rx.recv() {
                if let EngineCommand::CancelPending = command {
                    explorer_debug!("Cancelling pending requests");
                    cancel.cancel();
                    cancel = CancellationToken::new();
                    continue;
                }
                let api = api.clone();
                let event_tx = event_tx.clone();
                let token = cancel.clone();
                runtime.spawn(async move {
                    tokio::select! {
                        _ = token.cancelled() => {
                            explorer_trace!("Dropped cancelled request");
                        }
                        event = handle_command(api.as_ref(), command) => {
                            if let Some(event) = event {
                                let _ = event_tx.send(event);
                            }
                        }
                    }
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn query(&self, generation: Generation, query: ManifestQuery) {
        let _ = self.cmd_tx.send(EngineCommand::Query { generation, query });
    }

    pub fn suggest(&self, generation: Generation, id: ManifestId) {
        let _ = self.cmd_tx.send(EngineCommand::Suggest { generation, id });
    }

    pub fn fetch_manifest(&self, generation: Generation, id: ManifestId) {
        let _ = self
            .cmd_tx
            .send(EngineCommand::FetchManifest { generation, id });
    }

    /// Requests still in flight finish silently without producing events.
    pub fn cancel_pending(&self) {
        let _ = self.cmd_tx.send(EngineCommand::CancelPending);
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<ClientEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }
}

async fn handle_command(api: &dyn ManifestApi, command: EngineCommand) -> Option<ClientEvent> {
    match command {
        EngineCommand::Query { generation, query } => {
            let result = api.query_manifests(Some(query)).await;
            Some(ClientEvent::QueryCompleted { generation, result })
        }
        EngineCommand::Suggest { generation, id } => {
            let result = api.suggest_tags(id).await;
            Some(ClientEvent::SuggestionCompleted {
                generation,
                id,
                result,
            })
        }
        EngineCommand::FetchManifest { generation, id } => {
            let result = api.get_manifest(id).await;
            Some(ClientEvent::ManifestFetched {
                generation,
                id,
                result,
            })
        }
        EngineCommand::CancelPending => None,
    }
}
