use explorer_core::{Generation, Manifest, ManifestId, Msg, QueryResponse, TagSet};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    QueryCompleted {
        generation: Generation,
        result: Result<QueryResponse, RequestError>,
    },
    SuggestionCompleted {
        generation: Generation,
        id: ManifestId,
        result: Result<TagSet, RequestError>,
    },
    ManifestFetched {
        generation: Generation,
        id: ManifestId,
        result: Result<Manifest, RequestError>,
    },
}

impl ClientEvent {
    /// Converts a completion into the message the core state machine applies.
    pub fn into_msg(self) -> Msg {
        match self {
            ClientEvent::QueryCompleted { generation, result } => Msg::QueryCompleted {
                generation,
                result: result
                    .map(|response| response.manifests)
                    .map_err(|err| err.to_string()),
            },
            ClientEvent::SuggestionCompleted {
                generation,
                id,
                result,
            } => Msg::SuggestionCompleted {
                generation,
                id,
                result: result.map_err(|err| err.to_string()),
            },
            ClientEvent::ManifestFetched {
                generation, result, ..
            } => Msg::ManifestFetched {
                generation,
                result: result.map_err(|err| err.to_string()),
            },
        }
    }
}

/// A failed request. Status code and body are kept for diagnosis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct RequestError {
    pub kind: FailureKind,
    pub message: String,
    pub body: Option<String>,
}

impl RequestError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            body: None,
        }
    }

    pub(crate) fn with_body(mut self, body: String) -> Self {
        if !body.is_empty() {
            self.body = Some(body);
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureKind {
    #[error("invalid url")]
    InvalidUrl,
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("timeout")]
    Timeout,
    #[error("network error")]
    Network,
    #[error("invalid response body")]
    Decode,
    #[error("response too large (max {max_bytes})")]
    TooLarge { max_bytes: u64 },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("failed to start runtime: {0}")]
    Runtime(#[source] std::io::Error),
    #[error("failed to build client: {0}")]
    Client(#[from] RequestError),
}
