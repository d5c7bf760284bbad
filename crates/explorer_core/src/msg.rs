use crate::{Generation, Manifest, ManifestId, Tab, TagSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Application finished starting; mounts the initial tab.
    Started,
    /// User picked a tab in the tab shell.
    TabSelected(Tab),
    /// User edited the search box. Stored only; not wired to the query.
    SearchChanged(String),
    /// User asked to re-run the manifest query.
    RefreshClicked,
    /// User asked to reload a single manifest card.
    OpenManifest(ManifestId),
    /// Query for the explorer list finished.
    QueryCompleted {
        generation: Generation,
        result: Result<Vec<Manifest>, String>,
    },
    /// Suggestion request for one manifest finished.
    SuggestionCompleted {
        generation: Generation,
        id: ManifestId,
        result: Result<TagSet, String>,
    },
    /// Single-manifest reload finished.
    ManifestFetched {
        generation: Generation,
        result: Result<Manifest, String>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
