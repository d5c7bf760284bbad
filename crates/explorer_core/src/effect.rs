use crate::{Generation, ManifestId, ManifestQuery};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    QueryManifests {
        generation: Generation,
        query: ManifestQuery,
    },
    SuggestTags {
        generation: Generation,
        id: ManifestId,
    },
    FetchManifest {
        generation: Generation,
        id: ManifestId,
    },
    /// Drop every request issued for earlier generations.
    CancelPending,
}
