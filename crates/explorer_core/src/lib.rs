//! Explorer core: pure state machine, domain types and view-model helpers.
mod effect;
mod msg;
mod state;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use state::{AppState, DisplaySettings, Generation, ListStatus, Tab};
pub use types::{
    make_data_url, Manifest, ManifestId, ManifestQuery, QueryResponse, TagSet,
    DEFAULT_QUERY_LIMIT,
};
pub use update::update;
pub use view_model::{
    AppViewModel, ConfigView, ExplorerView, ManifestCardView, PanelView, TabView, TagChip,
};
