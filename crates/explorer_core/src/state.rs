use std::collections::HashSet;

use crate::view_model::{
    AppViewModel, ConfigView, ExplorerView, ManifestCardView, PanelView, TabView,
};
use crate::{Manifest, ManifestId, ManifestQuery, TagSet, DEFAULT_QUERY_LIMIT};

/// Identifies one explorer mount (or refresh). Completions carrying an older
/// generation are dropped.
pub type Generation = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Explorer,
    Config,
}

impl Tab {
    pub const ALL: [Tab; 2] = [Tab::Explorer, Tab::Config];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Explorer => "Explorer",
            Tab::Config => "Config",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ListStatus {
    #[default]
    Idle,
    Loading,
    Loaded,
    Failed(String),
}

/// Read-only settings shown on the Config tab and used to build queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplaySettings {
    pub base_url: String,
    pub default_limit: u32,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            default_limit: DEFAULT_QUERY_LIMIT,
        }
    }
}

/// Explorer panel state; exists only while the Explorer tab is mounted.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
struct ExplorerState {
    generation: Generation,
    manifests: Vec<Manifest>,
    search: String,
    status: ListStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    tab: Tab,
    started: bool,
    explorer: Option<ExplorerState>,
    last_generation: Generation,
    settings: DisplaySettings,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: DisplaySettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn tab(&self) -> Tab {
        self.tab
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Generation of the mounted explorer, if any.
    pub fn generation(&self) -> Option<Generation> {
        self.explorer.as_ref().map(|explorer| explorer.generation)
    }

    pub fn manifests(&self) -> &[Manifest] {
        self.explorer
            .as_ref()
            .map(|explorer| explorer.manifests.as_slice())
            .unwrap_or(&[])
    }

    pub fn manifest(&self, id: ManifestId) -> Option<&Manifest> {
        self.manifests().iter().find(|manifest| manifest.id == id)
    }

    pub fn status(&self) -> ListStatus {
        self.explorer
            .as_ref()
            .map(|explorer| explorer.status.clone())
            .unwrap_or_default()
    }

    pub fn search(&self) -> &str {
        self.explorer
            .as_ref()
            .map(|explorer| explorer.search.as_str())
            .unwrap_or("")
    }

    pub fn settings(&self) -> &DisplaySettings {
        &self.settings
    }

    /// Returns and clears the dirty flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn view(&self) -> AppViewModel {
        let tabs = Tab::ALL
            .iter()
            .map(|&tab| TabView {
                tab,
                label: tab.label(),
                selected: tab == self.tab,
            })
            .collect();

        let panel = match self.tab {
            Tab::Explorer => {
                let explorer = self.explorer.as_ref();
                PanelView::Explorer(ExplorerView {
                    search: self.search().to_string(),
                    status: self.status(),
                    cards: explorer
                        .map(|explorer| {
                            explorer
                                .manifests
                                .iter()
                                .map(ManifestCardView::from_manifest)
                                .collect()
                        })
                        .unwrap_or_default(),
                })
            }
            Tab::Config => PanelView::Config(ConfigView {
                base_url: self.settings.base_url.clone(),
                default_limit: self.settings.default_limit,
            }),
        };

        AppViewModel {
            tab: self.tab,
            tabs,
            panel,
            dirty: self.dirty,
        }
    }

    pub(crate) fn mark_started(&mut self) -> bool {
        !std::mem::replace(&mut self.started, true)
    }

    pub(crate) fn select_tab(&mut self, tab: Tab) {
        self.tab = tab;
        self.dirty = true;
    }

    pub(crate) fn default_query(&self) -> ManifestQuery {
        ManifestQuery::with_limit(self.settings.default_limit)
    }

    /// Mounts a fresh explorer with an empty list and a new generation.
    pub(crate) fn mount_explorer(&mut self) -> Generation {
        let generation = self.next_generation();
        self.explorer = Some(ExplorerState {
            generation,
            status: ListStatus::Loading,
            ..ExplorerState::default()
        });
        self.dirty = true;
        generation
    }

    /// Discards the explorer list; late completions no longer match.
    pub(crate) fn unmount_explorer(&mut self) {
        if self.explorer.take().is_some() {
            self.dirty = true;
        }
    }

    /// Starts a new generation on the mounted explorer, keeping the list
    /// until the next query result replaces it.
    pub(crate) fn begin_refresh(&mut self) -> Option<Generation> {
        self.explorer.as_ref()?;
        let generation = self.next_generation();
        let explorer = self.explorer.as_mut()?;
        explorer.generation = generation;
        explorer.status = ListStatus::Loading;
        self.dirty = true;
        Some(generation)
    }

    pub(crate) fn set_search(&mut self, text: String) {
        if let Some(explorer) = self.explorer.as_mut() {
            if explorer.search != text {
                explorer.search = text;
                self.dirty = true;
            }
        }
    }

    /// Replaces the list wholesale. Duplicate ids keep their first occurrence.
    /// Returns the ids now in the list, in order.
    pub(crate) fn replace_manifests(
        &mut self,
        generation: Generation,
        manifests: Vec<Manifest>,
    ) -> Option<Vec<ManifestId>> {
        let explorer = self.current_explorer_mut(generation)?;
        let mut seen = HashSet::with_capacity(manifests.len());
        explorer.manifests = manifests
            .into_iter()
            .filter(|manifest| seen.insert(manifest.id))
            .collect();
        explorer.status = ListStatus::Loaded;
        let ids = explorer.manifests.iter().map(|manifest| manifest.id).collect();
        self.dirty = true;
        Some(ids)
    }

    /// Records a failed query. The list on display is left as it was.
    pub(crate) fn fail_query(&mut self, generation: Generation, message: String) -> bool {
        let Some(explorer) = self.current_explorer_mut(generation) else {
            return false;
        };
        explorer.status = ListStatus::Failed(message);
        self.dirty = true;
        true
    }

    /// Sets `suggested_tags` on the record currently holding `id`.
    pub(crate) fn apply_suggestion(
        &mut self,
        generation: Generation,
        id: ManifestId,
        tags: TagSet,
    ) -> bool {
        let Some(manifest) = self.current_manifest_mut(generation, id) else {
            return false;
        };
        manifest.suggested_tags = Some(tags);
        self.dirty = true;
        true
    }

    /// Refreshes the authoritative tags of a listed manifest. Suggestions
    /// already applied survive unless the backend sent its own.
    pub(crate) fn apply_manifest(&mut self, generation: Generation, fetched: Manifest) -> bool {
        let Some(manifest) = self.current_manifest_mut(generation, fetched.id) else {
            return false;
        };
        manifest.tags = fetched.tags;
        if fetched.suggested_tags.is_some() {
            manifest.suggested_tags = fetched.suggested_tags;
        }
        self.dirty = true;
        true
    }

    fn next_generation(&mut self) -> Generation {
        self.last_generation += 1;
        self.last_generation
    }

    fn current_explorer_mut(&mut self, generation: Generation) -> Option<&mut ExplorerState> {
        self.explorer
            .as_mut()
            .filter(|explorer| explorer.generation == generation)
    }

    fn current_manifest_mut(
        &mut self,
        generation: Generation,
        id: ManifestId,
    ) -> Option<&mut Manifest> {
        self.current_explorer_mut(generation)?
            .manifests
            .iter_mut()
            .find(|manifest| manifest.id == id)
    }
}
