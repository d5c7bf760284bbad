use crate::{make_data_url, ListStatus, Manifest, ManifestId, Tab, TagSet};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppViewModel {
    pub tab: Tab,
    pub tabs: Vec<TabView>,
    pub panel: PanelView,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabView {
    pub tab: Tab,
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PanelView {
    Explorer(ExplorerView),
    Config(ConfigView),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ExplorerView {
    pub search: String,
    pub status: ListStatus,
    pub cards: Vec<ManifestCardView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigView {
    pub base_url: String,
    pub default_limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManifestCardView {
    pub id: ManifestId,
    /// `#` followed by the id padded to four digits.
    pub display_id: String,
    pub tags: Vec<TagChip>,
    pub suggested_tags: Vec<TagChip>,
    pub download_url: String,
}

impl ManifestCardView {
    pub fn from_manifest(manifest: &Manifest) -> Self {
        Self {
            id: manifest.id,
            display_id: format!("#{:04}", manifest.id.0),
            tags: chips(&manifest.tags),
            suggested_tags: manifest
                .suggested_tags
                .as_ref()
                .map(chips)
                .unwrap_or_default(),
            download_url: make_data_url(manifest.id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagChip {
    pub key: String,
    pub value: String,
}

impl TagChip {
    pub fn label(&self) -> String {
        format!("{}: {}", self.key, self.value)
    }
}

// TagSet iterates in key order, so chips come out sorted.
fn chips(tags: &TagSet) -> Vec<TagChip> {
    tags.iter()
        .map(|(key, value)| TagChip {
            key: key.clone(),
            value: value.clone(),
        })
        .collect()
}
