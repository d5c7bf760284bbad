use crate::{AppState, Effect, Msg, Tab};

/// Pure update function: applies a message to state and returns any effects.
///
/// This is the only writer of the manifest list. Query and suggestion
/// results arrive as messages and are applied to the list as it is now,
/// looked up by id, so completions may land in any order.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::Started => {
            if state.mark_started() {
                let tab = state.tab();
                mount(&mut state, tab)
            } else {
                Vec::new()
            }
        }
        Msg::TabSelected(tab) => {
            if tab == state.tab() {
                return (state, Vec::new());
            }
            let mut effects = unmount(&mut state);
            state.select_tab(tab);
            if state.is_started() {
                effects.extend(mount(&mut state, tab));
            }
            effects
        }
        Msg::SearchChanged(text) => {
            state.set_search(text);
            Vec::new()
        }
        Msg::RefreshClicked => match state.begin_refresh() {
            Some(generation) => vec![
                Effect::CancelPending,
                Effect::QueryManifests {
                    generation,
                    query: state.default_query(),
                },
            ],
            None => Vec::new(),
        },
        Msg::OpenManifest(id) => match state.generation() {
            Some(generation) if state.manifest(id).is_some() => {
                vec![Effect::FetchManifest { generation, id }]
            }
            _ => Vec::new(),
        },
        Msg::QueryCompleted { generation, result } => match result {
            Ok(manifests) => state
                .replace_manifests(generation, manifests)
                .map(|ids| {
                    ids.into_iter()
                        .map(|id| Effect::SuggestTags { generation, id })
                        .collect()
                })
                .unwrap_or_default(),
            Err(message) => {
                state.fail_query(generation, message);
                Vec::new()
            }
        },
        Msg::SuggestionCompleted {
            generation,
            id,
            result,
        } => {
            // Failed suggestions leave the field absent.
            if let Ok(tags) = result {
                state.apply_suggestion(generation, id, tags);
            }
            Vec::new()
        }
        Msg::ManifestFetched { generation, result } => {
            if let Ok(manifest) = result {
                state.apply_manifest(generation, manifest);
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn mount(state: &mut AppState, tab: Tab) -> Vec<Effect> {
    match tab {
        Tab::Explorer => {
            let generation = state.mount_explorer();
            vec![Effect::QueryManifests {
                generation,
                query: state.default_query(),
            }]
        }
        Tab::Config => Vec::new(),
    }
}

fn unmount(state: &mut AppState) -> Vec<Effect> {
    match state.tab() {
        Tab::Explorer if state.generation().is_some() => {
            state.unmount_explorer();
            vec![Effect::CancelPending]
        }
        _ => Vec::new(),
    }
}
