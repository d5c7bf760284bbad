use explorer_core::{
    AppViewModel, ConfigView, ExplorerView, ListStatus, ManifestCardView, PanelView, TabView,
    TagChip,
};

pub fn render(view: &AppViewModel) -> String {
    let mut lines = vec![tab_bar(&view.tabs), String::new()];

    match &view.panel {
        PanelView::Explorer(explorer) => render_explorer(explorer, &mut lines),
        PanelView::Config(config) => render_config(config, &mut lines),
    }

    lines.push(String::new());
    lines.join("\n")
}

fn tab_bar(tabs: &[TabView]) -> String {
    tabs.iter()
        .map(|tab| {
            if tab.selected {
                format!("[{}]", tab.label)
            } else {
                format!(" {} ", tab.label)
            }
        })
        .collect::<Vec<_>>()
        .join(" | ")
}

fn render_explorer(explorer: &ExplorerView, lines: &mut Vec<String>) {
    lines.push(format!("Search: [{}]", explorer.search));
    lines.push(status_line(&explorer.status, explorer.cards.len()));
    for card in &explorer.cards {
        lines.push(String::new());
        render_card(card, lines);
    }
}

fn status_line(status: &ListStatus, count: usize) -> String {
    match status {
        ListStatus::Idle => "Status: idle".to_string(),
        ListStatus::Loading if count > 0 => format!("Status: refreshing ({count} shown)"),
        ListStatus::Loading => "Status: loading".to_string(),
        ListStatus::Loaded => format!("Status: {count} manifests"),
        ListStatus::Failed(message) => format!("Status: query failed ({message})"),
    }
}

fn render_card(card: &ManifestCardView, lines: &mut Vec<String>) {
    lines.push(format!("{}  download: {}", card.display_id, card.download_url));
    lines.push(format!("  Tags:           {}", chip_row(&card.tags)));
    lines.push(format!("  Suggested Tags: {}", chip_row(&card.suggested_tags)));
}

fn chip_row(chips: &[TagChip]) -> String {
    if chips.is_empty() {
        return "-".to_string();
    }
    chips
        .iter()
        .map(|chip| format!("({})", chip.label()))
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_config(config: &ConfigView, lines: &mut Vec<String>) {
    lines.push(format!("Backend:       {}", config.base_url));
    lines.push(format!("Default limit: {}", config.default_limit));
}

#[cfg(test)]
mod tests {
    use super::*;
    use explorer_core::{
        update, AppState, DisplaySettings, Manifest, ManifestId, Msg, Tab, TagSet,
    };
    use pretty_assertions::assert_eq;

    fn tags(pairs: &[(&str, &str)]) -> TagSet {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn explorer_renders_cards_with_chips() {
        let (state, _) = update(AppState::new(), Msg::Started);
        let (state, _) = update(
            state,
            Msg::QueryCompleted {
                generation: 1,
                result: Ok(vec![Manifest::new(7, tags(&[("color", "red")]))]),
            },
        );
        let (state, _) = update(
            state,
            Msg::SuggestionCompleted {
                generation: 1,
                id: ManifestId(7),
                result: Ok(tags(&[("size", "small"), ("artist", "x")])),
            },
        );

        let text = render(&state.view());

        assert_eq!(
            text,
            "[Explorer] |  Config \n\
             \n\
             Search: []\n\
             Status: 1 manifests\n\
             \n\
             #0007  download: /d/7\n  \
             Tags:           (color: red)\n  \
             Suggested Tags: (artist: x) (size: small)\n"
        );
    }

    #[test]
    fn missing_suggestions_render_as_dash() {
        let (state, _) = update(AppState::new(), Msg::Started);
        let (state, _) = update(
            state,
            Msg::QueryCompleted {
                generation: 1,
                result: Ok(vec![Manifest::new(1, TagSet::new())]),
            },
        );

        let text = render(&state.view());
        assert!(text.contains("  Tags:           -\n"));
        assert!(text.contains("  Suggested Tags: -\n"));
    }

    #[test]
    fn failed_query_is_shown_in_status() {
        let (state, _) = update(AppState::new(), Msg::Started);
        let (state, _) = update(
            state,
            Msg::QueryCompleted {
                generation: 1,
                result: Err("http status 500: 500 Internal Server Error".to_string()),
            },
        );

        let text = render(&state.view());
        assert!(text.contains("Status: query failed (http status 500"));
    }

    #[test]
    fn config_tab_shows_settings() {
        let state = AppState::with_settings(DisplaySettings {
            base_url: "http://127.0.0.1:6026/".to_string(),
            default_limit: 10,
        });
        let (state, _) = update(state, Msg::TabSelected(Tab::Config));

        let text = render(&state.view());
        assert!(text.starts_with(" Explorer  | [Config]"));
        assert!(text.contains("Backend:       http://127.0.0.1:6026/"));
        assert!(text.contains("Default limit: 10"));
    }
}
