use dioxus::prelude::*;

use crate::api::ApiClient;
use crate::config::AppConfig;
use crate::table_ui::TableView;

/// Which of the server's tables is the visible one. A plain state machine:
/// the panel component renders whatever this says, recomputing the full
/// visibility set on every change rather than toggling entries one by one.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSwitcher {
    keys: Vec<String>,
    current: usize,
}

impl TableSwitcher {
    pub fn new(keys: Vec<String>) -> Self {
        Self { keys, current: 0 }
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_key(&self) -> Option<&str> {
        self.keys.get(self.current).map(String::as_str)
    }

    /// Make the table at `index` the visible one. Returns false (and changes
    /// nothing) for an out-of-range index.
    pub fn switch_to(&mut self, index: usize) -> bool {
        if index >= self.keys.len() {
            return false;
        }
        self.current = index;
        true
    }

    /// The recomputed visibility set: exactly one entry is visible, or none
    /// when there are no tables.
    pub fn visible(&self) -> Vec<bool> {
        (0..self.keys.len()).map(|i| i == self.current).collect()
    }
}

/// The multi-table panel: one switch button and one `TableView` per table
/// name, with exactly one view visible. Remounted wholesale (fresh instance,
/// fresh handlers) whenever the poller rebuilds the UI.
#[component]
pub fn TablePanel(client: Signal<ApiClient>, config: AppConfig, keys: Vec<String>) -> Element {
    let mut switcher = use_signal({
        let keys = keys.clone();
        move || TableSwitcher::new(keys)
    });

    // With no tables there is nothing further to initialize; the alert is
    // terminal for this panel instance.
    if switcher.read().is_empty() {
        return rsx! {
            div {
                class: "bg-yellow-50 border border-yellow-200 rounded-md p-4 text-sm text-yellow-800",
                "The server has no movie tables."
            }
        };
    }

    let current = switcher.read().current_index();
    let panel_keys = switcher.read().keys().to_vec();

    rsx! {
        div {
            class: "flex flex-col space-y-4",

            // Switch buttons, one per table
            div {
                class: "flex border-b border-gray-200",
                for (index, key) in panel_keys.iter().enumerate() {
                    button {
                        key: "{key}",
                        onclick: move |_| {
                            switcher.with_mut(|s| {
                                s.switch_to(index);
                            });
                        },
                        class: format!(
                            "px-4 py-2 text-sm font-medium {}",
                            if index == current {
                                "text-blue-600 border-b-2 border-blue-600"
                            } else {
                                "text-gray-500 hover:text-gray-700"
                            }
                        ),
                        "{key}"
                    }
                }
            }

            for (index, key) in panel_keys.iter().enumerate() {
                TableView {
                    key: "{key}",
                    client,
                    config: config.clone(),
                    table: key.clone(),
                    index,
                    switcher,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(names: &[&str]) -> Vec<String> {
        names.iter().map(|n| n.to_string()).collect()
    }

    #[test]
    fn test_empty_key_list() {
        let switcher = TableSwitcher::new(Vec::new());
        assert!(switcher.is_empty());
        assert!(switcher.current_key().is_none());
        assert!(switcher.visible().is_empty());
    }

    #[test]
    fn test_first_table_starts_visible() {
        let switcher = TableSwitcher::new(keys(&["movies", "shorts", "trailers"]));
        assert_eq!(switcher.current_key(), Some("movies"));
        assert_eq!(switcher.visible(), vec![true, false, false]);
    }

    #[test]
    fn test_switch_and_back_restores_original() {
        let mut switcher = TableSwitcher::new(keys(&["movies", "shorts"]));
        assert!(switcher.switch_to(1));
        assert_eq!(switcher.current_key(), Some("shorts"));
        assert_eq!(switcher.visible(), vec![false, true]);

        assert!(switcher.switch_to(0));
        assert_eq!(switcher.current_key(), Some("movies"));
        assert_eq!(switcher.visible(), vec![true, false]);
    }

    #[test]
    fn test_exactly_one_visible() {
        let mut switcher = TableSwitcher::new(keys(&["a", "b", "c", "d"]));
        for index in [2, 0, 3, 3, 1] {
            switcher.switch_to(index);
            let visible = switcher.visible();
            assert_eq!(visible.iter().filter(|v| **v).count(), 1);
            assert!(visible[index]);
        }
    }

    #[test]
    fn test_out_of_range_switch_rejected() {
        let mut switcher = TableSwitcher::new(keys(&["movies"]));
        assert!(!switcher.switch_to(1));
        assert_eq!(switcher.current_index(), 0);
    }

    #[test]
    fn test_redraw_idempotent() {
        let mut switcher = TableSwitcher::new(keys(&["movies", "shorts"]));
        switcher.switch_to(1);
        let first = switcher.visible();
        let second = switcher.visible();
        assert_eq!(first, second);
    }
}
