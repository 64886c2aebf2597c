use dioxus::prelude::*;

use crate::collection::{PageNav, PageState};

pub const DEFAULT_WINDOW_SIZE: u64 = 10;

pub const FIRST_LABEL: &str = "《";
pub const PREV_LABEL: &str = "〈";
pub const NEXT_LABEL: &str = "〉";
pub const LAST_LABEL: &str = "》";

/// One pagination handle: the four fast-travel arrows plus a numeric handle
/// per page in the current window.
#[derive(Debug, Clone, PartialEq)]
pub struct PageHandle {
    pub nav: PageNav,
    pub label: String,
    pub title: Option<String>,
    pub active: bool,
    pub disabled: bool,
}

impl PageHandle {
    fn fast_travel(nav: PageNav, label: &str, disabled: bool) -> Self {
        Self {
            nav,
            label: label.to_string(),
            title: None,
            active: false,
            disabled,
        }
    }
}

/// Compute the handle row for a page state: `first prev [window] next last`.
///
/// The numeric window has fixed width `window_size` and is snapped to
/// `window_size`-aligned boundaries, so stepping through pages only shifts
/// the window once per `window_size` pages.
pub fn page_handles(state: &PageState, window_size: u64) -> Vec<PageHandle> {
    let window_size = window_size.max(1);

    // Window arithmetic is 0-based; labels and PageNav targets are 1-based.
    let last = state.last_page() - 1;
    let current = state.current_page.clamp(PageState::FIRST_PAGE, state.last_page()) - 1;
    let window_start = (current / window_size) * window_size;
    let window_end = (last + 1).min(window_start + window_size);

    let mut handles = Vec::with_capacity((window_end - window_start) as usize + 4);
    handles.push(PageHandle::fast_travel(
        PageNav::First,
        FIRST_LABEL,
        !state.has_previous(),
    ));
    handles.push(PageHandle::fast_travel(
        PageNav::Previous,
        PREV_LABEL,
        !state.has_previous(),
    ));
    for index in window_start..window_end {
        let page = index + 1;
        handles.push(PageHandle {
            nav: PageNav::Page(page),
            label: page.to_string(),
            title: Some(format!("No. {}", page)),
            active: index == current,
            disabled: false,
        });
    }
    handles.push(PageHandle::fast_travel(
        PageNav::Next,
        NEXT_LABEL,
        !state.has_next(),
    ));
    handles.push(PageHandle::fast_travel(
        PageNav::Last,
        LAST_LABEL,
        !state.has_next(),
    ));
    handles
}

/// The pagination control. A pure renderer over `PageState`: every change
/// rebuilds the whole handle row, since the window and the disabled markers
/// depend on global paging state rather than on individual rows.
#[component]
pub fn Paginator(state: PageState, on_navigate: EventHandler<PageNav>) -> Element {
    let handles = page_handles(&state, DEFAULT_WINDOW_SIZE);

    rsx! {
        ul {
            class: "pagination flex items-center space-x-1",
            for handle in handles {
                li {
                    class: format!(
                        "px-2 py-1 text-sm rounded {}",
                        if handle.active {
                            "bg-blue-600 text-white"
                        } else if handle.disabled {
                            "text-gray-300 cursor-not-allowed"
                        } else {
                            "text-blue-600 hover:bg-blue-50 cursor-pointer"
                        }
                    ),
                    title: handle.title.clone().unwrap_or_default(),
                    onclick: {
                        let nav = handle.nav;
                        let active = handle.active;
                        let disabled = handle.disabled;
                        move |_| {
                            // Clicking the active or a disabled handle does nothing
                            if !active && !disabled {
                                on_navigate.call(nav);
                            }
                        }
                    },
                    "{handle.label}"
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(current_page: u64, per_page: u64, total_entries: u64) -> PageState {
        PageState {
            current_page,
            per_page,
            total_entries,
        }
    }

    fn numeric_labels(handles: &[PageHandle]) -> Vec<String> {
        handles
            .iter()
            .filter(|h| matches!(h.nav, PageNav::Page(_)))
            .map(|h| h.label.clone())
            .collect()
    }

    fn active_label(handles: &[PageHandle]) -> String {
        handles
            .iter()
            .find(|h| h.active)
            .map(|h| h.label.clone())
            .expect("one handle is active")
    }

    #[test]
    fn test_window_at_start() {
        // 25 pages, sixth page current (0-based index 5): window [0..9],
        // labels 1..10, label 6 active.
        let handles = page_handles(&state(6, 10, 250), 10);
        let labels = numeric_labels(&handles);
        assert_eq!(
            labels,
            (1..=10).map(|n| n.to_string()).collect::<Vec<_>>()
        );
        assert_eq!(active_label(&handles), "6");
    }

    #[test]
    fn test_window_snaps_to_boundary() {
        // 0-based index 12: window [10..19], labels 11..20.
        let handles = page_handles(&state(13, 10, 250), 10);
        let labels = numeric_labels(&handles);
        assert_eq!(
            labels,
            (11..=20).map(|n| n.to_string()).collect::<Vec<_>>()
        );
        assert_eq!(active_label(&handles), "13");
    }

    #[test]
    fn test_window_clipped_at_end() {
        // 25 pages, last window holds only pages 21..25.
        let handles = page_handles(&state(25, 10, 250), 10);
        assert_eq!(
            numeric_labels(&handles),
            (21..=25).map(|n| n.to_string()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_fast_travel_disabled_on_first_page() {
        let handles = page_handles(&state(1, 10, 250), 10);
        let first = &handles[0];
        let prev = &handles[1];
        assert_eq!(first.nav, PageNav::First);
        assert!(first.disabled);
        assert_eq!(prev.nav, PageNav::Previous);
        assert!(prev.disabled);

        let next = &handles[handles.len() - 2];
        let last = &handles[handles.len() - 1];
        assert!(!next.disabled);
        assert!(!last.disabled);
    }

    #[test]
    fn test_fast_travel_disabled_on_last_page() {
        let handles = page_handles(&state(25, 10, 250), 10);
        assert!(!handles[0].disabled);
        assert!(!handles[1].disabled);
        assert!(handles[handles.len() - 2].disabled);
        assert!(handles[handles.len() - 1].disabled);
    }

    #[test]
    fn test_single_empty_page() {
        // An empty table still renders one (active) handle with all four
        // fast-travel handles disabled.
        let handles = page_handles(&state(1, 10, 0), 10);
        assert_eq!(numeric_labels(&handles), vec!["1"]);
        assert_eq!(active_label(&handles), "1");
        assert!(handles.iter().filter(|h| h.disabled).count() == 4);
    }
}
