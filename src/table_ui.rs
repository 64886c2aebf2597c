use std::time::Duration;

use chrono::{DateTime, Utc};
use dioxus::prelude::*;

use crate::api::{ApiClient, TableSource};
use crate::collection::{PageNav, PagedCollection};
use crate::config::AppConfig;
use crate::grid::MovieGrid;
use crate::paginator::Paginator;
use crate::poller::Backoff;
use crate::switcher::TableSwitcher;

/// The view of one movie table: a grid, its paginator, a name filter, and a
/// refresh button, all bound to one paginated collection. Every table gets
/// its own instance; the switcher decides which one is visible.
#[component]
pub fn TableView(
    client: Signal<ApiClient>,
    config: AppConfig,
    table: String,
    index: usize,
    switcher: Signal<TableSwitcher>,
) -> Element {
    let per_page = config.per_page;
    let mut collection = use_signal({
        let table = table.clone();
        move || PagedCollection::new(table, per_page)
    });
    let mut filter_input = use_signal(String::new);
    let mut fetch_error = use_signal(|| Option::<String>::None);
    let last_refreshed = use_signal(|| Option::<DateTime<Utc>>::None);

    let retry = Backoff::new(
        Duration::from_millis(config.empty_retry_initial_ms),
        Duration::from_millis(config.empty_retry_max_ms),
    );

    // Initial fetch at mount, and a fresh one every time this table becomes
    // the visible one.
    use_effect(move || {
        let active = switcher.read().current_index() == index;
        if active || !collection.peek().loaded() {
            start_refresh(client, collection, fetch_error, last_refreshed, retry, None);
        }
    });

    // Periodic refresh while this table is the visible one.
    let refresh_secs = config.refresh_interval_secs;
    use_future(move || async move {
        if refresh_secs == 0 {
            return;
        }
        loop {
            tokio::time::sleep(Duration::from_secs(refresh_secs)).await;
            if switcher.peek().current_index() == index && collection.peek().loaded() {
                let source = client.peek().clone();
                run_refresh(source, collection, fetch_error, last_refreshed, retry, None).await;
            }
        }
    });

    let submit_filter = move |_| {
        let text = filter_input.peek().trim().to_string();
        let filter = if text.is_empty() { None } else { Some(text) };
        collection.with_mut(|c| c.set_filter(filter));
        start_refresh(client, collection, fetch_error, last_refreshed, retry, None);
    };

    let active = switcher.read().current_index() == index;
    let col = collection.read();
    let loaded = col.loaded();
    let no_data = loaded && col.rows.is_empty();
    let rows = col.rows.clone();
    let state = col.state;
    drop(col);
    let refreshed_stamp = last_refreshed().map(|t| t.format("%H:%M:%S").to_string());

    rsx! {
        div {
            class: if active { "flex flex-col space-y-4" } else { "hidden" },

            // Toolbar: filter, refresh, last-refreshed stamp
            div {
                class: "flex items-center justify-between",
                div {
                    class: "flex items-center space-x-2",
                    input {
                        r#type: "text",
                        placeholder: "Filter by name",
                        value: "{filter_input}",
                        oninput: move |evt| filter_input.set(evt.value()),
                        onkeydown: {
                            let mut submit = submit_filter;
                            move |event: Event<KeyboardData>| {
                                let key_str = format!("{:?}", event.key());
                                if key_str.contains("Enter") {
                                    submit(());
                                }
                            }
                        },
                        class: "px-3 py-1 border border-gray-300 rounded-md text-sm focus:outline-none focus:ring-2 focus:ring-blue-500",
                    }
                    button {
                        onclick: {
                            let mut submit = submit_filter;
                            move |_| submit(())
                        },
                        class: "px-3 py-1 bg-blue-600 text-white text-sm rounded-md hover:bg-blue-700",
                        "Search"
                    }
                    button {
                        onclick: move |_| {
                            filter_input.set(String::new());
                            collection.with_mut(|c| c.set_filter(None));
                            start_refresh(client, collection, fetch_error, last_refreshed, retry, None);
                        },
                        class: "px-3 py-1 bg-gray-100 text-gray-700 text-sm rounded-md hover:bg-gray-200",
                        "Clear"
                    }
                }
                div {
                    class: "flex items-center space-x-3",
                    if let Some(stamp) = refreshed_stamp {
                        span {
                            class: "text-xs text-gray-400",
                            "Updated {stamp}"
                        }
                    }
                    button {
                        // Goes back to page one before refreshing
                        onclick: move |_| {
                            collection.with_mut(|c| c.reset_page());
                            start_refresh(client, collection, fetch_error, last_refreshed, retry, None);
                        },
                        class: "px-3 py-1 bg-gray-100 text-gray-700 text-sm rounded-md hover:bg-gray-200",
                        "⟳ Refresh"
                    }
                }
            }

            // Fetch failures surface here rather than being swallowed
            if let Some(error) = fetch_error() {
                div {
                    class: "bg-red-50 border border-red-200 rounded-md p-3 flex justify-between items-center",
                    span {
                        class: "text-sm text-red-700",
                        "Failed to load table: {error}"
                    }
                    button {
                        onclick: move |_| fetch_error.set(None),
                        class: "text-red-400 hover:text-red-600 text-sm",
                        "✕"
                    }
                }
            }

            if no_data {
                div {
                    class: "text-center py-12 text-gray-500",
                    div { class: "text-2xl mb-2", "🎬" }
                    div { class: "text-sm", "No movies in this table yet. Watching for new entries." }
                }
            } else if loaded {
                div {
                    class: "overflow-x-auto border border-gray-200 rounded-md",
                    MovieGrid { client, rows }
                }
                div {
                    class: "flex items-center justify-between",
                    Paginator {
                        state,
                        on_navigate: move |nav: PageNav| {
                            start_refresh(
                                client,
                                collection,
                                fetch_error,
                                last_refreshed,
                                retry,
                                Some(nav),
                            );
                        },
                    }
                    span {
                        class: "text-xs text-gray-500",
                        "{state.total_entries} movie(s)"
                    }
                }
            } else {
                div {
                    class: "flex items-center justify-center py-12",
                    div {
                        class: "animate-spin rounded-full h-8 w-8 border-b-2 border-blue-600"
                    }
                }
            }
        }
    }
}

fn start_refresh(
    client: Signal<ApiClient>,
    collection: Signal<PagedCollection>,
    fetch_error: Signal<Option<String>>,
    last_refreshed: Signal<Option<DateTime<Utc>>>,
    retry: Backoff,
    nav: Option<PageNav>,
) {
    let source = client.peek().clone();
    spawn(run_refresh(
        source,
        collection,
        fetch_error,
        last_refreshed,
        retry,
        nav,
    ));
}

/// Fetch a page into the collection, then keep re-fetching with backoff for
/// as long as the table stays empty. A completion or retry whose ticket has
/// been overtaken by a newer fetch stops silently; the newer fetch owns the
/// collection now.
async fn run_refresh<S: TableSource>(
    source: S,
    mut collection: Signal<PagedCollection>,
    mut fetch_error: Signal<Option<String>>,
    mut last_refreshed: Signal<Option<DateTime<Utc>>>,
    mut retry: Backoff,
    nav: Option<PageNav>,
) {
    let first_ticket = collection.with_mut(|c| match nav {
        Some(nav) => c.navigate(nav),
        None => Some(c.begin_fetch()),
    });
    // Out-of-range navigation is a no-op
    let Some(mut ticket) = first_ticket else {
        return;
    };

    loop {
        match source.fetch_page(&ticket.table, &ticket.query).await {
            Ok(page) => {
                let empty = page.rows.is_empty();
                if !collection.with_mut(|c| c.apply_page(&ticket, page)) {
                    return;
                }
                last_refreshed.set(Some(Utc::now()));
                fetch_error.set(None);
                if !empty {
                    return;
                }
                tokio::time::sleep(retry.next_delay()).await;
                match collection.with_mut(|c| c.refetch_if_current(&ticket)) {
                    Some(next) => ticket = next,
                    None => return,
                }
            }
            Err(e) => {
                if collection.read().is_current(&ticket) {
                    log::error!("Failed to fetch table '{}': {}", ticket.table, e);
                    fetch_error.set(Some(e.to_string()));
                }
                return;
            }
        }
    }
}
