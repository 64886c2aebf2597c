use dioxus::prelude::*;

use crate::api::ApiClient;
use crate::collection::MovieRow;

/// The movie grid: one row per `MovieRow`, keyed by name so only changed
/// rows re-render.
#[component]
pub fn MovieGrid(client: Signal<ApiClient>, rows: Vec<MovieRow>) -> Element {
    rsx! {
        table {
            class: "min-w-full divide-y divide-gray-200",
            thead {
                class: "bg-gray-50",
                tr {
                    th {
                        class: "px-4 py-2 text-left text-xs font-medium text-gray-500 uppercase",
                        "Movie"
                    }
                    th {
                        class: "px-4 py-2 text-right text-xs font-medium text-gray-500 uppercase",
                        "Downloads"
                    }
                }
            }
            tbody {
                class: "bg-white divide-y divide-gray-200",
                for row in rows {
                    MovieRowView { key: "{row.name}", client, row: row.clone() }
                }
            }
        }
    }
}

/// One table row. The name cell links to the backend's movie detail route
/// (`movie/<name>`) in a new browsing context; the downloads cell is the
/// plain count.
#[component]
fn MovieRowView(client: Signal<ApiClient>, row: MovieRow) -> Element {
    let href = client.read().movie_url(&row.name).to_string();

    rsx! {
        tr {
            class: "hover:bg-gray-50",
            td {
                class: "px-4 py-2 text-sm",
                a {
                    href: "{href}",
                    target: "_blank",
                    title: "{row.name}",
                    tabindex: "-1",
                    class: "text-blue-600 hover:underline",
                    "{row.name}"
                }
            }
            td {
                class: "px-4 py-2 text-sm text-right text-gray-700",
                "{row.downloads}"
            }
        }
    }
}
