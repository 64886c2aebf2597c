#![allow(non_snake_case)]

use std::time::Duration;

use dioxus::prelude::*;

mod api;
mod collection;
mod config;
mod grid;
mod paginator;
mod poller;
mod switcher;
mod table_ui;

use api::ApiClient;
use config::AppConfig;
use poller::{AppHandles, PollerConfig};
use switcher::TablePanel;

fn main() {
    dioxus_logger::init(tracing::Level::INFO).expect("failed to init logger");

    LaunchBuilder::desktop()
        .with_cfg(dioxus::desktop::Config::new().with_window(
            dioxus::desktop::WindowBuilder::new().with_title("Marquee - Movie Server Admin"),
        ))
        .launch(App);
}

fn App() -> Element {
    let config = use_signal(|| match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            AppConfig::default()
        }
    });
    let client = use_signal(|| {
        let server_url = config.peek().server_url.clone();
        ApiClient::new(&server_url).unwrap_or_else(|e| {
            log::error!("Bad server URL '{}', falling back to default: {}", server_url, e);
            ApiClient::new(config::DEFAULT_SERVER_URL).expect("default server URL is valid")
        })
    });

    let offline = use_signal(|| false);
    let table_keys = use_signal(|| Option::<Vec<String>>::None);
    let rebuild_epoch = use_signal(|| 0u64);

    // The single persistent probe loop; it performs the initial table-key
    // fetch and every rebuild after an outage.
    use_future(move || {
        let cfg = config.peek().clone();
        poller::run(
            client.peek().clone(),
            AppHandles {
                offline,
                table_keys,
                rebuild_epoch,
            },
            PollerConfig {
                poll_interval: Duration::from_secs(cfg.poll_interval_secs),
                probe_backoff_initial: Duration::from_secs(1),
                probe_backoff_max: Duration::from_secs(30),
            },
        )
    });

    let server = client.read().base().to_string();

    rsx! {
        div {
            class: "min-h-screen bg-gray-100",

            if offline() {
                div {
                    class: "bg-red-600 text-white text-sm px-4 py-2 text-center",
                    "⚠ Cannot reach the movie server. Retrying in the background."
                }
            }

            header {
                class: "bg-white shadow-sm border-b",
                div {
                    class: "px-6 py-4 flex items-center justify-between",
                    h1 {
                        class: "text-2xl font-bold text-gray-900",
                        "🎬 Marquee"
                    }
                    span {
                        class: "text-xs text-gray-400",
                        "{server}"
                    }
                }
            }

            main {
                class: "p-6",
                match table_keys() {
                    None => rsx! {
                        div {
                            class: "flex flex-col items-center justify-center py-16 space-y-4",
                            div {
                                class: "animate-spin rounded-full h-8 w-8 border-b-2 border-blue-600"
                            }
                            div {
                                class: "text-sm text-gray-500",
                                "Connecting to the movie server…"
                            }
                        }
                    },
                    Some(keys) => rsx! {
                        // Keyed by the rebuild epoch: a reconnect mounts a
                        // fresh panel and drops the old one wholesale
                        TablePanel {
                            key: "{rebuild_epoch()}",
                            client,
                            config: config.read().clone(),
                            keys: keys.clone(),
                        }
                    },
                }
            }
        }

        style {
            "
            @import url('https://cdn.jsdelivr.net/npm/tailwindcss@2.2.19/dist/tailwind.min.css');

            .pagination li {{
                user-select: none;
            }}
            "
        }
    }
}
