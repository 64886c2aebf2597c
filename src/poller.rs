use std::time::Duration;

use dioxus::prelude::*;

use crate::api::{ApiClient, TableSource};

/// Connection status as observed by the probe loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConnState {
    Online,
    Offline,
}

/// What the poller must do after a probe completes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeAction {
    /// Still online: nothing to do.
    Idle,
    /// Probe failed: show the banner (idempotent) and keep retrying.
    Offline,
    /// Back online after an outage: clear the banner, tear the table UI
    /// down, and rebuild it from a fresh table-key fetch.
    Rebuild,
}

/// The two-state probe machine. Rebuild fires exactly once per recovery.
pub fn transition(state: ConnState, probe_ok: bool) -> (ConnState, ProbeAction) {
    match (state, probe_ok) {
        (ConnState::Online, true) => (ConnState::Online, ProbeAction::Idle),
        (ConnState::Offline, true) => (ConnState::Online, ProbeAction::Rebuild),
        (_, false) => (ConnState::Offline, ProbeAction::Offline),
    }
}

/// Delay between retries, doubling from an initial value up to a cap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Backoff {
    initial: Duration,
    max: Duration,
    next: Duration,
}

impl Backoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        Self {
            initial,
            max,
            next: initial,
        }
    }

    /// The delay to wait before the next attempt.
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.next;
        self.next = self.max.min(delay.saturating_mul(2));
        delay
    }

    pub fn reset(&mut self) {
        self.next = self.initial;
    }
}

/// The application state the poller drives, passed in explicitly rather
/// than shared through globals.
#[derive(Clone, Copy)]
pub struct AppHandles {
    /// Drives the disconnected banner.
    pub offline: Signal<bool>,
    /// `None` until the first table-key fetch completes (and again during a
    /// rebuild); `Some(vec![])` is the no-tables state.
    pub table_keys: Signal<Option<Vec<String>>>,
    /// Bumped on every rebuild so the table panel remounts from scratch.
    pub rebuild_epoch: Signal<u64>,
}

#[derive(Debug, Clone, Copy)]
pub struct PollerConfig {
    pub poll_interval: Duration,
    pub probe_backoff_initial: Duration,
    pub probe_backoff_max: Duration,
}

/// The persistent probe loop. Starts in the offline state with the banner
/// hidden, so the very first successful probe performs the initial table-key
/// fetch the same way a recovery does.
pub async fn run(client: ApiClient, mut app: AppHandles, config: PollerConfig) {
    let mut state = ConnState::Offline;
    let mut backoff = Backoff::new(config.probe_backoff_initial, config.probe_backoff_max);

    loop {
        let probe_ok = match client.probe().await {
            Ok(()) => true,
            Err(e) => {
                log::warn!("Probe failed: {}", e);
                false
            }
        };

        let (next_state, action) = transition(state, probe_ok);
        match action {
            ProbeAction::Idle => {}
            ProbeAction::Offline => {
                app.offline.set(true);
            }
            ProbeAction::Rebuild => {
                log::info!("Server reachable, rebuilding table panel");
                app.offline.set(false);
                backoff.reset();
                // Unmount the old panel before the new key list arrives, so
                // the rebuilt UI never inherits stale views or handlers.
                app.table_keys.set(None);
                app.rebuild_epoch.with_mut(|epoch| *epoch += 1);
                match client.table_keys().await {
                    Ok(keys) => app.table_keys.set(Some(keys)),
                    Err(e) => {
                        // The next offline/online cycle will retry.
                        log::error!("Failed to fetch table keys: {}", e);
                    }
                }
            }
        }
        state = next_state;

        let delay = match state {
            ConnState::Online => config.poll_interval,
            ConnState::Offline => backoff.next_delay(),
        };
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_table() {
        assert_eq!(
            transition(ConnState::Online, true),
            (ConnState::Online, ProbeAction::Idle)
        );
        assert_eq!(
            transition(ConnState::Online, false),
            (ConnState::Offline, ProbeAction::Offline)
        );
        assert_eq!(
            transition(ConnState::Offline, false),
            (ConnState::Offline, ProbeAction::Offline)
        );
        assert_eq!(
            transition(ConnState::Offline, true),
            (ConnState::Online, ProbeAction::Rebuild)
        );
    }

    #[test]
    fn test_rebuild_fires_once_per_recovery() {
        // online -> offline -> offline -> online -> online
        let outcomes = [true, false, false, true, true];
        let mut state = ConnState::Online;
        let mut rebuilds = 0;
        for ok in outcomes {
            let (next, action) = transition(state, ok);
            if action == ProbeAction::Rebuild {
                rebuilds += 1;
            }
            state = next;
        }
        assert_eq!(rebuilds, 1);
        assert_eq!(state, ConnState::Online);
    }

    #[test]
    fn test_backoff_doubles_to_cap() {
        let mut backoff = Backoff::new(Duration::from_secs(1), Duration::from_secs(30));
        assert_eq!(backoff.next_delay(), Duration::from_secs(1));
        assert_eq!(backoff.next_delay(), Duration::from_secs(2));
        assert_eq!(backoff.next_delay(), Duration::from_secs(4));
        assert_eq!(backoff.next_delay(), Duration::from_secs(8));
        assert_eq!(backoff.next_delay(), Duration::from_secs(16));
        assert_eq!(backoff.next_delay(), Duration::from_secs(30));
        assert_eq!(backoff.next_delay(), Duration::from_secs(30));
    }

    #[test]
    fn test_backoff_reset() {
        let mut backoff = Backoff::new(Duration::from_millis(500), Duration::from_secs(15));
        backoff.next_delay();
        backoff.next_delay();
        backoff.reset();
        assert_eq!(backoff.next_delay(), Duration::from_millis(500));
    }
}
