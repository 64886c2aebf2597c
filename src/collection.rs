use serde::{Deserialize, Serialize};

/// One row of a movie table, identified by its name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRow {
    pub name: String,
    pub downloads: u64,
}

/// Pagination metadata returned alongside every table page. `page` and
/// `per_page` are only present when the server clamped an out-of-bounds
/// request back into range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PageMeta {
    pub total_entries: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
}

/// One fetched page: metadata plus the rows of that page.
#[derive(Debug, Clone, PartialEq)]
pub struct TablePage {
    pub meta: PageMeta,
    pub rows: Vec<MovieRow>,
}

/// Paging bookkeeping for one table. Pages are 1-based, matching the server.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageState {
    pub current_page: u64,
    pub per_page: u64,
    pub total_entries: u64,
}

impl PageState {
    pub const FIRST_PAGE: u64 = 1;

    pub fn new(per_page: u64) -> Self {
        Self {
            current_page: Self::FIRST_PAGE,
            per_page,
            total_entries: 0,
        }
    }

    /// Last valid page; an empty table still has one (empty) page.
    pub fn last_page(&self) -> u64 {
        if self.per_page == 0 {
            return Self::FIRST_PAGE;
        }
        self.total_entries.div_ceil(self.per_page).max(1)
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > Self::FIRST_PAGE
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.last_page()
    }
}

/// Query parameters for one page fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    pub page: u64,
    pub per_page: u64,
    pub filter: Option<String>,
}

/// A page-navigation request against a collection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PageNav {
    First,
    Previous,
    Next,
    Last,
    Page(u64),
}

/// Snapshot of a fetch in flight. The generation lets the collection discard
/// a completion that was overtaken by a newer fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchTicket {
    pub generation: u64,
    pub table: String,
    pub query: PageQuery,
}

/// The rows and paging state of one named table, fetched page by page from
/// the server. All mutation goes through navigation, filtering, or applying
/// a fetched page against a still-current ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct PagedCollection {
    table: String,
    pub rows: Vec<MovieRow>,
    pub state: PageState,
    filter: Option<String>,
    generation: u64,
    loaded: bool,
}

impl PagedCollection {
    pub fn new(table: String, per_page: u64) -> Self {
        Self {
            table,
            rows: Vec::new(),
            state: PageState::new(per_page),
            filter: None,
            generation: 0,
            loaded: false,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn filter(&self) -> Option<&str> {
        self.filter.as_deref()
    }

    /// Whether at least one fetch has completed for this collection.
    pub fn loaded(&self) -> bool {
        self.loaded
    }

    /// Start a fetch of the current page, superseding any fetch in flight.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.generation += 1;
        FetchTicket {
            generation: self.generation,
            table: self.table.clone(),
            query: PageQuery {
                page: self.state.current_page,
                per_page: self.state.per_page,
                filter: self.filter.clone(),
            },
        }
    }

    /// Resolve a navigation request. Returns the fetch for the target page,
    /// or `None` when the request is out of range or already satisfied.
    pub fn navigate(&mut self, nav: PageNav) -> Option<FetchTicket> {
        let target = self.nav_target(nav)?;
        self.state.current_page = target;
        Some(self.begin_fetch())
    }

    fn nav_target(&self, nav: PageNav) -> Option<u64> {
        let state = &self.state;
        let target = match nav {
            PageNav::First => PageState::FIRST_PAGE,
            PageNav::Previous => {
                if !state.has_previous() {
                    return None;
                }
                state.current_page - 1
            }
            PageNav::Next => {
                if !state.has_next() {
                    return None;
                }
                state.current_page + 1
            }
            PageNav::Last => state.last_page(),
            PageNav::Page(n) => {
                if n < PageState::FIRST_PAGE || n > state.last_page() {
                    return None;
                }
                n
            }
        };
        if target == state.current_page {
            return None;
        }
        Some(target)
    }

    /// Set or clear the server-side name filter. Always resets to the first
    /// page; the caller starts the fetch.
    pub fn set_filter(&mut self, filter: Option<String>) {
        self.filter = filter.filter(|f| !f.is_empty());
        self.state.current_page = PageState::FIRST_PAGE;
    }

    /// Go back to the first page without fetching (the refresh button does
    /// this before refreshing).
    pub fn reset_page(&mut self) {
        self.state.current_page = PageState::FIRST_PAGE;
    }

    pub fn is_current(&self, ticket: &FetchTicket) -> bool {
        ticket.generation == self.generation
    }

    /// Install a fetched page if the ticket is still current. Returns false
    /// for a stale completion, which must be discarded.
    pub fn apply_page(&mut self, ticket: &FetchTicket, page: TablePage) -> bool {
        if !self.is_current(ticket) {
            log::info!(
                "Discarding stale page for table '{}' (generation {} < {})",
                self.table,
                ticket.generation,
                self.generation
            );
            return false;
        }
        self.state.total_entries = page.meta.total_entries;
        // The server corrects requests that ran past the end of the table.
        if let Some(page_num) = page.meta.page {
            self.state.current_page = page_num;
        }
        if let Some(per_page) = page.meta.per_page {
            self.state.per_page = per_page;
        }
        self.rows = page.rows;
        self.loaded = true;
        true
    }

    /// Re-arm the fetch for another round of the same page, but only if no
    /// newer fetch has started meanwhile.
    pub fn refetch_if_current(&mut self, ticket: &FetchTicket) -> Option<FetchTicket> {
        if self.is_current(ticket) {
            Some(self.begin_fetch())
        } else {
            None
        }
    }
}
