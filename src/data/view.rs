//! The view pipeline and its state transitions.
//!
//! A [`TableView`] owns a [`Table`], the [`ViewOptions`] it was created with,
//! and a per-instance [`ViewState`]. The displayed page is derived from
//! scratch on every call:
//!
//! ```text
//! rows ──▶ search ──▶ sort ──▶ paginate ──▶ Page
//! ```
//!
//! User interactions are expressed as [`ViewEvent`]s and applied through
//! [`ViewState::apply`], a pure `(state, event) -> state` transition.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::export::{export_table, Export};
use super::pagination::{clamp_page, page_bounds, page_window, total_pages};
use super::{Record, Row, Table};
use crate::error::TableError;

/// Callback invoked with the original record of an activated row.
pub type RowClickHandler = Box<dyn Fn(&Record)>;

/// Sort direction for the active sort column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Arrow shown next to a sorted header.
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// The active sort: one column key and a direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortConfig {
    pub key: String,
    pub direction: SortDirection,
}

/// Options fixed at view creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewOptions {
    pub pagination: bool,
    /// Rows per page. At least 1; [`TableView::new`] raises 0 to 1.
    pub page_size: usize,
    pub searchable: bool,
    pub downloadable: bool,
    /// Field delimiter used by export.
    pub delimiter: u8,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            pagination: true,
            page_size: 5,
            searchable: true,
            downloadable: true,
            delimiter: b',',
        }
    }
}

/// Per-instance view state driving the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub search_term: String,
    pub sort: Option<SortConfig>,
    /// 1-based.
    pub current_page: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            sort: None,
            current_page: 1,
        }
    }
}

/// A user interaction that changes the view state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// Replace the search term. Returns to page 1.
    SetSearch(String),
    /// Clear the search term. Returns to page 1.
    ClearSearch,
    /// A header was clicked.
    ToggleSort(String),
    NextPage,
    PrevPage,
    /// A page-number button was clicked.
    GoToPage(usize),
}

impl ViewState {
    /// Apply an event, returning the next state.
    ///
    /// Page moves are clamped to `[1, total_pages]` computed from the
    /// current state. Events that do not apply (sorting an unsortable or
    /// unknown column, searching a non-searchable view) leave the state as is.
    pub fn apply(&self, event: ViewEvent, table: &Table, options: &ViewOptions) -> ViewState {
        let mut next = self.clone();
        match event {
            ViewEvent::SetSearch(term) => {
                if options.searchable {
                    next.search_term = term;
                    next.current_page = 1;
                }
            }
            ViewEvent::ClearSearch => {
                next.search_term.clear();
                next.current_page = 1;
            }
            ViewEvent::ToggleSort(key) => {
                if table.column(&key).is_some_and(|c| c.sortable) {
                    next.sort = Some(toggle_sort(self.sort.as_ref(), key));
                }
            }
            ViewEvent::NextPage => {
                let total = self.total_pages(table, options);
                next.current_page = clamp_page(self.current_page + 1, total);
            }
            ViewEvent::PrevPage => {
                let total = self.total_pages(table, options);
                next.current_page = clamp_page(self.current_page.saturating_sub(1), total);
            }
            ViewEvent::GoToPage(page) => {
                let total = self.total_pages(table, options);
                next.current_page = clamp_page(page, total);
            }
        }
        next
    }

    /// Number of pages for the rows matching this state's search.
    pub fn total_pages(&self, table: &Table, options: &ViewOptions) -> usize {
        if !options.pagination {
            return 1;
        }
        let term = effective_term(&self.search_term, options);
        total_pages(search(table.rows(), term).len(), options.page_size)
    }
}

/// Sort toggle: a new column starts ascending, the same column flips.
pub fn toggle_sort(current: Option<&SortConfig>, key: String) -> SortConfig {
    match current {
        Some(sort) if sort.key == key => SortConfig {
            key,
            direction: sort.direction.flip(),
        },
        _ => SortConfig {
            key,
            direction: SortDirection::Asc,
        },
    }
}

fn effective_term<'a>(term: &'a str, options: &ViewOptions) -> &'a str {
    if options.searchable {
        term
    } else {
        ""
    }
}

/// Search stage: keep rows where any field's text contains `term`,
/// ignoring case. An empty term keeps everything.
pub fn search<'a>(rows: &'a [Row], term: &str) -> Vec<&'a Row> {
    if term.is_empty() {
        return rows.iter().collect();
    }
    let needle = term.to_lowercase();
    rows.iter()
        .filter(|row| row.values().any(|v| v.contains_lowercase(&needle)))
        .collect()
}

/// Sort stage: stable sort on the value at `field`.
pub fn sort_rows(rows: &mut [&Row], field: usize, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = a.get(field).sort_cmp(b.get(field));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

/// The rows shown for the current state, plus page bookkeeping.
#[derive(Debug, Clone)]
pub struct Page<'a> {
    pub rows: Vec<&'a Row>,
    /// 1-based page number, already clamped.
    pub number: usize,
    pub total_pages: usize,
    /// Rows matching the search across all pages.
    pub total_matches: usize,
}

impl Page<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_prev(&self) -> bool {
        self.number > 1
    }

    pub fn has_next(&self) -> bool {
        self.number < self.total_pages
    }
}

/// Placeholder text shown when a page has no rows.
pub const EMPTY_PLACEHOLDER: &str = "No results found";

/// A table plus its options and view state.
pub struct TableView {
    table: Table,
    options: ViewOptions,
    state: ViewState,
    on_row_click: Option<RowClickHandler>,
}

impl fmt::Debug for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableView")
            .field("title", &self.table.title())
            .field("rows", &self.table.len())
            .field("options", &self.options)
            .field("state", &self.state)
            .finish()
    }
}

impl TableView {
    /// Create a view on page 1. A `page_size` of 0 is raised to 1.
    pub fn new(table: Table, mut options: ViewOptions) -> Self {
        options.page_size = options.page_size.max(1);
        Self {
            table,
            options,
            state: ViewState::default(),
            on_row_click: None,
        }
    }

    /// Register the row activation callback.
    pub fn on_row_click<F>(mut self, handler: F) -> Self
    where
        F: Fn(&Record) + 'static,
    {
        self.on_row_click = Some(Box::new(handler));
        self
    }

    pub fn table(&self) -> &Table {
        &self.table
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Apply a user interaction.
    pub fn dispatch(&mut self, event: ViewEvent) {
        debug!(?event, "view event");
        self.state = self.state.apply(event, &self.table, &self.options);
    }

    /// Swap in freshly loaded data, keeping the view state where it still applies.
    ///
    /// A sort on a column the new table lacks is dropped, and the current
    /// page is clamped to the new page count.
    pub fn replace_table(&mut self, table: Table) {
        self.table = table;
        if let Some(sort) = &self.state.sort {
            if self.table.column(&sort.key).is_none() {
                self.state.sort = None;
            }
        }
        let total = self.state.total_pages(&self.table, &self.options);
        self.state.current_page = clamp_page(self.state.current_page, total);
    }

    /// Search and sort stages, before pagination.
    pub fn filtered(&self) -> Vec<&Row> {
        let term = effective_term(&self.state.search_term, &self.options);
        let mut rows = search(self.table.rows(), term);
        if let Some(sort) = &self.state.sort {
            if let Some(field) = self.table.field_of(&sort.key) {
                sort_rows(&mut rows, field, sort.direction);
            }
        }
        rows
    }

    /// The full pipeline for the current state.
    pub fn page(&self) -> Page<'_> {
        let rows = self.filtered();
        let total_matches = rows.len();

        if !self.options.pagination {
            return Page {
                rows,
                number: 1,
                total_pages: 1,
                total_matches,
            };
        }

        let total = total_pages(total_matches, self.options.page_size);
        let bounds = page_bounds(self.state.current_page, self.options.page_size, total_matches);
        Page {
            rows: rows[bounds].to_vec(),
            number: self.state.current_page,
            total_pages: total,
            total_matches,
        }
    }

    pub fn total_pages(&self) -> usize {
        self.state.total_pages(&self.table, &self.options)
    }

    /// Page-number buttons for the current page.
    pub fn page_window(&self) -> Vec<usize> {
        if !self.options.pagination {
            return Vec::new();
        }
        page_window(self.state.current_page, self.total_pages())
    }

    /// Activate the row at `index` on the current page.
    ///
    /// Invokes the row-click callback with the original record and returns
    /// it. Returns `None` when the index is past the end of the page.
    pub fn click_row(&self, index: usize) -> Option<Record> {
        let page = self.page();
        let row = page.rows.get(index)?;
        let record = self.table.record(row);
        if let Some(handler) = &self.on_row_click {
            handler(&record);
        }
        Some(record)
    }

    /// Export the whole unfiltered dataset.
    ///
    /// Returns `Ok(None)` when export is disabled or there are no rows.
    pub fn export(&self) -> Result<Option<Export>, TableError> {
        if !self.options.downloadable {
            return Ok(None);
        }
        export_table(&self.table, self.options.delimiter)
    }
}
