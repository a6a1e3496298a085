//! Application state and interaction logic.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use ratatui::layout::Rect;
use tracing::info;

use crate::data::{Record, Table, TableView, ViewEvent};
use crate::session::{Session, LAST_EXPORT_KEY, THEME_KEY};
use crate::settings::Settings;
use crate::source::DataSource;
use crate::ui::Theme;

/// How long a status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Width of the table's row highlight symbol (`"▶ "`).
pub const HIGHLIGHT_WIDTH: u16 = 2;

/// A clickable pager element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PagerTarget {
    Prev,
    Next,
    Page(usize),
}

/// Horizontal extent of a pager button, `start..end` in terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerButton {
    pub start: u16,
    pub end: u16,
    pub target: PagerTarget,
}

/// Geometry recorded during the last draw, used for mouse hit-testing.
#[derive(Debug, Clone, Default)]
pub struct ScreenLayout {
    /// The bordered table block.
    pub table: Rect,
    /// Index of the first page row visible in the table after scrolling.
    pub table_offset: usize,
    /// Row the pager is drawn on.
    pub pager_row: u16,
    pub pager_buttons: Vec<PagerButton>,
}

impl ScreenLayout {
    /// Column index under terminal column `x`, assuming equal-width columns.
    pub fn column_at(&self, x: u16, columns: usize) -> Option<usize> {
        let inner_start = self.table.x + 1 + HIGHLIGHT_WIDTH;
        let inner_width = self.table.width.saturating_sub(2 + HIGHLIGHT_WIDTH);
        if columns == 0 || inner_width == 0 || x < inner_start || x >= inner_start + inner_width {
            return None;
        }
        let offset = (x - inner_start) as usize;
        Some((offset * columns / inner_width as usize).min(columns - 1))
    }

    /// True if terminal row `y` is the table's header row.
    pub fn is_header_row(&self, y: u16) -> bool {
        self.table.height > 2 && y == self.table.y + 1
    }

    /// Page-relative row index under terminal row `y`, accounting for the
    /// rows scrolled out of view.
    pub fn row_at(&self, y: u16) -> Option<usize> {
        let first = self.table.y + 2;
        let last = (self.table.y + self.table.height).saturating_sub(1);
        if y >= first && y < last {
            Some(self.table_offset + (y - first) as usize)
        } else {
            None
        }
    }

    pub fn pager_target_at(&self, x: u16, y: u16) -> Option<PagerTarget> {
        if y != self.pager_row {
            return None;
        }
        self.pager_buttons
            .iter()
            .find(|b| x >= b.start && x < b.end)
            .map(|b| b.target)
    }
}

/// Main application state.
pub struct App {
    pub running: bool,
    pub show_help: bool,
    pub show_detail_overlay: bool,

    // Data source
    source: Box<dyn DataSource>,
    pub view: TableView,
    pub load_error: Option<String>,
    pub last_loaded: Option<Instant>,

    // Configuration and session state
    pub settings: Settings,
    session: Box<dyn Session>,

    // Navigation state (index into the current page)
    pub selected_row: usize,

    // Search input mode
    pub search_active: bool,

    // Last activated row, shown in the detail overlay
    pub activated: Option<Record>,

    // UI
    pub theme: Theme,
    pub layout: ScreenLayout,

    // Status message (temporary feedback)
    pub status_message: Option<(String, Instant)>,
}

impl App {
    /// Create a new App reading from `source`.
    ///
    /// Initialises the session from the settings before anything reads it.
    pub fn new(
        source: Box<dyn DataSource>,
        settings: Settings,
        mut session: Box<dyn Session>,
    ) -> Self {
        session.init(&settings);
        let theme = Theme::from_mode(settings.theme);
        session.set(THEME_KEY, theme.mode.name().to_string());

        let view = TableView::new(Table::empty(settings.title.clone()), settings.view_options())
            .on_row_click(|record| {
                info!(fields = record.len(), "row activated");
            });

        Self {
            running: true,
            show_help: false,
            show_detail_overlay: false,
            source,
            view,
            load_error: None,
            last_loaded: None,
            settings,
            session,
            selected_row: 0,
            search_active: false,
            activated: None,
            theme,
            layout: ScreenLayout::default(),
            status_message: None,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    pub fn session(&self) -> &dyn Session {
        self.session.as_ref()
    }

    /// Set a temporary status message that will be shown for a few seconds.
    pub fn set_status_message(&mut self, message: String) {
        self.status_message = Some((message, Instant::now()));
    }

    /// Get the current status message if it hasn't expired.
    pub fn get_status_message(&self) -> Option<&str> {
        if let Some((msg, time)) = &self.status_message {
            if time.elapsed() < STATUS_TTL {
                return Some(msg);
            }
        }
        None
    }

    /// Poll the data source for a new dataset.
    ///
    /// Returns Ok(true) if new data was loaded, Ok(false) if there was
    /// nothing new, or Err if the document did not form a valid table.
    pub fn reload_data(&mut self) -> Result<bool> {
        let Some(document) = self.source.poll() else {
            if let Some(err) = self.source.error() {
                self.load_error = Some(err.to_string());
            }
            return Ok(false);
        };

        let table = match document.into_table(&self.settings.title) {
            Ok(table) => table,
            Err(e) => {
                self.load_error = Some(e.to_string());
                return Err(e).context("invalid dataset document");
            }
        };

        info!(
            source = self.source.description(),
            rows = table.len(),
            columns = table.columns().len(),
            "dataset loaded"
        );
        self.view.replace_table(table);
        self.load_error = None;
        self.last_loaded = Some(Instant::now());
        self.clamp_selection();
        Ok(true)
    }

    /// Number of rows on the current page.
    pub fn page_row_count(&self) -> usize {
        self.view.page().rows.len()
    }

    fn clamp_selection(&mut self) {
        let count = self.page_row_count();
        if self.selected_row >= count {
            self.selected_row = count.saturating_sub(1);
        }
    }

    fn dispatch(&mut self, event: ViewEvent) {
        let before = self.view.state().current_page;
        self.view.dispatch(event);
        if self.view.state().current_page != before {
            self.selected_row = 0;
        }
        self.clamp_selection();
    }

    /// Move selection down by one row on the current page.
    pub fn select_next(&mut self) {
        let max = self.page_row_count().saturating_sub(1);
        self.selected_row = (self.selected_row + 1).min(max);
    }

    /// Move selection up by one row.
    pub fn select_prev(&mut self) {
        self.selected_row = self.selected_row.saturating_sub(1);
    }

    pub fn select_first(&mut self) {
        self.selected_row = 0;
    }

    pub fn select_last(&mut self) {
        self.selected_row = self.page_row_count().saturating_sub(1);
    }

    pub fn next_page(&mut self) {
        self.dispatch(ViewEvent::NextPage);
    }

    pub fn prev_page(&mut self) {
        self.dispatch(ViewEvent::PrevPage);
    }

    pub fn first_page(&mut self) {
        self.dispatch(ViewEvent::GoToPage(1));
    }

    pub fn last_page(&mut self) {
        let last = self.view.total_pages();
        self.dispatch(ViewEvent::GoToPage(last));
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.dispatch(ViewEvent::GoToPage(page));
    }

    /// Toggle sort on the column at `index` (0-based display order).
    pub fn sort_by_column(&mut self, index: usize) {
        let Some(column) = self.view.table().columns().get(index) else {
            return;
        };
        if !column.sortable {
            let message = format!("{} is not sortable", column.header);
            self.set_status_message(message);
            return;
        }
        let key = column.key.clone();
        self.dispatch(ViewEvent::ToggleSort(key));
    }

    /// Enter search input mode (starts capturing keystrokes).
    pub fn start_search(&mut self) {
        if self.view.options().searchable {
            self.search_active = true;
        }
    }

    /// Exit search input mode without clearing the term.
    pub fn cancel_search(&mut self) {
        self.search_active = false;
    }

    /// Clear the search term and exit search mode.
    pub fn clear_search(&mut self) {
        self.dispatch(ViewEvent::ClearSearch);
        self.search_active = false;
    }

    /// Append a character to the search term.
    pub fn search_push(&mut self, c: char) {
        let mut term = self.view.state().search_term.clone();
        term.push(c);
        self.dispatch(ViewEvent::SetSearch(term));
    }

    /// Remove the last character from the search term.
    pub fn search_pop(&mut self) {
        let mut term = self.view.state().search_term.clone();
        term.pop();
        self.dispatch(ViewEvent::SetSearch(term));
    }

    /// Activate the selected row: notify the row-click callback and open
    /// the detail overlay.
    pub fn activate_selected(&mut self) {
        self.activate_row(self.selected_row);
    }

    /// Select and activate the row at `index` on the current page.
    pub fn activate_row(&mut self, index: usize) {
        if let Some(record) = self.view.click_row(index) {
            self.selected_row = index;
            self.activated = Some(record);
            self.show_detail_overlay = true;
        }
    }

    /// Close the detail overlay if open.
    pub fn close_overlay(&mut self) {
        self.show_detail_overlay = false;
    }

    /// Navigate back: close the overlay first, then drop the search term.
    pub fn go_back(&mut self) {
        if self.show_detail_overlay {
            self.show_detail_overlay = false;
        } else if !self.view.state().search_term.is_empty() {
            self.clear_search();
        }
    }

    /// Toggle the help overlay.
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    /// Switch between the dark and light palette.
    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
        self.session.set(THEME_KEY, self.theme.mode.name().to_string());
        self.set_status_message(format!("Theme: {}", self.theme.mode.name()));
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Export the full dataset into the configured export directory.
    ///
    /// Returns the written path, or `None` when there was nothing to export.
    pub fn export(&mut self) -> Result<Option<PathBuf>> {
        let Some(export) = self.view.export()? else {
            return Ok(None);
        };
        let path = export.write_to(&self.settings.export_dir)?;
        self.session.set(LAST_EXPORT_KEY, path.display().to_string());
        Ok(Some(path))
    }

    /// Export and report the outcome in the status bar.
    pub fn export_and_report(&mut self) {
        if !self.view.options().downloadable {
            self.set_status_message("Export is disabled".to_string());
            return;
        }
        match self.export() {
            Ok(Some(path)) => {
                let rows = self.view.table().len();
                self.set_status_message(format!("Exported {} rows to {}", rows, path.display()));
            }
            Ok(None) => self.set_status_message("Nothing to export".to_string()),
            Err(e) => self.set_status_message(format!("Export failed: {}", e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{SortDirection, Value};
    use crate::session::MemorySession;
    use crate::settings::ThemeMode;
    use crate::source::{ChannelSource, DatasetDocument};

    fn settings(export_dir: PathBuf) -> Settings {
        Settings {
            title: "Discrepancies".to_string(),
            theme: ThemeMode::Dark,
            export_dir,
            ..Settings::default()
        }
    }

    fn document(rows: usize) -> DatasetDocument {
        let rows: Vec<serde_json::Value> = (1..=rows)
            .map(|i| serde_json::json!({ "id": i, "msisdn": format!("555-{:04}", i) }))
            .collect();
        DatasetDocument::from_json(&serde_json::Value::Array(rows).to_string()).unwrap()
    }

    fn app_with(rows: usize, export_dir: PathBuf) -> App {
        let (tx, source) = ChannelSource::create("test");
        tx.send(document(rows)).unwrap();
        let mut app = App::new(
            Box::new(source),
            settings(export_dir),
            Box::new(MemorySession::new()),
        );
        assert!(app.reload_data().unwrap());
        app
    }

    #[test]
    fn test_reload_loads_table() {
        let app = app_with(12, PathBuf::from("."));
        assert_eq!(app.view.table().len(), 12);
        assert_eq!(app.view.table().title(), "Discrepancies");
        assert_eq!(app.page_row_count(), 5);
        assert!(app.load_error.is_none());
        assert_eq!(app.session().get(THEME_KEY), Some("dark"));
    }

    #[test]
    fn test_selection_stays_on_page() {
        let mut app = app_with(7, PathBuf::from("."));
        app.select_last();
        assert_eq!(app.selected_row, 4);
        app.select_next();
        assert_eq!(app.selected_row, 4);

        app.next_page();
        assert_eq!(app.selected_row, 0);
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_row, 1);
    }

    #[test]
    fn test_search_typing_filters_live() {
        let mut app = app_with(12, PathBuf::from("."));
        app.last_page();
        app.start_search();
        for c in "555-0011".chars() {
            app.search_push(c);
        }

        assert_eq!(app.view.state().current_page, 1);
        assert_eq!(app.page_row_count(), 1);
        app.search_pop();
        assert_eq!(app.view.state().search_term, "555-001");

        app.go_back();
        assert!(app.view.state().search_term.is_empty());
        assert!(!app.search_active);
    }

    #[test]
    fn test_sort_by_column_toggles() {
        let mut app = app_with(3, PathBuf::from("."));
        let id = app.view.table().columns().iter().position(|c| c.key == "id").unwrap();

        app.sort_by_column(id);
        app.sort_by_column(id);
        let sort = app.view.state().sort.clone().unwrap();
        assert_eq!(sort.key, "id");
        assert_eq!(sort.direction, SortDirection::Desc);

        app.sort_by_column(99);
        assert_eq!(app.view.state().sort.as_ref().unwrap().key, "id");
    }

    #[test]
    fn test_activate_row_opens_detail() {
        let mut app = app_with(6, PathBuf::from("."));
        app.next_page();
        app.activate_row(0);

        assert!(app.show_detail_overlay);
        assert_eq!(app.activated.as_ref().unwrap().get("id"), Some(&Value::Int(6)));

        app.go_back();
        assert!(!app.show_detail_overlay);

        app.activate_row(3);
        assert!(!app.show_detail_overlay);
    }

    #[test]
    fn test_export_writes_full_dataset() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(8, dir.path().to_path_buf());
        app.search_push('7');

        let path = app.export().unwrap().unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();

        assert_eq!(path, dir.path().join("discrepancies.csv"));
        assert_eq!(contents.lines().count(), 9);
        assert_eq!(
            app.session().get(LAST_EXPORT_KEY),
            Some(path.display().to_string().as_str())
        );
    }

    #[test]
    fn test_export_empty_dataset_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app_with(0, dir.path().to_path_buf());

        assert!(app.export().unwrap().is_none());
        app.export_and_report();
        assert_eq!(app.get_status_message(), Some("Nothing to export"));
    }

    #[test]
    fn test_toggle_theme_records_in_session() {
        let mut app = app_with(1, PathBuf::from("."));
        app.toggle_theme();
        assert_eq!(app.theme.mode, ThemeMode::Light);
        assert_eq!(app.session().get(THEME_KEY), Some("light"));
    }

    #[test]
    fn test_layout_hit_testing() {
        let layout = ScreenLayout {
            table: Rect::new(0, 2, 43, 10),
            table_offset: 0,
            pager_row: 12,
            pager_buttons: vec![PagerButton {
                start: 10,
                end: 13,
                target: PagerTarget::Page(2),
            }],
        };

        assert!(layout.is_header_row(3));
        assert_eq!(layout.row_at(4), Some(0));
        assert_eq!(layout.row_at(11), None);
        assert_eq!(layout.column_at(3, 4), Some(0));
        assert_eq!(layout.column_at(41, 4), Some(3));
        assert_eq!(layout.column_at(1, 4), None);
        assert_eq!(layout.pager_target_at(11, 12), Some(PagerTarget::Page(2)));
        assert_eq!(layout.pager_target_at(11, 13), None);
    }

    #[test]
    fn test_row_click_follows_scroll_offset() {
        let mut app = app_with(30, PathBuf::from("."));
        app.settings.page_size = 30;
        app.view = TableView::new(app.view.table().clone(), app.settings.view_options());
        app.layout = ScreenLayout {
            table: Rect::new(0, 2, 43, 10),
            table_offset: 12,
            ..ScreenLayout::default()
        };

        // First visible data row is page row 12
        let index = app.layout.row_at(4).unwrap();
        assert_eq!(index, 12);
        app.activate_row(index);
        assert_eq!(app.activated.as_ref().unwrap().get("id"), Some(&Value::Int(13)));
    }
}
