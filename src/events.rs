//! Keyboard and mouse dispatch onto [`App`] actions.

use std::time::Duration;

use anyhow::Result;
use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use tracing::warn;

use crate::app::{App, PagerTarget};

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    // If detail overlay is shown, handle overlay-specific keys
    if app.show_detail_overlay {
        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Backspace | KeyCode::Char('q') => {
                app.close_overlay();
            }
            _ => {}
        }
        return;
    }

    // If search input is active, handle text input
    if app.search_active {
        handle_search_input(app, key);
        return;
    }

    match key.code {
        // Quit
        KeyCode::Char('q') => app.quit(),

        // Row navigation
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Home => app.select_first(),
        KeyCode::End => app.select_last(),

        // Page navigation
        KeyCode::Left | KeyCode::Char('h') | KeyCode::PageUp => app.prev_page(),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::PageDown => app.next_page(),
        KeyCode::Char('g') => app.first_page(),
        KeyCode::Char('G') => app.last_page(),

        // Header click equivalents: 1-9 toggle sort on that column
        KeyCode::Char(c @ '1'..='9') => {
            let index = c as usize - '1' as usize;
            app.sort_by_column(index);
        }

        // Row click
        KeyCode::Enter => app.activate_selected(),

        // Go back (Esc and Backspace)
        KeyCode::Esc | KeyCode::Backspace => app.go_back(),

        // Reload
        KeyCode::Char('r') => {
            if let Err(e) = app.reload_data() {
                warn!(error = %e, "reload failed");
                app.set_status_message(format!("Reload failed: {:#}", e));
            }
        }

        // Help
        KeyCode::Char('?') => app.toggle_help(),

        // Search (start typing to filter)
        KeyCode::Char('/') => app.start_search(),

        // Clear search
        KeyCode::Char('c') => {
            if !app.view.state().search_term.is_empty() {
                app.clear_search();
            }
        }

        // Export
        KeyCode::Char('e') => app.export_and_report(),

        // Theme
        KeyCode::Char('t') => app.toggle_theme(),

        _ => {}
    }
}

/// Handle key input while search is active
fn handle_search_input(app: &mut App, key: KeyEvent) {
    match key.code {
        // Confirm search
        KeyCode::Enter => {
            app.search_active = false;
        }

        // Leave input mode, keeping the term
        KeyCode::Esc => {
            app.cancel_search();
        }

        // Clear and exit
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_search();
        }

        KeyCode::Backspace => {
            app.search_pop();
            if app.view.state().search_term.is_empty() {
                app.search_active = false;
            }
        }

        KeyCode::Char(c) => {
            app.search_push(c);
        }

        _ => {}
    }
}

/// Handle mouse events using the geometry recorded at the last draw.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.select_prev(),
        MouseEventKind::ScrollDown => app.select_next(),

        MouseEventKind::Down(MouseButton::Left) => {
            if app.show_help {
                app.show_help = false;
                return;
            }
            if app.show_detail_overlay {
                app.close_overlay();
                return;
            }

            let (x, y) = (mouse.column, mouse.row);

            if app.layout.is_header_row(y) {
                let columns = app.view.table().columns().len();
                if let Some(index) = app.layout.column_at(x, columns) {
                    app.sort_by_column(index);
                }
                return;
            }

            if let Some(index) = app.layout.row_at(y) {
                app.activate_row(index);
                return;
            }

            match app.layout.pager_target_at(x, y) {
                Some(PagerTarget::Prev) => app.prev_page(),
                Some(PagerTarget::Next) => app.next_page(),
                Some(PagerTarget::Page(page)) => app.go_to_page(page),
                None => {}
            }
        }

        // Right-click goes back
        MouseEventKind::Down(MouseButton::Right) => app.go_back(),

        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemorySession;
    use crate::settings::{Settings, ThemeMode};
    use crate::source::{ChannelSource, DatasetDocument};

    fn app() -> App {
        let (tx, source) = ChannelSource::create("test");
        let rows: Vec<serde_json::Value> = (1..=12)
            .map(|i| serde_json::json!({ "case": format!("C-{}", i), "age": i }))
            .collect();
        tx.send(DatasetDocument::from_json(&serde_json::Value::Array(rows).to_string()).unwrap())
            .unwrap();
        let settings = Settings {
            theme: ThemeMode::Dark,
            ..Settings::default()
        };
        let mut app = App::new(Box::new(source), settings, Box::new(MemorySession::new()));
        app.reload_data().unwrap();
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_page_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Right);
        assert_eq!(app.view.state().current_page, 2);
        press(&mut app, KeyCode::Char('G'));
        assert_eq!(app.view.state().current_page, 3);
        press(&mut app, KeyCode::Right);
        assert_eq!(app.view.state().current_page, 3);
        press(&mut app, KeyCode::Char('g'));
        assert_eq!(app.view.state().current_page, 1);
    }

    #[test]
    fn test_digit_toggles_sort() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        assert_eq!(app.view.state().sort.as_ref().unwrap().key, "age");
    }

    #[test]
    fn test_search_mode_captures_keys() {
        let mut app = app();
        press(&mut app, KeyCode::Char('/'));
        assert!(app.search_active);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.running);
        assert_eq!(app.view.state().search_term, "q");

        press(&mut app, KeyCode::Backspace);
        assert!(!app.search_active);

        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_enter_opens_and_esc_closes_detail() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert!(app.show_detail_overlay);
        assert!(app.activated.is_some());

        press(&mut app, KeyCode::Esc);
        assert!(!app.show_detail_overlay);
    }
}
