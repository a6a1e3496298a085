//! Common UI components.
//!
//! This module contains the header bar, pager, status bar, and help overlay.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, PagerButton, PagerTarget};

/// Render the header bar with dataset overview.
///
/// Displays: title, row count, column count, data source.
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let table = app.view.table();

    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", table.title().to_uppercase()),
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            format!("{}", table.len()),
            Style::default().fg(app.theme.highlight),
        ),
        Span::raw(" rows │ "),
        Span::styled(
            format!("{}", table.columns().len()),
            Style::default().fg(app.theme.highlight),
        ),
        Span::raw(" columns │ "),
        Span::styled(
            app.source_description().to_string(),
            Style::default().add_modifier(Modifier::DIM),
        ),
    ]);

    frame.render_widget(Paragraph::new(line), area);
}

/// Render the pager: prev/next controls and the page-number window.
///
/// Records each button's extent in `app.layout` for mouse clicks.
pub fn render_pager(frame: &mut Frame, app: &mut App, area: Rect) {
    app.layout.pager_row = area.y;
    app.layout.pager_buttons.clear();

    if !app.view.options().pagination {
        return;
    }

    let (number, total) = {
        let page = app.view.page();
        (page.number, page.total_pages)
    };

    let mut spans: Vec<Span> = Vec::new();
    let mut buttons: Vec<PagerButton> = Vec::new();
    let mut x = area.x + 1;
    spans.push(Span::raw(" "));

    let mut push_button = |label: String, style: Style, target: Option<PagerTarget>| {
        let width = label.chars().count() as u16;
        if let Some(target) = target {
            buttons.push(PagerButton {
                start: x,
                end: x + width,
                target,
            });
        }
        spans.push(Span::styled(label, style));
        spans.push(Span::raw(" "));
        x += width + 1;
    };

    let disabled = Style::default().add_modifier(Modifier::DIM);
    if number > 1 {
        push_button("‹ Prev".to_string(), app.theme.page_inactive, Some(PagerTarget::Prev));
    } else {
        push_button("‹ Prev".to_string(), disabled, None);
    }

    for n in app.view.page_window() {
        let style = if n == number {
            app.theme.page_active
        } else {
            app.theme.page_inactive
        };
        push_button(format!(" {} ", n), style, Some(PagerTarget::Page(n)));
    }

    if number < total {
        push_button("Next ›".to_string(), app.theme.page_inactive, Some(PagerTarget::Next));
    } else {
        push_button("Next ›".to_string(), disabled, None);
    }

    spans.push(Span::styled(
        format!(" Page {} of {}", number, total.max(1)),
        Style::default().add_modifier(Modifier::DIM),
    ));

    app.layout.pager_buttons = buttons;
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Render the status bar at the bottom.
///
/// Shows temporary status messages, load errors, or the available controls.
pub fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    if let Some(msg) = app.get_status_message() {
        let paragraph =
            Paragraph::new(format!(" {} ", msg)).style(Style::default().fg(app.theme.highlight));
        frame.render_widget(paragraph, area);
        return;
    }

    if let Some(ref err) = app.load_error {
        let paragraph = Paragraph::new(format!(" Error: {} | r:retry q:quit", err))
            .style(Style::default().fg(app.theme.error));
        frame.render_widget(paragraph, area);
        return;
    }

    let controls = if app.search_active {
        "Type to search | Enter:apply Esc:leave Ctrl-C:clear"
    } else {
        "/:search 1-9:sort ←→:page Enter:open e:export ?:help q:quit"
    };

    let status = match app.last_loaded {
        Some(at) => format!(
            " Loaded {:.0}s ago | {}",
            at.elapsed().as_secs_f64(),
            controls
        ),
        None => format!(" Loading... | {}", controls),
    };

    let paragraph = Paragraph::new(status).style(Style::default().add_modifier(Modifier::DIM));
    frame.render_widget(paragraph, area);
}

/// Render the help overlay with keyboard shortcuts.
///
/// Displayed as a centered modal on top of the current view.
pub fn render_help(frame: &mut Frame, app: &App, area: Rect) {
    let section = |title: &'static str| {
        Line::from(vec![Span::styled(
            title,
            Style::default().add_modifier(Modifier::BOLD),
        )])
    };

    let help_text = vec![
        Line::from(vec![Span::styled("Keyboard Shortcuts", app.theme.header)]),
        Line::from(""),
        section(" Rows"),
        Line::from("  ↑/↓ j/k     Select row"),
        Line::from("  Home/End    First/last row"),
        Line::from("  Enter       Open row detail"),
        Line::from("  Esc         Close / clear search"),
        Line::from(""),
        section(" Pages"),
        Line::from("  ←/→ h/l     Previous/next page"),
        Line::from("  g/G         First/last page"),
        Line::from(""),
        section(" Table"),
        Line::from("  /         Search all fields"),
        Line::from("  c         Clear search"),
        Line::from("  1-9       Sort by column (again: reverse)"),
        Line::from("  e         Export CSV"),
        Line::from(""),
        section(" General"),
        Line::from("  r         Reload data"),
        Line::from("  t         Toggle theme"),
        Line::from("  q         Quit"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default().add_modifier(Modifier::DIM),
        )]),
    ];

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_type(app.theme.border_type)
        .border_style(Style::default().fg(app.theme.highlight));

    let paragraph = Paragraph::new(help_text).block(block);

    // Center the help overlay - responsive to terminal size
    let help_width = 46u16.min(area.width.saturating_sub(4));
    let help_height = 26u16.min(area.height.saturating_sub(2));
    let x = area.x + (area.width.saturating_sub(help_width)) / 2;
    let y = area.y + (area.height.saturating_sub(help_height)) / 2;
    let help_area = Rect::new(x, y, help_width, help_height);

    frame.render_widget(Clear, help_area);
    frame.render_widget(paragraph, help_area);
}
