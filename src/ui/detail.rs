//! Detail overlay rendering.
//!
//! Displays a modal overlay with every field of the activated row record.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::App;

/// Minimum width required for the detail overlay to render properly.
const MIN_OVERLAY_WIDTH: u16 = 40;
/// Minimum height required for the detail overlay to render properly.
const MIN_OVERLAY_HEIGHT: u16 = 8;

/// Render the activated record as a modal overlay.
///
/// Fields that belong to a column are labelled with the column header and
/// shown both formatted and raw; other fields are shown raw under their key.
pub fn render_overlay(frame: &mut Frame, app: &App, area: Rect) {
    // Skip rendering if terminal is too small for the overlay
    if area.width < MIN_OVERLAY_WIDTH || area.height < MIN_OVERLAY_HEIGHT {
        return;
    }

    let Some(ref record) = app.activated else {
        return;
    };
    let table = app.view.table();

    // Width: 80% of screen, clamped to [MIN_OVERLAY_WIDTH, 90]
    let overlay_width = (area.width * 80 / 100).clamp(MIN_OVERLAY_WIDTH, 90);
    // Height: fit the fields plus borders and footer
    let wanted = record.len() as u16 + 5;
    let overlay_height = wanted.clamp(MIN_OVERLAY_HEIGHT, area.height.saturating_sub(2));

    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay_area = Rect::new(x, y, overlay_width, overlay_height);

    frame.render_widget(Clear, overlay_area);

    let chunks = Layout::vertical([
        Constraint::Min(3),    // Fields table
        Constraint::Length(1), // Footer
    ])
    .split(overlay_area);

    let header = Row::new(vec![
        Cell::from("Field"),
        Cell::from("Value"),
        Cell::from("Raw"),
    ])
    .height(1)
    .style(app.theme.header);

    // Column fields first in display order, then the rest by key
    let mut rows: Vec<Row> = Vec::with_capacity(record.len());
    for column in table.columns() {
        if let Some(value) = record.get(&column.key) {
            rows.push(Row::new(vec![
                Cell::from(Span::styled(
                    column.header.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Cell::from(column.display(value)),
                Cell::from(Span::styled(value.to_string(), app.theme.muted)),
            ]));
        }
    }
    for (key, value) in record.iter().filter(|(k, _)| table.column(k).is_none()) {
        rows.push(Row::new(vec![
            Cell::from(key.clone()),
            Cell::from(value.to_string()),
            Cell::from(""),
        ]));
    }

    let widths = [
        Constraint::Fill(1), // Field
        Constraint::Fill(2), // Value
        Constraint::Fill(1), // Raw
    ];

    let fields = Table::new(rows, widths).header(header).block(
        Block::default()
            .title(" Row Detail ")
            .borders(Borders::ALL)
            .border_type(app.theme.border_type)
            .border_style(Style::default().fg(app.theme.highlight)),
    );
    frame.render_widget(fields, chunks[0]);

    let footer = Paragraph::new(Line::from(vec![Span::styled(
        " Press Esc to close ",
        Style::default().add_modifier(Modifier::DIM),
    )]));
    frame.render_widget(footer, chunks[1]);
}
