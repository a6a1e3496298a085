//! Table view rendering.
//!
//! Draws the current page produced by the view pipeline, with a sort arrow
//! on the sorted header and a placeholder row when nothing matches.

use ratatui::{
    layout::{Constraint, Rect},
    style::{Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::app::App;
use crate::data::EMPTY_PLACEHOLDER;

/// Render the current page of the table view.
pub fn render(frame: &mut Frame, app: &mut App, area: Rect) {
    app.layout.table = area;

    let view = &app.view;
    let table = view.table();
    let state = view.state();
    let page = view.page();
    let column_count = table.columns().len().max(1);

    let header = Row::new(
        table
            .columns()
            .iter()
            .enumerate()
            .map(|(i, column)| {
                let sorted = state.sort.as_ref().filter(|s| s.key == column.key);
                let label = match sorted {
                    Some(sort) => format!("{}{}", column.header, sort.direction.arrow()),
                    None => column.header.clone(),
                };
                let label = if i < 9 {
                    format!("{} {}", i + 1, label)
                } else {
                    label
                };
                let style = if sorted.is_some() {
                    Style::default().fg(app.theme.sorted).add_modifier(Modifier::BOLD)
                } else if !column.sortable {
                    Style::default().add_modifier(Modifier::DIM)
                } else {
                    Style::default()
                };
                Cell::from(Span::styled(label, style))
            })
            .collect::<Vec<_>>(),
    )
    .height(1)
    .style(app.theme.header);

    let rows: Vec<Row> = if page.is_empty() {
        // A single placeholder row in place of data rows
        let mut cells = vec![Cell::from(Span::styled(EMPTY_PLACEHOLDER, app.theme.muted))];
        cells.extend((1..column_count).map(|_| Cell::from("")));
        vec![Row::new(cells)]
    } else {
        page.rows
            .iter()
            .map(|row| Row::new(table.display_row(row).into_iter().map(Cell::from)))
            .collect()
    };

    let widths = vec![Constraint::Fill(1); column_count];

    // Build title with search info
    let search_info = if app.search_active {
        format!(" /{}_", state.search_term)
    } else if !state.search_term.is_empty() {
        format!(" /{}/ [c:clear]", state.search_term)
    } else {
        String::new()
    };

    let sort_info = match &state.sort {
        Some(sort) => format!(" [sort {}{}]", sort.key, sort.direction.arrow()),
        None => String::new(),
    };

    let title = format!(
        " {} ({}/{}){}{} ",
        table.title(),
        page.total_matches,
        table.len(),
        sort_info,
        search_info
    );

    let widget = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_type(app.theme.border_type)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .row_highlight_style(app.theme.selected)
        .highlight_symbol("▶ ");

    let mut table_state = TableState::default();
    if !page.is_empty() {
        table_state.select(Some(app.selected_row.min(page.rows.len() - 1)));
    }

    frame.render_stateful_widget(widget, area, &mut table_state);
    app.layout.table_offset = table_state.offset();
}
