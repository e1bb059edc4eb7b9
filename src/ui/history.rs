use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

use cubetime::display::HistoryRow;

const PB_MARKER: &str = " *";

/// Pure presenter for a single history row
pub fn present_row(row: &HistoryRow) -> Row<'static> {
    let time_cell = if row.is_pb {
        Cell::from(format!("{}{}", row.time, PB_MARKER)).style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Cell::from(row.time.clone())
    };

    Row::new(vec![
        Cell::from(row.number.to_string()).style(Style::default().fg(Color::Gray)),
        time_cell,
        Cell::from(row.date.clone()).style(Style::default().fg(Color::DarkGray)),
    ])
}

/// History table with the selected row highlighted
pub fn render_history(rows: &[HistoryRow], selected: usize, area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL).title("History");

    if rows.is_empty() {
        Paragraph::new("No solves yet")
            .style(Style::default().fg(Color::Gray))
            .block(block)
            .render(area, buf);
        return;
    }

    let header = Row::new(vec!["#", "Time", "Date"]).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(
        rows.iter().map(present_row),
        [
            Constraint::Length(5),
            Constraint::Length(14),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(block)
    .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default().with_selected(Some(selected.min(rows.len() - 1)));
    StatefulWidget::render(table, area, buf, &mut state);
}
