use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    symbols::Marker,
    text::Span,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType, Paragraph, Widget},
};

use cubetime::stats::{chart_bounds, ChartPoint};

/// Format a simple numeric label consistently
pub fn format_label(val: f64) -> String {
    if (val - val.round()).abs() < f64::EPSILON {
        format!("{}", val.round())
    } else {
        format!("{val:.2}")
    }
}

/// Line chart of solve times (seconds) against solve number
pub fn render_progress_chart(points: &[ChartPoint], area: Rect, buf: &mut Buffer) {
    let block = Block::default().borders(Borders::ALL).title("Progress");

    if points.is_empty() {
        Paragraph::new("Save a solve to start the chart")
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center)
            .block(block)
            .render(area, buf);
        return;
    }

    let bold_style = Style::default().add_modifier(Modifier::BOLD);
    let tuples: Vec<(f64, f64)> = points.iter().copied().map(Into::into).collect();
    let ([x_lo, x_hi], [y_lo, y_hi]) = chart_bounds(points);

    let datasets = vec![Dataset::default()
        .marker(Marker::Braille)
        .style(Style::default().fg(Color::Blue))
        .graph_type(GraphType::Line)
        .data(&tuples)];

    Chart::new(datasets)
        .block(block)
        .x_axis(
            Axis::default()
                .title("solve")
                .bounds([x_lo, x_hi])
                .labels(vec![
                    Span::styled(format_label(x_lo), bold_style),
                    Span::styled(format_label(x_hi), bold_style),
                ]),
        )
        .y_axis(
            Axis::default()
                .title("seconds")
                .bounds([y_lo, y_hi])
                .labels(vec![
                    Span::styled(format_label(y_lo), bold_style),
                    Span::styled(format_label(y_hi), bold_style),
                ]),
        )
        .render(area, buf);
}
