pub mod charting;
pub mod history;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget, Wrap},
};

use cubetime::TimerState;

use crate::App;

const HORIZONTAL_MARGIN: u16 = 2;
const VERTICAL_MARGIN: u16 = 1;

fn timer_style(state: TimerState) -> Style {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    match state {
        TimerState::Idle => bold,
        TimerState::Ready => bold.fg(Color::Yellow),
        TimerState::Running => bold.fg(Color::Green),
        TimerState::Stopped => bold.fg(Color::Cyan),
    }
}

fn legend(app: &App) -> &'static str {
    if app.bindings.hold_mode {
        "(hold space) start / (enter) start-stop / (s)ave / (r)eset / (n)ew scramble / (d)elete / (c)lear / (q)uit"
    } else {
        "(space) start-stop / (s)ave / (r)eset / (n)ew scramble / (d)elete / (c)lear / (q)uit"
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let model = self.controller.sink();
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(3), // scramble
                Constraint::Length(3), // live time
                Constraint::Length(1), // stats
                Constraint::Min(6),    // chart + history
                Constraint::Length(2), // tip
                Constraint::Length(1), // status / legend
            ])
            .split(area);

        Paragraph::new(model.scramble.as_str())
            .block(Block::default().borders(Borders::ALL).title("Scramble"))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[0], buf);

        Paragraph::new(Span::styled(
            model.time.as_str(),
            timer_style(model.timer_state),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(model.timer_state.to_string()),
        )
        .alignment(Alignment::Center)
        .render(chunks[1], buf);

        Paragraph::new(Line::from(vec![
            Span::raw("PB "),
            Span::styled(
                model.stats.personal_best.as_str(),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw("   Ao5 "),
            Span::styled(
                model.stats.average_of_5.as_str(),
                Style::default().fg(Color::Magenta),
            ),
            Span::raw("   Solves "),
            Span::styled(
                model.stats.count.as_str(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[3]);

        charting::render_progress_chart(&model.chart, body[0], buf);
        history::render_history(&model.history, self.selected, body[1], buf);

        if let Some(tip) = &model.tip {
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{}: ", tip.title),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
                Span::styled(tip.text, italic_style),
            ]))
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);
        }

        let status = match &model.warning {
            Some(warning) => Span::styled(
                warning.as_str(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            None => Span::styled(legend(self), italic_style),
        };
        Paragraph::new(status).render(chunks[5], buf);

        if let Some(pending) = &self.pending {
            render_confirm(&pending.prompt, area, buf);
        }
    }
}

/// Centered y/n prompt drawn over the main screen
fn render_confirm(prompt: &str, area: Rect, buf: &mut Buffer) {
    let text_width = u16::try_from(prompt.chars().count()).unwrap_or(u16::MAX);
    let width = text_width.saturating_add(6).max(20).min(area.width);
    let height = 4.min(area.height);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    Clear.render(popup, buf);
    Paragraph::new(vec![
        Line::from(prompt),
        Line::from(Span::styled(
            "(y)es / (n)o",
            Style::default().add_modifier(Modifier::ITALIC),
        )),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Confirm")
            .style(Style::default().fg(Color::Red)),
    )
    .alignment(Alignment::Center)
    .render(popup, buf);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{App, Pending, PendingKind};
    use cubetime::config::Config;
    use cubetime::storage::MemoryKvStore;

    fn test_app() -> App {
        App::with_store(Box::new(MemoryKvStore::new()), &Config::default(), false)
    }

    fn rendered(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer.content().iter().map(|c| c.symbol()).collect()
    }

    #[test]
    fn test_ui_renders_idle_screen() {
        let app = test_app();
        let text = rendered(&app, Rect::new(0, 0, 100, 30));

        assert!(text.contains("00:00.000"));
        assert!(text.contains("Scramble"));
        assert!(text.contains("--:--.---"));
        assert!(text.contains("No solves yet"));
    }

    #[test]
    fn test_ui_renders_saved_solve() {
        let mut app = test_app();
        app.controller.primary_action();
        std::thread::sleep(std::time::Duration::from_millis(5));
        app.controller.primary_action();
        app.controller.save().unwrap();

        let text = rendered(&app, Rect::new(0, 0, 100, 30));
        assert!(text.contains("Solves 1"));
        assert!(text.contains(" *"));
    }

    #[test]
    fn test_ui_renders_warning_instead_of_legend() {
        let mut app = test_app();
        app.controller
            .sink_mut()
            .warning = Some("history not saved: disk full".to_string());

        let text = rendered(&app, Rect::new(0, 0, 100, 30));
        assert!(text.contains("history not saved"));
    }

    #[test]
    fn test_ui_renders_confirm_prompt() {
        let mut app = test_app();
        app.pending = Some(Pending {
            kind: PendingKind::Clear,
            prompt: "Delete all 3 solves?".to_string(),
        });

        let text = rendered(&app, Rect::new(0, 0, 100, 30));
        assert!(text.contains("Delete all 3 solves?"));
        assert!(text.contains("(y)es / (n)o"));
    }

    #[test]
    fn test_ui_small_area() {
        let app = test_app();
        let area = Rect::new(0, 0, 10, 5);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert_eq!(*buffer.area(), area);
    }

    #[test]
    fn test_confirm_prompt_in_narrow_terminal() {
        let mut app = test_app();
        app.pending = Some(Pending {
            kind: PendingKind::Clear,
            prompt: "Delete all 3 solves?".to_string(),
        });

        for area in [
            Rect::new(0, 0, 15, 10),
            Rect::new(0, 0, 1, 1),
            Rect::new(0, 0, 0, 0),
        ] {
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert_eq!(*buffer.area(), area);
        }
    }

    #[test]
    fn test_timer_style_by_state() {
        assert_eq!(timer_style(TimerState::Running).fg, Some(Color::Green));
        assert_eq!(timer_style(TimerState::Ready).fg, Some(Color::Yellow));
        assert_eq!(timer_style(TimerState::Stopped).fg, Some(Color::Cyan));
        assert_eq!(timer_style(TimerState::Idle).fg, None);
    }
}
