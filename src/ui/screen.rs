use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use super::{drawing_layout, SketchView};
use crate::session::{Mode, SessionState};
use crate::surface::Tool;
use crate::App;

/// Seconds left at which the countdown turns red
const HURRY_SECS: u32 = 5;

/// A UI Screen boundary, one per session state
pub trait Screen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer);
}

pub struct TitleScreen;

impl Screen for TitleScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);
        let config = app.session.config();

        let mut lines = vec![
            Line::from(Span::styled("ポンチ絵道場", bold.fg(Color::Magenta))),
            Line::from(Span::styled("ponchie dojo", dim)),
            Line::from(""),
            Line::from(vec![
                Span::styled("[t] ", bold),
                Span::raw(format!("修行モード ({}秒)", config.training_secs)),
            ]),
            Line::from(vec![
                Span::styled("[f] ", bold),
                Span::raw(format!("自由モード ({}秒)", config.free_secs)),
            ]),
            Line::from(vec![Span::styled("[q] ", bold), Span::raw("終了")]),
        ];

        if app.session.rounds_completed() > 0 {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("修行回数: {}", app.session.rounds_completed()),
                dim,
            )));
        }
        if let Some(latest) = app.session.history().latest() {
            lines.push(Line::from(Span::styled(
                format!("前回のお題: {latest}"),
                dim,
            )));
        }

        render_centered(lines, area, buf);
    }
}

pub struct GeneratingScreen;

impl Screen for GeneratingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let heading = match app.session.mode() {
            Mode::Training => "お題を生成中...",
            Mode::Free => "準備中...",
        };
        let lines = vec![
            Line::from(Span::styled(
                heading,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD | Modifier::ITALIC),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "[esc] やめる",
                Style::default().add_modifier(Modifier::DIM),
            )),
        ];
        render_centered(lines, area, buf);
    }
}

pub struct DrawingScreen;

impl Screen for DrawingScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let layout = drawing_layout(area);
        let session = &app.session;

        if let Some(theme) = session.current_theme() {
            let prompt = Line::from(vec![
                Span::styled(
                    format!("{} ", theme.sub_text),
                    Style::default().add_modifier(Modifier::DIM),
                ),
                Span::styled(
                    theme.main_text.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]);
            Paragraph::new(prompt).render(
                Rect {
                    height: 1,
                    ..layout.header
                },
                buf,
            );
        }

        let remaining = session.time_remaining();
        let clock_style = if remaining <= HURRY_SECS {
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Green)
        };
        let tool = match session.tool() {
            Tool::Pen => "ペン",
            Tool::Eraser => "消しゴム",
        };
        let clock = format!("残り {remaining}秒");
        let tool_label = format!("道具: {tool}");
        // right-align the tool next to the clock
        let gap = (layout.header.width as usize)
            .saturating_sub(clock.width() + tool_label.width());
        let status = Line::from(vec![
            Span::styled(clock, clock_style),
            Span::raw(" ".repeat(gap)),
            Span::raw(tool_label),
        ]);
        if layout.header.height > 1 {
            Paragraph::new(status).render(
                Rect {
                    y: layout.header.y + 1,
                    height: 1,
                    ..layout.header
                },
                buf,
            );
        }

        SketchView::new(session.surface().raster()).render(layout.canvas, buf);

        let footer = if app.confirm_abort {
            Span::styled(
                "このラウンドを中断しますか? [y] はい / 他のキー: 続ける",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(
                "[p] ペン  [e] 消しゴム  [c] 全消し  [esc] 中断",
                Style::default().add_modifier(Modifier::DIM),
            )
        };
        Paragraph::new(Line::from(footer)).render(layout.footer, buf);
    }
}

pub struct ResultScreen;

impl Screen for ResultScreen {
    fn render(&self, app: &App, area: Rect, buf: &mut Buffer) {
        let Some(review) = app.session.review() else {
            return;
        };
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().add_modifier(Modifier::DIM);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(area);
        let panes = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(rows[0]);

        let mut text = vec![
            Line::from(Span::styled("お題", dim)),
            Line::from(review.theme.sub_text.as_str()),
            Line::from(Span::styled(
                review.theme.main_text.as_str(),
                bold.fg(Color::Magenta),
            )),
        ];
        if !review.theme.image_prompt.is_empty() {
            text.push(Line::from(""));
            text.push(Line::from(Span::styled(
                review.theme.image_prompt.as_str(),
                Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
            )));
        }
        Paragraph::new(text)
            .block(Block::default().borders(Borders::ALL).title("結果"))
            .wrap(Wrap { trim: true })
            .render(panes[0], buf);

        let frame = Block::default().borders(Borders::ALL).title("あなたの絵");
        let inner = frame.inner(panes[1]);
        frame.render(panes[1], buf);
        SketchView::new(&review.image).render(inner, buf);

        let footer = match &app.status {
            Some(status) => Line::from(Span::styled(
                status.as_str(),
                Style::default().fg(Color::Green),
            )),
            None => Line::from(Span::styled("[r] もう一度  [h] タイトル  [s] 保存", dim)),
        };
        Paragraph::new(footer).render(rows[1], buf);
    }
}

fn render_centered(lines: Vec<Line>, area: Rect, buf: &mut Buffer) {
    let height = lines.len() as u16;
    let top = area.height.saturating_sub(height) / 2;
    let rect = Rect {
        y: area.y + top,
        height: height.min(area.height),
        ..area
    };
    Paragraph::new(lines)
        .alignment(Alignment::Center)
        .render(rect, buf);
}

/// Helper to construct the appropriate screen for the current state
pub fn current_screen(state: SessionState) -> Box<dyn Screen> {
    match state {
        SessionState::Title => Box::new(TitleScreen),
        SessionState::Generating => Box::new(GeneratingScreen),
        SessionState::Drawing => Box::new(DrawingScreen),
        SessionState::Result => Box::new(ResultScreen),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::prompt::{ScriptedSource, Vocabulary};
    use crate::ui::HALF_BLOCK;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use std::time::Duration;

    fn app() -> App {
        let config = Config {
            training_secs: 6,
            ..Config::default()
        };
        App::new(
            &config,
            Vocabulary::builtin().unwrap(),
            Box::new(ScriptedSource::new([5, 1, 2], [true])),
            (80, 24),
            std::env::temp_dir(),
        )
        .unwrap()
    }

    fn render(app: &App) -> String {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn press(app: &mut App, c: char) {
        app.on_key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE));
    }

    #[test]
    fn test_title_lists_modes() {
        let rendered = render(&app());
        assert!(rendered.contains("[t]"));
        assert!(rendered.contains("[f]"));
        assert!(rendered.contains("[q]"));
    }

    #[test]
    fn test_generating_shows_escape_hint() {
        let mut app = app();
        press(&mut app, 't');
        assert!(render(&app).contains("[esc]"));
    }

    #[test]
    fn test_drawing_shows_clock_and_canvas() {
        let mut app = app();
        press(&mut app, 't');
        app.on_elapsed(Duration::from_millis(2500));
        app.on_elapsed(Duration::from_secs(1));

        let rendered = render(&app);
        assert!(rendered.contains('5'));
        assert!(rendered.contains(HALF_BLOCK));
        assert!(rendered.contains("[p]"));

        app.on_key(KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(render(&app).contains("[y]"));
    }

    #[test]
    fn test_result_shows_footer_keys() {
        let mut app = app();
        press(&mut app, 't');
        app.on_elapsed(Duration::from_millis(2500));
        app.on_elapsed(Duration::from_secs(6));
        assert_eq!(app.state(), SessionState::Result);

        let rendered = render(&app);
        assert!(rendered.contains("[r]"));
        assert!(rendered.contains("[h]"));
        assert!(rendered.contains("[s]"));
    }

    #[test]
    fn test_small_area_does_not_panic() {
        let mut app = app();
        press(&mut app, 't');
        app.on_elapsed(Duration::from_millis(2500));

        let area = Rect::new(0, 0, 10, 3);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        assert_eq!(*buffer.area(), area);
    }
}
