//! Terminal front end state: key and mouse handling around the session
//! controller. Rendering lives in [`crate::ui`].

use std::path::PathBuf;
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Rect;

use crate::config::Config;
use crate::error::Result;
use crate::export;
use crate::prompt::{PromptGenerator, RandomSource, Vocabulary};
use crate::runtime::DojoEvent;
use crate::session::{Mode, SessionConfig, SessionController, SessionState, Transition};
use crate::surface::{
    DeviceClass, DrawingSurface, PointerAdapter, PointerEvent, PointerKind, StrokeCanvas, Tool,
};
use crate::ui::drawing_layout;

pub struct App {
    pub session: SessionController<StrokeCanvas>,
    /// Esc was pressed while drawing; `y` abandons the round
    pub confirm_abort: bool,
    /// One-line message for the footer
    pub status: Option<String>,
    pub should_quit: bool,
    terminal_size: (u16, u16),
    raster_scale: u32,
    export_dir: PathBuf,
}

impl App {
    pub fn new(
        config: &Config,
        vocabulary: Vocabulary,
        rng: Box<dyn RandomSource>,
        terminal_size: (u16, u16),
        export_dir: PathBuf,
    ) -> Result<Self> {
        config.validate()?;
        let generator = PromptGenerator::new(vocabulary, config.generator)?;

        let raster_scale = config.raster_scale;
        let (w, h) = viewport_for(terminal_size, raster_scale);
        let surface = StrokeCanvas::new(w, h, config.brush, config.resize_policy);
        let session = SessionController::new(
            SessionConfig::from(config),
            generator,
            rng,
            surface,
            PointerAdapter::new(config.input_filter),
        );

        Ok(Self {
            session,
            confirm_abort: false,
            status: None,
            should_quit: false,
            terminal_size,
            raster_scale,
            export_dir,
        })
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    /// Terminal cells the canvas occupies
    pub fn canvas_area(&self) -> Rect {
        let (w, h) = self.terminal_size;
        drawing_layout(Rect::new(0, 0, w, h)).canvas
    }

    /// Canvas size in display pixels, taken from the raster so a resize held
    /// back by an active stroke keeps the old mapping until the stroke ends
    pub fn display_size(&self) -> (f32, f32) {
        let (w, h) = self.session.surface().size();
        let scale = self.raster_scale as f32;
        (w as f32 / scale, h as f32 / scale)
    }

    pub fn handle(&mut self, event: DojoEvent, elapsed: Duration) {
        match event {
            DojoEvent::Key(key) => self.on_key(key),
            DojoEvent::Mouse(mouse) => self.on_mouse(mouse),
            DojoEvent::Resize(w, h) => self.on_resize(w, h),
            DojoEvent::Tick => {}
        }
        self.on_elapsed(elapsed);
    }

    pub fn on_elapsed(&mut self, elapsed: Duration) {
        let transitions = self.session.advance(elapsed);
        self.after(transitions);
    }

    pub fn on_resize(&mut self, width: u16, height: u16) {
        self.terminal_size = (width, height);
        let (w, h) = viewport_for(self.terminal_size, self.raster_scale);
        self.session.resize(w, h);
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        let transition = match self.session.state() {
            SessionState::Title => match key.code {
                KeyCode::Char('t') => self.session.start(Mode::Training),
                KeyCode::Char('f') => self.session.start(Mode::Free),
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.should_quit = true;
                    None
                }
                _ => None,
            },
            SessionState::Generating => match key.code {
                KeyCode::Esc => self.session.abort(),
                _ => None,
            },
            SessionState::Drawing if self.confirm_abort => {
                self.confirm_abort = false;
                match key.code {
                    KeyCode::Char('y') => self.session.abort(),
                    _ => None,
                }
            }
            SessionState::Drawing => {
                match key.code {
                    KeyCode::Char('p') => self.session.set_tool(Tool::Pen),
                    KeyCode::Char('e') => self.session.set_tool(Tool::Eraser),
                    KeyCode::Char('c') => self.session.clear_canvas(),
                    KeyCode::Esc => self.confirm_abort = true,
                    _ => {}
                }
                None
            }
            SessionState::Result => match key.code {
                KeyCode::Char('r') => self.session.replay(),
                KeyCode::Char('h') | KeyCode::Esc => self.session.home(),
                KeyCode::Char('s') => {
                    self.save();
                    None
                }
                _ => None,
            },
        };
        self.after(transition);
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let area = self.canvas_area();
        let inside = mouse.column >= area.x
            && mouse.column < area.x + area.width
            && mouse.row >= area.y
            && mouse.row < area.y + area.height;

        let kind = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) if inside => PointerKind::Down,
            MouseEventKind::Drag(MouseButton::Left) if inside => PointerKind::Move,
            MouseEventKind::Drag(MouseButton::Left) => PointerKind::Leave,
            MouseEventKind::Up(MouseButton::Left) => PointerKind::Up,
            _ => return,
        };

        // centre of the cell; each row holds two display pixels
        let x = mouse.column.saturating_sub(area.x) as f32 + 0.5;
        let y = mouse.row.saturating_sub(area.y) as f32 * 2.0 + 1.0;
        let event = PointerEvent::new(kind, x, y, DeviceClass::Mouse);
        self.session.pointer(event, self.display_size());
    }

    fn save(&mut self) {
        let Some(review) = self.session.review() else {
            return;
        };
        self.status = Some(
            match export::save_review(review, &self.export_dir, chrono::Local::now()) {
                Ok(path) => format!("saved {}", path.display()),
                Err(e) => {
                    tracing::error!("saving sketch failed: {e}");
                    format!("save failed: {e}")
                }
            },
        );
    }

    fn after(&mut self, transitions: impl IntoIterator<Item = Transition>) {
        for transition in transitions {
            if transition.from != transition.to {
                self.confirm_abort = false;
                self.status = None;
            }
        }
    }
}

/// Raster size for a terminal of `size` cells, never empty
fn viewport_for(size: (u16, u16), raster_scale: u32) -> (u32, u32) {
    let canvas = drawing_layout(Rect::new(0, 0, size.0, size.1)).canvas;
    (
        (canvas.width as u32 * raster_scale).max(1),
        (canvas.height as u32 * 2 * raster_scale).max(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::{RngSource, ThemeMode};
    use crate::surface::Rgb;
    use tempfile::tempdir;

    fn app_in(dir: PathBuf) -> App {
        let config = Config {
            training_secs: 3,
            reveal_delay_ms: 100,
            ..Config::default()
        };
        App::new(
            &config,
            Vocabulary::builtin().unwrap(),
            Box::new(RngSource::seeded(1)),
            (80, 24),
            dir,
        )
        .unwrap()
    }

    fn app() -> App {
        app_in(std::env::temp_dir())
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    fn esc() -> KeyEvent {
        KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn drawing_app() -> App {
        let mut app = app();
        app.on_key(key('t'));
        app.on_elapsed(Duration::from_millis(100));
        assert_eq!(app.state(), SessionState::Drawing);
        app
    }

    fn drag_across(app: &mut App) {
        let area = app.canvas_area();
        let row = area.y + area.height / 2;
        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), area.x + 2, row));
        app.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), area.x + 20, row));
        app.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), area.x + 20, row));
    }

    #[test]
    fn test_viewport_follows_canvas_area() {
        let app = app();
        let area = app.canvas_area();
        assert_eq!(
            app.session.viewport(),
            (area.width as u32 * 2, area.height as u32 * 4)
        );
    }

    #[test]
    fn test_title_keys() {
        let mut app = app();
        app.on_key(key('x'));
        assert_eq!(app.state(), SessionState::Title);

        app.on_key(key('f'));
        assert_eq!(app.state(), SessionState::Generating);
        app.on_elapsed(Duration::from_millis(100));
        assert_eq!(app.session.current_theme().unwrap().mode, ThemeMode::Free);

        let mut app = self::app();
        app.on_key(key('q'));
        assert!(app.should_quit);
    }

    #[test]
    fn test_escape_while_generating_returns_to_title() {
        let mut app = app();
        app.on_key(key('t'));
        app.on_key(esc());
        assert_eq!(app.state(), SessionState::Title);
    }

    #[test]
    fn test_abandon_needs_confirmation() {
        let mut app = drawing_app();

        app.on_key(esc());
        assert!(app.confirm_abort);
        app.on_key(key('n'));
        assert!(!app.confirm_abort);
        assert_eq!(app.state(), SessionState::Drawing);

        app.on_key(esc());
        app.on_key(key('y'));
        assert_eq!(app.state(), SessionState::Title);
        assert!(!app.confirm_abort);
    }

    #[test]
    fn test_mouse_drag_draws_on_canvas() {
        let mut app = drawing_app();
        drag_across(&mut app);

        let snapshot = app.session.surface().snapshot();
        assert!(snapshot.count_other_than(Rgb::WHITE) > 0);
        assert!(!app.session.surface().is_drawing());
    }

    #[test]
    fn test_drag_after_resize_stays_under_cursor() {
        let mut app = drawing_app();
        let area = app.canvas_area();
        let column = area.x + 40;

        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), column, area.y + 3));
        app.on_resize(160, 48);
        for row in area.y + 4..area.y + 8 {
            app.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), column, row));
        }
        app.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), column, area.y + 8));

        let snapshot = app.session.surface().snapshot();
        let inked: Vec<(u32, u32)> = (0..snapshot.height)
            .flat_map(|y| (0..snapshot.width).map(move |x| (x, y)))
            .filter(|&(x, y)| snapshot.get(x, y) != Some(Rgb::WHITE))
            .collect();
        // column 40 is raster x 81 at scale 2, whatever the terminal size
        assert!(inked.iter().all(|&(x, _)| (77..=85).contains(&x)));
        let rows = inked.iter().map(|&(_, y)| y);
        assert!(rows.clone().max().unwrap() - rows.min().unwrap() >= 8);
        assert_eq!(app.session.surface().size(), app.session.viewport());
    }

    #[test]
    fn test_mouse_outside_canvas_is_ignored() {
        let mut app = drawing_app();
        app.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 1, 0));
        assert!(!app.session.surface().is_drawing());
        assert!(app.session.surface().snapshot().is_uniform(Rgb::WHITE));
    }

    #[test]
    fn test_eraser_and_clear_keys() {
        let mut app = drawing_app();
        drag_across(&mut app);

        app.on_key(key('e'));
        assert_eq!(app.session.tool(), Tool::Eraser);
        app.on_key(key('c'));
        assert!(app.session.surface().snapshot().is_uniform(Rgb::WHITE));
        app.on_key(key('p'));
        assert_eq!(app.session.tool(), Tool::Pen);
    }

    #[test]
    fn test_terminal_resize_keeps_ink() {
        let mut app = drawing_app();
        drag_across(&mut app);
        let before = app.session.surface().snapshot().count_other_than(Rgb::WHITE);

        app.on_resize(120, 40);

        let (w, h) = app.session.viewport();
        assert_eq!(app.session.surface().size(), (w, h));
        assert_eq!(
            app.session.surface().snapshot().count_other_than(Rgb::WHITE),
            before
        );
    }

    #[test]
    fn test_round_ends_and_saves() {
        let dir = tempdir().unwrap();
        let mut app = app_in(dir.path().to_path_buf());
        app.on_key(key('t'));
        app.on_elapsed(Duration::from_millis(100));
        drag_across(&mut app);
        app.on_elapsed(Duration::from_secs(3));
        assert_eq!(app.state(), SessionState::Result);

        app.on_key(key('s'));
        assert!(app.status.as_deref().unwrap().starts_with("saved"));
        let saved = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(saved, 2);

        app.on_key(key('h'));
        assert_eq!(app.state(), SessionState::Title);
        assert!(app.status.is_none());
    }
}
