//! Round state machine: title -> generating -> drawing -> result.
//!
//! The controller owns the countdown as a [`TaskHandle`] on its own
//! [`Scheduler`]; every exit from `Drawing` cancels it, and deliveries carrying
//! any other handle are dropped as stale.

use std::time::Duration;

use crate::config::Config;
use crate::prompt::{PromptGenerator, PromptHistory, RandomSource, Theme};
use crate::runtime::{Scheduler, TaskHandle};
use crate::surface::{DrawingSurface, PointerAdapter, PointerEvent, RasterImage, Tool};

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum SessionState {
    Title,
    Generating,
    Drawing,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Mode {
    /// Short round on a generated prompt
    #[default]
    Training,
    /// Longer round on a placeholder prompt
    Free,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    pub training_secs: u32,
    pub free_secs: u32,
    pub reveal_delay: Duration,
    pub tick_interval: Duration,
    pub history_limit: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        (&Config::default()).into()
    }
}

impl From<&Config> for SessionConfig {
    fn from(cfg: &Config) -> Self {
        Self {
            training_secs: cfg.training_secs,
            free_secs: cfg.free_secs,
            reveal_delay: cfg.reveal_delay(),
            tick_interval: cfg.tick_interval(),
            history_limit: cfg.history_limit,
        }
    }
}

impl SessionConfig {
    pub fn limit_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Training => self.training_secs,
            Mode::Free => self.free_secs,
        }
        .max(1)
    }
}

/// Scheduled work the controller reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTask {
    /// End of the generating pause
    Reveal,
    /// One countdown step
    Countdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SessionState,
    pub to: SessionState,
}

/// What the result screen shows: the prompt and the sketch as it was when
/// time ran out.
#[derive(Debug, Clone, PartialEq)]
pub struct Review {
    pub theme: Theme,
    pub mode: Mode,
    pub image: RasterImage,
}

pub struct SessionController<S: DrawingSurface> {
    config: SessionConfig,
    generator: PromptGenerator,
    history: PromptHistory,
    rng: Box<dyn RandomSource>,
    surface: S,
    adapter: PointerAdapter,
    scheduler: Scheduler<SessionTask>,
    state: SessionState,
    mode: Mode,
    tool: Tool,
    current_theme: Option<Theme>,
    time_remaining: u32,
    countdown: Option<TaskHandle>,
    reveal: Option<TaskHandle>,
    viewport: (u32, u32),
    review: Option<Review>,
    rounds_completed: u32,
}

impl<S: DrawingSurface> SessionController<S> {
    pub fn new(
        config: SessionConfig,
        generator: PromptGenerator,
        rng: Box<dyn RandomSource>,
        surface: S,
        adapter: PointerAdapter,
    ) -> Self {
        let viewport = surface.size();
        Self {
            history: PromptHistory::new(config.history_limit),
            config,
            generator,
            rng,
            surface,
            adapter,
            scheduler: Scheduler::new(),
            state: SessionState::Title,
            mode: Mode::Training,
            tool: Tool::Pen,
            current_theme: None,
            time_remaining: 0,
            countdown: None,
            reveal: None,
            viewport,
            review: None,
            rounds_completed: 0,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    pub fn current_theme(&self) -> Option<&Theme> {
        self.current_theme.as_ref()
    }

    pub fn time_remaining(&self) -> u32 {
        self.time_remaining
    }

    pub fn history(&self) -> &PromptHistory {
        &self.history
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn viewport(&self) -> (u32, u32) {
        self.viewport
    }

    pub fn rounds_completed(&self) -> u32 {
        self.rounds_completed
    }

    pub fn countdown_handle(&self) -> Option<TaskHandle> {
        self.countdown
    }

    pub fn reveal_handle(&self) -> Option<TaskHandle> {
        self.reveal
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Only available in `Result`
    pub fn review(&self) -> Option<&Review> {
        match self.state {
            SessionState::Result => self.review.as_ref(),
            _ => None,
        }
    }

    /// Title -> Generating
    pub fn start(&mut self, mode: Mode) -> Option<Transition> {
        if self.state != SessionState::Title {
            tracing::debug!(state = %self.state, "start ignored");
            return None;
        }
        self.mode = mode;
        Some(self.enter_generating())
    }

    /// Drawing (or Generating) -> Title, dropping the round
    pub fn abort(&mut self) -> Option<Transition> {
        match self.state {
            SessionState::Drawing => {
                self.cancel_countdown();
                self.surface.end_stroke();
            }
            SessionState::Generating => {
                if let Some(handle) = self.reveal.take() {
                    self.scheduler.cancel(handle);
                }
            }
            SessionState::Title | SessionState::Result => {
                tracing::debug!(state = %self.state, "abort ignored");
                return None;
            }
        }
        self.current_theme = None;
        self.time_remaining = 0;
        Some(self.transition(SessionState::Title))
    }

    /// Result -> another round in the same mode
    pub fn replay(&mut self) -> Option<Transition> {
        if self.state != SessionState::Result {
            tracing::debug!(state = %self.state, "replay ignored");
            return None;
        }
        self.review = None;
        match self.mode {
            Mode::Training => Some(self.enter_generating()),
            Mode::Free => Some(self.begin_round(Theme::free_draw())),
        }
    }

    /// Result -> Title
    pub fn home(&mut self) -> Option<Transition> {
        if self.state != SessionState::Result {
            tracing::debug!(state = %self.state, "home ignored");
            return None;
        }
        self.review = None;
        self.current_theme = None;
        Some(self.transition(SessionState::Title))
    }

    /// Record the viewport size; only a drawing round resizes the surface.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            tracing::warn!(width, height, "ignoring empty viewport");
            return;
        }
        self.viewport = (width, height);
        if self.state == SessionState::Drawing {
            self.surface.resize(width, height);
        }
    }

    /// Feed one pointer event. `display` is the on-screen size of the canvas
    /// in the event's coordinate space.
    pub fn pointer(&mut self, event: PointerEvent, display: (f32, f32)) -> bool {
        if self.state != SessionState::Drawing {
            return false;
        }
        self.adapter.apply(event, display, &mut self.surface, self.tool)
    }

    pub fn set_tool(&mut self, tool: Tool) {
        if self.state == SessionState::Drawing {
            self.tool = tool;
        }
    }

    pub fn clear_canvas(&mut self) {
        if self.state == SessionState::Drawing {
            self.surface.clear();
        }
    }

    /// Move the clock forward, handling everything that fell due in order.
    pub fn advance(&mut self, elapsed: Duration) -> Vec<Transition> {
        let deadline = self.scheduler.now() + elapsed;
        let mut transitions = Vec::new();
        while let Some((handle, task)) = self.scheduler.next_due(deadline) {
            transitions.extend(self.deliver(handle, task));
        }
        self.scheduler.settle(deadline);
        transitions
    }

    /// Handle one task delivery. Deliveries for a handle the controller no
    /// longer holds are ignored.
    pub fn deliver(&mut self, handle: TaskHandle, task: SessionTask) -> Option<Transition> {
        match task {
            SessionTask::Reveal
                if self.state == SessionState::Generating && self.reveal == Some(handle) =>
            {
                self.reveal = None;
                let theme = match self.mode {
                    Mode::Training => self.generator.generate(&mut self.history, self.rng.as_mut()),
                    Mode::Free => Theme::free_draw(),
                };
                Some(self.begin_round(theme))
            }
            SessionTask::Countdown
                if self.state == SessionState::Drawing && self.countdown == Some(handle) =>
            {
                self.time_remaining = self.time_remaining.saturating_sub(1);
                if self.time_remaining == 0 {
                    Some(self.finish_round())
                } else {
                    None
                }
            }
            _ => {
                tracing::debug!(?handle, ?task, state = %self.state, "stale task delivery");
                None
            }
        }
    }

    fn enter_generating(&mut self) -> Transition {
        self.reveal = Some(
            self.scheduler
                .schedule_once(self.config.reveal_delay, SessionTask::Reveal),
        );
        self.transition(SessionState::Generating)
    }

    fn begin_round(&mut self, theme: Theme) -> Transition {
        tracing::info!(
            mode = %self.mode,
            sub = %theme.sub_text,
            main = %theme.main_text,
            "round started"
        );
        self.current_theme = Some(theme);
        self.time_remaining = self.config.limit_for(self.mode);

        let (w, h) = self.viewport;
        self.surface.resize(w, h);
        self.surface.clear();

        self.cancel_countdown();
        self.countdown = Some(
            self.scheduler
                .schedule_repeating(self.config.tick_interval, SessionTask::Countdown),
        );
        self.transition(SessionState::Drawing)
    }

    fn finish_round(&mut self) -> Transition {
        self.cancel_countdown();
        self.surface.end_stroke();
        if let Some(theme) = self.current_theme.clone() {
            self.review = Some(Review {
                theme,
                mode: self.mode,
                image: self.surface.snapshot(),
            });
        }
        self.rounds_completed += 1;
        self.transition(SessionState::Result)
    }

    fn cancel_countdown(&mut self) {
        if let Some(handle) = self.countdown.take() {
            self.scheduler.cancel(handle);
        }
    }

    fn transition(&mut self, to: SessionState) -> Transition {
        let from = self.state;
        self.state = to;
        tracing::info!(%from, %to, "session transition");
        Transition { from, to }
    }
}
