//! Pause and game-over screens
//!
//! Presentation belongs to the host UI. The game only says what to show;
//! the UI fades it in or out over [`crate::consts::OVERLAY_FADE_SECS`].

/// UI layer the game reports to
pub trait Overlay {
    fn show_pause(&mut self);
    fn hide_pause(&mut self);
    /// Game-over card with this run's score and the best score so far
    fn show_game_over(&mut self, score: u32, high_score: u32);
    fn hide_game_over(&mut self);
}

/// What is on screen right now
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    None,
    Pause,
    GameOver { score: u32, high_score: u32 },
}

/// Overlay that just remembers what it was told to show
#[derive(Debug, Default)]
pub struct OverlayState {
    pub screen: Screen,
    /// Number of show calls, any kind
    pub shown: u32,
}

impl Overlay for OverlayState {
    fn show_pause(&mut self) {
        self.screen = Screen::Pause;
        self.shown += 1;
    }

    fn hide_pause(&mut self) {
        if self.screen == Screen::Pause {
            self.screen = Screen::None;
        }
    }

    fn show_game_over(&mut self, score: u32, high_score: u32) {
        self.screen = Screen::GameOver { score, high_score };
        self.shown += 1;
    }

    fn hide_game_over(&mut self) {
        if matches!(self.screen, Screen::GameOver { .. }) {
            self.screen = Screen::None;
        }
    }
}

/// Overlay that logs instead of drawing
#[derive(Debug, Default)]
pub struct LogOverlay;

impl Overlay for LogOverlay {
    fn show_pause(&mut self) {
        log::info!("[overlay] paused");
    }

    fn hide_pause(&mut self) {
        log::info!("[overlay] resumed");
    }

    fn show_game_over(&mut self, score: u32, high_score: u32) {
        log::info!("[overlay] game over - score {} / best {}", score, high_score);
    }

    fn hide_game_over(&mut self) {
        log::info!("[overlay] new game");
    }
}
