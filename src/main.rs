//! Space War headless runner
//!
//! Plays a session with a simple dodging autopilot and logs what happens.
//! Usage: `space-war [seed] [seconds]` (set `RUST_LOG=info` to watch).

use glam::Vec2;

use space_war::Settings;
use space_war::audio::LogAudio;
use space_war::consts::*;
use space_war::highscores::{HighScoreStore, Record};
use space_war::overlay::LogOverlay;
use space_war::persistence::MemoryStore;
use space_war::sim::{Game, GameEvent, GamePhase, Playfield, TickInput};

type HeadlessGame = Game<LogAudio, LogOverlay, Record<MemoryStore>>;

/// How far ahead (vertically) the autopilot looks for trouble
const LOOKAHEAD: f32 = 260.0;
/// Sideways hop when dodging
const DODGE_STEP: f32 = 120.0;

/// Game instance plus the fixed-step driver
struct Runner {
    game: HeadlessGame,
    accumulator: f32,
    input: TickInput,
    runs: u32,
    best_run: u32,
}

impl Runner {
    fn new(seed: u64) -> Self {
        let mut store = MemoryStore::new();
        let settings = Settings::load(&store);
        if let Err(e) = settings.save(&mut store) {
            log::warn!("Could not save settings: {}", e);
        }

        Self {
            game: Game::new(
                seed,
                Playfield::default(),
                &settings,
                LogAudio,
                LogOverlay,
                Record::new(store),
            ),
            accumulator: 0.0,
            input: TickInput::default(),
            runs: 1,
            best_run: 0,
        }
    }

    /// Run simulation ticks for one host frame
    fn update(&mut self, dt: f32) {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            self.drive();
            let input = self.input.clone();
            self.game.tick(&input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;

            // Clear one-shot inputs after processing
            self.input = TickInput::default();
            self.handle_events();
        }
    }

    /// Decide this tick's input
    fn drive(&mut self) {
        match self.game.phase() {
            GamePhase::GameOver => {
                self.runs += 1;
                self.input.restart = true;
            }
            GamePhase::Paused => self.input.resume = true,
            GamePhase::Running => self.input.pointer = self.dodge(),
        }
    }

    /// Step aside from the nearest asteroid coming down on the ship
    fn dodge(&self) -> Option<Vec2> {
        let world = &self.game.world;
        if world.is_moving() {
            return None;
        }
        let ship = world.player.pos;
        let half_width = world.playfield.width / 2.0;

        let threat = world
            .obstacles
            .iter()
            .filter(|o| o.pos.y > ship.y && o.pos.y - ship.y < LOOKAHEAD)
            .filter(|o| (o.pos.x - ship.x).abs() < o.size().x + DODGE_STEP / 2.0)
            .min_by(|a, b| a.pos.y.total_cmp(&b.pos.y))?;

        let side = if threat.pos.x >= ship.x { -1.0 } else { 1.0 };
        let mut x = ship.x + side * DODGE_STEP;
        if x.abs() > half_width {
            x = ship.x - side * DODGE_STEP;
        }
        Some(Vec2::new(x.clamp(-half_width, half_width), ship.y))
    }

    fn handle_events(&mut self) {
        for event in self.game.drain_events() {
            match event {
                GameEvent::ScoreChanged(score) => {
                    log::debug!("{}", self.game.score_label());
                    self.best_run = self.best_run.max(score);
                }
                GameEvent::NewRecord(score) => log::info!("New record: {}", score),
                _ => {}
            }
        }
    }
}

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(rand::random::<u64>);
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(60.0);

    log::info!("Space War (headless) starting, seed {}", seed);

    let mut runner = Runner::new(seed);
    let frames = (seconds / SIM_DT).round() as u32;
    for _ in 0..frames {
        runner.update(SIM_DT);
    }

    println!(
        "seed {}: {} run(s) in {:.0}s, best run {}, record {}",
        seed,
        runner.runs,
        seconds,
        runner.best_run,
        runner.game.records().high_score()
    );
}
