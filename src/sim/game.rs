//! Game state machine
//!
//! Owns the phase, the score and the music state, and is the only thing
//! that changes them. Each frame the host feeds a [`TickInput`] and a
//! timestep; the world is advanced only while running, and whatever it
//! reports (exits, contact) is turned into score changes, transitions and
//! calls out to the audio, overlay and high-score collaborators.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::state::{GamePhase, ObstacleId, Playfield};
use super::world::World;
use crate::audio::{AudioSink, AudioState, Clip, Track};
use crate::highscores::HighScoreStore;
use crate::overlay::Overlay;
use crate::settings::Settings;

/// Stream offset so track picks don't share a sequence with the world
const AUDIO_RNG_STREAM: u64 = 0x5eed_a0d1_0000_0001;

/// Input commands for a single frame
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Active pointer position, in playfield coordinates
    pub pointer: Option<Vec2>,
    /// Pause button
    pub pause: bool,
    /// Play button on the pause screen
    pub resume: bool,
    /// Replay button on the game-over screen
    pub restart: bool,
    /// Music switch on the pause screen
    pub toggle_music: bool,
}

/// Things that happened during a frame, for HUD and effects
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    ObstacleSpawned(ObstacleId),
    ObstacleExited(ObstacleId),
    ScoreChanged(u32),
    PhaseChanged { from: GamePhase, to: GamePhase },
    ShipHit(ObstacleId),
    NewRecord(u32),
    MusicToggled(bool),
}

/// A game session
pub struct Game<A, O, H> {
    pub world: World,
    phase: GamePhase,
    score: u32,
    audio: AudioState,
    rng: Pcg32,
    events: Vec<GameEvent>,
    sink: A,
    overlay: O,
    records: H,
}

impl<A: AudioSink, O: Overlay, H: HighScoreStore> Game<A, O, H> {
    /// Start a session: running, score 0, a random background track playing
    /// if the settings allow music.
    pub fn new(
        seed: u64,
        playfield: Playfield,
        settings: &Settings,
        mut sink: A,
        overlay: O,
        records: H,
    ) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed ^ AUDIO_RNG_STREAM);
        sink.set_music_volume(settings.music_volume);
        sink.set_sfx_volume(settings.sfx_volume);
        let mut audio = AudioState::new(settings.music_on, Track::random(&mut rng));
        audio.apply_preference(&mut sink);

        log::info!(
            "New game (seed {}, playfield {}x{})",
            seed,
            playfield.width,
            playfield.height
        );

        Self {
            world: World::new(seed, playfield),
            phase: GamePhase::Running,
            score: 0,
            audio,
            rng,
            events: Vec::new(),
            sink,
            overlay,
            records,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// HUD score text
    pub fn score_label(&self) -> String {
        format!("Score: {}", self.score)
    }

    pub fn audio(&self) -> &AudioState {
        &self.audio
    }

    pub fn music_on(&self) -> bool {
        self.audio.music_on
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }

    pub fn records(&self) -> &H {
        &self.records
    }

    /// Take the events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn set_phase(&mut self, to: GamePhase) {
        let from = self.phase;
        self.phase = to;
        self.events.push(GameEvent::PhaseChanged { from, to });
    }

    fn set_score(&mut self, score: u32) {
        self.score = score;
        self.events.push(GameEvent::ScoreChanged(score));
    }

    /// Running → Paused: freeze, silence the music, show the pause screen
    pub fn pause(&mut self) {
        if self.phase != GamePhase::Running {
            return;
        }
        self.set_phase(GamePhase::Paused);
        self.audio.stop(&mut self.sink);
        self.overlay.show_pause();
        log::info!("Paused at score {}", self.score);
    }

    /// Paused → Running: unfreeze, music back per preference
    pub fn resume(&mut self) {
        if self.phase != GamePhase::Paused {
            return;
        }
        self.overlay.hide_pause();
        self.set_phase(GamePhase::Running);
        self.audio.apply_preference(&mut self.sink);
        log::info!("Resumed");
    }

    /// GameOver → Running: empty field, score 0, fresh track
    pub fn restart(&mut self) {
        if self.phase != GamePhase::GameOver {
            return;
        }
        self.overlay.hide_game_over();
        self.world.reset();
        self.set_score(0);
        self.set_phase(GamePhase::Running);
        self.audio.start_new_track(&mut self.sink, &mut self.rng);
        log::info!("Restarted");
    }

    /// Flip the music preference. While running it takes effect at once;
    /// otherwise it is applied on the next return to play.
    pub fn toggle_music(&mut self) {
        let on = self.audio.toggle();
        self.events.push(GameEvent::MusicToggled(on));
        log::info!("Music {}", if on { "on" } else { "off" });

        if self.phase == GamePhase::Running {
            self.audio.apply_preference(&mut self.sink);
        }
    }

    /// Steer the ship toward `target`. Ignored unless running.
    pub fn pointer(&mut self, target: Vec2) {
        if self.phase == GamePhase::Running {
            self.world.apply_pointer(target);
        }
    }

    /// Handle one frame of input, then advance the simulation by `dt`
    pub fn tick(&mut self, input: &TickInput, dt: f32) {
        if input.toggle_music {
            self.toggle_music();
        }
        if input.pause {
            self.pause();
        }
        if input.resume {
            self.resume();
        }
        if input.restart {
            self.restart();
        }
        if let Some(target) = input.pointer {
            self.pointer(target);
        }
        self.step(dt);
    }

    /// Advance the simulation by `dt`. Nothing moves unless running.
    pub fn step(&mut self, dt: f32) {
        if self.phase != GamePhase::Running {
            return;
        }

        for id in self.world.advance_spawner(dt) {
            self.events.push(GameEvent::ObstacleSpawned(id));
        }

        self.world.tick(dt);

        if let Some(id) = self.world.contact() {
            self.game_over(id);
            return;
        }

        let exited = self.world.detect_offscreen();
        if exited.is_empty() {
            return;
        }
        let removed = self.world.remove(&exited) as u32;
        for id in exited {
            log::debug!("Asteroid {:?} left the field", id);
            self.events.push(GameEvent::ObstacleExited(id));
        }
        self.set_score(self.score + removed);
    }

    /// Running → GameOver, once per run
    fn game_over(&mut self, hit_by: ObstacleId) {
        self.events.push(GameEvent::ShipHit(hit_by));
        self.set_phase(GamePhase::GameOver);
        self.audio.stop(&mut self.sink);

        let submission = self.records.submit(self.score);
        if submission.new_record {
            self.events.push(GameEvent::NewRecord(submission.high_score));
        }
        self.overlay.show_game_over(self.score, submission.high_score);

        self.sink.play_once(Clip::Hit);
        self.sink.play_once(Clip::Defeat);

        log::info!(
            "Game over: score {}, best {}{}",
            self.score,
            submission.high_score,
            if submission.new_record { " (new record)" } else { "" }
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{AudioCue, CueLog};
    use crate::consts::*;
    use crate::highscores::Record;
    use crate::overlay::{OverlayState, Screen};
    use crate::persistence::MemoryStore;
    use crate::sim::SpawnSchedule;
    use proptest::prelude::*;

    type TestGame = Game<CueLog, OverlayState, Record<MemoryStore>>;

    fn game_with_record(record: u32) -> TestGame {
        let mut records = Record::new(MemoryStore::new());
        if record > 0 {
            records.set_high_score(record);
        }
        Game::new(
            1234,
            Playfield::new(400.0, 800.0),
            &Settings::default(),
            CueLog::default(),
            OverlayState::default(),
            records,
        )
    }

    fn game() -> TestGame {
        game_with_record(0)
    }

    /// Put `n` asteroids just past the bottom edge, well clear of the ship
    fn drop_rocks(game: &mut TestGame, n: u32) {
        let exit_y = game.world.playfield.exit_y();
        for i in 0..n {
            let id = game.world.spawn_obstacle();
            let rock = game.world.obstacles.iter_mut().find(|o| o.id == id).unwrap();
            rock.pos = Vec2::new(1000.0 + i as f32 * 200.0, exit_y - 10.0);
            rock.vel = Vec2::ZERO;
        }
        game.step(SIM_DT);
    }

    /// Put an asteroid right on the ship
    fn ram_ship(game: &mut TestGame) -> ObstacleId {
        let id = game.world.spawn_obstacle();
        let ship = game.world.player.pos;
        let rock = game.world.obstacles.iter_mut().find(|o| o.id == id).unwrap();
        rock.pos = ship;
        rock.vel = Vec2::ZERO;
        id
    }

    #[test]
    fn test_starts_running_with_music() {
        let game = game();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 0);
        assert!(game.audio().playing);
        assert_eq!(game.sink().cues, vec![AudioCue::Loop(game.audio().track)]);
        assert_eq!(game.sink().music_volume, Some(MUSIC_VOLUME));
    }

    #[test]
    fn test_starts_silent_when_music_off() {
        let settings = Settings {
            music_on: false,
            ..Settings::default()
        };
        let game = Game::new(
            1,
            Playfield::default(),
            &settings,
            CueLog::default(),
            OverlayState::default(),
            Record::new(MemoryStore::new()),
        );
        assert!(!game.audio().playing);
        assert_eq!(game.sink().count(AudioCue::Loop(game.audio().track)), 0);
    }

    #[test]
    fn test_sound_volume_reaches_sink() {
        let settings = Settings {
            sfx_volume: 0.0,
            ..Settings::default()
        };
        let mut game = Game::new(
            1,
            Playfield::default(),
            &settings,
            CueLog::default(),
            OverlayState::default(),
            Record::new(MemoryStore::new()),
        );
        assert_eq!(game.sink().sfx_volume, Some(0.0));
        assert_eq!(game.sink().music_volume, Some(settings.music_volume));

        // Clips are still cued; muting them is up to the sink
        ram_ship(&mut game);
        game.step(SIM_DT);
        assert_eq!(game.sink().count(AudioCue::Once(Clip::Hit)), 1);
        assert_eq!(game.sink().sfx_volume, Some(0.0));
    }

    #[test]
    fn test_rocks_colliding_do_not_score_or_end_game() {
        let mut game = game();
        game.world = game.world.clone().with_spawner(SpawnSchedule::new(1000.0, 0.0));
        game.world.advance_spawner(SIM_DT);
        game.world.obstacles.clear();

        let mut rock = |x: f32, vx: f32| {
            let id = game.world.spawn_obstacle();
            let rock = game.world.obstacles.iter_mut().find(|o| o.id == id).unwrap();
            rock.pos = Vec2::new(x, 300.0);
            rock.vel = Vec2::new(vx, 0.0);
            rock.angular_vel = 0.0;
            id
        };
        let left = rock(-60.0, 80.0);
        let right = rock(60.0, -80.0);

        for _ in 0..60 {
            game.step(SIM_DT);
        }

        assert_eq!(game.score(), 0);
        assert_eq!(game.phase(), GamePhase::Running);
        let events = game.drain_events();
        assert!(!events.iter().any(|e| matches!(
            e,
            GameEvent::ObstacleExited(_) | GameEvent::ShipHit(_) | GameEvent::ScoreChanged(_)
        )));

        // Both still in play, and the bounce slowed their approach
        let vel = |id| game.world.obstacles.iter().find(|o| o.id == id).unwrap().vel;
        assert!(vel(left).x < 80.0);
        assert!(vel(right).x > -80.0);
    }

    #[test]
    fn test_obstacle_exit_scores_once() {
        let mut game = game();
        let top = game.world.playfield.height + OBSTACLE_SPRITE_SIZE.y;
        let id = game.world.spawn_obstacle();
        {
            let rock = game.world.obstacles.iter_mut().find(|o| o.id == id).unwrap();
            rock.pos = Vec2::new(5.0, top);
            rock.vel = Vec2::ZERO;
        }
        // Keep the ship out of the lane
        game.world.player.pos = Vec2::new(-150.0, 0.0);
        // Let the spawner fire its immediate rock, then drop that rock
        game.world = game.world.clone().with_spawner(SpawnSchedule::new(1000.0, 0.0));
        game.world.advance_spawner(SIM_DT);
        game.world.obstacles.retain(|o| o.id == id);

        let mut exited_at = None;
        for frame in 0..2000 {
            game.step(SIM_DT);
            if game.score() > 0 {
                exited_at = Some(frame);
                break;
            }
        }
        assert!(exited_at.is_some());
        assert_eq!(game.score(), 1);
        assert!(!game.world.obstacles.iter().any(|o| o.id == id));

        let events = game.drain_events();
        assert_eq!(
            events.iter().filter(|e| **e == GameEvent::ObstacleExited(id)).count(),
            1
        );
        assert_eq!(game.score_label(), "Score: 1");
    }

    #[test]
    fn test_pause_and_resume_keep_score() {
        let mut game = game();
        drop_rocks(&mut game, 7);
        assert_eq!(game.score(), 7);

        game.tick(
            &TickInput {
                pause: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(game.phase(), GamePhase::Paused);
        assert!(!game.audio().playing);
        assert_eq!(game.sink().last(), Some(AudioCue::StopAndRewind));
        assert_eq!(game.overlay().screen, Screen::Pause);

        game.tick(
            &TickInput {
                resume: true,
                ..Default::default()
            },
            SIM_DT,
        );
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 7);
        assert!(game.audio().playing);
        assert_eq!(game.sink().last(), Some(AudioCue::Loop(game.audio().track)));
        assert_eq!(game.overlay().screen, Screen::None);
    }

    #[test]
    fn test_nothing_moves_while_paused() {
        let mut game = game();
        game.step(SIM_DT);
        let before: Vec<Vec2> = game.world.obstacles.iter().map(|o| o.pos).collect();
        assert_eq!(before.len(), 1);

        game.pause();
        game.drain_events();
        for _ in 0..600 {
            game.tick(
                &TickInput {
                    pointer: Some(Vec2::new(-100.0, 0.0)),
                    ..Default::default()
                },
                SIM_DT,
            );
        }
        let after: Vec<Vec2> = game.world.obstacles.iter().map(|o| o.pos).collect();
        assert_eq!(before, after);
        assert!(!game.world.is_moving());
        assert!(game.drain_events().is_empty());

        // No catch-up burst after ten seconds of pause
        game.resume();
        game.step(SIM_DT);
        assert_eq!(game.world.obstacles.len(), 1);
    }

    #[test]
    fn test_contact_ends_game_and_beats_record() {
        let mut game = game_with_record(10);
        drop_rocks(&mut game, 12);
        assert_eq!(game.score(), 12);
        game.drain_events();

        let id = ram_ship(&mut game);
        game.sink.clear();
        game.step(SIM_DT);

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.records().high_score(), 12);
        assert_eq!(
            game.overlay().screen,
            Screen::GameOver {
                score: 12,
                high_score: 12
            }
        );
        assert_eq!(
            game.sink().cues,
            vec![
                AudioCue::StopAndRewind,
                AudioCue::Once(Clip::Hit),
                AudioCue::Once(Clip::Defeat)
            ]
        );
        let events = game.drain_events();
        assert!(events.contains(&GameEvent::ShipHit(id)));
        assert!(events.contains(&GameEvent::NewRecord(12)));
    }

    #[test]
    fn test_contact_fires_once_under_overlap() {
        let mut game = game_with_record(10);
        ram_ship(&mut game);
        for _ in 0..120 {
            game.step(SIM_DT);
        }
        assert_eq!(game.phase(), GamePhase::GameOver);
        assert_eq!(game.overlay().shown, 1);
        assert_eq!(game.sink().count(AudioCue::Once(Clip::Hit)), 1);
        assert_eq!(game.sink().count(AudioCue::Once(Clip::Defeat)), 1);
        // Score 0 never beats 10: only the setup write
        assert_eq!(game.records().store().writes(), 1);
        assert_eq!(
            game.overlay().screen,
            Screen::GameOver {
                score: 0,
                high_score: 10
            }
        );
    }

    #[test]
    fn test_rock_stays_after_contact() {
        let mut game = game();
        let id = ram_ship(&mut game);
        game.step(SIM_DT);
        assert!(game.world.obstacles.iter().any(|o| o.id == id));
    }

    #[test]
    fn test_restart_resets_everything() {
        let mut game = game();
        drop_rocks(&mut game, 3);
        game.pointer(Vec2::new(80.0, 40.0));
        game.step(SIM_DT);
        ram_ship(&mut game);
        game.step(SIM_DT);
        assert_eq!(game.phase(), GamePhase::GameOver);

        // Only the replay button gets out of game over
        game.pause();
        game.resume();
        assert_eq!(game.phase(), GamePhase::GameOver);

        game.sink.clear();
        game.tick(
            &TickInput {
                restart: true,
                ..Default::default()
            },
            0.0,
        );
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.world.player.pos, Vec2::ZERO);
        assert_eq!(game.overlay().screen, Screen::None);
        assert_eq!(game.sink().cues, vec![AudioCue::Loop(game.audio().track)]);
        // The frame's step already re-spawned the first rock
        assert!(game.world.obstacles.len() <= 1);
    }

    #[test]
    fn test_restart_ignored_while_running() {
        let mut game = game();
        drop_rocks(&mut game, 2);
        game.restart();
        assert_eq!(game.score(), 2);
    }

    #[test]
    fn test_toggle_music_while_running() {
        let mut game = game();
        let track = game.audio().track;

        game.toggle_music();
        assert!(!game.music_on());
        assert_eq!(game.sink().last(), Some(AudioCue::StopAndRewind));

        game.toggle_music();
        assert!(game.music_on());
        assert_eq!(game.sink().last(), Some(AudioCue::Loop(track)));
    }

    #[test]
    fn test_toggle_music_while_paused_applies_on_resume() {
        let mut game = game();
        game.pause();
        let cues = game.sink().cues.len();

        game.toggle_music();
        assert_eq!(game.sink().cues.len(), cues);

        game.resume();
        assert!(!game.audio().playing);
        assert_eq!(game.sink().count(AudioCue::Loop(game.audio().track)), 1);
    }

    #[test]
    fn test_touch_left_leans_positive() {
        let mut game = game();
        let target = Vec2::new(-250.0, 0.0);
        game.pointer(target);

        // One second trip, first third ends at 1/3 s
        for _ in 0..20 {
            game.step(SIM_DT);
        }
        assert!((game.world.player.rotation - LEAN_ANGLE).abs() < 1e-3);
        assert!(game.world.player.pos.x < 0.0);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Steps(u32),
        Pause,
        Resume,
        Restart,
        ToggleMusic,
        Pointer(f32, f32),
        DropRocks(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            (1u32..120).prop_map(Op::Steps),
            Just(Op::Pause),
            Just(Op::Resume),
            Just(Op::Restart),
            Just(Op::ToggleMusic),
            (-200.0f32..200.0, -300.0f32..300.0).prop_map(|(x, y)| Op::Pointer(x, y)),
            (1u32..4).prop_map(Op::DropRocks),
        ]
    }

    proptest! {
        #[test]
        fn prop_score_only_grows_while_running(ops in proptest::collection::vec(op(), 1..40)) {
            let mut game = game();
            for op in ops {
                let phase = game.phase();
                let score = game.score();
                match op {
                    Op::Steps(n) => (0..n).for_each(|_| game.step(SIM_DT)),
                    Op::Pause => game.pause(),
                    Op::Resume => game.resume(),
                    Op::Restart => game.restart(),
                    Op::ToggleMusic => game.toggle_music(),
                    Op::Pointer(x, y) => game.pointer(Vec2::new(x, y)),
                    Op::DropRocks(n) => {
                        if phase == GamePhase::Running {
                            drop_rocks(&mut game, n);
                        }
                    }
                }

                if matches!(op, Op::Restart) && phase == GamePhase::GameOver {
                    prop_assert_eq!(game.score(), 0);
                    prop_assert_eq!(game.phase(), GamePhase::Running);
                } else if phase != GamePhase::Running {
                    prop_assert_eq!(game.score(), score);
                } else {
                    prop_assert!(game.score() >= score);
                }
                if game.phase() == GamePhase::GameOver {
                    prop_assert!(game.records().high_score() >= game.score());
                }
            }
        }
    }
}
