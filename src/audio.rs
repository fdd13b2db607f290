//! Audio cue dispatch
//!
//! The game owns an [`AudioState`] (music preference, chosen track, whether
//! the loop is playing) and drives a stateless [`AudioSink`] supplied by the
//! host. Decoding and mixing are the sink's business.

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Looping background tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Track {
    Background1,
    Background2,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Background1, Track::Background2];

    /// Uniform pick between the two tracks
    pub fn random<R: Rng>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Asset file name
    pub fn file_name(&self) -> &'static str {
        match self {
            Track::Background1 => "background1.mp3",
            Track::Background2 => "background2.mp3",
        }
    }
}

/// One-shot sounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Clip {
    /// Ship hit
    Hit,
    /// Non-looping game-over music
    Defeat,
}

impl Clip {
    pub fn id(&self) -> &'static str {
        match self {
            Clip::Hit => "hit",
            Clip::Defeat => "defeat",
        }
    }

    pub fn file_name(&self) -> &'static str {
        match self {
            Clip::Hit => "hit.mp3",
            Clip::Defeat => "sad.mp3",
        }
    }
}

/// Host-side audio output.
///
/// Calls are fire-and-forget and must not block the simulation.
pub trait AudioSink {
    /// Loop `track` forever on the music channel. If `track` is the one
    /// already loaded, playback continues from its current position.
    fn play_loop(&mut self, track: Track);

    /// Stop the music channel and rewind it to the start
    fn stop_and_rewind(&mut self);

    /// Play a clip once. [`Clip::Defeat`] goes on the music channel, so the
    /// next `play_loop` or `stop_and_rewind` cuts it off.
    fn play_once(&mut self, clip: Clip);

    /// Music channel volume in [0, 1]
    fn set_music_volume(&mut self, _volume: f32) {}

    /// Volume in [0, 1] for clips started by `play_once`
    fn set_sfx_volume(&mut self, _volume: f32) {}
}

/// Discards every cue
#[derive(Debug, Default)]
pub struct NullAudio;

impl AudioSink for NullAudio {
    fn play_loop(&mut self, _track: Track) {}
    fn stop_and_rewind(&mut self) {}
    fn play_once(&mut self, _clip: Clip) {}
}

/// Writes every cue to the log
#[derive(Debug, Default)]
pub struct LogAudio;

impl AudioSink for LogAudio {
    fn play_loop(&mut self, track: Track) {
        log::info!("Music loop {}", track.file_name());
    }

    fn stop_and_rewind(&mut self) {
        log::info!("Music stopped");
    }

    fn play_once(&mut self, clip: Clip) {
        log::info!("Sound {} ({})", clip.id(), clip.file_name());
    }

    fn set_music_volume(&mut self, volume: f32) {
        log::debug!("Music volume {:.2}", volume);
    }

    fn set_sfx_volume(&mut self, volume: f32) {
        log::debug!("Sound volume {:.2}", volume);
    }
}

/// A cue as seen by [`CueLog`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Loop(Track),
    StopAndRewind,
    Once(Clip),
}

/// Records cues in order
#[derive(Debug, Default)]
pub struct CueLog {
    pub cues: Vec<AudioCue>,
    pub music_volume: Option<f32>,
    pub sfx_volume: Option<f32>,
}

impl CueLog {
    pub fn last(&self) -> Option<AudioCue> {
        self.cues.last().copied()
    }

    pub fn count(&self, cue: AudioCue) -> usize {
        self.cues.iter().filter(|c| **c == cue).count()
    }

    pub fn clear(&mut self) {
        self.cues.clear();
    }
}

impl AudioSink for CueLog {
    fn play_loop(&mut self, track: Track) {
        self.cues.push(AudioCue::Loop(track));
    }

    fn stop_and_rewind(&mut self) {
        self.cues.push(AudioCue::StopAndRewind);
    }

    fn play_once(&mut self, clip: Clip) {
        self.cues.push(AudioCue::Once(clip));
    }

    fn set_music_volume(&mut self, volume: f32) {
        self.music_volume = Some(volume);
    }

    fn set_sfx_volume(&mut self, volume: f32) {
        self.sfx_volume = Some(volume);
    }
}

/// Music state owned by the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioState {
    /// Player preference, process-wide for the session
    pub music_on: bool,
    /// Track chosen on the last entry into play
    pub track: Track,
    /// Whether the background loop is currently sounding
    pub playing: bool,
}

impl AudioState {
    pub fn new(music_on: bool, track: Track) -> Self {
        Self {
            music_on,
            track,
            playing: false,
        }
    }

    /// Start (or continue) the loop if the preference allows, else make sure it is stopped
    pub fn apply_preference<S: AudioSink + ?Sized>(&mut self, sink: &mut S) {
        if self.music_on {
            sink.play_loop(self.track);
            self.playing = true;
        } else {
            self.stop(sink);
        }
    }

    /// Stop and rewind the loop
    pub fn stop<S: AudioSink + ?Sized>(&mut self, sink: &mut S) {
        sink.stop_and_rewind();
        self.playing = false;
    }

    /// Pick a fresh track and start it per preference
    pub fn start_new_track<S: AudioSink + ?Sized, R: Rng>(&mut self, sink: &mut S, rng: &mut R) {
        self.track = Track::random(rng);
        self.apply_preference(sink);
    }

    /// Flip the preference, returning the new value
    pub fn toggle(&mut self) -> bool {
        self.music_on = !self.music_on;
        self.music_on
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_apply_preference() {
        let mut sink = CueLog::default();
        let mut state = AudioState::new(true, Track::Background2);
        state.apply_preference(&mut sink);
        assert!(state.playing);
        assert_eq!(sink.last(), Some(AudioCue::Loop(Track::Background2)));

        state.toggle();
        state.apply_preference(&mut sink);
        assert!(!state.playing);
        assert_eq!(sink.last(), Some(AudioCue::StopAndRewind));
    }

    #[test]
    fn test_both_tracks_get_picked() {
        let mut rng = Pcg32::seed_from_u64(5);
        let picks: Vec<Track> = (0..64).map(|_| Track::random(&mut rng)).collect();
        assert!(picks.contains(&Track::Background1));
        assert!(picks.contains(&Track::Background2));
    }

    #[test]
    fn test_state_tracks_playing_without_output() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut state = AudioState::new(true, Track::Background1);
        state.start_new_track(&mut NullAudio, &mut rng);
        assert!(state.playing);
        state.stop(&mut NullAudio);
        assert!(!state.playing);
    }

    #[test]
    fn test_log_sink_drives_state() {
        let mut sink = LogAudio;
        sink.set_music_volume(0.2);
        sink.set_sfx_volume(1.0);

        let mut state = AudioState::new(true, Track::Background2);
        state.apply_preference(&mut sink);
        assert!(state.playing);
        sink.play_once(Clip::Hit);
        state.stop(&mut sink);
        assert!(!state.playing);
    }

    #[test]
    fn test_clip_ids() {
        assert_eq!(Clip::Hit.id(), "hit");
        assert_eq!(Clip::Defeat.id(), "defeat");
    }
}
