//! Best-score record
//!
//! A single integer persisted under the key `"record"`.

use crate::persistence::KeyValueStore;

/// Storage key for the best score
pub const RECORD_KEY: &str = "record";

/// Outcome of submitting a finished run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Submission {
    /// Best score after this run
    pub high_score: u32,
    /// Whether this run set it
    pub new_record: bool,
}

/// Persisted best score
pub trait HighScoreStore {
    /// Best score so far, 0 if none
    fn high_score(&self) -> u32;
    fn set_high_score(&mut self, score: u32);

    /// Record `score` if it beats the stored best. Writes nothing otherwise,
    /// so submitting the same score twice writes at most once.
    fn submit(&mut self, score: u32) -> Submission {
        let best = self.high_score();
        if score > best {
            self.set_high_score(score);
            Submission {
                high_score: score,
                new_record: true,
            }
        } else {
            Submission {
                high_score: best,
                new_record: false,
            }
        }
    }
}

/// Best score kept in a key-value store
#[derive(Debug, Clone, Default)]
pub struct Record<S> {
    store: S,
}

impl<S: KeyValueStore> Record<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

impl<S: KeyValueStore> HighScoreStore for Record<S> {
    fn high_score(&self) -> u32 {
        match self.store.get(RECORD_KEY) {
            Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                log::warn!("Ignoring unreadable record {:?}", raw);
                0
            }),
            None => 0,
        }
    }

    fn set_high_score(&mut self, score: u32) {
        self.store.set(RECORD_KEY, &score.to_string());
        log::info!("New record saved: {}", score);
    }
}
