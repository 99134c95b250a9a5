//! High score persistence
//!
//! A single integer under one storage key, kept as the max across sessions.

use serde::{Deserialize, Serialize};

use crate::persistence::{self, KeyValueStore, StorageError};

/// Best score seen across sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HighScore {
    pub best: u64,
}

impl HighScore {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "highestScore";

    pub fn new(best: u64) -> Self {
        Self { best }
    }

    /// Keep `score` if it beats the current best. Returns whether it did.
    pub fn record(&mut self, score: u64) -> bool {
        if score > self.best {
            self.best = score;
            true
        } else {
            false
        }
    }

    /// Read the stored best; a missing or unreadable slot counts as zero
    pub fn load(store: &impl KeyValueStore) -> Self {
        let high = persistence::load_or_default::<HighScore>(store, Self::STORAGE_KEY);
        log::info!("High score: {}", high.best);
        high
    }

    pub fn save(&self, store: &mut impl KeyValueStore) -> Result<(), StorageError> {
        persistence::save_json(store, Self::STORAGE_KEY, self)?;
        log::info!("High score saved ({})", self.best);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;

    #[test]
    fn test_record_keeps_max() {
        let mut high = HighScore::new(10);
        assert!(!high.record(10));
        assert!(!high.record(3));
        assert!(high.record(11));
        assert_eq!(high.best, 11);
    }

    #[test]
    fn test_stored_as_plain_integer() {
        let mut store = MemoryStore::default();
        HighScore::new(42).save(&mut store).expect("save");
        assert_eq!(
            store.get(HighScore::STORAGE_KEY).expect("get").as_deref(),
            Some("42")
        );
        assert_eq!(HighScore::load(&store).best, 42);
    }

    #[test]
    fn test_missing_or_garbage_is_zero() {
        let mut store = MemoryStore::default();
        assert_eq!(HighScore::load(&store).best, 0);
        store.set(HighScore::STORAGE_KEY, "lots").expect("set");
        assert_eq!(HighScore::load(&store).best, 0);
    }
}
