//! Fastest-time leaderboard
//!
//! Persisted to LocalStorage, ordered by run time ascending.

use serde::{Deserialize, Serialize};

/// Entries shown on the leaderboard screen
pub const TOP_N: usize = 10;

/// Entries kept in storage (enough for per-year views)
pub const MAX_STORED_ENTRIES: usize = 100;

/// Longest accepted player name, in characters
pub const MAX_NAME_LEN: usize = 20;

/// A single completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub id: u64,
    pub name: String,
    /// Whole milliseconds across every tier
    pub time_ms: u64,
    /// School year the run was played at
    pub year_level: u8,
}

/// Local leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
    #[serde(default)]
    next_id: u64,
}

impl Leaderboard {
    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "parkour_master_leaderboard";

    pub fn new() -> Self {
        Self::default()
    }

    /// Record a run, returning the new entry's id
    ///
    /// The name is trimmed and cut to `MAX_NAME_LEN` characters; an empty name
    /// or a non-finite time is rejected.
    pub fn submit(&mut self, name: &str, time_ms: f64, year_level: u8) -> Option<u64> {
        let name: String = name.trim().chars().take(MAX_NAME_LEN).collect();
        if name.is_empty() || !time_ms.is_finite() || time_ms < 0.0 {
            return None;
        }

        self.next_id = self.next_id.max(self.entries.iter().map(|e| e.id).max().unwrap_or(0)) + 1;
        let entry = LeaderboardEntry {
            id: self.next_id,
            name,
            time_ms: time_ms.round() as u64,
            year_level,
        };

        // Stable: ties keep submission order
        let pos = self.entries.iter().position(|e| entry.time_ms < e.time_ms);
        match pos {
            Some(i) => self.entries.insert(i, entry),
            None => self.entries.push(entry),
        }
        self.entries.truncate(MAX_STORED_ENTRIES);

        // Truncation may have dropped the new entry itself
        let id = self.next_id;
        self.entries.iter().any(|e| e.id == id).then_some(id)
    }

    /// The `n` fastest runs, optionally for one school year
    pub fn top(&self, n: usize, year_level: Option<u8>) -> Vec<&LeaderboardEntry> {
        self.entries
            .iter()
            .filter(|e| year_level.is_none_or(|y| e.year_level == y))
            .take(n)
            .collect()
    }

    /// 1-indexed position of an entry among all runs
    pub fn rank_of(&self, id: u64) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id).map(|i| i + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Best time (if any)
    pub fn best_time(&self) -> Option<u64> {
        self.entries.first().map(|e| e.time_ms)
    }

    /// Load the leaderboard from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match serde_json::from_str::<Leaderboard>(&json) {
                    Ok(mut board) => {
                        board.entries.sort_by_key(|e| e.time_ms);
                        log::info!("Loaded {} leaderboard entries", board.entries.len());
                        return board;
                    }
                    Err(e) => log::warn!("Failed to parse leaderboard: {:?}", e),
                }
            }
        }

        log::info!("No leaderboard found, starting fresh");
        Self::new()
    }

    /// Save the leaderboard to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                match storage.set_item(Self::STORAGE_KEY, &json) {
                    Ok(()) => log::info!("Leaderboard saved ({} entries)", self.entries.len()),
                    Err(e) => log::warn!("Failed to save leaderboard: {:?}", e),
                }
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::new()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}

/// Format a run time as `m:ss.t`
pub fn format_time(ms: f64) -> String {
    let tenths = (ms.max(0.0) / 100.0).floor() as u64;
    let secs = tenths / 10;
    format!("{}:{:02}.{}", secs / 60, secs % 60, tenths % 10)
}
