use anyhow::{Result, bail};
use chrono::Utc;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::storage::{KeyValueStore, load_json, save_json};
use super::word::MAX_GUESSES;

pub const STATS_KEY: &str = "stats";
pub const HISTORY_LIMIT: usize = 50;
/// Narrowest bar in the distribution chart, in percent.
pub const MIN_BAR_WIDTH: u32 = 7;

#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameResult {
    Won,
    Lost,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub word: String,
    pub result: GameResult,
    pub attempts: u8,
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    #[serde(default)]
    pub games_played: u32,
    #[serde(default)]
    pub games_won: u32,
    #[serde(default)]
    pub current_streak: u32,
    #[serde(default)]
    pub max_streak: u32,
    #[serde(default = "empty_distribution")]
    pub guess_distribution: BTreeMap<u8, u32>,
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
}

fn empty_distribution() -> BTreeMap<u8, u32> {
    (1..=MAX_GUESSES as u8).map(|n| (n, 0)).collect()
}

impl Default for Stats {
    fn default() -> Self {
        Stats {
            games_played: 0,
            games_won: 0,
            current_streak: 0,
            max_streak: 0,
            guess_distribution: empty_distribution(),
            history: Vec::new(),
        }
    }
}

/// One row of the distribution chart.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct DistributionRow {
    pub guesses: u8,
    pub count: u32,
    /// Bar width in percent of the widest row, never below [`MIN_BAR_WIDTH`].
    pub width: u32,
}

impl Stats {
    pub fn record_result(&mut self, word: &str, won: bool, attempts: u8, timestamp: i64) -> Result<()> {
        if attempts == 0 || attempts as usize > MAX_GUESSES {
            bail!("attempts must be within 1..={MAX_GUESSES}, got {attempts}");
        }

        self.games_played += 1;
        if won {
            self.games_won += 1;
            self.current_streak += 1;
            self.max_streak = self.max_streak.max(self.current_streak);
            *self.guess_distribution.entry(attempts).or_insert(0) += 1;
        } else {
            self.current_streak = 0;
        }

        self.history.push(HistoryEntry {
            word: word.to_string(),
            result: if won { GameResult::Won } else { GameResult::Lost },
            attempts,
            timestamp,
        });
        Ok(())
    }

    pub fn win_percentage(&self) -> u32 {
        if self.games_played == 0 {
            return 0;
        }
        (100.0 * self.games_won as f64 / self.games_played as f64).round() as u32
    }

    pub fn distribution_rows(&self) -> Vec<DistributionRow> {
        let max_count = self
            .guess_distribution
            .values()
            .copied()
            .max()
            .unwrap_or(0)
            .max(1);

        (1..=MAX_GUESSES as u8)
            .map(|guesses| {
                let count = self.guess_distribution.get(&guesses).copied().unwrap_or(0);
                let width = (100.0 * count as f64 / max_count as f64).round() as u32;
                DistributionRow {
                    guesses,
                    count,
                    width: width.max(MIN_BAR_WIDTH),
                }
            })
            .collect()
    }

    /// The latest games, newest first.
    pub fn recent_history(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().rev().take(HISTORY_LIMIT)
    }
}

/// Stats bound to the store they persist in.
pub struct StatsStore {
    store: Box<dyn KeyValueStore>,
    stats: Stats,
}

impl StatsStore {
    /// Loads the saved stats. Missing or unreadable data starts from zero.
    pub fn load(store: Box<dyn KeyValueStore>) -> Self {
        let stats = match load_json::<Stats>(store.as_ref(), STATS_KEY) {
            Ok(Some(stats)) => stats,
            Ok(None) => Stats::default(),
            Err(e) => {
                warn!("{e:#}, starting with empty stats");
                Stats::default()
            }
        };
        StatsStore { store, stats }
    }

    pub fn stats(&self) -> &Stats {
        &self.stats
    }

    pub fn record_result(&mut self, word: &str, won: bool, attempts: u8) -> Result<()> {
        self.record_result_at(word, won, attempts, Utc::now().timestamp_millis())
    }

    pub fn record_result_at(
        &mut self,
        word: &str,
        won: bool,
        attempts: u8,
        timestamp: i64,
    ) -> Result<()> {
        self.stats.record_result(word, won, attempts, timestamp)?;
        debug!(
            "recorded {} for {word} in {attempts}, streak {}",
            if won { "win" } else { "loss" },
            self.stats.current_streak
        );
        save_json(self.store.as_mut(), STATS_KEY, &self.stats)
    }
}
