use std::collections::BTreeMap;

use serde::Serialize;

use crate::game::GameId;

/// Best score per game for one player session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighScores {
    best: BTreeMap<GameId, u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScoreEntry {
    pub game_id: GameId,
    pub score: u64,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run. Returns true if `score` beats the previous best.
    pub fn record(&mut self, game_id: GameId, score: u64) -> bool {
        match self.best.get(&game_id) {
            Some(&best) if best >= score => false,
            _ => {
                tracing::debug!(game = %game_id, score, "New high score");
                self.best.insert(game_id, score);
                true
            },
        }
    }

    pub fn best(&self, game_id: &GameId) -> Option<u64> {
        self.best.get(game_id).copied()
    }

    /// All best scores ordered by game id.
    pub fn entries(&self) -> Vec<ScoreEntry> {
        self.best
            .iter()
            .map(|(game_id, &score)| ScoreEntry {
                game_id: game_id.clone(),
                score,
            })
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.best.is_empty()
    }
}
