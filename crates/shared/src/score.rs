//! Distance-based round scoring.

use serde::{Deserialize, Serialize};

use crate::models::Point;

pub const MAX_ROUND_SCORE: u32 = 5000;
/// Guesses within this many world units of the answer earn full marks.
pub const SCORE_LENIENCY: f64 = 50.0;
pub const SCORE_DROP_OFF: f64 = 0.001;

/// Score for one round. No guess scores zero.
pub fn round_score(guess: Option<Point>, correct: Point, max: u32) -> u32 {
    let Some(guess) = guess else {
        return 0;
    };
    let distance = guess.distance(correct);
    let raw = f64::from(max) * (-SCORE_DROP_OFF * (distance - SCORE_LENIENCY)).exp();
    if !raw.is_finite() {
        return 0;
    }
    (raw.round() as u32).min(max)
}

/// Running total across the rounds of a game.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoundTally {
    pub rounds_played: u32,
    pub total: u32,
    pub last_round: Option<u32>,
}

impl RoundTally {
    /// Score a finished round and add it to the total.
    pub fn record(&mut self, guess: Option<Point>, correct: Point) -> u32 {
        let score = round_score(guess, correct, MAX_ROUND_SCORE);
        self.rounds_played += 1;
        self.total += score;
        self.last_round = Some(score);
        score
    }

    /// Highest total reachable over the rounds played so far.
    pub fn max_total(&self) -> u32 {
        self.rounds_played * MAX_ROUND_SCORE
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
