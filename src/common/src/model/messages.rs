use std::{cmp::Ordering, fmt};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::game::{Choice, Outcome};

#[derive(Debug, Hash, Eq, PartialEq, Clone, Copy)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub user_wins: u32,
    pub computer_wins: u32,
    pub ties: u32,
}

impl Score {
    pub fn new(user_wins: u32, computer_wins: u32, ties: u32) -> Self {
        Score {
            user_wins,
            computer_wins,
            ties,
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::UserWins => self.user_wins += 1,
            Outcome::ComputerWins => self.computer_wins += 1,
            Outcome::Tie => self.ties += 1,
        }
    }

    pub fn rounds_played(&self) -> u32 {
        self.user_wins + self.computer_wins + self.ties
    }

    /// Overall winner by win counts alone; ties are not considered.
    pub fn verdict(&self) -> Outcome {
        match self.user_wins.cmp(&self.computer_wins) {
            Ordering::Greater => Outcome::UserWins,
            Ordering::Less => Outcome::ComputerWins,
            Ordering::Equal => Outcome::Tie,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoundResult {
    pub round: u32,
    pub user: Choice,
    pub computer: Choice,
    pub outcome: Outcome,
    pub score: Score,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(tag = "type")]
pub enum SessionOutcome {
    Completed {
        score: Score,
        verdict: Outcome,
        rounds: u32,
    },
    // `round` is the in-flight round that was discarded
    Abandoned { score: Score, round: u32 },
}

impl SessionOutcome {
    pub fn score(&self) -> Score {
        match self {
            SessionOutcome::Completed { score, .. } | SessionOutcome::Abandoned { score, .. } => {
                *score
            }
        }
    }

    pub fn verdict(&self) -> Option<Outcome> {
        match self {
            SessionOutcome::Completed { verdict, .. } => Some(*verdict),
            SessionOutcome::Abandoned { .. } => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SessionReport {
    pub outcome: SessionOutcome,
    pub rounds: Vec<RoundResult>,
}
