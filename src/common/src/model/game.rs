use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    UserWins,
    ComputerWins,
    Tie,
}

impl Outcome {
    // Same round seen from the other side of the table
    pub fn reversed(self) -> Outcome {
        match self {
            Outcome::UserWins => Outcome::ComputerWins,
            Outcome::ComputerWins => Outcome::UserWins,
            Outcome::Tie => Outcome::Tie,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Choice {
    Rock,
    Paper,
    Scissors,
}

// Indexed by `Choice as usize`: the choice each one defeats.
const BEATS: [Choice; 3] = [Choice::Scissors, Choice::Rock, Choice::Paper];

impl Choice {
    pub const ALL: [Choice; 3] = [Choice::Rock, Choice::Paper, Choice::Scissors];

    pub fn as_str(&self) -> &'static str {
        match self {
            Choice::Rock => "rock",
            Choice::Paper => "paper",
            Choice::Scissors => "scissors",
        }
    }

    /// The single choice this one defeats.
    pub fn beaten(&self) -> Choice {
        BEATS[*self as usize]
    }

    /// The single choice that defeats this one.
    pub fn beaten_by(&self) -> Choice {
        Choice::ALL
            .into_iter()
            .find(|other| other.beaten() == *self)
            .unwrap_or_else(|| unreachable!("beats table is a 3-cycle"))
    }

    pub fn beats(&self, other: &Choice) -> bool {
        self.beaten() == *other
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Exact match against the canonical symbols. Use [`crate::input::normalize`]
/// for user-typed text.
impl FromStr for Choice {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Choice::ALL
            .into_iter()
            .find(|choice| choice.as_str() == s)
            .ok_or_else(|| GameError::InvalidChoice(s.to_owned()))
    }
}

pub fn resolve(user: Choice, computer: Choice) -> Outcome {
    if user == computer {
        Outcome::Tie
    } else if user.beats(&computer) {
        Outcome::UserWins
    } else {
        Outcome::ComputerWins
    }
}
