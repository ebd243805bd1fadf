use std::fmt;

use thiserror::Error;

/// Where in a round a fault happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingInput,
    Resolving,
    Scored,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let stage = match self {
            Stage::AwaitingInput => "waiting for input",
            Stage::Resolving => "resolving",
            Stage::Scored => "scoring",
        };
        f.write_str(stage)
    }
}

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Invalid choice '{0}': expected one of rock, paper, scissors")]
    InvalidChoice(String),

    #[error("Number of rounds must be at least 1, got {0}")]
    InvalidArgument(i64),

    #[error("Interrupted by user")]
    Interrupted,

    #[error("Input closed before a choice was made")]
    InputClosed,

    #[error("Round {round} failed while {stage}: {source}")]
    RoundFault {
        round: u32,
        stage: Stage,
        #[source]
        source: Box<GameError>,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl GameError {
    pub fn in_round(self, round: u32, stage: Stage) -> GameError {
        GameError::RoundFault {
            round,
            stage,
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
