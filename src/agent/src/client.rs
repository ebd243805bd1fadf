use common::model::game::{Choice, Outcome};
use tracing::debug;

use crate::strategy::{RandomMove, Round, Strategy};

/// The computer side of a session.
pub struct Computer {
    strategy: Box<dyn Strategy>,
    history: Vec<Round>,
    last_move: Option<Choice>,
}

impl Computer {
    pub fn new(strategy: Box<dyn Strategy>) -> Self {
        Computer {
            strategy,
            history: Vec::new(),
            last_move: None,
        }
    }

    pub fn random(seed: Option<u64>) -> Self {
        let strategy = match seed {
            Some(seed) => RandomMove::seeded(seed),
            None => RandomMove::new(),
        };
        Self::new(Box::new(strategy))
    }

    pub fn play(&mut self) -> Choice {
        let next_move = self.strategy.make_move(&self.history);
        debug!("Computer selected: {}", next_move);
        self.last_move = Some(next_move);
        next_move
    }

    /// Record how the last move fared. The history is what the strategy
    /// sees on its next `make_move`.
    pub fn observe(&mut self, user_move: Choice, outcome: Outcome) {
        let Some(my_move) = self.last_move.take() else {
            return;
        };
        self.history.push(Round {
            my_move,
            their_move: user_move,
            outcome,
        });
    }

    pub fn history(&self) -> &[Round] {
        &self.history
    }
}
