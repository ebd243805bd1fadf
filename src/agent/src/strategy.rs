use common::model::game::{Choice, Outcome};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;

#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub my_move: Choice,
    pub their_move: Choice,
    // From the user's side, as resolved
    pub outcome: Outcome,
}

/// Picks the computer's next move. `history` holds every resolved round so
/// far; the strategies here draw without looking at it, but adaptive ones
/// can.
pub trait Strategy: Send {
    fn make_move(&mut self, history: &[Round]) -> Choice;
}

// Trivial strategy
pub struct Fixed(pub Choice);
impl Strategy for Fixed {
    fn make_move(&mut self, _: &[Round]) -> Choice {
        self.0
    }
}

/// Replays a fixed sequence, starting over once it runs out.
pub struct Scripted {
    moves: Vec<Choice>,
    next: usize,
}
impl Scripted {
    pub fn new(moves: Vec<Choice>) -> Self {
        assert!(!moves.is_empty(), "Scripted strategy needs at least one move");
        Scripted { moves, next: 0 }
    }
}
impl Strategy for Scripted {
    fn make_move(&mut self, _: &[Round]) -> Choice {
        let choice = self.moves[self.next % self.moves.len()];
        self.next += 1;
        choice
    }
}

// Uniform over all choices, independent of history
pub struct RandomMove {
    rng: ChaCha8Rng,
}
impl RandomMove {
    pub fn new() -> Self {
        RandomMove {
            rng: ChaCha8Rng::from_entropy(),
        }
    }

    pub fn seeded(seed: u64) -> Self {
        RandomMove {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }
}
impl Default for RandomMove {
    fn default() -> Self {
        Self::new()
    }
}
impl Strategy for RandomMove {
    fn make_move(&mut self, _: &[Round]) -> Choice {
        *Choice::ALL
            .choose(&mut self.rng)
            .unwrap_or_else(|| unreachable!("choice set is never empty"))
    }
}
