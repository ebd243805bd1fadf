use std::io::Write;

use common::{
    error::Result,
    model::{
        game::Outcome,
        messages::{RoundResult, Score, SessionId, SessionOutcome},
    },
};

use super::session::SessionObserver;

const WIDE_RULE: usize = 50;
const ROUND_RULE: usize = 30;

/// Renders a session as plain text.
pub struct Scoreboard<W> {
    out: W,
    verbose: bool,
    rounds: u32,
}

impl<W: Write + Send> Scoreboard<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Scoreboard {
            out,
            verbose,
            rounds: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn rule(&mut self, width: usize) -> Result<()> {
        writeln!(self.out, "{}", "=".repeat(width))?;
        Ok(())
    }

    fn score_line(&mut self, label: &str, score: &Score) -> Result<()> {
        writeln!(
            self.out,
            "{} - You: {} | Computer: {} | Ties: {}",
            label, score.user_wins, score.computer_wins, score.ties
        )?;
        Ok(())
    }
}

fn plural(rounds: u32) -> &'static str {
    if rounds == 1 {
        ""
    } else {
        "s"
    }
}

pub fn result_message(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::UserWins => "You win!",
        Outcome::ComputerWins => "You lose!",
        Outcome::Tie => "It's a tie!",
    }
}

pub fn verdict_message(verdict: Outcome) -> &'static str {
    match verdict {
        Outcome::UserWins => "🎉 You won the game!",
        Outcome::ComputerWins => "💻 Computer won the game!",
        Outcome::Tie => "🤝 It's a tie overall!",
    }
}

impl<W: Write + Send> SessionObserver for Scoreboard<W> {
    fn session_started(&mut self, _id: SessionId, rounds: u32) -> Result<()> {
        self.rounds = rounds;
        writeln!(self.out)?;
        self.rule(WIDE_RULE)?;
        writeln!(self.out, "Playing {} round{}", rounds, plural(rounds))?;
        self.rule(WIDE_RULE)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn round_started(&mut self, round: u32, rounds: u32) -> Result<()> {
        writeln!(self.out, "Round {}/{}", round, rounds)?;
        writeln!(self.out, "{}", "-".repeat(ROUND_RULE))?;
        Ok(())
    }

    fn round_finished(&mut self, result: &RoundResult) -> Result<()> {
        if self.verbose {
            writeln!(self.out, "\nYou chose: {}", result.user)?;
        }
        writeln!(self.out, "Computer chose: {}", result.computer)?;
        writeln!(self.out, "{}", result_message(result.outcome))?;
        writeln!(self.out)?;
        self.score_line("Current Score", &result.score)?;
        if result.round < self.rounds {
            writeln!(self.out)?;
        }
        self.out.flush()?;
        Ok(())
    }

    fn session_finished(&mut self, outcome: &SessionOutcome) -> Result<()> {
        match outcome {
            SessionOutcome::Completed { score, verdict, .. } => {
                writeln!(self.out)?;
                self.rule(WIDE_RULE)?;
                writeln!(self.out, "GAME OVER - Final Score")?;
                self.rule(WIDE_RULE)?;
                writeln!(self.out, "You: {}", score.user_wins)?;
                writeln!(self.out, "Computer: {}", score.computer_wins)?;
                writeln!(self.out, "Ties: {}", score.ties)?;
                writeln!(self.out, "\n{}", verdict_message(*verdict))?;
                self.rule(WIDE_RULE)?;
                writeln!(self.out)?;
            }
            SessionOutcome::Abandoned { score, .. } => {
                writeln!(self.out, "\n\nGame interrupted by user. Goodbye!")?;
                self.score_line("Score so far", score)?;
            }
        }
        self.out.flush()?;
        Ok(())
    }
}
