use std::io::{self, IsTerminal, Write};

use agent::client::Computer;
use common::{
    error::Result,
    model::messages::{SessionOutcome, SessionReport},
};
use tokio::sync::broadcast;
use tracing::info;

use super::service::{
    player_input::{MenuInput, MoveSupplier, TextInput},
    scoreboard::Scoreboard,
    session::Session,
};

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_INTERRUPTED: u8 = 130;

#[derive(Debug, Clone)]
pub struct GameConfig {
    pub rounds: i64,
    pub verbose: bool,
    // Offer the arrow-key menu when stdin is a terminal
    pub menu: bool,
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            rounds: 1,
            verbose: false,
            menu: true,
            seed: None,
        }
    }
}

/// Play one session on the process's terminal.
pub async fn serve(
    config: GameConfig,
    interrupt: broadcast::Receiver<()>,
) -> Result<SessionReport> {
    let mut input: Box<dyn MoveSupplier> = if config.menu && io::stdin().is_terminal() {
        Box::new(MenuInput::new(TextInput::stdio()))
    } else {
        Box::new(TextInput::stdio())
    };
    run(config, input.as_mut(), io::stdout(), interrupt).await
}

pub async fn run<W: Write + Send>(
    config: GameConfig,
    input: &mut dyn MoveSupplier,
    out: W,
    mut interrupt: broadcast::Receiver<()>,
) -> Result<SessionReport> {
    let session = Session::new(config.rounds, Computer::random(config.seed))?;
    info!(
        "Starting game with {} round{}",
        session.rounds(),
        if session.rounds() > 1 { "s" } else { "" }
    );
    let mut scoreboard = Scoreboard::new(out, config.verbose);
    session.play(input, &mut scoreboard, &mut interrupt).await
}

/// Show the cursor again if a menu was cut off while it had it hidden. The
/// menu draws on stderr.
pub fn restore_terminal() -> io::Result<()> {
    let term = console::Term::stderr();
    if term.is_term() {
        term.show_cursor()?;
    }
    Ok(())
}

pub fn exit_code(result: &Result<SessionReport>) -> u8 {
    match result {
        Ok(SessionReport {
            outcome: SessionOutcome::Completed { .. },
            ..
        }) => EXIT_SUCCESS,
        Ok(SessionReport {
            outcome: SessionOutcome::Abandoned { .. },
            ..
        }) => EXIT_INTERRUPTED,
        Err(_) => EXIT_FAILURE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::player_input::{ScriptedInput, WhenExhausted};
    use common::{error::GameError, model::messages::Score};

    fn config(rounds: i64) -> GameConfig {
        GameConfig {
            rounds,
            seed: Some(11),
            ..GameConfig::default()
        }
    }

    fn scripted(raw: &[&str]) -> ScriptedInput {
        ScriptedInput::new(raw.iter().map(|s| s.to_string()).collect())
    }

    #[tokio::test]
    async fn completed_game_exits_cleanly() {
        let (_sender, interrupt) = broadcast::channel(1);
        let mut out = Vec::new();
        let result = run(
            config(3),
            &mut scripted(&["rock", "paper", "scissors"]),
            &mut out,
            interrupt,
        )
        .await;

        assert_eq!(exit_code(&result), EXIT_SUCCESS);
        assert_eq!(result.unwrap().outcome.score().rounds_played(), 3);
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Playing 3 rounds"));
        assert!(text.contains("GAME OVER - Final Score"));
    }

    #[tokio::test]
    async fn invalid_round_count_fails_before_playing() {
        let (_sender, interrupt) = broadcast::channel(1);
        let mut out = Vec::new();
        let result = run(config(0), &mut scripted(&["rock"]), &mut out, interrupt).await;

        assert!(matches!(result, Err(GameError::InvalidArgument(0))));
        assert_eq!(exit_code(&result), EXIT_FAILURE);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn interrupt_maps_to_distinct_exit_code() {
        let (sender, interrupt) = broadcast::channel(1);
        sender.send(()).unwrap();
        let mut input = scripted(&[]).when_exhausted(WhenExhausted::Wait);
        let result = run(config(5), &mut input, Vec::new(), interrupt).await;

        assert_eq!(exit_code(&result), EXIT_INTERRUPTED);
        assert_eq!(result.unwrap().outcome.score(), Score::default());
    }

    #[tokio::test]
    async fn closed_input_is_a_failure() {
        let (_sender, interrupt) = broadcast::channel(1);
        let result = run(config(2), &mut scripted(&["rock"]), Vec::new(), interrupt).await;
        assert_eq!(exit_code(&result), EXIT_FAILURE);
    }

    #[test]
    fn restoring_terminal_never_fails_off_a_tty() {
        restore_terminal().unwrap();
        restore_terminal().unwrap();
    }

    #[tokio::test]
    async fn seeded_games_replay_identically() {
        let mut reports = Vec::new();
        for _ in 0..2 {
            let (_sender, interrupt) = broadcast::channel(1);
            let mut input = ScriptedInput::repeating(common::model::game::Choice::Rock);
            let report = run(config(20), &mut input, Vec::new(), interrupt)
                .await
                .unwrap();
            reports.push(report);
        }
        assert_eq!(reports[0], reports[1]);
    }
}
