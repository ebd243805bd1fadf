use agent::client::Computer;
use common::{
    error::{GameError, Result, Stage},
    model::{
        game::{resolve, Choice},
        messages::{RoundResult, Score, SessionId, SessionOutcome, SessionReport},
    },
};
use tokio::sync::broadcast;
use tracing::{debug, error, info, info_span, warn, Instrument};

use super::player_input::MoveSupplier;

/// Receives session events as they happen. Every hook defaults to doing
/// nothing; a failing hook ends the session with a fault.
pub trait SessionObserver: Send {
    fn session_started(&mut self, _id: SessionId, _rounds: u32) -> Result<()> {
        Ok(())
    }

    fn round_started(&mut self, _round: u32, _rounds: u32) -> Result<()> {
        Ok(())
    }

    fn round_finished(&mut self, _result: &RoundResult) -> Result<()> {
        Ok(())
    }

    fn session_finished(&mut self, _outcome: &SessionOutcome) -> Result<()> {
        Ok(())
    }
}

pub struct NoopObserver;
impl SessionObserver for NoopObserver {}

enum SessionPhase {
    AwaitingInput { round: u32 },
    Resolving { round: u32, user: Choice },
    Scored { round: u32 },
    Complete,
}

pub struct Session {
    id: SessionId,
    rounds: u32,
    computer: Computer,
    score: Score,
    results: Vec<RoundResult>,
}

impl Session {
    pub fn new(rounds: i64, computer: Computer) -> Result<Self> {
        let rounds = u32::try_from(rounds)
            .ok()
            .filter(|rounds| *rounds >= 1)
            .ok_or(GameError::InvalidArgument(rounds))?;
        Ok(Session {
            id: SessionId::new(),
            rounds,
            computer,
            score: Score::default(),
            results: Vec::new(),
        })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Play every round in order. Consumes the session.
    ///
    /// An interrupt while waiting for the user's move discards that round and
    /// returns [`SessionOutcome::Abandoned`] with the score so far.
    pub async fn play(
        self,
        input: &mut dyn MoveSupplier,
        observer: &mut dyn SessionObserver,
        interrupt: &mut broadcast::Receiver<()>,
    ) -> Result<SessionReport> {
        let span = info_span!("session", id = %self.id);
        self.run(input, observer, interrupt).instrument(span).await
    }

    async fn run(
        mut self,
        input: &mut dyn MoveSupplier,
        observer: &mut dyn SessionObserver,
        interrupt: &mut broadcast::Receiver<()>,
    ) -> Result<SessionReport> {
        info!("Starting game session with {} rounds", self.rounds);
        observer.session_started(self.id, self.rounds)?;

        let mut phase = SessionPhase::AwaitingInput { round: 1 };
        loop {
            phase = match phase {
                SessionPhase::AwaitingInput { round } => {
                    observer
                        .round_started(round, self.rounds)
                        .map_err(|e| e.in_round(round, Stage::AwaitingInput))?;
                    tokio::select! {
                        biased;
                        choice = input.next_choice(round) => match choice {
                            Ok(user) => SessionPhase::Resolving { round, user },
                            Err(GameError::Interrupted) => {
                                return self.abandon(round, observer);
                            }
                            Err(e) => {
                                error!("Round {} failed waiting for input: {}", round, e);
                                return Err(e.in_round(round, Stage::AwaitingInput));
                            }
                        },
                        Ok(()) = interrupt.recv() => {
                            return self.abandon(round, observer);
                        }
                    }
                }
                SessionPhase::Resolving { round, user } => {
                    let computer = self.computer.play();
                    debug!("Comparing: user={} vs computer={}", user, computer);
                    let outcome = resolve(user, computer);
                    self.score.record(outcome);
                    self.computer.observe(user, outcome);
                    info!("Round {} result: {:?}", round, outcome);

                    self.results.push(RoundResult {
                        round,
                        user,
                        computer,
                        outcome,
                        score: self.score,
                    });
                    SessionPhase::Scored { round }
                }
                SessionPhase::Scored { round } => {
                    if let Some(result) = self.results.last() {
                        observer
                            .round_finished(result)
                            .map_err(|e| e.in_round(round, Stage::Scored))?;
                    }
                    if round < self.rounds {
                        SessionPhase::AwaitingInput { round: round + 1 }
                    } else {
                        SessionPhase::Complete
                    }
                }
                SessionPhase::Complete => break,
            };
        }

        let verdict = self.score.verdict();
        info!(
            "Game session completed: {:?} ({}-{}, {} ties)",
            verdict, self.score.user_wins, self.score.computer_wins, self.score.ties
        );
        let outcome = SessionOutcome::Completed {
            score: self.score,
            verdict,
            rounds: self.rounds,
        };
        observer.session_finished(&outcome)?;
        Ok(SessionReport {
            outcome,
            rounds: self.results,
        })
    }

    fn abandon(self, round: u32, observer: &mut dyn SessionObserver) -> Result<SessionReport> {
        warn!(
            "Game interrupted by user in round {} of {}",
            round, self.rounds
        );
        let outcome = SessionOutcome::Abandoned {
            score: self.score,
            round,
        };
        observer.session_finished(&outcome)?;
        Ok(SessionReport {
            outcome,
            rounds: self.results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::player_input::{ScriptedInput, WhenExhausted};
    use agent::strategy::{Fixed, RandomMove, Scripted};
    use common::model::game::Outcome;
    use std::io;

    fn computer(moves: &[Choice]) -> Computer {
        Computer::new(Box::new(Scripted::new(moves.to_vec())))
    }

    fn inputs(raw: &[&str]) -> ScriptedInput {
        ScriptedInput::new(raw.iter().map(|s| s.to_string()).collect())
    }

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
    }
    impl SessionObserver for Recorder {
        fn session_started(&mut self, _id: SessionId, rounds: u32) -> Result<()> {
            self.events.push(format!("start {rounds}"));
            Ok(())
        }
        fn round_started(&mut self, round: u32, rounds: u32) -> Result<()> {
            self.events.push(format!("round {round}/{rounds}"));
            Ok(())
        }
        fn round_finished(&mut self, result: &RoundResult) -> Result<()> {
            self.events.push(format!("result {} {:?}", result.round, result.outcome));
            Ok(())
        }
        fn session_finished(&mut self, outcome: &SessionOutcome) -> Result<()> {
            self.events.push(format!("finish {:?}", outcome.verdict()));
            Ok(())
        }
    }

    async fn play(
        session: Session,
        input: &mut ScriptedInput,
        observer: &mut dyn SessionObserver,
    ) -> Result<SessionReport> {
        let (_sender, mut interrupt) = broadcast::channel(1);
        session.play(input, observer, &mut interrupt).await
    }

    #[tokio::test]
    async fn user_sweeps_three_rounds() {
        let session = Session::new(
            3,
            computer(&[Choice::Scissors, Choice::Rock, Choice::Paper]),
        )
        .unwrap();
        let report = play(
            session,
            &mut inputs(&["rock", "paper", "scissors"]),
            &mut NoopObserver,
        )
        .await
        .unwrap();

        assert!(report
            .rounds
            .iter()
            .all(|round| round.outcome == Outcome::UserWins));
        assert_eq!(
            report.outcome,
            SessionOutcome::Completed {
                score: Score::new(3, 0, 0),
                verdict: Outcome::UserWins,
                rounds: 3,
            }
        );
    }

    #[tokio::test]
    async fn single_tie() {
        let session = Session::new(1, computer(&[Choice::Rock])).unwrap();
        let report = play(session, &mut inputs(&["rock"]), &mut NoopObserver)
            .await
            .unwrap();
        assert_eq!(report.rounds[0].outcome, Outcome::Tie);
        assert_eq!(report.outcome.score(), Score::new(0, 0, 1));
        assert_eq!(report.outcome.verdict(), Some(Outcome::Tie));
    }

    #[test]
    fn rejects_non_positive_round_counts() {
        for rounds in [0, -1, -100] {
            assert!(matches!(
                Session::new(rounds, computer(&[Choice::Rock])),
                Err(GameError::InvalidArgument(r)) if r == rounds
            ));
        }
        assert!(matches!(
            Session::new(i64::MAX, computer(&[Choice::Rock])),
            Err(GameError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn largest_round_count_starts_without_reserving() {
        let session = Session::new(
            u32::MAX as i64,
            Computer::new(Box::new(Fixed(Choice::Rock))),
        )
        .unwrap();
        assert_eq!(session.rounds(), u32::MAX);

        let mut input = inputs(&["paper", "rock"]).when_exhausted(WhenExhausted::Interrupt);
        let report = play(session, &mut input, &mut NoopObserver).await.unwrap();
        assert_eq!(
            report.outcome,
            SessionOutcome::Abandoned {
                score: Score::new(1, 0, 1),
                round: 3,
            }
        );
    }

    #[tokio::test]
    async fn every_round_is_scored_exactly_once() {
        let rounds = 200;
        let session = Session::new(rounds, Computer::new(Box::new(RandomMove::seeded(3)))).unwrap();
        let mut input = ScriptedInput::repeating(Choice::Paper);
        let report = play(session, &mut input, &mut NoopObserver).await.unwrap();

        let score = report.outcome.score();
        assert_eq!(score.rounds_played(), rounds as u32);
        assert_eq!(report.rounds.len(), rounds as usize);
        for pair in report.rounds.windows(2) {
            assert_eq!(pair[1].score.rounds_played(), pair[0].score.rounds_played() + 1);
        }
    }

    #[tokio::test]
    async fn results_are_emitted_before_next_round() {
        let session = Session::new(2, Computer::new(Box::new(Fixed(Choice::Rock)))).unwrap();
        let mut recorder = Recorder::default();
        play(session, &mut inputs(&["paper", "scissors"]), &mut recorder)
            .await
            .unwrap();
        assert_eq!(
            recorder.events,
            vec![
                "start 2",
                "round 1/2",
                "result 1 UserWins",
                "round 2/2",
                "result 2 ComputerWins",
                "finish Some(Tie)",
            ]
        );
    }

    #[tokio::test]
    async fn interrupt_signal_abandons_in_flight_round() {
        let session = Session::new(5, computer(&[Choice::Scissors])).unwrap();
        let mut input = inputs(&["rock"]).when_exhausted(WhenExhausted::Wait);
        let mut recorder = Recorder::default();
        let (sender, mut interrupt) = broadcast::channel(1);
        sender.send(()).unwrap();

        let report = session
            .play(&mut input, &mut recorder, &mut interrupt)
            .await
            .unwrap();

        assert_eq!(
            report.outcome,
            SessionOutcome::Abandoned {
                score: Score::new(1, 0, 0),
                round: 2,
            }
        );
        assert_eq!(report.outcome.verdict(), None);
        assert_eq!(report.rounds.len(), 1);
        assert_eq!(recorder.events.last().unwrap(), "finish None");
    }

    #[tokio::test]
    async fn supplier_interrupt_abandons_session() {
        let session = Session::new(3, computer(&[Choice::Paper])).unwrap();
        let mut input = inputs(&["scissors"]).when_exhausted(WhenExhausted::Interrupt);
        let report = play(session, &mut input, &mut NoopObserver).await.unwrap();
        assert_eq!(
            report.outcome,
            SessionOutcome::Abandoned {
                score: Score::new(1, 0, 0),
                round: 2,
            }
        );
    }

    #[tokio::test]
    async fn closed_interrupt_channel_is_not_an_interrupt() {
        let session = Session::new(1, computer(&[Choice::Paper])).unwrap();
        let (sender, mut interrupt) = broadcast::channel::<()>(1);
        drop(sender);
        let report = session
            .play(&mut inputs(&["rock"]), &mut NoopObserver, &mut interrupt)
            .await
            .unwrap();
        assert_eq!(report.outcome.verdict(), Some(Outcome::ComputerWins));
    }

    #[tokio::test]
    async fn input_failure_names_round_and_stage() {
        let session = Session::new(2, computer(&[Choice::Paper])).unwrap();
        let error = play(session, &mut inputs(&["rock"]), &mut NoopObserver)
            .await
            .unwrap_err();
        assert!(matches!(
            error,
            GameError::RoundFault {
                round: 2,
                stage: Stage::AwaitingInput,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn display_failure_stops_session() {
        struct BrokenDisplay;
        impl SessionObserver for BrokenDisplay {
            fn round_finished(&mut self, _result: &RoundResult) -> Result<()> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed").into())
            }
        }

        let session = Session::new(3, computer(&[Choice::Paper])).unwrap();
        let error = play(
            session,
            &mut inputs(&["rock", "rock", "rock"]),
            &mut BrokenDisplay,
        )
        .await
        .unwrap_err();
        assert!(matches!(
            error,
            GameError::RoundFault {
                round: 1,
                stage: Stage::Scored,
                ..
            }
        ));
    }
}
