use std::{
    collections::VecDeque,
    io::{self, Write},
};

use async_trait::async_trait;
use common::{
    error::{GameError, Result},
    input::normalize,
    model::game::Choice,
};
use dialoguer::Select;
use serde::Deserialize;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader, Lines, Stdin};
use tracing::{debug, warn};

pub const PROMPT: &str = "Enter your choice (rock, paper, scissors): ";
pub const INVALID_CHOICE: &str = "Invalid choice. Please try again.";

const MENU_PROMPT: &str = "Select your choice";
const MENU_ITEMS: [&str; 3] = ["1. 🪨 Rock", "2. 📄 Paper", "3. ✂️  Scissors"];

/// User side of a session. Implementations may block until the user decides
/// and report an abort as [`GameError::Interrupted`].
#[async_trait]
pub trait MoveSupplier: Send {
    async fn next_choice(&mut self, round: u32) -> Result<Choice>;
}

/// Line-based prompt. Invalid lines are rejected and the same round is
/// prompted again.
pub struct TextInput<R, W> {
    lines: Lines<BufReader<R>>,
    out: W,
}

impl<R, W> TextInput<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: Write + Send,
{
    pub fn new(reader: R, out: W) -> Self {
        TextInput {
            lines: BufReader::new(reader).lines(),
            out,
        }
    }
}

impl TextInput<Stdin, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(tokio::io::stdin(), io::stdout())
    }
}

#[async_trait]
impl<R, W> MoveSupplier for TextInput<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: Write + Send,
{
    async fn next_choice(&mut self, _round: u32) -> Result<Choice> {
        loop {
            write!(self.out, "{}", PROMPT)?;
            self.out.flush()?;
            let line = match self.lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => return Err(GameError::InputClosed),
                // The undecodable line is already consumed; ask again
                Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                    warn!("Unreadable input received: {}", e);
                    writeln!(self.out, "{}", INVALID_CHOICE)?;
                    continue;
                }
                Err(e) => return Err(e.into()),
            };
            match normalize(&line) {
                Ok(choice) => {
                    debug!("User selected: {}", choice);
                    return Ok(choice);
                }
                Err(GameError::InvalidChoice(raw)) => {
                    warn!("Invalid choice received: '{}'", raw);
                    writeln!(self.out, "{}", INVALID_CHOICE)?;
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Arrow-key menu. If the terminal can't drive the menu, falls back to
/// `fallback` for the rest of the session.
pub struct MenuInput<F> {
    fallback: F,
    menu_failed: bool,
}

impl<F: MoveSupplier> MenuInput<F> {
    pub fn new(fallback: F) -> Self {
        MenuInput {
            fallback,
            menu_failed: false,
        }
    }

    async fn select() -> std::result::Result<Option<usize>, dialoguer::Error> {
        tokio::task::spawn_blocking(|| {
            Select::new()
                .with_prompt(MENU_PROMPT)
                .report(false)
                .items(&MENU_ITEMS)
                .default(0)
                .interact_opt()
        })
        .await
        .map_err(|e| dialoguer::Error::IO(io::Error::new(io::ErrorKind::Other, e)))?
    }
}

#[async_trait]
impl<F: MoveSupplier> MoveSupplier for MenuInput<F> {
    async fn next_choice(&mut self, round: u32) -> Result<Choice> {
        if !self.menu_failed {
            match Self::select().await {
                Ok(Some(index)) => {
                    let choice = Choice::ALL[index];
                    debug!("User selected: {}", choice);
                    return Ok(choice);
                }
                Ok(None) => return Err(GameError::Interrupted),
                Err(dialoguer::Error::IO(e)) if e.kind() == io::ErrorKind::Interrupted => {
                    return Err(GameError::Interrupted);
                }
                Err(e) => {
                    warn!("Interactive menu failed: {}, falling back to text input", e);
                    self.menu_failed = true;
                }
            }
        }
        self.fallback.next_choice(round).await
    }
}

#[derive(Deserialize, Debug, Clone, Copy, Default, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum WhenExhausted {
    /// Behave like a closed input stream
    #[default]
    Close,
    /// Report a user abort
    Interrupt,
    /// Never answer
    Wait,
}

/// Feeds pre-recorded raw text through the normalizer. Entries that fail to
/// normalize are skipped, like a user retyping at the prompt.
pub struct ScriptedInput {
    raw: VecDeque<String>,
    repeat: Option<Choice>,
    when_exhausted: WhenExhausted,
}

impl ScriptedInput {
    pub fn new(raw: Vec<String>) -> Self {
        ScriptedInput {
            raw: raw.into(),
            repeat: None,
            when_exhausted: WhenExhausted::default(),
        }
    }

    pub fn repeating(choice: Choice) -> Self {
        ScriptedInput {
            raw: VecDeque::new(),
            repeat: Some(choice),
            when_exhausted: WhenExhausted::default(),
        }
    }

    pub fn when_exhausted(mut self, when_exhausted: WhenExhausted) -> Self {
        self.when_exhausted = when_exhausted;
        self
    }
}

#[async_trait]
impl MoveSupplier for ScriptedInput {
    async fn next_choice(&mut self, round: u32) -> Result<Choice> {
        while let Some(raw) = self.raw.pop_front() {
            match normalize(&raw) {
                Ok(choice) => return Ok(choice),
                Err(e) => debug!("Round {}: skipping scripted input: {}", round, e),
            }
        }
        if let Some(choice) = self.repeat {
            return Ok(choice);
        }
        match self.when_exhausted {
            WhenExhausted::Close => Err(GameError::InputClosed),
            WhenExhausted::Interrupt => Err(GameError::Interrupted),
            WhenExhausted::Wait => std::future::pending().await,
        }
    }
}
