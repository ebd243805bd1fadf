use clap::Parser;
use common::utility::{create_interrupt_channel, init_logging, log_level};
use game::entrypoint::{exit_code, restore_terminal, serve, GameConfig, EXIT_INTERRUPTED};
use tracing::{error, warn};

const EXAMPLES: &str = "\
Examples:
  rock-paper-scissors                    # Play one round
  rock-paper-scissors -r 5               # Play 5 rounds
  rock-paper-scissors --rounds 3 -v      # Play 3 rounds with verbose output
  rock-paper-scissors --debug            # Enable debug logging";

#[derive(Parser, Debug)]
#[command(
    name = "rock-paper-scissors",
    version,
    about = "Play Rock, Paper, Scissors game against the computer",
    after_help = EXAMPLES
)]
struct Args {
    /// number of rounds to play
    #[arg(
        short,
        long,
        default_value_t = 1,
        value_name = "N",
        allow_negative_numbers = true
    )]
    rounds: i64,

    /// enable verbose output (shows more game details)
    #[arg(short, long)]
    verbose: bool,

    /// enable debug logging (shows all logging messages)
    #[arg(long)]
    debug: bool,

    /// always type choices instead of using the arrow-key menu
    #[arg(long)]
    no_menu: bool,

    /// seed for the computer's moves, for reproducible games
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,
}

impl From<Args> for GameConfig {
    fn from(args: Args) -> Self {
        GameConfig {
            rounds: args.rounds,
            verbose: args.verbose,
            menu: !args.no_menu,
            seed: args.seed,
        }
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(log_level(args.verbose, args.debug));

    let interrupt = create_interrupt_channel();
    let result = serve(args.into(), interrupt).await;
    if let Err(e) = &result {
        eprintln!("Error: {}", e);
        error!("Game failed: {}", e);
    }
    let code = exit_code(&result);
    if code == EXIT_INTERRUPTED {
        if let Err(e) = restore_terminal() {
            warn!("Failed to restore terminal: {}", e);
        }
    }
    // Exit here rather than returning: a stdin read or menu may still be
    // parked on a blocking thread that the runtime would wait for.
    std::process::exit(code.into());
}
