use tokio::sync::broadcast;
use tracing::Level;

/// Spawns a Ctrl+C listener and returns a receiver that fires once when the
/// user interrupts the process.
pub fn create_interrupt_channel() -> broadcast::Receiver<()> {
    let (interrupt_sender, interrupt_receiver): (broadcast::Sender<()>, broadcast::Receiver<()>) =
        broadcast::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for ctrl-c: {}", e);
            return;
        }
        tracing::info!("Interrupt received");
        // Nobody listening means the session already finished
        let _ = interrupt_sender.send(());
    });
    interrupt_receiver
}

pub fn log_level(verbose: bool, debug: bool) -> Level {
    if debug {
        Level::DEBUG
    } else if verbose {
        Level::INFO
    } else {
        Level::WARN
    }
}

// Init logging, ignore error if already set
pub fn init_logging(level: Level) {
    let _ = tracing_subscriber::fmt()
        .with_line_number(true)
        .with_file(true)
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}
