//! Working Cycles - a 60-60-30 work/rest timer
//!
//! One cycle is four 25 minute work periods separated by 5 minute breaks,
//! followed by a 30 minute break. Each phase boundary raises a desktop
//! notification and, when enabled, an audible signal.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use tokio::sync::mpsc;

use working_cycles::cli::{console, Cli, Commands, Display};
use working_cycles::control::{ChannelSink, ControlEvent, ControlSurface};
use working_cycles::notification::{DesktopNotifier, Notifier};
use working_cycles::sound::{try_create_player, AlertSound};
use working_cycles::types::{CycleConfig, EngineState};

/// Capacity of the user event queue.
const EVENT_QUEUE_CAPACITY: usize = 16;

/// Main entry point
#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let cli = Cli::parse();

    // Initialize logging
    init_tracing(cli.verbose);

    // Execute command
    if let Err(e) = execute(cli).await {
        Display::show_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

/// Initializes the tracing subscriber for logging.
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{fmt, EnvFilter};

    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .init();
}

/// Executes the CLI command.
async fn execute(cli: Cli) -> Result<()> {
    match cli.command {
        Some(Commands::Completions { shell }) => {
            generate_completions(shell);
            Ok(())
        }
        None => run_timer(cli.sound).await,
    }
}

/// Loads the alert sound, wires the console to the control surface and runs
/// until Quit.
async fn run_timer(sound_path: Option<PathBuf>) -> Result<()> {
    let config = CycleConfig::default();

    let sound = match sound_path {
        Some(path) => AlertSound::from_file(&path).map_err(|e| {
            let hint = e.suggestion();
            anyhow::Error::new(e)
                .context(format!("cannot load alert sound {} ({})", path.display(), hint))
        })?,
        None => AlertSound::Tone,
    };
    let audio = try_create_player(sound);
    let notifier: Arc<dyn Notifier> = Arc::new(DesktopNotifier::new());
    let state = Arc::new(EngineState::new());

    let (menu_tx, menu_rx) = crossbeam_channel::unbounded();
    let surface = ControlSurface::new(config, state, notifier, audio, ChannelSink::new(menu_tx))
        .context("invalid cycle configuration")?;
    let renderer =
        console::spawn_menu_renderer(menu_rx).context("failed to start menu renderer")?;

    let (event_tx, event_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    console::spawn_stdin_source(event_tx.clone()).context("failed to start console input")?;
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            let _ = event_tx.send(ControlEvent::Quit).await;
        }
    });

    Display::show_banner(&config);

    let sink = surface.run(event_rx).await;

    // Closing the sink disconnects the renderer.
    drop(sink);
    if renderer.join().is_err() {
        tracing::warn!("menu renderer panicked");
    }

    Ok(())
}

/// Generates shell completion scripts.
fn generate_completions(shell: clap_complete::Shell) {
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_no_args() {
        let cli = Cli::parse_from(["working-cycles"]);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_parse_completions() {
        let cli = Cli::parse_from(["working-cycles", "completions", "bash"]);
        assert!(matches!(cli.command, Some(Commands::Completions { .. })));
    }

    #[test]
    fn test_cli_parse_verbose() {
        let cli = Cli::parse_from(["working-cycles", "--verbose"]);
        assert!(cli.verbose);
    }

    #[tokio::test]
    async fn test_missing_sound_file_is_fatal() {
        let result = run_timer(Some(PathBuf::from("/nonexistent/alert.mp3"))).await;
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("cannot load alert sound"));
        assert!(message.contains("not found"));
        assert!(message.contains("check the path passed to --sound"));
    }
}
