//! redgreen - A TDD session countdown for the terminal
//!
//! Every invocation loads the session, applies one operation, prints one
//! line and exits.

use std::process::ExitCode;

use tracing::debug;
use tracing_subscriber::EnvFilter;

use redgreen::{
    config::{Command, Config},
    error::{SessionError, TimerError},
    state::parse_minutes,
    store::SessionStore,
};

fn main() -> anyhow::Result<ExitCode> {
    let config = Config::parse();

    // Logs go to stderr so stdout stays a single line
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("redgreen={}", config.log_level())));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config_dir = config.config_dir()?;
    debug!("using config directory {}", config_dir.display());
    let store = SessionStore::new(config_dir);

    let outcome = match &config.command {
        Command::Start { minutes } => parse_minutes(minutes)
            .map_err(SessionError::from)
            .and_then(|minutes| store.start(i64::from(minutes))),
        Command::Status => {
            let report = store.status()?;
            println!("{}", report.message);
            return Ok(ExitCode::from(report.exit_code));
        }
        Command::Pause => store.pause(),
        Command::Resume => store.resume(),
        Command::Restart => store.restart(),
    };

    match outcome {
        Ok(message) => {
            println!("{message}");
            Ok(ExitCode::SUCCESS)
        }
        Err(SessionError::Timer(err)) => Ok(report_rejection(&err)),
        Err(err) => Err(err.into()),
    }
}

fn report_rejection(err: &TimerError) -> ExitCode {
    eprintln!("{err}");
    ExitCode::FAILURE
}
