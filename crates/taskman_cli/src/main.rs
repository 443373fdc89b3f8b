//! Line-oriented CLI over a taskman session.
//!
//! # Responsibility
//! - Collect session options from flags and start logging when asked.
//! - Feed stdin lines to `Session::execute` and print feedback plus the
//!   three live views after each command.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process;

use clap::Parser;
use log::info;
use taskman_core::{
    default_log_level, init_logging, Session, SessionConfig, ViewKind, DEFAULT_HISTORY_CAPACITY,
};

/// Keyboard-driven task and event manager.
#[derive(Parser)]
#[command(name = "taskman", version, about = "Keyboard-driven task and event manager")]
struct Cli {
    /// SQLite file to load from and persist to (in-memory when omitted)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files (logging is off when omitted)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Log level: trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Maximum number of undoable commands
    #[arg(long, default_value_t = DEFAULT_HISTORY_CAPACITY)]
    history_capacity: usize,

    /// Do not print the views after each command
    #[arg(long)]
    quiet: bool,
}

fn main() {
    let cli = Cli::parse();

    if let Some(log_dir) = &cli.log_dir {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        if let Err(err) = init_logging(level, &log_dir.to_string_lossy()) {
            eprintln!("error: {err}");
            process::exit(2);
        }
    }

    let config = SessionConfig {
        history_capacity: Some(cli.history_capacity),
        db_path: cli.db.clone(),
    };
    let mut session = match Session::open(&config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("error: failed to open session: {err}");
            process::exit(1);
        }
    };
    info!(
        "event=cli_start module=cli status=ok persistent={}",
        config.db_path.is_some()
    );

    if let Err(err) = run(&mut session, cli.quiet) {
        eprintln!("error: {err}");
        process::exit(1);
    }
}

fn run(session: &mut Session, quiet: bool) -> io::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout().lock();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        if matches!(line.trim(), "exit" | "quit") {
            break;
        }

        let result = session.execute(&line);
        let marker = if result.succeeded { "ok" } else { "error" };
        writeln!(stdout, "[{marker}] {}", result.feedback)?;
        if !quiet {
            print_views(&mut stdout, session)?;
        }
        stdout.flush()?;
    }
    Ok(())
}

fn print_views(out: &mut impl Write, session: &Session) -> io::Result<()> {
    for kind in ViewKind::ALL {
        let rows = session.view(kind);
        writeln!(out, "== {kind} ({}) ==", rows.len())?;
        for (position, activity) in rows.iter().enumerate() {
            writeln!(out, "{:>3}. {activity}", position + 1)?;
        }
    }
    Ok(())
}
