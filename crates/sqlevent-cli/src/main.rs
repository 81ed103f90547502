//! sqlevent CLI - report telemetry events found in SQL files

mod args;
mod config;
mod output;

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use miette::{IntoDiagnostic, Result};
use sqlevent_core::{EventKind, SqlEvent, SqlEventParser};

use crate::args::{Args, Command};
use crate::config::Config;
use crate::output::OutputFormatter;

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so JSON on stdout stays parseable
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_level(args.verbose, args.quiet).into()),
        )
        .init();

    match run(args) {
        Ok(missing_kinds) => {
            if missing_kinds {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            }
        }
        Err(e) => {
            eprintln!("Error: {:?}", e);
            ExitCode::from(2)
        }
    }
}

fn log_level(verbose: u8, quiet: bool) -> tracing::Level {
    if quiet {
        return tracing::Level::ERROR;
    }
    match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    }
}

/// Returns true when `--kind` filters were given but no file matched them
fn run(args: Args) -> Result<bool> {
    match args.command {
        Command::Scan {
            files,
            format,
            kinds,
            method,
            tables_only,
            dollar_quoting,
            config: config_path,
        } => {
            // Load configuration
            let config = if let Some(path) = config_path {
                Config::from_file(&path)?
            } else {
                Config::find_and_load()?.unwrap_or_default()
            };

            // Merge CLI args with config (CLI takes precedence)
            let config = config.merge_with_args(
                &files,
                format,
                &kinds,
                method.as_deref(),
                tables_only,
                dollar_quoting,
            );

            let output_format = config.output_format()?;
            let kinds = config.event_kinds()?;
            let sql_files = collect_files(&config.files)?;

            if sql_files.is_empty() {
                miette::bail!(
                    "No SQL files specified. Use positional arguments or configure in sqlevent.toml"
                );
            }

            let parser = SqlEventParser::new().with_dollar_quoting(config.dollar_quoting);
            let mut total_events = 0;

            for sql_file in &sql_files {
                let content = fs::read_to_string(sql_file).into_diagnostic()?;

                let mut events: Vec<SqlEvent> = if config.tables_only {
                    parser
                        .get_table_events(&content)
                        .into_iter()
                        .map(SqlEvent::from)
                        .collect()
                } else {
                    parser.parse_sql_events(&content)
                };

                retain_kinds(&mut events, &kinds);

                tracing::info!(
                    file = %sql_file.display(),
                    events = events.len(),
                    "scanned file"
                );
                total_events += events.len();

                let formatter = OutputFormatter::new(output_format, sql_file.display().to_string());
                formatter.print_events(&events, config.method())?;
            }

            if !args.quiet {
                eprintln!();
                eprintln!(
                    "Found {} event(s) in {} file(s)",
                    total_events,
                    sql_files.len()
                );
            }

            Ok(requested_kinds_missing(&kinds, total_events))
        }

        Command::Split {
            file,
            dollar_quoting,
        } => {
            let content = fs::read_to_string(&file).into_diagnostic()?;
            let parser = SqlEventParser::new().with_dollar_quoting(dollar_quoting);

            for (i, statement) in parser.split_statements(&content).iter().enumerate() {
                println!("Statement {}:", i + 1);
                println!("{}", statement);
                println!();
            }

            Ok(false)
        }

        Command::Kinds => {
            for kind in EventKind::ALL {
                let family = if kind.is_table_event() {
                    "table"
                } else {
                    "object"
                };
                println!("{:<20} {}", kind.as_str(), family);
            }

            Ok(false)
        }
    }
}

/// Drop events whose kind was not requested; an empty filter keeps everything
fn retain_kinds(events: &mut Vec<SqlEvent>, kinds: &[EventKind]) {
    if !kinds.is_empty() {
        events.retain(|event| kinds.contains(&event.kind()));
    }
}

/// Kinds were requested but no scanned file produced any of them
fn requested_kinds_missing(kinds: &[EventKind], reported_events: usize) -> bool {
    !kinds.is_empty() && reported_events == 0
}

/// Expand glob patterns; plain paths are kept as given
fn collect_files(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for pattern in patterns {
        if pattern.contains(['*', '?', '[']) {
            for path in glob::glob(pattern).into_diagnostic()?.flatten() {
                files.push(path);
            }
        } else {
            files.push(PathBuf::from(pattern));
        }
    }

    Ok(files)
}
