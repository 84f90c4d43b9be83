// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// ReadZen: reading-aid renderer
//
// Entry point. Initialises logging, opens the stored preferences, renders the
// input text and prints the annotated HTML to stdout.

use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use readzen_core::{Profile, ProfilePresets};
use readzen_core::error::Result;
use readzen_session::{PreferenceStore, ReaderSession};

const USAGE: &str = "usage: readzen [FILE] [--profile ID]\n       readzen --list-profiles";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Render {
        file: Option<PathBuf>,
        profile: Option<String>,
    },
    ListProfiles,
    Help,
}

fn main() -> ExitCode {
    // Logs go to stderr so stdout carries only the rendered HTML.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let command = match parse_args(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(msg) => {
            eprintln!("readzen: {msg}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "readzen failed");
            ExitCode::FAILURE
        }
    }
}

fn parse_args(mut args: impl Iterator<Item = String>) -> std::result::Result<Command, String> {
    let mut file = None;
    let mut profile = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(Command::Help),
            "--list-profiles" => return Ok(Command::ListProfiles),
            "--profile" => match args.next() {
                Some(id) => profile = Some(id),
                None => return Err("--profile needs an id".into()),
            },
            flag if flag.starts_with("--profile=") => {
                profile = Some(flag["--profile=".len()..].to_string());
            }
            "-" => file = None,
            flag if flag.starts_with('-') => return Err(format!("unknown option {flag}")),
            path => {
                if file.is_some() {
                    return Err("only one input file is accepted".into());
                }
                file = Some(PathBuf::from(path));
            }
        }
    }

    Ok(Command::Render { file, profile })
}

fn run(command: Command) -> Result<()> {
    match command {
        Command::Help => {
            println!("{USAGE}");
            Ok(())
        }
        Command::ListProfiles => {
            let mut out = std::io::stdout().lock();
            for profile in ProfilePresets::all() {
                writeln!(out, "{}", profile_line(profile))?;
            }
            Ok(())
        }
        Command::Render { file, profile } => render(file, profile.as_deref()),
    }
}

fn profile_line(profile: &Profile) -> String {
    format!(
        "{:<20} {:<20} theme={} font={}",
        profile.id,
        profile.label,
        profile.patch.theme.as_str(),
        profile.patch.font.as_str()
    )
}

fn render(file: Option<PathBuf>, profile: Option<&str>) -> Result<()> {
    let raw = match &file {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let mut session = ReaderSession::new(PreferenceStore::open_default());
    if let Some(id) = profile {
        // Unknown ids are already logged by the session; stored preferences apply.
        session.apply_profile(id);
    }
    session.load_text(raw);

    let report = session.last_report();
    tracing::info!(
        blocks = session.mounted().nodes.len(),
        images_placed = report.images_placed,
        "rendered"
    );

    let mut out = std::io::stdout().lock();
    writeln!(out, "{}", session.to_html())?;
    Ok(())
}
