//! Parse spoken expense phrases from the command line.
//!
//! Usage: voice_parse [--json] [--db <path>] [--settings <path>] [transcript ...]
//!
//! Without transcripts on the command line, one transcript is read per stdin line.
//! With `--db`, every transcript goes through the capture flow and is stored.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Invalid arguments
//!   2 - Settings error
//!   3 - Storage error
//!   4 - Stdin read error
//!   5 - Stdout write error

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use kolki::capture::{CaptureOutcome, VoiceCapture};
use kolki::settings::{self, VoiceSettings};
use kolki::speech::{extract_original_category, parse_expense_from_voice, ParsedExpense};
use kolki::{ExpenseStore, SqliteStore};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "Usage: voice_parse [--json] [--db <path>] [--settings <path>] [transcript ...]";

#[derive(Debug, Default)]
struct Args {
    json: bool,
    db: Option<PathBuf>,
    settings: Option<PathBuf>,
    transcripts: Vec<String>,
}

fn parse_args(mut raw: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut args = Args::default();

    while let Some(arg) = raw.next() {
        match arg.as_str() {
            "--json" => args.json = true,
            "--db" => {
                let path = raw.next().ok_or("--db needs a path")?;
                args.db = Some(PathBuf::from(path));
            }
            "--settings" => {
                let path = raw.next().ok_or("--settings needs a path")?;
                args.settings = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("Unknown option: {}", flag)),
            _ => args.transcripts.push(arg),
        }
    }

    Ok(args)
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn load_settings(path: Option<&PathBuf>) -> anyhow::Result<VoiceSettings> {
    match path {
        Some(path) => VoiceSettings::load(path),
        None => match settings::default_path() {
            Ok(path) => VoiceSettings::load(&path),
            Err(e) => {
                log::warn!("{}, using default settings", e);
                Ok(VoiceSettings::default())
            }
        },
    }
}

/// Candidate with the spoken label filled in
fn parse_line(transcript: &str) -> Option<ParsedExpense> {
    parse_expense_from_voice(transcript)
        .map(|parsed| parsed.with_original_category(extract_original_category(transcript)))
}

fn format_plain(parsed: Option<&ParsedExpense>, currency_symbol: &str) -> String {
    match parsed {
        Some(p) => format!(
            "{} | {} {:.2} | {} | {}",
            p.category,
            currency_symbol,
            p.amount,
            p.comment.as_deref().unwrap_or("-"),
            p.original_category.as_deref().unwrap_or("-"),
        ),
        None => "sin monto".to_string(),
    }
}

fn to_json<T: serde::Serialize>(value: Option<&T>) -> String {
    serde_json::to_string(&value).unwrap_or_else(|_| "null".to_string())
}

/// One transcript per line. Invalid UTF-8 is replaced rather than ending the input.
fn read_transcripts<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut transcripts = Vec::new();
    for line in reader.split(b'\n') {
        let line = line?;
        let text = String::from_utf8_lossy(&line);
        let text = text.trim_end_matches('\r');
        if !text.trim().is_empty() {
            transcripts.push(text.to_string());
        }
    }
    Ok(transcripts)
}

#[derive(Debug)]
enum RunError {
    Storage(anyhow::Error),
    Write(io::Error),
}

fn print_parsed<W: Write>(
    out: &mut W,
    transcripts: &[String],
    json: bool,
    currency_symbol: &str,
) -> io::Result<()> {
    for transcript in transcripts {
        let parsed = parse_line(transcript);
        let line = if json {
            to_json(parsed.as_ref())
        } else {
            format_plain(parsed.as_ref(), currency_symbol)
        };
        writeln!(out, "{}", line)?;
    }
    out.flush()
}

fn print_captured<S: ExpenseStore, W: Write>(
    out: &mut W,
    capture: &mut VoiceCapture<S>,
    transcripts: &[String],
    json: bool,
) -> Result<(), RunError> {
    let currency_symbol = capture.settings().currency_symbol.clone();

    for transcript in transcripts {
        let outcome = capture
            .handle_transcript(transcript)
            .map_err(RunError::Storage)?;
        let line = if json {
            let stored = match &outcome {
                CaptureOutcome::Saved(expense) | CaptureOutcome::SavedRaw(expense) => Some(expense),
                CaptureOutcome::Recognized { .. } => None,
            };
            to_json(stored)
        } else {
            outcome.summary(&currency_symbol)
        };
        writeln!(out, "{}", line).map_err(RunError::Write)?;
    }
    out.flush().map_err(RunError::Write)
}

fn main() -> ExitCode {
    init_tracing();

    let args = match parse_args(env::args().skip(1)) {
        Ok(a) => a,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(1);
        }
    };

    let voice_settings = match load_settings(args.settings.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("SETTINGS_ERROR:{:#}", e);
            return ExitCode::from(2);
        }
    };

    let transcripts = if args.transcripts.is_empty() {
        match read_transcripts(io::stdin().lock()) {
            Ok(t) => t,
            Err(e) => {
                eprintln!("READ_ERROR:{}", e);
                return ExitCode::from(4);
            }
        }
    } else {
        args.transcripts
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let result = match args.db {
        Some(db_path) => {
            let store = match SqliteStore::open(&db_path) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("STORAGE_ERROR:{:#}", e);
                    return ExitCode::from(3);
                }
            };
            let mut capture = VoiceCapture::new(voice_settings, store);
            print_captured(&mut out, &mut capture, &transcripts, args.json)
        }
        None => print_parsed(&mut out, &transcripts, args.json, &voice_settings.currency_symbol)
            .map_err(RunError::Write),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(RunError::Storage(e)) => {
            eprintln!("STORAGE_ERROR:{:#}", e);
            ExitCode::from(3)
        }
        Err(RunError::Write(e)) => {
            eprintln!("WRITE_ERROR:{}", e);
            ExitCode::from(5)
        }
    }
}
