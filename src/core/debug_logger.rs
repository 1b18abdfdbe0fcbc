use crate::common::CopyCommand;
use crate::modes::rewrite::{RewriteOptions, SkipReason};
use directories::ProjectDirs;
use std::fs::{create_dir_all, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Instant;
use time::macros::format_description;

static LOG_FILE: OnceLock<PathBuf> = OnceLock::new();
static SESSION_START: OnceLock<Instant> = OnceLock::new();

fn now() -> time::OffsetDateTime {
    time::OffsetDateTime::now_local().unwrap_or_else(|_| time::OffsetDateTime::now_utc())
}

fn timestamp() -> String {
    now()
        .format(format_description!(
            "[year]-[month]-[day] [hour]:[minute]:[second].[subsecond digits:3]"
        ))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn log_dir() -> PathBuf {
    match ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
        Some(dirs) => dirs.data_local_dir().join("logs"),
        None => {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local/share/cpgen/logs")
        }
    }
}

/// Start a session log, later calls append to it
pub fn init_log() -> std::io::Result<PathBuf> {
    let log_dir = log_dir();

    if let Err(e) = create_dir_all(&log_dir) {
        eprintln!(
            "Warning: Failed to create log directory {:?}: {}",
            log_dir, e
        );
        return Err(e);
    }

    // timestamped filename with PID
    let stamp = now()
        .format(format_description!(
            "[year][month][day]-[hour][minute][second]"
        ))
        .unwrap_or_else(|_| "00000000-000000".to_string());
    let pid = std::process::id();
    let path = log_dir.join(format!("cpgen-debug-{}-pid{}.log", stamp, pid));

    let mut file = match OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(&path)
    {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: Failed to create log file {:?}: {}", path, e);
            return Err(e);
        }
    };

    SESSION_START.set(Instant::now()).ok();

    writeln!(file, "=== CPGEN DEBUG SESSION STARTED ===")?;
    writeln!(file, "Timestamp: {}", timestamp())?;
    writeln!(file, "PID: {}", pid)?;
    writeln!(file, "Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(file, "Log file: {:?}", path)?;
    writeln!(file)?;

    LOG_FILE.set(path.clone()).ok();
    Ok(path)
}

fn append<F: FnOnce(&mut std::fs::File) -> std::io::Result<()>>(write: F) {
    if let Some(path) = LOG_FILE.get() {
        match OpenOptions::new().append(true).open(path) {
            Ok(mut file) => {
                let _ = write(&mut file);
            }
            Err(_) => eprintln!("Warning: Failed to write to log file: {:?}", path),
        }
    }
}

fn elapsed_ms() -> u128 {
    SESSION_START
        .get()
        .map(|start| start.elapsed().as_millis())
        .unwrap_or(0)
}

pub fn log_startup_info(opts: &RewriteOptions, input: Option<&std::path::Path>) {
    append(|file| {
        writeln!(file, "[STARTUP] Configuration:")?;
        writeln!(file, "  Output dir: {:?}", opts.output_dir)?;
        writeln!(file, "  Marker: {:?}", opts.marker)?;
        writeln!(file, "  Program: {:?}", opts.program)?;
        writeln!(file, "  Quote style: {}", opts.quote)?;
        writeln!(file, "  Strict filter: {}", opts.strict_filter)?;
        writeln!(file, "  Reject empty: {}", opts.reject_empty)?;
        writeln!(file, "  Strip ANSI: {}", opts.strip_ansi)?;
        match input {
            Some(p) => writeln!(file, "  Input: {}", p.display())?,
            None => writeln!(file, "  Input: <stdin>")?,
        }
        writeln!(file)
    });
}

pub fn log_event(event: &str) {
    append(|file| writeln!(file, "[{:>6}ms] EVENT: {}", elapsed_ms(), event));
}

pub fn log_skipped(line_number: usize, reason: SkipReason) {
    let why = match reason {
        SkipReason::Blank => "blank",
        SkipReason::NoMarker => "no marker",
    };
    append(|file| writeln!(file, "[SKIP] line {}: {}", line_number, why));
}

pub fn log_command(cmd: &CopyCommand, rendered: &str) {
    append(|file| {
        writeln!(file, "[EMIT] line {}: {}", cmd.line_number, rendered)?;
        if crate::strings::basename(&cmd.source).is_empty() {
            writeln!(file, "       └── empty basename for {:?}", cmd.source)?;
        }
        Ok(())
    });
}

pub fn log_session_end() {
    append(|file| {
        let elapsed = SESSION_START
            .get()
            .map(|start| start.elapsed())
            .unwrap_or(std::time::Duration::ZERO);
        writeln!(file)?;
        writeln!(file, "=== CPGEN DEBUG SESSION ENDED ===")?;
        writeln!(file, "Duration: {:.3}s", elapsed.as_secs_f64())?;
        writeln!(file, "Timestamp: {}", timestamp())?;
        writeln!(file)
    });
}
