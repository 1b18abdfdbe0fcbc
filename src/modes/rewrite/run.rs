//! Rewrite mode entry point

use super::{parse, rewrite, Rewrite, RewriteOptions};
use crate::cli::Opts;
use crate::core::debug_logger;
use eyre::{Result, WrapErr};
use scopeguard::defer;
use std::io::{self, Write};

/// Run rewrite mode: read the input, print one command per path
pub fn run(cli: &Opts) -> Result<()> {
    let verbose = cli.verbose.unwrap_or(0) > 0;

    if verbose {
        if let Ok(path) = debug_logger::init_log() {
            eprintln!("Debug log: {}", path.display());
        }
    }
    defer! {
        debug_logger::log_session_end();
    }

    let opts = &cli.rewrite;
    debug_logger::log_startup_info(opts, cli.input.as_deref());

    let block = parse::read_input(cli.input.as_deref())?;
    debug_logger::log_event(&format!("read {} bytes", block.len()));

    let result = rewrite(&block, opts)?;
    for &(line_number, reason) in &result.skipped {
        debug_logger::log_skipped(line_number, reason);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    write_commands(&mut out, &result, opts)?;

    if verbose {
        eprintln!(
            "{} lines read, {} skipped, {} commands",
            result.lines_read,
            result.skipped.len(),
            result.commands.len()
        );
    }

    Ok(())
}

/// Write each rendered command on its own line
pub fn write_commands<W: Write>(out: &mut W, result: &Rewrite, opts: &RewriteOptions) -> Result<()> {
    for (cmd, line) in result.commands.iter().zip(result.lines(opts)) {
        debug_logger::log_command(cmd, &line);
        match writeln!(out, "{line}") {
            Ok(()) => {}
            // downstream closed (e.g. `| head`), nothing left to do
            Err(e) if e.kind() == io::ErrorKind::BrokenPipe => return Ok(()),
            Err(e) => return Err(e).wrap_err("Failed to write to stdout"),
        }
    }
    out.flush().or_else(|e| match e.kind() {
        io::ErrorKind::BrokenPipe => Ok(()),
        _ => Err(e),
    })
    .wrap_err("Failed to flush stdout")
}
