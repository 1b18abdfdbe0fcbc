#![deny(unsafe_code)]
#![deny(missing_docs)]

//! # Cpgen
//!
//! > Turns `firefox a.svg; firefox b.png` lines into `cp` commands
//!
//! Paste the viewer command lines a test run printed, get back one
//! `cp <path> <output_dir><basename>` per path, ready to copy into a shell.
//! Nothing is copied or executed, the commands are only printed.

/// CLI parser
mod cli;
/// Shared command types
mod common;
/// Config file and environment overrides
mod config;
/// Debug logging
mod core;
/// Program modes
mod modes;
/// String helpers
mod strings;

use std::process;

fn main() {
    if let Err(error) = real_main() {
        eprintln!("{error:?}");
        process::exit(1);
    }
}

fn real_main() -> eyre::Result<()> {
    let cli = cli::parse()?;
    modes::rewrite::run(&cli)
}
