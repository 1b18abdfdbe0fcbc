// Rewrite mode - viewer command lines to copy commands

pub mod parse;
pub mod run;

use crate::common::{CopyCommand, QuoteStyle};
use crate::strings::basename;
use eyre::{eyre, Result};

pub use parse::{ScannedLine, SkipReason};
pub use run::run;

/// Default marker, the viewer invocation in front of each path
pub const DEFAULT_MARKER: &str = "firefox ";

/// Default program placed in front of every emitted line
pub const DEFAULT_PROGRAM: &str = "cp";

/// Everything one rewrite pass needs
#[derive(Debug, Clone)]
pub struct RewriteOptions {
    /// Prefix for every destination, not required to end with `/`
    pub output_dir: String,
    /// Token stripped from each line (and required in strict mode)
    pub marker: String,
    /// How paths are written out, `Double` is the original quoted variant
    pub quote: QuoteStyle,
    /// Drop non-blank lines lacking the marker instead of rewriting them
    pub strict_filter: bool,
    /// Verb in front of every line, `cp` unless configured
    pub program: String,
    /// Fail on a segment with an empty basename
    pub reject_empty: bool,
    /// Strip ANSI escape codes from input lines first
    ///
    /// Off by default: stripping also drops control bytes such as `\t`,
    /// which would change the paths themselves.
    pub strip_ansi: bool,
}

impl Default for RewriteOptions {
    fn default() -> Self {
        Self {
            output_dir: String::new(),
            marker: DEFAULT_MARKER.to_string(),
            quote: QuoteStyle::None,
            strict_filter: false,
            program: DEFAULT_PROGRAM.to_string(),
            reject_empty: false,
            strip_ansi: false,
        }
    }
}

/// Result of a rewrite pass: the commands plus what was skipped
#[derive(Debug, Default)]
pub struct Rewrite {
    /// One per segment, in input order
    pub commands: Vec<CopyCommand>,
    /// Line number (1-based) and reason for every line that produced nothing
    pub skipped: Vec<(usize, SkipReason)>,
    /// Number of lines in the block, blank ones included
    pub lines_read: usize,
}

impl Rewrite {
    /// Rendered command lines, in input order
    pub fn lines<'a>(&'a self, opts: &'a RewriteOptions) -> impl Iterator<Item = String> + 'a {
        self.commands
            .iter()
            .map(move |cmd| cmd.render(&opts.program, opts.quote))
    }
}

/// Turn a block of `firefox <path>; firefox <path>` lines into copy commands
///
/// Order follows the input: left to right within a line, top to bottom across lines.
/// Empty segments go through untouched unless `reject_empty` is set.
pub fn rewrite(block: &str, opts: &RewriteOptions) -> Result<Rewrite> {
    let scanned = parse::scan_lines(block, &opts.marker, opts.strict_filter, opts.strip_ansi);
    let mut out = Rewrite {
        lines_read: scanned.len(),
        ..Rewrite::default()
    };

    for entry in scanned {
        let line = match entry {
            ScannedLine::Keep(line) => line,
            ScannedLine::Skip {
                line_number,
                reason,
            } => {
                out.skipped.push((line_number, reason));
                continue;
            }
        };

        for segment in line.segments() {
            let name = basename(segment);
            if opts.reject_empty && name.is_empty() {
                return Err(eyre!(
                    "line {}: segment {:?} has no file name to copy",
                    line.line_number,
                    segment
                ));
            }
            out.commands.push(CopyCommand::new(
                segment,
                &opts.output_dir,
                name,
                line.line_number,
            ));
        }
    }

    Ok(out)
}
