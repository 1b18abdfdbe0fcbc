//! Input acquisition and line/segment extraction for rewrite mode

use crate::strings::{has_marker, strip_marker};
use eyre::{eyre, Result, WrapErr};
use is_terminal::IsTerminal;
use std::fs;
use std::io::{self, Read};
use std::path::Path;

/// Check if stdin is being piped to us
pub fn is_stdin_piped() -> bool {
    !io::stdin().is_terminal()
}

/// Read the whole of stdin
pub fn read_stdin_block() -> io::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer)
}

/// Read the input block from `path`, `-` means stdin
///
/// Without a path stdin must be piped, otherwise we would sit on the terminal.
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) if p.as_os_str() == "-" => read_stdin_block().wrap_err("Failed to read from stdin"),
        Some(p) => fs::read_to_string(p)
            .wrap_err_with(|| format!("Failed to read input file {}", p.display())),
        None => {
            if !is_stdin_piped() {
                return Err(eyre!(
                    "no input: pipe text to stdin or pass --input <file>"
                ));
            }
            read_stdin_block().wrap_err("Failed to read from stdin")
        }
    }
}

/// Remove terminal escape sequences from a line
pub fn strip_ansi(line: &str) -> String {
    let bytes = strip_ansi_escapes::strip(line);
    String::from_utf8_lossy(&bytes).into_owned()
}

/// A non-blank input line that survived filtering, marker already removed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLine {
    /// Line number (1-based) in the input block
    pub line_number: usize,
    /// Line content after trimming and marker removal
    pub body: String,
}

impl SourceLine {
    /// `;`-separated segments, each trimmed, empty ones included
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.body.split(';').map(str::trim)
    }
}

/// Why a line produced no output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Empty after trimming
    Blank,
    /// Strict mode and the marker is missing
    NoMarker,
}

/// Outcome of looking at one input line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScannedLine {
    /// Line to split into segments
    Keep(SourceLine),
    /// Line dropped before segmenting
    Skip { line_number: usize, reason: SkipReason },
}

/// Split the block into lines and apply trimming, strict filtering and marker removal
pub fn scan_lines(block: &str, marker: &str, strict_filter: bool, ansi: bool) -> Vec<ScannedLine> {
    block
        .split('\n')
        .enumerate()
        .map(|(idx, raw)| {
            let line_number = idx + 1;
            let cleaned = if ansi { strip_ansi(raw) } else { raw.to_string() };
            let trimmed = cleaned.trim();

            if trimmed.is_empty() {
                return ScannedLine::Skip {
                    line_number,
                    reason: SkipReason::Blank,
                };
            }
            if strict_filter && !has_marker(trimmed, marker) {
                return ScannedLine::Skip {
                    line_number,
                    reason: SkipReason::NoMarker,
                };
            }

            ScannedLine::Keep(SourceLine {
                line_number,
                body: strip_marker(trimmed, marker),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kept(scanned: &[ScannedLine]) -> Vec<&SourceLine> {
        scanned
            .iter()
            .filter_map(|s| match s {
                ScannedLine::Keep(line) => Some(line),
                ScannedLine::Skip { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_blank_lines_skipped() {
        let scanned = scan_lines("\n   \n\t\nfirefox /a.svg\n", "firefox ", false, false);
        let lines = kept(&scanned);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].line_number, 4);
        assert_eq!(lines[0].body, "/a.svg");
        assert_eq!(
            scanned[0],
            ScannedLine::Skip {
                line_number: 1,
                reason: SkipReason::Blank
            }
        );
    }

    #[test]
    fn test_lenient_keeps_unmarked_lines() {
        let scanned = scan_lines("hello world\nfirefox /x/y.png", "firefox ", false, false);
        let lines = kept(&scanned);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].body, "hello world");
    }

    #[test]
    fn test_strict_drops_unmarked_lines() {
        let scanned = scan_lines("hello world\nfirefox /x/y.png", "firefox ", true, false);
        let lines = kept(&scanned);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].body, "/x/y.png");
        assert_eq!(
            scanned[0],
            ScannedLine::Skip {
                line_number: 1,
                reason: SkipReason::NoMarker
            }
        );
    }

    #[test]
    fn test_segments_trimmed_and_ordered() {
        let line = SourceLine {
            line_number: 1,
            body: "/a/b.svg;  /a/c.png ;/d".to_string(),
        };
        let segs: Vec<&str> = line.segments().collect();
        assert_eq!(segs, vec!["/a/b.svg", "/a/c.png", "/d"]);
    }

    #[test]
    fn test_trailing_semicolon_yields_empty_segment() {
        let line = SourceLine {
            line_number: 1,
            body: "/a/b.svg;".to_string(),
        };
        let segs: Vec<&str> = line.segments().collect();
        assert_eq!(segs, vec!["/a/b.svg", ""]);
    }

    #[test]
    fn test_ansi_codes_removed() {
        let colored = "\x1b[31mfirefox /a/b.svg\x1b[0m";
        assert_eq!(strip_ansi(colored), "firefox /a/b.svg");

        let scanned = scan_lines(colored, "firefox ", true, true);
        assert_eq!(kept(&scanned)[0].body, "/a/b.svg");

        // left alone when disabled, so the strict filter still sees the marker
        let raw = scan_lines(colored, "firefox ", true, false);
        assert_eq!(kept(&raw)[0].body, "\x1b[31m/a/b.svg\x1b[0m");
    }

    #[test]
    fn test_read_input_from_file() {
        let path = std::env::temp_dir().join(format!("cpgen-input-{}.txt", std::process::id()));
        fs::write(&path, "firefox /a/b.svg; firefox /a/c.png\n").unwrap();

        let block = read_input(Some(&path)).unwrap();
        let _ = fs::remove_file(&path);
        assert_eq!(block, "firefox /a/b.svg; firefox /a/c.png\n");
    }

    #[test]
    fn test_read_input_missing_file() {
        let path = Path::new("/nonexistent/cpgen/input.txt");
        let err = read_input(Some(path)).unwrap_err();
        assert!(err
            .to_string()
            .contains("Failed to read input file /nonexistent/cpgen/input.txt"));
    }

    #[test]
    fn test_crlf_input_is_trimmed() {
        let scanned = scan_lines("firefox /a.svg\r\nfirefox /b.svg\r\n", "firefox ", false, false);
        let bodies: Vec<String> = kept(&scanned).iter().map(|l| l.body.clone()).collect();
        assert_eq!(bodies, vec!["/a.svg", "/b.svg"]);
    }
}
