// Rewritten command representation shared by the rewrite mode and the logger

use std::fmt;

/// How source and destination paths are written out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum QuoteStyle {
    /// Paths as-is: `cp /a/b.svg /out/b.svg`
    #[default]
    None,
    /// Wrapped in double quotes, no escaping: `cp "/a/b.svg" "/out/b.svg"`
    Double,
    /// POSIX shell quoting via `shell_words::quote`
    Shell,
}

impl QuoteStyle {
    /// Parse a style name, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "none" | "plain" => Some(Self::None),
            "double" | "quoted" => Some(Self::Double),
            "shell" | "posix" => Some(Self::Shell),
            _ => None,
        }
    }

    fn apply<'a>(self, path: &'a str) -> std::borrow::Cow<'a, str> {
        match self {
            Self::None => path.into(),
            Self::Double => format!("\"{path}\"").into(),
            Self::Shell => shell_words::quote(path),
        }
    }
}

impl fmt::Display for QuoteStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::Double => "double",
            Self::Shell => "shell",
        };
        f.write_str(name)
    }
}

/// One copy command derived from a path segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyCommand {
    /// Trimmed segment, exactly as it appeared in the input
    pub source: String,
    /// Output directory immediately followed by the basename
    pub destination: String,
    /// Line number (1-based) of the input line the segment came from
    pub line_number: usize,
}

impl CopyCommand {
    /// Build a command from a segment, the output directory and the segment's basename
    pub fn new(source: &str, output_dir: &str, basename: &str, line_number: usize) -> Self {
        Self {
            source: source.to_string(),
            destination: format!("{output_dir}{basename}"),
            line_number,
        }
    }

    /// Render as a shell line, `program` is usually `cp`
    pub fn render(&self, program: &str, style: QuoteStyle) -> String {
        format!(
            "{} {} {}",
            program,
            style.apply(&self.source),
            style.apply(&self.destination)
        )
    }
}
