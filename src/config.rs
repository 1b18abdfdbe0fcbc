use crate::common::QuoteStyle;
use crate::modes::rewrite::{DEFAULT_MARKER, DEFAULT_PROGRAM};
use directories::ProjectDirs;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Error type for config loading
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Toml(toml::de::Error),
    Invalid(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Toml(e) => write!(f, "TOML parse error: {}", e),
            ConfigError::Invalid(msg) => write!(f, "invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        ConfigError::Io(e)
    }
}

impl From<toml::de::Error> for ConfigError {
    fn from(e: toml::de::Error) -> Self {
        ConfigError::Toml(e)
    }
}

/// Contents of `config.toml`, every key optional
#[derive(Debug, Deserialize, Clone)]
pub struct CpgenConfig {
    /// Destination prefix, usually ending in `/`
    #[serde(default)]
    pub output_dir: Option<String>,
    /// Token identifying viewer lines, `"firefox "` by default
    #[serde(default = "default_marker")]
    pub marker: String,
    /// Shorthand for `quote_style = "double"`
    #[serde(default)]
    pub quote: bool,
    /// "none", "double" or "shell", wins over `quote`
    #[serde(default)]
    pub quote_style: Option<String>,
    /// Drop lines without the marker
    #[serde(default)]
    pub strict_filter: bool,
    /// Verb emitted instead of `cp`
    #[serde(default = "default_program")]
    pub program: String,
    /// Strip terminal escape codes (and other control bytes) from input
    #[serde(default)]
    pub strip_ansi: bool,
    /// Fail on a segment without a file name
    #[serde(default)]
    pub reject_empty: bool,
}

// Default value implementations for serde
fn default_marker() -> String {
    DEFAULT_MARKER.to_string()
}
fn default_program() -> String {
    DEFAULT_PROGRAM.to_string()
}

impl Default for CpgenConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            marker: default_marker(),
            quote: false,
            quote_style: None,
            strict_filter: false,
            program: default_program(),
            strip_ansi: false,
            reject_empty: false,
        }
    }
}

impl CpgenConfig {
    /// Load from `cli_config_path` or the default location, then apply `CPGEN_*` overrides
    pub fn new(cli_config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        // Priority: CLI arg > XDG_CONFIG_HOME > Default fallback
        let cli_provided = cli_config_path.is_some();
        let config_path = if let Some(path) = cli_config_path {
            Some(path)
        } else if let Some(proj_dirs) = ProjectDirs::from("", "", env!("CARGO_PKG_NAME")) {
            let mut p = proj_dirs.config_dir().to_path_buf();
            p.push("config.toml");
            Some(p)
        } else {
            None
        };

        let mut cfg = match config_path {
            Some(ref path) if path.exists() => {
                let contents = fs::read_to_string(path)?;
                Self::read(&contents)?
            }
            Some(ref path) if cli_provided => {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("Config file not found at {}", path.display()),
                )
                .into());
            }
            _ => Self::default(),
        };

        cfg.apply_env(|key| env::var(key).ok());
        cfg.quote_style()?;
        Ok(cfg)
    }

    /// Parse a config file body
    pub fn read(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// Override fields from `CPGEN_*` variables, unparsable values are ignored
    fn apply_env<F: Fn(&str) -> Option<String>>(&mut self, var: F) {
        if let Some(val) = var("CPGEN_OUTPUT_DIR") {
            self.output_dir = Some(val);
        }
        if let Some(val) = var("CPGEN_MARKER") {
            self.marker = val;
        }
        // CPGEN_QUOTE overrides a quote_style from the file
        if let Some(Ok(quote)) = var("CPGEN_QUOTE").map(|val| val.parse::<bool>()) {
            self.quote = quote;
            let style = if quote { QuoteStyle::Double } else { QuoteStyle::None };
            self.quote_style = Some(style.to_string());
        }
        if let Some(val) = var("CPGEN_QUOTE_STYLE") {
            self.quote_style = Some(val);
        }
        if let Some(val) = var("CPGEN_STRICT_FILTER") {
            self.strict_filter = val.parse().unwrap_or(self.strict_filter);
        }
        if let Some(val) = var("CPGEN_PROGRAM") {
            self.program = val;
        }
        if let Some(val) = var("CPGEN_STRIP_ANSI") {
            self.strip_ansi = val.parse().unwrap_or(self.strip_ansi);
        }
        if let Some(val) = var("CPGEN_REJECT_EMPTY") {
            self.reject_empty = val.parse().unwrap_or(self.reject_empty);
        }
    }

    /// Effective quote style, `quote_style` first, then the `quote` flag
    pub fn quote_style(&self) -> Result<QuoteStyle, ConfigError> {
        match self.quote_style {
            Some(ref name) => QuoteStyle::from_name(name).ok_or_else(|| {
                ConfigError::Invalid(format!(
                    "unknown quote_style {:?}, expected none, double or shell",
                    name
                ))
            }),
            None if self.quote => Ok(QuoteStyle::Double),
            None => Ok(QuoteStyle::None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_empty_file_gives_defaults() {
        let cfg = CpgenConfig::read("").unwrap();
        assert_eq!(cfg.output_dir, None);
        assert_eq!(cfg.marker, "firefox ");
        assert_eq!(cfg.program, "cp");
        assert!(!cfg.strip_ansi);
        assert!(!cfg.strict_filter);
        assert!(!cfg.reject_empty);
        assert_eq!(cfg.quote_style().unwrap(), QuoteStyle::None);
    }

    #[test]
    fn test_full_file() {
        let cfg = CpgenConfig::read(
            r#"
output_dir = "/home/me/AA/"
marker = "eog "
quote = true
strict_filter = true
program = "cp -v"
strip_ansi = true
reject_empty = true
"#,
        )
        .unwrap();
        assert_eq!(cfg.output_dir.as_deref(), Some("/home/me/AA/"));
        assert_eq!(cfg.marker, "eog ");
        assert_eq!(cfg.program, "cp -v");
        assert!(cfg.strict_filter);
        assert!(cfg.strip_ansi);
        assert!(cfg.reject_empty);
        assert_eq!(cfg.quote_style().unwrap(), QuoteStyle::Double);
    }

    #[test]
    fn test_quote_style_wins_over_quote() {
        let cfg = CpgenConfig::read("quote = true\nquote_style = \"shell\"").unwrap();
        assert_eq!(cfg.quote_style().unwrap(), QuoteStyle::Shell);

        let bad = CpgenConfig::read("quote_style = \"fancy\"").unwrap();
        assert!(matches!(bad.quote_style(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_bad_toml_is_error() {
        assert!(CpgenConfig::read("quote = \"maybe\"").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let vars: HashMap<&str, &str> = [
            ("CPGEN_OUTPUT_DIR", "/env/"),
            ("CPGEN_STRICT_FILTER", "true"),
            ("CPGEN_STRIP_ANSI", "not-a-bool"),
            ("CPGEN_PROGRAM", "mv"),
        ]
        .into_iter()
        .collect();

        let mut cfg = CpgenConfig::read("output_dir = \"/file/\"").unwrap();
        cfg.apply_env(|k| vars.get(k).map(|v| v.to_string()));

        assert_eq!(cfg.output_dir.as_deref(), Some("/env/"));
        assert!(cfg.strict_filter);
        // unparsable value keeps the previous one
        assert!(!cfg.strip_ansi);
        assert_eq!(cfg.program, "mv");
    }

    fn with_env(conf: &str, vars: &[(&str, &str)]) -> CpgenConfig {
        let vars: HashMap<&str, &str> = vars.iter().copied().collect();
        let mut cfg = CpgenConfig::read(conf).unwrap();
        cfg.apply_env(|k| vars.get(k).map(|v| v.to_string()));
        cfg
    }

    #[test]
    fn test_env_marker_and_reject_empty() {
        let cfg = with_env(
            "marker = \"eog \"\nreject_empty = false",
            &[("CPGEN_MARKER", "feh "), ("CPGEN_REJECT_EMPTY", "true")],
        );
        assert_eq!(cfg.marker, "feh ");
        assert!(cfg.reject_empty);
    }

    #[test]
    fn test_env_quote_beats_file_quote_style() {
        let cfg = with_env("quote_style = \"none\"", &[("CPGEN_QUOTE", "true")]);
        assert!(cfg.quote);
        assert_eq!(cfg.quote_style().unwrap(), QuoteStyle::Double);

        let cfg = with_env("quote_style = \"shell\"", &[("CPGEN_QUOTE", "false")]);
        assert_eq!(cfg.quote_style().unwrap(), QuoteStyle::None);

        // garbage leaves the file setting alone
        let cfg = with_env("quote_style = \"shell\"", &[("CPGEN_QUOTE", "yes please")]);
        assert_eq!(cfg.quote_style().unwrap(), QuoteStyle::Shell);
    }

    #[test]
    fn test_env_quote_style() {
        let cfg = with_env("quote = true", &[("CPGEN_QUOTE_STYLE", "shell")]);
        assert_eq!(cfg.quote_style().unwrap(), QuoteStyle::Shell);

        // both set: the style is read after the flag and wins
        let cfg = with_env(
            "",
            &[("CPGEN_QUOTE", "true"), ("CPGEN_QUOTE_STYLE", "none")],
        );
        assert_eq!(cfg.quote_style().unwrap(), QuoteStyle::None);
    }

    #[test]
    fn test_missing_explicit_config_is_error() {
        let err = CpgenConfig::new(Some(PathBuf::from("/nonexistent/cpgen/config.toml")))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
