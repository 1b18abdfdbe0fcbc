use crate::common::QuoteStyle;
use crate::config::CpgenConfig;
use crate::modes::rewrite::RewriteOptions;
use eyre::{eyre, WrapErr};
use std::ffi::OsString;
use std::{env, path};

fn usage() -> ! {
    println!(
        "Usage: {} [options] <OUTPUT_DIR>

Reads lines like `firefox /a/b.svg; firefox /a/c.png` and prints
`cp /a/b.svg <OUTPUT_DIR>b.svg` for every path.

  -i, --input <file>       Read input from a file (`-` for stdin, default: piped stdin).
  -m, --marker <token>     Token to strip from each line (default: \"firefox \").
  -q, --quote              Wrap paths in double quotes.
      --quote-style <s>    Quote style: none, double or shell.
  -s, --strict             Drop lines that don't contain the marker.
      --lenient            Rewrite every non-blank line (overrides config).
  -p, --program <cmd>      Command to emit instead of `cp`.
      --reject-empty       Fail on a path with no file name (e.g. trailing `/`).
      --allow-empty        Emit such paths anyway (default, overrides config).
      --strip-ansi         Strip terminal escape codes from input. Also drops
                           control bytes like tabs inside paths.
      --keep-ansi          Leave input bytes untouched (default, overrides config).
  -c, --config <config>    Specify a config file.
  -v, --verbose            Write a debug log and print a summary (multiple).
  -h, --help               Show this help message.
  -V, --version            Show the version number and quit.
",
        &env::args().next().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
    );
    std::process::exit(0);
}

/// Command line interface.
#[derive(Debug)]
pub struct Opts {
    /// Fully resolved rewrite settings (defaults < config < env < CLI)
    pub rewrite: RewriteOptions,
    /// Input file, `None` reads piped stdin
    pub input: Option<path::PathBuf>,
    /// Verbosity level
    pub verbose: Option<u64>,
}

/// Raw flags as given on the command line, unset ones stay `None`
#[derive(Debug, Default)]
struct Args {
    config_file: Option<path::PathBuf>,
    output_dir: Option<String>,
    input: Option<path::PathBuf>,
    marker: Option<String>,
    quote: Option<QuoteStyle>,
    strict_filter: Option<bool>,
    program: Option<String>,
    reject_empty: Option<bool>,
    strip_ansi: Option<bool>,
    verbose: Option<u64>,
}

fn parse_args<I>(args: I) -> Result<Args, lexopt::Error>
where
    I: IntoIterator,
    I::Item: Into<OsString>,
{
    use lexopt::prelude::*;
    let mut parser = lexopt::Parser::from_args(args);
    let mut args = Args::default();

    while let Some(arg) = parser.next()? {
        match arg {
            Short('i') | Long("input") => {
                args.input = Some(path::PathBuf::from(parser.value()?));
            }
            Short('m') | Long("marker") => {
                args.marker = Some(parser.value()?.string()?);
            }
            Short('q') | Long("quote") => {
                args.quote = Some(QuoteStyle::Double);
            }
            Long("quote-style") => {
                let name = parser.value()?.string()?;
                let style = QuoteStyle::from_name(&name).ok_or_else(|| {
                    format!("unknown quote style '{name}', expected none, double or shell")
                })?;
                args.quote = Some(style);
            }
            Short('s') | Long("strict") => {
                args.strict_filter = Some(true);
            }
            Long("lenient") => {
                args.strict_filter = Some(false);
            }
            Short('p') | Long("program") => {
                args.program = Some(parser.value()?.string()?);
            }
            Long("reject-empty") => {
                args.reject_empty = Some(true);
            }
            Long("allow-empty") => {
                args.reject_empty = Some(false);
            }
            Long("strip-ansi") => {
                args.strip_ansi = Some(true);
            }
            Long("keep-ansi") => {
                args.strip_ansi = Some(false);
            }
            Short('c') | Long("config") => {
                args.config_file = Some(path::PathBuf::from(parser.value()?));
            }
            Short('v') | Long("verbose") => {
                if let Some(v) = args.verbose {
                    args.verbose = Some(v + 1);
                } else {
                    args.verbose = Some(1);
                }
            }
            Short('h') | Long("help") => {
                usage();
            }
            Short('V') | Long("version") => {
                println!("{}", env!("CARGO_PKG_VERSION"));
                std::process::exit(0);
            }
            Value(val) if args.output_dir.is_none() => {
                args.output_dir = Some(val.string()?);
            }
            _ => return Err(arg.unexpected()),
        }
    }

    Ok(args)
}

/// Layer the command line over the loaded config
fn resolve(args: Args, file_conf: CpgenConfig) -> eyre::Result<Opts> {
    let quote = match args.quote {
        Some(style) => style,
        None => file_conf
            .quote_style()
            .wrap_err("Error parsing config file")?,
    };

    let output_dir = args
        .output_dir
        .or(file_conf.output_dir)
        .ok_or_else(|| eyre!("missing <OUTPUT_DIR> (pass it as an argument or set output_dir in the config)"))?;

    if args.program.as_deref().is_some_and(|p| p.trim().is_empty()) {
        return Err(eyre!("--program must not be empty"));
    }

    Ok(Opts {
        rewrite: RewriteOptions {
            output_dir,
            marker: args.marker.unwrap_or(file_conf.marker),
            quote,
            strict_filter: args.strict_filter.unwrap_or(file_conf.strict_filter),
            program: args.program.unwrap_or(file_conf.program),
            reject_empty: args.reject_empty.unwrap_or(file_conf.reject_empty),
            strip_ansi: args.strip_ansi.unwrap_or(file_conf.strip_ansi),
        },
        input: args.input,
        verbose: args.verbose,
    })
}

/// Parses the cli arguments
pub fn parse() -> eyre::Result<Opts> {
    let args = parse_args(env::args_os().skip(1))?;
    let file_conf = CpgenConfig::new(args.config_file.clone()).wrap_err("Error reading config file")?;
    resolve(args, file_conf)
}
