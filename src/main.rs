use scopefmt::config::{FormatOptions, DEFAULT_SNIPPET_OFFSET};
use scopefmt::{console, logging, server, FormatError, Formatter, Language};
use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{debug, error};

const USAGE: &str = "\
usage: scopefmt [options] [FILE]
       scopefmt [options] --snippet START END [OFFSET] FILE
       scopefmt [options] --server

With FILE, print it re-indented. Without FILE, start the interactive console.

options:
  --config PATH       read options from a JSON file
  --indent N          indent with N spaces
  --tabs              indent with tabs
  --language NAME     source language (java)
  -h, --help          show this text";

#[derive(Debug, Error)]
enum CliError {
    #[error("missing value for {0}")]
    MissingValue(&'static str),

    #[error("{flag} expects a number, got `{value}`")]
    InvalidNumber { flag: &'static str, value: String },

    #[error("unexpected argument `{0}`")]
    Unexpected(String),

    #[error("--snippet needs a FILE")]
    MissingFile,

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

#[derive(Debug, PartialEq)]
enum Mode {
    Help,
    Console,
    Server,
    Format(PathBuf),
    Snippet {
        path: PathBuf,
        start: usize,
        end: usize,
        offset: usize,
    },
}

#[derive(Debug, Default)]
struct Overrides {
    config: Option<PathBuf>,
    indent: Option<usize>,
    tabs: bool,
    language: Option<Language>,
}

impl Overrides {
    fn into_options(self) -> Result<FormatOptions, FormatError> {
        let mut options = match self.config {
            Some(path) => FormatOptions::load(path)?,
            None => FormatOptions::default(),
        };
        if let Some(width) = self.indent {
            options.indent_unit = " ".repeat(width);
        }
        if self.tabs {
            options.indent_unit = "\t".to_string();
        }
        if let Some(language) = self.language {
            options.language = language;
        }
        options.validate()?;
        Ok(options)
    }
}

fn main() -> ExitCode {
    logging::init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "scopefmt failed");
            eprintln!("scopefmt: {}", err);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), CliError> {
    let (mode, overrides) = parse_args(std::env::args().skip(1))?;
    debug!(?mode, ?overrides, "parsed arguments");
    if mode == Mode::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let options = overrides.into_options()?;

    match mode {
        Mode::Help => {}
        Mode::Server => server::run_server_mode(options)?,
        Mode::Console => console::run_console(options)?,
        Mode::Format(path) => {
            let source = fs::read_to_string(path)?;
            let formatter = Formatter::new(options);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for line in formatter.format(&source) {
                writeln!(out, "{}", line)?;
            }
        }
        Mode::Snippet {
            path,
            start,
            end,
            offset,
        } => {
            let source = fs::read_to_string(path)?;
            let snippet = Formatter::new(options).format_snippet(&source, start, end, offset)?;
            let json = serde_json::to_string_pretty(&snippet).map_err(FormatError::from)?;
            println!("{}", json);
        }
    }

    Ok(())
}

fn parse_args(args: impl Iterator<Item = String>) -> Result<(Mode, Overrides), CliError> {
    let mut args = args.peekable();
    let mut overrides = Overrides::default();
    let mut server = false;
    let mut snippet: Option<(usize, usize, usize)> = None;
    let mut file: Option<PathBuf> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok((Mode::Help, overrides)),
            "--server" => server = true,
            "--tabs" => overrides.tabs = true,
            "--config" => {
                let path = args.next().ok_or(CliError::MissingValue("--config"))?;
                overrides.config = Some(PathBuf::from(path));
            }
            "--indent" => overrides.indent = Some(number(&mut args, "--indent")?),
            "--language" => {
                let name = args.next().ok_or(CliError::MissingValue("--language"))?;
                overrides.language = Some(name.parse()?);
            }
            "--snippet" => {
                let start = number(&mut args, "--snippet")?;
                let end = number(&mut args, "--snippet")?;
                let has_offset = args
                    .peek()
                    .is_some_and(|next| next.parse::<usize>().is_ok());
                let offset = if has_offset {
                    number(&mut args, "--snippet")?
                } else {
                    DEFAULT_SNIPPET_OFFSET
                };
                snippet = Some((start, end, offset));
            }
            other if other.starts_with('-') => return Err(CliError::Unexpected(arg)),
            _ if file.is_none() => file = Some(PathBuf::from(arg)),
            _ => return Err(CliError::Unexpected(arg)),
        }
    }

    let mode = match (server, snippet, file) {
        (true, _, _) => Mode::Server,
        (false, Some((start, end, offset)), Some(path)) => Mode::Snippet {
            path,
            start,
            end,
            offset,
        },
        (false, Some(_), None) => return Err(CliError::MissingFile),
        (false, None, Some(path)) => Mode::Format(path),
        (false, None, None) => Mode::Console,
    };
    Ok((mode, overrides))
}

fn number(args: &mut impl Iterator<Item = String>, flag: &'static str) -> Result<usize, CliError> {
    let value = args.next().ok_or(CliError::MissingValue(flag))?;
    value
        .parse()
        .map_err(|_| CliError::InvalidNumber { flag, value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<(Mode, Overrides), CliError> {
        parse_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_modes() {
        assert_eq!(parse(&[]).unwrap().0, Mode::Console);
        assert_eq!(parse(&["--server"]).unwrap().0, Mode::Server);
        assert_eq!(parse(&["A.java"]).unwrap().0, Mode::Format(PathBuf::from("A.java")));
        assert_eq!(
            parse(&["--snippet", "14", "14", "A.java"]).unwrap().0,
            Mode::Snippet {
                path: PathBuf::from("A.java"),
                start: 14,
                end: 14,
                offset: DEFAULT_SNIPPET_OFFSET,
            }
        );
        assert_eq!(
            parse(&["--snippet", "3", "5", "2", "A.java"]).unwrap().0,
            Mode::Snippet {
                path: PathBuf::from("A.java"),
                start: 3,
                end: 5,
                offset: 2,
            }
        );
    }

    #[test]
    fn test_parse_overrides() {
        let (_, overrides) = parse(&["--indent", "2", "--language", "JAVA", "A.java"]).unwrap();
        let options = overrides.into_options().unwrap();
        assert_eq!(options.indent_unit, "  ");
        assert_eq!(options.language, Language::Java);

        let (_, overrides) = parse(&["--tabs"]).unwrap();
        assert_eq!(overrides.into_options().unwrap().indent_unit, "\t");
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(parse(&["--indent"]), Err(CliError::MissingValue("--indent"))));
        assert!(matches!(
            parse(&["--indent", "x"]),
            Err(CliError::InvalidNumber { flag: "--indent", .. })
        ));
        assert!(matches!(parse(&["--snippet", "1", "2"]), Err(CliError::MissingFile)));
        assert!(matches!(parse(&["--bogus"]), Err(CliError::Unexpected(_))));
        assert!(matches!(parse(&["--language", "cobol"]), Err(CliError::Format(_))));
        assert!(matches!(
            parse(&["--indent", "0"]).unwrap().1.into_options(),
            Err(FormatError::EmptyIndentUnit)
        ));
    }
}
