use crate::config::{FormatOptions, DEFAULT_SNIPPET_OFFSET};
use crate::engine::Formatter;
use crate::error::FormatError;
use crate::rules::Language;
use std::fs;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
  open <path>                      load a source file
  format                           print the whole file re-indented
  snippet <start> <end> [offset]   print the re-indented context of a selection
  indent <n>|tab                   set the indentation unit
  language <name>                  set the source language
  help                             show this text
  q, quit                          leave";

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("no file open, use `open <path>` first")]
    NoSource,

    #[error("unknown command `{0}`, type `help` for a list")]
    UnknownCommand(String),

    #[error("unbalanced quotes")]
    UnbalancedQuotes,

    #[error("`{0}` is not a number")]
    InvalidNumber(String),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Io(#[from] io::Error),
}

enum Flow {
    Continue,
    Quit,
}

struct OpenFile {
    path: PathBuf,
    source: String,
}

/// Interactive prompt over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
    formatter: Formatter,
    file: Option<OpenFile>,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W, options: FormatOptions) -> Self {
        Self {
            input,
            output,
            formatter: Formatter::new(options),
            file: None,
        }
    }

    pub fn options(&self) -> &FormatOptions {
        self.formatter.options()
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Prompt until `quit` or end of input. Command errors are reported and
    /// the loop keeps going.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut input = String::new();
            if self.input.read_line(&mut input)? == 0 {
                break;
            }

            match self.execute(input.trim()) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Quit) => break,
                Err(err) => {
                    warn!(%err, "command failed");
                    writeln!(self.output, "error: {}", err)?;
                }
            }
        }

        Ok(())
    }

    fn execute(&mut self, line: &str) -> Result<Flow, CommandError> {
        let words = shlex::split(line).ok_or(CommandError::UnbalancedQuotes)?;
        let Some((command, args)) = words.split_first() else {
            return Ok(Flow::Continue);
        };
        debug!(%command, ?args, "console command");

        match command.as_str() {
            "q" | "quit" => return Ok(Flow::Quit),
            "help" => writeln!(self.output, "{}", HELP)?,
            "open" => {
                let [path] = args else {
                    return Err(CommandError::Usage("open <path>"));
                };
                self.open(PathBuf::from(path))?;
            }
            "format" => {
                let file = self.file.as_ref().ok_or(CommandError::NoSource)?;
                for line in self.formatter.format(&file.source) {
                    writeln!(self.output, "{}", line)?;
                }
            }
            "snippet" => self.snippet(args)?,
            "indent" => {
                let options = match args {
                    [unit] if unit == "tab" => FormatOptions::tabs(),
                    [width] => FormatOptions::spaces(parse_number(width)?),
                    _ => return Err(CommandError::Usage("indent <n>|tab")),
                };
                self.set_options(FormatOptions {
                    indent_unit: options.indent_unit,
                    ..self.options().clone()
                })?;
            }
            "language" => {
                let [name] = args else {
                    return Err(CommandError::Usage("language <name>"));
                };
                let language: Language = name.parse()?;
                self.set_options(FormatOptions {
                    language,
                    ..self.options().clone()
                })?;
            }
            _ => return Err(CommandError::UnknownCommand(command.clone())),
        }

        Ok(Flow::Continue)
    }

    fn open(&mut self, path: PathBuf) -> Result<(), CommandError> {
        let source = fs::read_to_string(&path)?;
        writeln!(
            self.output,
            "opened {} ({} lines)",
            path.display(),
            source.split('\n').count()
        )?;
        self.file = Some(OpenFile { path, source });
        Ok(())
    }

    fn snippet(&mut self, args: &[String]) -> Result<(), CommandError> {
        let (start, end, offset) = match args {
            [start, end] => (parse_number(start)?, parse_number(end)?, DEFAULT_SNIPPET_OFFSET),
            [start, end, offset] => (parse_number(start)?, parse_number(end)?, parse_number(offset)?),
            _ => return Err(CommandError::Usage("snippet <start> <end> [offset]")),
        };
        let file = self.file.as_ref().ok_or(CommandError::NoSource)?;

        let snippet = self.formatter.format_snippet(&file.source, start, end, offset)?;
        writeln!(
            self.output,
            "{} lines {}-{}",
            file.path.display(),
            snippet.range.start,
            snippet.range.end
        )?;
        for line in snippet.lines() {
            writeln!(self.output, "{}", line)?;
        }
        Ok(())
    }

    fn set_options(&mut self, options: FormatOptions) -> Result<(), CommandError> {
        options.validate()?;
        writeln!(
            self.output,
            "indent {:?}, language {}",
            options.indent_unit, options.language
        )?;
        self.formatter = Formatter::new(options);
        Ok(())
    }
}

fn parse_number(text: &str) -> Result<usize, CommandError> {
    text.parse()
        .map_err(|_| CommandError::InvalidNumber(text.to_string()))
}

/// Run the console on stdin/stdout.
pub fn run_console(options: FormatOptions) -> io::Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut console = Console::new(stdin.lock(), stdout.lock(), options);
    writeln!(console.output, "scopefmt console, type `help` for commands")?;
    console.run()
}
