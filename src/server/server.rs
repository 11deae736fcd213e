use super::protocol::{FileArguments, FormatArguments, Message, MessageContent, SnippetArguments};
use crate::config::FormatOptions;
use crate::engine::Formatter;
use crate::error::FormatError;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::fs;
use std::io::{self, BufRead, Read, Write};
use tracing::{debug, info, warn};

const CONTENT_LENGTH: &str = "Content-Length:";

/// Request/response loop speaking Content-Length framed JSON.
pub struct FormatServer<R, W> {
    reader: R,
    writer: W,
    seq: u64,
    formatter: Formatter,
}

impl<R: BufRead, W: Write> FormatServer<R, W> {
    pub fn new(reader: R, writer: W, options: FormatOptions) -> Self {
        Self {
            reader,
            writer,
            seq: 0,
            formatter: Formatter::new(options),
        }
    }

    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    pub fn into_writer(self) -> W {
        self.writer
    }

    fn next_seq(&mut self) -> u64 {
        self.seq += 1;
        self.seq
    }

    pub fn send_response(
        &mut self,
        request_seq: u64,
        command: String,
        success: bool,
        body: Option<Value>,
    ) -> io::Result<()> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "response".to_string(),
            content: MessageContent::Response {
                request_seq,
                success,
                command,
                message: None,
                body,
            },
        };
        self.send_message(&msg)
    }

    pub fn send_error(&mut self, request_seq: u64, command: String, message: String) -> io::Result<()> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "response".to_string(),
            content: MessageContent::Response {
                request_seq,
                success: false,
                command,
                message: Some(message),
                body: None,
            },
        };
        self.send_message(&msg)
    }

    pub fn send_event(&mut self, event: String, body: Option<Value>) -> io::Result<()> {
        let msg = Message {
            seq: self.next_seq(),
            msg_type: "event".to_string(),
            content: MessageContent::Event { event, body },
        };
        self.send_message(&msg)
    }

    fn send_message(&mut self, msg: &Message) -> io::Result<()> {
        let json = serde_json::to_string(msg)?;
        write!(self.writer, "{} {}\r\n\r\n{}", CONTENT_LENGTH, json.len(), json)?;
        self.writer.flush()?;
        debug!(bytes = json.len(), "sent message");
        Ok(())
    }

    /// Read one framed message. `Ok(None)` means the input is exhausted; a
    /// frame whose body is not a message is reported as `InvalidData`.
    pub fn read_message(&mut self) -> io::Result<Option<Message>> {
        let mut content_length = None;

        loop {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }

            let line = line.trim_end_matches(['\r', '\n']);
            if line.is_empty() {
                if content_length.is_some() {
                    break;
                }
                continue;
            }
            if let Some(value) = line.strip_prefix(CONTENT_LENGTH) {
                content_length = value.trim().parse::<usize>().ok();
            }
        }

        let mut buffer = vec![0u8; content_length.unwrap_or(0)];
        self.reader.read_exact(&mut buffer)?;
        let msg = serde_json::from_slice(&buffer)?;
        Ok(Some(msg))
    }

    /// Serve requests until `disconnect` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            let msg = match self.read_message() {
                Ok(Some(msg)) => msg,
                Ok(None) => {
                    info!("input closed");
                    break;
                }
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    warn!(%err, "discarding malformed message");
                    continue;
                }
                Err(err) => return Err(err),
            };

            let MessageContent::Request { command, arguments } = msg.content else {
                debug!(seq = msg.seq, "ignoring non-request message");
                continue;
            };
            debug!(seq = msg.seq, %command, "received request");

            match command.as_str() {
                "initialize" => self.handle_initialize(msg.seq, command, arguments)?,
                "configure" => self.handle_configure(msg.seq, command, arguments)?,
                "format" => self.handle_format(msg.seq, command, arguments)?,
                "formatSnippet" => self.handle_format_snippet(msg.seq, command, arguments)?,
                "formatFile" => self.handle_format_file(msg.seq, command, arguments)?,
                "disconnect" => {
                    self.send_response(msg.seq, command, true, None)?;
                    info!("disconnected");
                    break;
                }
                _ => {
                    warn!(%command, "unhandled command");
                    let message = format!("unknown command `{}`", command);
                    self.send_error(msg.seq, command, message)?;
                }
            }
        }

        Ok(())
    }

    pub fn handle_initialize(&mut self, seq: u64, command: String, args: Option<Value>) -> io::Result<()> {
        let result = self.reconfigure(args).map(|options| {
            json!({
                "supportsFormat": true,
                "supportsFormatSnippet": true,
                "supportsFormatFile": true,
                "languages": [options.language],
                "options": options,
            })
        });
        let ok = result.is_ok();
        self.reply(seq, command, result)?;

        if ok {
            self.send_event("initialized".to_string(), None)?;
        }
        Ok(())
    }

    pub fn handle_configure(&mut self, seq: u64, command: String, args: Option<Value>) -> io::Result<()> {
        let result = self
            .reconfigure(args)
            .and_then(|options| Ok(serde_json::to_value(options)?));
        self.reply(seq, command, result)
    }

    pub fn handle_format(&mut self, seq: u64, command: String, args: Option<Value>) -> io::Result<()> {
        let result = parse_arguments::<FormatArguments>(args).map(|args| {
            let lines = self.formatter.format(&args.source);
            json!({ "lines": lines })
        });
        self.reply(seq, command, result)
    }

    pub fn handle_format_snippet(&mut self, seq: u64, command: String, args: Option<Value>) -> io::Result<()> {
        let result = parse_arguments::<SnippetArguments>(args).and_then(|args| {
            let snippet = self.formatter.format_snippet(
                &args.source,
                args.selection_start,
                args.selection_end,
                args.offset,
            )?;
            Ok(serde_json::to_value(snippet)?)
        });
        self.reply(seq, command, result)
    }

    pub fn handle_format_file(&mut self, seq: u64, command: String, args: Option<Value>) -> io::Result<()> {
        let result = parse_arguments::<FileArguments>(args).and_then(|args| {
            let source = fs::read_to_string(&args.path)?;
            let lines = self.formatter.format(&source);
            Ok(json!({ "path": args.path, "lines": lines }))
        });
        self.reply(seq, command, result)
    }

    /// Apply option fields from `args` and rebuild the formatter.
    fn reconfigure(&mut self, args: Option<Value>) -> Result<FormatOptions, FormatError> {
        let options = match args {
            Some(patch) => self.formatter.options().merge_json(&patch)?,
            None => self.formatter.options().clone(),
        };
        self.formatter = Formatter::new(options.clone());
        Ok(options)
    }

    fn reply(&mut self, seq: u64, command: String, result: Result<Value, FormatError>) -> io::Result<()> {
        match result {
            Ok(body) => self.send_response(seq, command, true, Some(body)),
            Err(err) => {
                warn!(%command, %err, "request failed");
                self.send_error(seq, command, err.to_string())
            }
        }
    }
}

fn parse_arguments<T: DeserializeOwned>(args: Option<Value>) -> Result<T, FormatError> {
    let args = args.unwrap_or_else(|| json!({}));
    Ok(serde_json::from_value(args)?)
}
