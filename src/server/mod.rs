mod protocol;
mod server;

use crate::config::FormatOptions;
use std::io;
use tracing::info;

pub use protocol::{FileArguments, FormatArguments, Message, MessageContent, SnippetArguments};
pub use server::FormatServer;

/// Serve formatting requests over stdin/stdout until the client disconnects.
pub fn run_server_mode(options: FormatOptions) -> io::Result<()> {
    info!(language = %options.language, "format server starting");

    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut server = FormatServer::new(stdin.lock(), stdout.lock(), options);
    server.run()?;

    info!("format server exiting");
    Ok(())
}
