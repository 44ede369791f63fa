//! convkit MCP Server
//!
//! Line-delimited JSON-RPC over stdio. Logs go to stderr; stdout carries
//! protocol messages only.
//!
//! Tools:
//! - convert: Convert a value between two units of a category
//! - list_categories: List measurement categories
//! - list_units: List the units of a category
//! - favorites / load_favorite: Session favorites
//! - history / clear_history: Session conversion history

mod config;
mod protocol;
mod session;
mod tools;

use std::io::{self, BufRead, IsTerminal, Write};

use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use crate::protocol::{McpResponse, Server, PROTOCOL_VERSION, SERVER_VERSION};

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();
}

/// Write one response line; false if stdout is gone
fn send(response: &McpResponse) -> bool {
    let response_json = match serde_json::to_string(response) {
        Ok(json) => json,
        Err(e) => {
            error!(error = %e, "failed to serialize response");
            return true;
        }
    };

    let mut stdout = io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{}", response_json) {
        error!(error = %e, "failed to write response");
        return false;
    }
    if let Err(e) = stdout.flush() {
        error!(error = %e, "failed to flush stdout");
        return false;
    }
    true
}

fn main() {
    init_logging();

    let config = ServerConfig::from_env();
    info!(
        version = SERVER_VERSION,
        protocol = PROTOCOL_VERSION,
        decimals = config.decimals,
        history_limit = config.history_limit,
        favorites_limit = config.favorites_limit,
        "convkit MCP server started"
    );
    debug!(
        stdin_terminal = io::stdin().is_terminal(),
        stdout_terminal = io::stdout().is_terminal(),
        "stdio"
    );

    let mut server = Server::new(config);

    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("client disconnected (EOF)");
                break;
            }
            Ok(_) => {
                // Blank lines and notifications do not get a response
                let Some(response) = server.handle_line(&line) else {
                    continue;
                };
                if !send(&response) {
                    break;
                }
                debug!("sent response");
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        }
    }

    info!("server shutting down");
}
