//! Terminal chat against the portfolio completion endpoint.
//!
//! Reads one prompt per stdin line and streams the reply to stdout. Ctrl-C
//! while a reply is streaming cancels it; Ctrl-C at the prompt or EOF exits.

mod render;

use std::io::{self, Write};

use chat::decode::LineFraming;
use chat::{ChatConfig, ChatError, StreamingChatSession, SubmitOutcome};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use uuid::Uuid;

use render::ReplyRenderer;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid chat configuration: {0}")]
    Config(#[from] chat::config::ConfigError),
    #[error("chat client init failed: {0}")]
    Chat(#[from] ChatError),
    #[error("terminal i/o failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Parser, Debug)]
#[command(name = "folio-chat", about = "Chat with the portfolio assistant from a terminal")]
struct Cli {
    /// Completion endpoint URL.
    #[arg(long, env = "CHAT_SERVER_ADDRESS")]
    endpoint: Option<String>,

    /// Line framing: `per_chunk` or `buffered`.
    #[arg(long, value_parser = parse_framing)]
    framing: Option<LineFraming>,
}

fn parse_framing(raw: &str) -> Result<LineFraming, String> {
    LineFraming::parse(raw).ok_or_else(|| format!("expected 'per_chunk' or 'buffered', got '{raw}'"))
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(tracing::Level::WARN)
        .init();

    let cli = Cli::parse();
    let mut config = ChatConfig::from_env()?;
    if let Some(endpoint) = cli.endpoint.filter(|e| !e.trim().is_empty()) {
        config = config.with_endpoint(endpoint.trim());
    }
    if let Some(framing) = cli.framing {
        config = config.with_framing(framing);
    }

    let session = StreamingChatSession::with_http(config)?;
    if let Some(welcome) = session.snapshot().history.first() {
        println!("{}", welcome.content);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            println!();
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let reply_index = session.snapshot().history.len() + 1;
        match session.submit(&line) {
            Ok(SubmitOutcome::Started(request_id)) => stream_reply(&session, request_id, reply_index).await?,
            Ok(SubmitOutcome::Ignored) => {}
            Err(e) => {
                println!("ERROR: {e}");
                if matches!(e, ChatError::Configuration(_)) {
                    session.clear_error();
                }
            }
        }
    }
    Ok(())
}

async fn stream_reply(session: &StreamingChatSession, request_id: Uuid, reply_index: usize) -> Result<(), CliError> {
    let mut renderer = ReplyRenderer::new(request_id, reply_index);
    let mut snapshots = session.subscribe();
    let mut stdout = io::stdout();

    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        if let Some(outcome) = renderer.update(&snapshot, &mut stdout)? {
            tracing::debug!(%request_id, ?outcome, "reply finished");
            if matches!(outcome, render::Outcome::Failed(_)) {
                session.clear_error();
            }
            return Ok(());
        }

        tokio::select! {
            changed = snapshots.changed() => {
                if changed.is_err() {
                    return Ok(());
                }
            }
            _ = tokio::signal::ctrl_c() => session.cancel(),
        }
    }
}
