use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use futures_util::{SinkExt, StreamExt};
use reqwest::StatusCode;
use reqwest::Url;
use serde_json::Value;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{info, warn};
use wire::WireError;

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;

type WsStream = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

/// Header carrying the relay's sequence number on `/radar.json`.
const SEQ_HEADER: &str = "x-radar-seq";

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("websocket failed: {0}")]
    Ws(Box<tokio_tungstenite::tungstenite::Error>),
    #[error("websocket closed")]
    WsClosed,
    #[error("cannot read {path}: {source}")]
    Input { path: String, source: io::Error },
    #[error("feed has no valid messages to repeat")]
    EmptyFeed,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

impl From<tokio_tungstenite::tungstenite::Error> for CliError {
    fn from(error: tokio_tungstenite::tungstenite::Error) -> Self {
        Self::Ws(Box::new(error))
    }
}

#[derive(Parser, Debug)]
#[command(name = "radar-cli", about = "Radar relay HTTP and websocket CLI")]
struct Cli {
    #[arg(long, env = "RADAR_BASE_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    #[arg(long, env = "RADAR_PUBLISH_TOKEN")]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the relay is up.
    Ping,
    /// Print the agent and weapon tables.
    Tables,
    /// Print the newest published message.
    Latest,
    /// Stream a JSONL feed to the relay.
    Publish(PublishArgs),
    /// Print one summary line per pushed message.
    Watch {
        #[arg(long, help = "Stop after this many messages")]
        count: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct PublishArgs {
    #[arg(long, default_value = "-", help = "Input file path, or - for stdin")]
    input: String,

    #[arg(long, default_value_t = 22, help = "Delay between messages")]
    interval_ms: u64,

    #[arg(long, default_value_t = false, help = "Loop the feed until interrupted")]
    repeat: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_writer(io::stderr).init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Ping => run_ping(&cli).await,
        Command::Tables => run_tables(&cli).await,
        Command::Latest => run_latest(&cli).await,
        Command::Publish(args) => run_publish(&cli, args).await,
        Command::Watch { count } => run_watch(&cli, *count).await,
    }
}

// =============================================================================
// HTTP
// =============================================================================

async fn run_ping(cli: &Cli) -> Result<(), CliError> {
    http_get(cli, "/healthz").await?;
    println!("ok");
    Ok(())
}

async fn run_tables(cli: &Cli) -> Result<(), CliError> {
    let agents = http_get(cli, "/actors.json").await?.json::<Value>().await?;
    let weapons = http_get(cli, "/weapons.json").await?.json::<Value>().await?;
    print_json(&serde_json::json!({ "agents": agents, "weapons": weapons }))
}

async fn run_latest(cli: &Cli) -> Result<(), CliError> {
    let response = http_get(cli, "/radar.json").await?;
    if response.status() == StatusCode::NO_CONTENT {
        info!("nothing published yet");
        return Ok(());
    }
    if let Some(seq) = response.headers().get(SEQ_HEADER).and_then(|v| v.to_str().ok()) {
        info!(%seq, "latest message");
    }
    print_json(&response.json::<Value>().await?)
}

async fn http_get(cli: &Cli, path: &str) -> Result<reqwest::Response, CliError> {
    let url = format!("{}{}", cli.base_url.trim_end_matches('/'), path);
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CliError::Status { status: status.as_u16(), body });
    }
    Ok(response)
}

// =============================================================================
// WEBSOCKET
// =============================================================================

async fn run_publish(cli: &Cli, args: &PublishArgs) -> Result<(), CliError> {
    let url = ws_url(&cli.base_url, "/ws/publish", cli.token.as_deref())?;
    let (mut stream, _) = connect_async(url.as_str()).await?;
    let delay = Duration::from_millis(args.interval_ms);

    let mut sent = 0_usize;
    let mut skipped = 0_usize;
    let mut kept = Vec::new();

    let reader = open_input(&args.input)?;
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| CliError::Input { path: args.input.clone(), source })?;
        match parse_feed_line(&line) {
            Ok(None) => {}
            Ok(Some(raw)) => {
                send_paced(&mut stream, &raw, delay).await?;
                sent = sent.saturating_add(1);
                if args.repeat {
                    kept.push(raw);
                }
            }
            Err(error) => {
                warn!(line = number + 1, %error, "skipping feed line");
                skipped = skipped.saturating_add(1);
            }
        }
    }

    if args.repeat {
        if kept.is_empty() {
            return Err(CliError::EmptyFeed);
        }
        info!(messages = kept.len(), "repeating feed");
        loop {
            for raw in &kept {
                send_paced(&mut stream, raw, delay).await?;
            }
        }
    }

    stream.close(None).await?;
    info!(sent, skipped, "publish complete");
    Ok(())
}

async fn run_watch(cli: &Cli, count: Option<usize>) -> Result<(), CliError> {
    let url = ws_url(&cli.base_url, "/ws", None)?;
    let (mut stream, _) = connect_async(url.as_str()).await?;

    let mut seen = 0_usize;
    while count.is_none_or(|limit| seen < limit) {
        let text = next_text(&mut stream).await?;
        println!("{}", summary_line(&text));
        seen += 1;
    }
    stream.close(None).await?;
    Ok(())
}

async fn send_paced(stream: &mut WsStream, raw: &str, delay: Duration) -> Result<(), CliError> {
    stream.send(Message::Text(raw.to_owned().into())).await?;
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
    Ok(())
}

async fn next_text(stream: &mut WsStream) -> Result<String, CliError> {
    loop {
        let Some(message) = stream.next().await else {
            return Err(CliError::WsClosed);
        };
        match message? {
            Message::Text(text) => return Ok(text.as_str().to_owned()),
            Message::Close(_) => return Err(CliError::WsClosed),
            _ => {}
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

/// Websocket URL for `path` on the relay at `base_url`.
fn ws_url(base_url: &str, path: &str, token: Option<&str>) -> Result<Url, CliError> {
    let base = base_url.trim_end_matches('/');
    let joined = if let Some(rest) = base.strip_prefix("http://") {
        format!("ws://{rest}{path}")
    } else if let Some(rest) = base.strip_prefix("https://") {
        format!("wss://{rest}{path}")
    } else {
        return Err(CliError::InvalidBaseUrl(base_url.to_owned()));
    };

    let mut url = Url::parse(&joined).map_err(|_| CliError::InvalidBaseUrl(base_url.to_owned()))?;
    if let Some(token) = token {
        url.query_pairs_mut().append_pair("token", token);
    }
    Ok(url)
}

fn open_input(input: &str) -> Result<Box<dyn BufRead>, CliError> {
    if input == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file = File::open(input).map_err(|source| CliError::Input { path: input.to_owned(), source })?;
    Ok(Box::new(BufReader::new(file)))
}

/// Validate one feed line. Blank lines yield `None`.
fn parse_feed_line(line: &str) -> Result<Option<String>, WireError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    wire::classify(trimmed)?;
    Ok(Some(trimmed.to_owned()))
}

/// One-line description of a pushed message.
fn summary_line(raw: &str) -> String {
    match wire::classify(raw) {
        Ok(wire::Message::Render(snapshot)) => format!(
            "map={} entities={} yaw={:.1}",
            snapshot.map_name, snapshot.entity_count, snapshot.local_view_angle_y
        ),
        Ok(wire::Message::Other(command)) => format!("waiting ({command})"),
        Err(error) => format!("invalid: {error}"),
    }
}

fn print_json(value: &Value) -> Result<(), CliError> {
    let rendered = serde_json::to_string_pretty(value)?;
    println!("{rendered}");
    Ok(())
}
