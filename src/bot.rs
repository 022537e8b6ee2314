//! Chat webhook answering slash commands such as `/mc mc.example.com 25565 --type full`.
//!
//! The chat service posts a form with `token` and `text`; the reply is a JSON
//! body with the rendered `text` and a `response_type` deciding who sees it.

use crate::{BasicStat, BotConf, Conf, FullStat, QueryErr};
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Form, Json, Router,
};
use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};

const USAGE: &str =
    "Invalid command. Usage: [host] [port] [--hidden|--public] [--type basic|full|players]";
const UNAUTHORIZED: &str = "Invalid API token. Your team is not set up to use this server.";

/// What to ask the server for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum QueryType {
    #[default]
    Basic,
    Full,
    Players,
}

#[derive(Debug, Parser)]
#[command(
    name = "mc",
    no_binary_name = true,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct CommandArgs {
    host: Option<String>,
    port: Option<u16>,
    #[arg(long, conflicts_with = "public")]
    hidden: bool,
    #[arg(long)]
    public: bool,
    #[arg(long = "type", value_enum, default_value_t = QueryType::Basic)]
    query_type: QueryType,
}

/// A parsed slash command, with configured defaults filled in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    pub host: String,
    pub port: u16,
    pub hidden: bool,
    pub query_type: QueryType,
}

impl Command {
    pub fn parse(text: &str, conf: &BotConf) -> Result<Self, QueryErr> {
        let args = CommandArgs::try_parse_from(text.split_whitespace())
            .map_err(|err| QueryErr::DataErr(err.to_string()))?;
        let host = args
            .host
            .filter(|host| !host.is_empty())
            .unwrap_or_else(|| conf.default_ip.clone());

        if host.is_empty() {
            return Err(QueryErr::DataErr("no host given and no default host".into()));
        }

        Ok(Self {
            host,
            port: args.port.unwrap_or(conf.default_port),
            hidden: match (args.hidden, args.public) {
                (true, _) => true,
                (_, true) => false,
                _ => conf.hidden_by_default,
            },
            query_type: args.query_type,
        })
    }

    /// Query the server and render the reply text.
    pub async fn run(&self) -> Result<String, QueryErr> {
        let conf = Conf::create_with_port(&self.host, self.port);

        Ok(match self.query_type {
            QueryType::Basic => render_basic(&conf.query().await?),
            QueryType::Full => render_full(&conf.query_full().await?),
            QueryType::Players => render_players(&conf.query_full().await?),
        })
    }
}

/// Parse and run one command.
pub async fn handle_command(text: &str, conf: &BotConf) -> Result<(Command, String), QueryErr> {
    let command = Command::parse(text, conf)?;
    let reply = command.run().await?;

    Ok((command, reply))
}

pub fn render_basic(stat: &BasicStat) -> String {
    format!(
        "```MOTD: {}\nGametype: {}\nMap: {}\nNumPlayers: {}\nMaxPlayers: {}\nHostPort: {}\nHostIp: {}\n```",
        stat.motd,
        stat.game_type,
        stat.map,
        stat.num_players,
        stat.max_players,
        stat.host_port,
        stat.host_ip
    )
}

pub fn render_full(stat: &FullStat) -> String {
    let mut text = String::from("```\n");

    for (key, value) in &stat.key_values {
        text.push_str(&format!("{}: {}\n", key, value));
    }

    if stat.players.is_empty() {
        text.push_str("Players: <none>\n");
    } else {
        text.push_str("Players:\n");
        for player in &stat.players {
            text.push_str(&format!("    {}\n", player));
        }
    }

    text.push_str("```");
    text
}

pub fn render_players(stat: &FullStat) -> String {
    let mut text = String::from("```\n");

    if stat.players.is_empty() {
        text.push_str("<No Players Online>\n");
    }
    for player in &stat.players {
        text.push_str(player);
        text.push('\n');
    }

    text.push_str("```");
    text
}

/// Form fields posted by the chat service.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebhookForm {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    Ephemeral,
    InChannel,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reply {
    pub text: String,
    pub response_type: ResponseType,
}

#[derive(Debug, PartialEq, Eq)]
pub enum WebhookResponse {
    Ok(Reply),
    Rejected(StatusCode, &'static str),
}

impl IntoResponse for WebhookResponse {
    fn into_response(self) -> Response {
        match self {
            WebhookResponse::Ok(reply) => (StatusCode::OK, Json(reply)).into_response(),
            WebhookResponse::Rejected(status, message) => (status, message).into_response(),
        }
    }
}

/// Status and client safe message for a failed command.
///
/// The error itself may carry addresses or raw packet bytes, it is only logged.
pub fn rejection(err: &QueryErr) -> (StatusCode, &'static str) {
    match err {
        QueryErr::DataErr(_) => (StatusCode::BAD_REQUEST, USAGE),
        QueryErr::ConnectErr { .. } => (StatusCode::BAD_REQUEST, "Could not reach the server."),
        QueryErr::TimeoutErr(_) => (
            StatusCode::REQUEST_TIMEOUT,
            "The server did not answer in time. Is enable-query set?",
        ),
        QueryErr::ProtocolErr(_) => (
            StatusCode::BAD_REQUEST,
            "The server sent an invalid query response.",
        ),
        _ => (StatusCode::BAD_REQUEST, "The query failed."),
    }
}

/// Check the shared secret, run the command and build the reply.
pub async fn respond(conf: &BotConf, form: WebhookForm) -> WebhookResponse {
    if !conf.slack_token.is_empty() && conf.slack_token != form.token {
        warn!(text = %form.text, "request with bad token");
        return WebhookResponse::Rejected(StatusCode::UNAUTHORIZED, UNAUTHORIZED);
    }

    match handle_command(&form.text, conf).await {
        Ok((command, text)) => {
            info!(
                host = %command.host,
                port = command.port,
                query_type = ?command.query_type,
                "command answered"
            );
            WebhookResponse::Ok(Reply {
                text,
                response_type: if command.hidden {
                    ResponseType::Ephemeral
                } else {
                    ResponseType::InChannel
                },
            })
        }
        Err(err) => {
            warn!(error = %err, text = %form.text, "command failed");
            let (status, message) = rejection(&err);
            WebhookResponse::Rejected(status, message)
        }
    }
}

async fn webhook(
    State(conf): State<Arc<BotConf>>,
    Form(form): Form<WebhookForm>,
) -> WebhookResponse {
    respond(&conf, form).await
}

pub fn router(conf: BotConf) -> Router {
    Router::new()
        .route("/", post(webhook))
        .with_state(Arc::new(conf))
}

/// Serve the webhook until the listener fails.
pub async fn serve(listener: TcpListener, conf: BotConf) -> std::io::Result<()> {
    info!(addr = ?listener.local_addr().ok(), "webhook listening");
    axum::serve(listener, router(conf)).await
}
