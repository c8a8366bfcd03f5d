use crate::pimp::NO_TRENDS_LINE;
use crate::service::ResponseService;
use crate::trends::TrendClient;
use serenity::all::{Client, Context, EventHandler, GatewayIntents, Message, Ready};
use serenity::async_trait;
use std::sync::Arc;
use tracing::{error, info};

const TRENDS_COMMAND: &str = "!trends";
/// Discord rejects messages longer than this.
const MAX_MESSAGE_CHARS: usize = 2000;

pub struct DiscordHandler {
    service: Arc<ResponseService>,
    trends: Arc<TrendClient>,
}

impl DiscordHandler {
    pub fn new(service: Arc<ResponseService>, trends: Arc<TrendClient>) -> Self {
        Self { service, trends }
    }

    async fn reply_for(&self, content: &str) -> Option<String> {
        match classify_message(content)? {
            Inbound::Trends => {
                let trends = self.trends.fetch_crypto_trends().await;
                Some(format_trends(&trends))
            }
            Inbound::Question(question) => Some(self.service.respond(question).await),
        }
    }
}

#[async_trait]
impl EventHandler for DiscordHandler {
    async fn message(&self, ctx: Context, msg: Message) {
        if msg.author.bot {
            return;
        }

        let Some(reply) = self.reply_for(&msg.content).await else {
            return;
        };

        if let Err(e) = msg
            .channel_id
            .say(&ctx.http, truncate(&reply, MAX_MESSAGE_CHARS))
            .await
        {
            error!("Discord connection lost: {}", e);
        }
    }

    async fn ready(&self, _ctx: Context, ready: Ready) {
        info!("Blockchain Pimp connected to Discord as {}", ready.user.name);
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Inbound<'a> {
    Trends,
    Question(&'a str),
}

fn classify_message(content: &str) -> Option<Inbound<'_>> {
    if content.trim().is_empty() {
        return None;
    }
    if content.trim().eq_ignore_ascii_case(TRENDS_COMMAND) {
        return Some(Inbound::Trends);
    }
    Some(Inbound::Question(content))
}

fn format_trends(trends: &[String]) -> String {
    if trends.is_empty() {
        return NO_TRENDS_LINE.to_string();
    }
    let lines: Vec<String> = trends.iter().map(|t| format!("• {t}")).collect();
    format!("What the streets are hyping:\n{}", lines.join("\n"))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}

/// Connects to the gateway and answers messages until the connection ends.
pub async fn run(
    token: &str,
    handler: DiscordHandler,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let intents = GatewayIntents::GUILD_MESSAGES
        | GatewayIntents::DIRECT_MESSAGES
        | GatewayIntents::MESSAGE_CONTENT;

    let mut client = Client::builder(token, intents)
        .event_handler(handler)
        .await?;
    client.start().await?;
    Ok(())
}
