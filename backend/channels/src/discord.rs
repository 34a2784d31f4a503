use std::sync::Arc;

use anyhow::{bail, Context as _, Result};
use async_trait::async_trait;
use cyborg_core::{InboundMessage, ReplyPayload, Transport, TransportEvent};
use serenity::all::{ChannelId, CreateEmbed, CreateEmbedFooter, CreateMessage, Http};
use serenity::model::channel::Message as DiscordMessage;
use serenity::model::gateway::Ready;
use serenity::prelude::*;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

struct Handler {
    events: mpsc::Sender<TransportEvent>,
}

#[async_trait]
impl EventHandler for Handler {
    async fn message(&self, _ctx: Context, msg: DiscordMessage) {
        debug!(channel = %msg.channel_id, author = %msg.author.id, "Received Discord message");

        let inbound = InboundMessage::new(
            msg.id.to_string(),
            msg.channel_id.to_string(),
            msg.author.id.get(),
            msg.author.name.clone(),
            msg.content,
        );
        if self.events.send(TransportEvent::Message(inbound)).await.is_err() {
            error!("Router stopped; dropping Discord message");
        }
    }

    async fn ready(&self, _: Context, ready: Ready) {
        info!("{} is connected!", ready.user.name);
        let _ = self
            .events
            .send(TransportEvent::Ready {
                user: ready.user.name.clone(),
            })
            .await;
    }
}

/// Discord gateway transport. Replies are sent as embeds.
pub struct DiscordTransport {
    token: String,
    http: Arc<Http>,
}

impl DiscordTransport {
    pub fn new(token: impl Into<String>) -> Self {
        let token = token.into();
        let http = Arc::new(Http::new(&token));
        Self { token, http }
    }
}

/// Parse a Discord channel snowflake.
pub fn parse_channel_id(raw: &str) -> Result<ChannelId> {
    let id: u64 = raw
        .parse()
        .with_context(|| format!("invalid Discord channel id `{raw}`"))?;
    if id == 0 {
        bail!("invalid Discord channel id `0`");
    }
    Ok(ChannelId::new(id))
}

/// The embed a reply renders to.
pub fn build_embed(reply: &ReplyPayload) -> CreateEmbed {
    CreateEmbed::new()
        .description(&reply.description)
        .colour(reply.colour)
        .footer(CreateEmbedFooter::new(&reply.footer))
}

#[async_trait]
impl Transport for DiscordTransport {
    fn name(&self) -> &str {
        "discord"
    }

    async fn start(&self, events: mpsc::Sender<TransportEvent>) -> Result<()> {
        info!("Starting Discord transport");

        let intents = GatewayIntents::GUILD_MESSAGES
            | GatewayIntents::DIRECT_MESSAGES
            | GatewayIntents::MESSAGE_CONTENT;

        let mut client = Client::builder(&self.token, intents)
            .event_handler(Handler { events })
            .await
            .context("Failed to build Discord client")?;

        if let Err(why) = client.start().await {
            error!("Client error: {:?}", why);
            bail!("Discord client error: {why}");
        }
        Ok(())
    }

    async fn send_reply(&self, channel_id: &str, reply: ReplyPayload) -> Result<()> {
        let channel = parse_channel_id(channel_id)?;
        let message = CreateMessage::new().embed(build_embed(&reply));
        channel
            .send_message(self.http.as_ref(), message)
            .await
            .with_context(|| format!("Failed to send reply to channel {channel_id}"))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn channel_ids() {
        assert_eq!(parse_channel_id("1234").unwrap().get(), 1234);
        assert!(parse_channel_id("0").is_err());
        assert!(parse_channel_id("console").is_err());
    }
}
