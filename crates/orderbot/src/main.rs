use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

mod console;
mod controller;
mod replies;

use orderbot_channels::{Channel, OutboundMessage};
use orderbot_core::{OrderbotConfig, Participant};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "orderbot=info".into()),
        )
        .init();

    // load config: explicit path > ORDERBOT_CONFIG env > ~/.orderbot/orderbot.toml
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("ORDERBOT_CONFIG").ok());
    let config = OrderbotConfig::load(config_path.as_deref()).unwrap_or_else(|e| {
        tracing::warn!("Config load failed ({}), using defaults", e);
        OrderbotConfig::default()
    });

    let nick = config.bot.nick.clone();
    let mut roster = config.channel.roster.clone();
    if !roster.contains(&nick) {
        roster.push(nick.clone());
    }

    let mut channel = console::ConsoleChannel::new(roster);
    channel.connect().await?;
    let channel: Arc<dyn Channel> = Arc::new(channel);

    let controller = controller::SessionController::new(
        Arc::clone(&channel),
        Participant::from(nick.clone()),
        Duration::from_secs(config.nag.interval_secs),
    );

    info!(nick = %nick, "orderbot running; address commands as `sender: @<nick> <command>`");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("stdin closed, shutting down");
                    break;
                };
                let Some(mut msg) = console::parse_line(&line) else {
                    continue;
                };
                // Only messages addressed to the bot are classified.
                let Some(body) = console::addressed_to_bot(&msg.content, &nick) else {
                    continue;
                };
                msg.content = body.to_string();
                if let Some(reply) = controller.handle_message(&msg).await {
                    channel.send(&OutboundMessage::text(reply)).await?;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("interrupt received, shutting down");
                break;
            }
        }
    }

    Ok(())
}
