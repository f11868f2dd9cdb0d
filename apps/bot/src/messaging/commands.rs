//! `/subscribe` and `/unsubscribe` handling, plus the long-poll loop that
//! feeds chat messages into it.

use std::time::Duration;

use tracing::{error, info, warn};

use crate::messaging::{Messenger, TelegramClient};
use crate::store::{ContentStore, StoreError};

pub const SUBSCRIBED_REPLY: &str = "✅ You have subscribed to PrepAI!";
pub const UNSUBSCRIBED_REPLY: &str = "❌ You have unsubscribed from PrepAI.";

pub const POLL_TIMEOUT_SECS: u64 = 25;
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Subscribe,
    Unsubscribe,
}

impl Command {
    /// Recognizes `/subscribe` and `/unsubscribe`, with or without a
    /// `@BotName` suffix. Any other text is `None`.
    pub fn parse(text: &str) -> Option<Command> {
        let word = text.split_whitespace().next()?;
        let name = word.split('@').next().unwrap_or(word);
        match name {
            "/subscribe" => Some(Command::Subscribe),
            "/unsubscribe" => Some(Command::Unsubscribe),
            _ => None,
        }
    }
}

/// Applies a command for `chat_id` and sends the confirmation reply.
/// Returns the command that was handled, if the text was one.
///
/// Store failures are returned; a failed reply is only logged, the
/// subscription change already happened.
pub async fn handle_command(
    store: &dyn ContentStore,
    messenger: &dyn Messenger,
    chat_id: i64,
    text: &str,
) -> Result<Option<Command>, StoreError> {
    let Some(command) = Command::parse(text) else {
        return Ok(None);
    };

    let reply = match command {
        Command::Subscribe => {
            let subscriber = store.subscribe(chat_id).await?;
            info!("Chat {chat_id} subscribed (user {})", subscriber.id);
            SUBSCRIBED_REPLY
        }
        Command::Unsubscribe => {
            if store.unsubscribe(chat_id).await? {
                info!("Chat {chat_id} unsubscribed");
            } else {
                info!("Unsubscribe from unknown chat {chat_id}");
            }
            UNSUBSCRIBED_REPLY
        }
    };

    if let Err(e) = messenger.send_message(chat_id, reply).await {
        warn!("Failed to send {command:?} reply to {chat_id}: {e}");
    }

    Ok(Some(command))
}

/// Long-polls Telegram forever, dispatching every text message to
/// `handle_command`. Never returns.
pub async fn poll_commands(store: &dyn ContentStore, telegram: &TelegramClient) {
    let mut offset: Option<i64> = None;
    info!("Polling for subscription commands");

    loop {
        let updates = match telegram.get_updates(offset, POLL_TIMEOUT_SECS).await {
            Ok(updates) => updates,
            Err(e) => {
                warn!("getUpdates failed: {e}; retrying in {POLL_ERROR_BACKOFF:?}");
                tokio::time::sleep(POLL_ERROR_BACKOFF).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);

            let Some(message) = update.message else {
                continue;
            };
            let Some(text) = message.text else {
                continue;
            };

            if let Err(e) = handle_command(store, telegram, message.chat.id, &text).await {
                error!("Failed to handle command from chat {}: {e}", message.chat.id);
            }
        }
    }
}
