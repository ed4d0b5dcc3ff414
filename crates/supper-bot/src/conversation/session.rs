//! The conversation as a keyed session: one per (chat, user), driven by the
//! framework's session hub so its events are handled one at a time.

use super::context::ConversationContext;
use super::event::{ConversationKey, Inbound, Update};
use super::flow::Flow;
use super::stage::Stage;
use super::{ConversationError, Services};
use crate::model::Cart;
use crate::transport::{MessageRef, Outbound, Transport};
use actor_framework::SessionEntity;
use async_trait::async_trait;
use tracing::{debug, info, warn};

pub struct ConversationSession {
    key: ConversationKey,
    context: ConversationContext,
}

/// What one event did to the conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct Turn {
    pub stage: Stage,
    pub replies: Vec<Outbound>,
    pub cart: Cart,
    pub order_id: Option<String>,
}

#[async_trait]
impl SessionEntity for ConversationSession {
    type Key = ConversationKey;
    type Event = Update;
    type Output = Turn;
    type Context = Services;
    type Error = ConversationError;

    fn open(key: ConversationKey) -> Self {
        Self {
            key,
            context: ConversationContext::default(),
        }
    }

    async fn handle_event(&mut self, update: Update, services: &Services) -> Result<Turn, ConversationError> {
        let before = self.context.stage;
        // button presses edit the prompt they came from; anything typed starts a new one
        let prompt = match update.input {
            Inbound::Callback(_) => self.context.prompt.take(),
            _ => None,
        };
        self.context.prompt = None;

        let replies = match Flow::new(&mut self.context, services, &update).run().await {
            Ok(replies) => replies,
            Err(e) => {
                warn!(key = %self.key, stage = %before, error = %e, "Turn failed, conversation reset");
                self.context.clear();
                return Err(e);
            }
        };

        let prompt = deliver(services.transport.as_ref(), update.chat_id, &replies, prompt).await;
        if self.context.stage.is_active() {
            self.context.prompt = prompt;
        }

        let after = self.context.stage;
        if before != after {
            info!(key = %self.key, from = %before, to = %after, "Stage changed");
        }

        Ok(Turn {
            stage: after,
            replies,
            cart: self.context.cart.clone(),
            order_id: self.context.order_id.clone(),
        })
    }

    async fn on_idle(&mut self, _services: &Services) {
        if self.context.stage.is_active() {
            info!(key = %self.key, stage = %self.context.stage, "Conversation timed out");
        }
        self.context.clear();
    }
}

/// Sends the replies in order and returns the prompt later presses should edit.
/// Failed sends are logged and skipped.
async fn deliver(
    transport: &dyn Transport,
    chat_id: i64,
    replies: &[Outbound],
    mut prompt: Option<MessageRef>,
) -> Option<MessageRef> {
    for reply in replies {
        let result = match reply {
            Outbound::Text { text, markup } => transport
                .send_text(chat_id, text, markup.as_ref())
                .await
                .map(drop),
            Outbound::Image { source, caption } => {
                transport.send_image(chat_id, source, caption).await.map(drop)
            }
            Outbound::Prompt { text, markup } => {
                let edited = match &prompt {
                    Some(message) => match transport.edit_text(message, text, markup.as_ref()).await {
                        Ok(()) => true,
                        Err(e) => {
                            debug!(chat_id, error = %e, "Prompt not editable, sending a new one");
                            false
                        }
                    },
                    None => false,
                };
                if edited {
                    Ok(())
                } else {
                    transport
                        .send_text(chat_id, text, markup.as_ref())
                        .await
                        .map(|sent| prompt = Some(sent))
                }
            }
        };
        if let Err(e) = result {
            warn!(chat_id, error = %e, "Reply not delivered");
        }
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{Markup, RecordingTransport, Sent};

    #[tokio::test]
    async fn unknown_prompt_is_sent_anew() {
        let transport = RecordingTransport::new();
        let stale = MessageRef {
            chat_id: 7,
            message_id: 99,
        };
        let replies = vec![Outbound::prompt("Pick one:", Markup::Inline(Vec::new()))];

        let prompt = deliver(&transport, 7, &replies, Some(stale)).await;

        let sent = transport.sent();
        assert_eq!(sent.len(), 1);
        assert!(matches!(&sent[0], Sent::Text { text, .. } if text == "Pick one:"));
        assert_eq!(prompt.map(|p| p.message_id), Some(1));
    }

    #[tokio::test]
    async fn failed_sends_do_not_stop_later_replies() {
        let transport = RecordingTransport::new();
        transport.fail_chat(7);
        let replies = vec![Outbound::text("one"), Outbound::text("two")];

        let prompt = deliver(&transport, 7, &replies, None).await;

        assert!(prompt.is_none());
        assert!(transport.sent().is_empty());
    }
}
