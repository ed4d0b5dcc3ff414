//! # Messaging Transport
//!
//! The chat platform as seen by the bot: three outbound primitives and a
//! recording implementation used by tests and the demo binary.

use async_trait::async_trait;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum TransportError {
    #[error("Send failed: {0}")]
    Send(String),
    #[error("Message {0} cannot be edited")]
    NotEditable(i64),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Button {
    pub text: String,
    pub data: String,
}

impl Button {
    pub fn new(text: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            data: data.into(),
        }
    }
}

/// Buttons attached to a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup {
    /// Rows of buttons under the message that report back as callbacks.
    Inline(Vec<Vec<Button>>),
    /// A persistent keyboard that sends its labels as plain text.
    Reply(Vec<Vec<String>>),
}

impl Markup {
    /// Every inline button, row by row.
    pub fn buttons(&self) -> Vec<&Button> {
        match self {
            Self::Inline(rows) => rows.iter().flatten().collect(),
            Self::Reply(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageRef {
    pub chat_id: i64,
    pub message_id: i64,
}

#[async_trait]
pub trait Transport: Send + Sync {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&Markup>,
    ) -> Result<MessageRef, TransportError>;

    /// `source` is a path or URL the platform can fetch.
    async fn send_image(
        &self,
        chat_id: i64,
        source: &str,
        caption: &str,
    ) -> Result<MessageRef, TransportError>;

    async fn edit_text(
        &self,
        message: &MessageRef,
        text: &str,
        markup: Option<&Markup>,
    ) -> Result<(), TransportError>;
}

/// Something the bot wants shown to the customer.
#[derive(Debug, Clone, PartialEq)]
pub enum Outbound {
    Text { text: String, markup: Option<Markup> },
    Image { source: String, caption: String },
    /// Replaces the current inline prompt when there is one.
    Prompt { text: String, markup: Option<Markup> },
}

impl Outbound {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            markup: None,
        }
    }

    pub fn text_with(text: impl Into<String>, markup: Markup) -> Self {
        Self::Text {
            text: text.into(),
            markup: Some(markup),
        }
    }

    pub fn prompt(text: impl Into<String>, markup: Markup) -> Self {
        Self::Prompt {
            text: text.into(),
            markup: Some(markup),
        }
    }

    /// Prompt without buttons: the current prompt's text is replaced and its
    /// buttons removed.
    pub fn replace(text: impl Into<String>) -> Self {
        Self::Prompt {
            text: text.into(),
            markup: None,
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Self::Text { text, .. } | Self::Prompt { text, .. } => text,
            Self::Image { caption, .. } => caption,
        }
    }

    pub fn markup(&self) -> Option<&Markup> {
        match self {
            Self::Text { markup, .. } | Self::Prompt { markup, .. } => markup.as_ref(),
            Self::Image { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    Text {
        chat_id: i64,
        message_id: i64,
        text: String,
        markup: Option<Markup>,
    },
    Image {
        chat_id: i64,
        message_id: i64,
        source: String,
        caption: String,
    },
    Edit {
        chat_id: i64,
        message_id: i64,
        text: String,
        markup: Option<Markup>,
    },
}

impl Sent {
    pub fn chat_id(&self) -> i64 {
        match self {
            Self::Text { chat_id, .. } | Self::Image { chat_id, .. } | Self::Edit { chat_id, .. } => {
                *chat_id
            }
        }
    }

    pub fn body(&self) -> &str {
        match self {
            Self::Text { text, .. } | Self::Edit { text, .. } => text,
            Self::Image { caption, .. } => caption,
        }
    }
}

#[derive(Default)]
struct Log {
    next_id: i64,
    sent: Vec<Sent>,
    failing: Vec<i64>,
}

/// Keeps everything it is asked to send.
#[derive(Default)]
pub struct RecordingTransport {
    log: Mutex<Log>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Sent> {
        self.log.lock().map(|log| log.sent.clone()).unwrap_or_default()
    }

    /// Bodies of everything delivered to one chat, in order.
    pub fn bodies(&self, chat_id: i64) -> Vec<String> {
        self.sent()
            .iter()
            .filter(|sent| sent.chat_id() == chat_id)
            .map(|sent| sent.body().to_string())
            .collect()
    }

    /// Makes every later send to `chat_id` fail.
    pub fn fail_chat(&self, chat_id: i64) {
        if let Ok(mut log) = self.log.lock() {
            log.failing.push(chat_id);
        }
    }

    fn record(&self, chat_id: i64, build: impl FnOnce(i64) -> Sent) -> Result<MessageRef, TransportError> {
        let mut log = self
            .log
            .lock()
            .map_err(|e| TransportError::Send(e.to_string()))?;
        if log.failing.contains(&chat_id) {
            return Err(TransportError::Send(format!("chat {chat_id} unreachable")));
        }
        log.next_id += 1;
        let message_id = log.next_id;
        log.sent.push(build(message_id));
        Ok(MessageRef { chat_id, message_id })
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send_text(
        &self,
        chat_id: i64,
        text: &str,
        markup: Option<&Markup>,
    ) -> Result<MessageRef, TransportError> {
        self.record(chat_id, |message_id| Sent::Text {
            chat_id,
            message_id,
            text: text.to_string(),
            markup: markup.cloned(),
        })
    }

    async fn send_image(
        &self,
        chat_id: i64,
        source: &str,
        caption: &str,
    ) -> Result<MessageRef, TransportError> {
        self.record(chat_id, |message_id| Sent::Image {
            chat_id,
            message_id,
            source: source.to_string(),
            caption: caption.to_string(),
        })
    }

    async fn edit_text(
        &self,
        message: &MessageRef,
        text: &str,
        markup: Option<&Markup>,
    ) -> Result<(), TransportError> {
        let mut log = self
            .log
            .lock()
            .map_err(|e| TransportError::Send(e.to_string()))?;
        if log.failing.contains(&message.chat_id) {
            return Err(TransportError::Send(format!("chat {} unreachable", message.chat_id)));
        }
        if message.message_id > log.next_id {
            return Err(TransportError::NotEditable(message.message_id));
        }
        log.sent.push(Sent::Edit {
            chat_id: message.chat_id,
            message_id: message.message_id,
            text: text.to_string(),
            markup: markup.cloned(),
        });
        Ok(())
    }
}
