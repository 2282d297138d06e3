use serde::Serialize;

use crate::card::{Card, CardAuthor, Color};
use crate::grouping::MessageGroup;

/// Opaque identifier of a message on the remote platform.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct RemoteMessageId(pub String);

impl RemoteMessageId {
    pub fn new(id: impl Into<String>) -> Self {
        RemoteMessageId(id.into())
    }
}

/// Which remote channel a log message is bound for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogChannel {
    Log,
    Errors,
}

/// Outgoing message payload: one text body plus any number of cards the
/// platform will accept in a single message.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct OutgoingMessage {
    pub content: Option<String>,
    pub cards: Vec<Card>,
}

impl OutgoingMessage {
    pub fn from_text(text: impl Into<String>) -> Self {
        OutgoingMessage {
            content: Some(text.into()),
            cards: Vec::new(),
        }
    }

    pub fn from_card(card: Card) -> Self {
        OutgoingMessage {
            content: None,
            cards: vec![card],
        }
    }

    /// Stamps `color` on any card that doesn't have one. Used by raw-mode
    /// dispatch, which otherwise passes payloads through untouched.
    pub fn with_default_color(mut self, color: Color) -> Self {
        for card in &mut self.cards {
            if card.color.is_none() {
                card.color = Some(color);
            }
        }
        self
    }

    /// Stamps the caller attribution on any card that doesn't carry one.
    pub fn with_default_author(mut self, author: &CardAuthor) -> Self {
        for card in &mut self.cards {
            if card.author.is_none() {
                *card = std::mem::take(card).with_author(&author.name, author.icon_url.as_deref());
            }
        }
        self
    }
}

impl From<MessageGroup> for OutgoingMessage {
    fn from(group: MessageGroup) -> Self {
        OutgoingMessage {
            content: group.text,
            cards: group.cards,
        }
    }
}
