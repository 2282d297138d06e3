//! Rich card units and error field extraction.
//!
//! A card is the structured, visually distinct block inside a chat message
//! (title/description/fields), analogous to a rich embed. The platform caps
//! field lengths, so everything is clamped on the way in.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::text::{limit_string, limit_string_paragraph};

/// Hard platform limits, with some buffer built in.
const TITLE_LIMIT: usize = 250; // Really 256.
const DESCRIPTION_LIMIT: usize = 2000; // Really 2048.
const FIELD_LIMIT: usize = 1000; // Really 1024.
const LIMIT_TOLERANCE: usize = 100;

/// A display accent color (RGB).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Color(pub u32);

impl Color {
    pub const ERROR: Color = Color(0xff034a);
    pub const WARN: Color = Color(0xffaa02);
    pub const INFO: Color = Color(0x00aff4);
    pub const REGULAR: Color = Color(0x424555);
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

/// Attribution line shown at the top of a card (e.g. the command that logged).
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CardAuthor {
    pub name: String,
    pub icon_url: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Card {
    pub title: Option<String>,
    pub description: Option<String>,
    pub fields: Vec<CardField>,
    pub color: Option<Color>,
    pub author: Option<CardAuthor>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl Card {
    pub fn new() -> Self {
        Self::default()
    }

    /// Card wrapping a plain string, used when a log level promotes text.
    pub fn from_text(text: &str) -> Self {
        Card {
            description: Some(limit_description(text)),
            timestamp: Some(Utc::now()),
            ..Card::default()
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(limit_string(title, TITLE_LIMIT));
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(limit_description(description));
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = Some(color);
        self
    }

    /// Attributes the card to a caller (e.g. the command doing the logging).
    pub fn with_author(mut self, name: &str, icon_url: Option<&str>) -> Self {
        self.author = Some(CardAuthor {
            name: limit_string(name, TITLE_LIMIT),
            icon_url: icon_url.map(str::to_string),
        });
        self
    }

    pub fn add_field(&mut self, name: &str, value: &str, inline: bool) {
        self.fields.push(CardField {
            name: limit_string(name, TITLE_LIMIT),
            value: limit_field(value),
            inline,
        });
    }

    /// Card describing an error, with one field per piece of information we
    /// managed to extract.
    pub fn for_error(details: &ErrorDetails, title: &str) -> Self {
        let mut card = Card::new().with_title(title);
        for (name, value, inline) in details.fields() {
            card.add_field(&name, &value, inline);
        }
        card.timestamp = Some(Utc::now());
        card
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.fields.is_empty()
    }
}

fn limit_description(s: &str) -> String {
    limit_string_paragraph(s, DESCRIPTION_LIMIT, LIMIT_TOLERANCE)
}

fn limit_field(s: &str) -> String {
    limit_string_paragraph(s, FIELD_LIMIT, LIMIT_TOLERANCE)
}

fn wrap_mono(s: &str) -> String {
    format!("`{s}`")
}

fn wrap_code_block(s: &str) -> String {
    format!("```\n{s}\n```")
}

/// Interesting or useful information extracted from an error.
///
/// The idea is that you can throw in any error and get useful fields for the
/// log; everything is optional and absent members are simply skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorDetails {
    pub name: Option<String>,
    pub code: Option<String>,
    pub id: Option<String>,
    pub message: Option<String>,
    pub stack: Option<String>,
    pub server_name: Option<String>,
    pub target_url: Option<String>,
}

impl ErrorDetails {
    pub fn from_message(message: &str) -> Self {
        ErrorDetails {
            message: Some(message.to_string()),
            ..ErrorDetails::default()
        }
    }

    /// Ordered `(name, value, inline)` triples for card display.
    ///
    /// A name that is literally "Error" carries no information and is skipped.
    pub fn fields(&self) -> Vec<(String, String, bool)> {
        let mut fields = Vec::new();
        if let Some(name) = &self.name {
            if name.to_lowercase() != "error" {
                fields.push(("Name".to_string(), name.clone(), true));
            }
        }
        if let Some(code) = &self.code {
            fields.push(("Code".to_string(), wrap_mono(code), true));
        }
        if let Some(id) = &self.id {
            fields.push(("ID".to_string(), id.clone(), true));
        }
        if let Some(server_name) = &self.server_name {
            fields.push(("Socket server name".to_string(), server_name.clone(), true));
        }
        if let Some(url) = &self.target_url {
            fields.push(("Target URL".to_string(), format!("[{url}]({url})"), true));
        }
        if let Some(message) = &self.message {
            fields.push(("Message".to_string(), message.clone(), false));
        }
        if let Some(stack) = &self.stack {
            fields.push(("Stack".to_string(), wrap_code_block(stack), false));
        }
        fields
    }
}

impl From<&crate::Error> for ErrorDetails {
    fn from(err: &crate::Error) -> Self {
        let name = match err {
            crate::Error::Config(_) => "ConfigError",
            crate::Error::Usage(_) => "UsageError",
            crate::Error::Io(_) => "IoError",
            crate::Error::Db(_) => "DatabaseError",
            crate::Error::Remote(_) => "RemoteError",
        };
        ErrorDetails {
            name: Some(name.to_string()),
            message: Some(err.to_string()),
            ..ErrorDetails::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_fields_keep_fixed_order() {
        let details = ErrorDetails {
            name: Some("RequestError".to_string()),
            code: Some("ECONNRESET".to_string()),
            id: None,
            message: Some("connection reset".to_string()),
            stack: Some("at main".to_string()),
            server_name: Some("gateway.example.com".to_string()),
            target_url: None,
        };
        let names: Vec<String> = details.fields().into_iter().map(|f| f.0).collect();
        assert_eq!(
            names,
            ["Name", "Code", "Socket server name", "Message", "Stack"]
        );
    }

    #[test]
    fn plain_error_name_is_skipped() {
        let details = ErrorDetails {
            name: Some("Error".to_string()),
            message: Some("boom".to_string()),
            ..ErrorDetails::default()
        };
        let names: Vec<String> = details.fields().into_iter().map(|f| f.0).collect();
        assert_eq!(names, ["Message"]);
    }

    #[test]
    fn titles_are_clamped() {
        let card = Card::new().with_title(&"t".repeat(400));
        assert!(card.title.unwrap().chars().count() <= 250);
    }

    #[test]
    fn author_attribution() {
        let card = Card::new().with_author("system", Some("https://example.com/i.png"));
        let author = card.author.unwrap();
        assert_eq!(author.name, "system");
        assert!(author.icon_url.is_some());
    }

    #[test]
    fn error_card_has_fields_and_timestamp() {
        let details = ErrorDetails::from_message("boom");
        let card = Card::for_error(&details, "An error has occurred");
        assert_eq!(card.title.as_deref(), Some("An error has occurred"));
        assert_eq!(card.fields.len(), 1);
        assert!(card.timestamp.is_some());
    }
}
