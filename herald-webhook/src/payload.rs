//! Discord-style webhook body.
//!
//! ```json
//! { "content": "...", "embeds": [ { "title": "...", "description": "...", "url": "...",
//!   "fields": [ { "name": "...", "value": "...", "inline": true } ], "color": 15258703 } ] }
//! ```

use herald_core::{NotificationMessage, Section};
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebhookPayload {
    pub content: String,
    pub embeds: Vec<Embed>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Embed {
    pub title: String,
    pub description: String,
    pub url: String,
    pub fields: Vec<EmbedField>,
    pub color: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    pub inline: bool,
}

impl From<&Section> for EmbedField {
    fn from(section: &Section) -> Self {
        Self {
            name: section.label.clone(),
            value: section.value.clone(),
            inline: section.compact,
        }
    }
}

impl From<&NotificationMessage> for WebhookPayload {
    fn from(message: &NotificationMessage) -> Self {
        let headline = &message.headline;
        Self {
            content: message.content.clone(),
            embeds: vec![Embed {
                title: headline.title.clone(),
                description: headline.description.clone(),
                url: headline.url.clone(),
                fields: message.sections.iter().map(EmbedField::from).collect(),
                color: headline.color,
            }],
        }
    }
}

/// Serialize `message` exactly as it goes over the wire.
pub fn encode(message: &NotificationMessage) -> Result<String> {
    Ok(serde_json::to_string(&WebhookPayload::from(message))?)
}
