//! Discord webhook message shapes.
//!
//! Each notification becomes one rich embed. Discord renders field values as
//! text, so numeric metrics are formatted before serialisation.

use chrono::SecondsFormat;
use serde::Serialize;

use crate::domain::{NotificationEvent, UNKNOWN};

/// Embed accent colour.
pub(super) const EMBED_COLOUR: u32 = 5_814_783;

/// Discord's limit on a single embed field value.
const FIELD_VALUE_LIMIT: usize = 1024;

#[derive(Debug, Serialize)]
pub(super) struct WebhookMessageDto {
    embeds: Vec<EmbedDto>,
}

#[derive(Debug, Serialize)]
struct EmbedDto {
    title: String,
    color: u32,
    #[serde(rename = "type")]
    kind: &'static str,
    fields: Vec<EmbedFieldDto>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thumbnail: Option<ThumbnailDto>,
    timestamp: String,
}

#[derive(Debug, Serialize)]
struct EmbedFieldDto {
    name: &'static str,
    value: String,
    inline: bool,
}

#[derive(Debug, Serialize)]
struct ThumbnailDto {
    url: String,
}

impl EmbedFieldDto {
    fn new(name: &'static str, value: impl Into<String>, inline: bool) -> Self {
        Self {
            name,
            value: field_value(value.into()),
            inline,
        }
    }
}

impl From<&NotificationEvent> for WebhookMessageDto {
    fn from(event: &NotificationEvent) -> Self {
        let timestamp = event
            .occurred_at()
            .to_rfc3339_opts(SecondsFormat::Millis, true);
        let embed = match event {
            NotificationEvent::Query {
                path, caller_ip, ..
            } => EmbedDto {
                title: "New Query".to_owned(),
                color: EMBED_COLOUR,
                kind: "rich",
                fields: vec![
                    EmbedFieldDto::new("Path", path.as_str(), false),
                    EmbedFieldDto::new("IP", caller_ip.as_str(), true),
                ],
                thumbnail: None,
                timestamp,
            },
            NotificationEvent::ProfileSummary {
                profile, totals, ..
            } => EmbedDto {
                title: format!("{} ({})", profile.display_name, profile.steam_id),
                color: EMBED_COLOUR,
                kind: "rich",
                fields: vec![
                    EmbedFieldDto::new("Views", totals.views.to_string(), true),
                    EmbedFieldDto::new("Subscribers", totals.subscribers.to_string(), true),
                    EmbedFieldDto::new("Favorites", totals.favorites.to_string(), true),
                    EmbedFieldDto::new("Likes", totals.likes.to_string(), true),
                    EmbedFieldDto::new("Dislikes", totals.dislikes.to_string(), true),
                    EmbedFieldDto::new("Awards", totals.awards.to_string(), true),
                ],
                thumbnail: (!profile.avatar_url.is_empty()).then(|| ThumbnailDto {
                    url: profile.avatar_url.clone(),
                }),
                timestamp,
            },
            NotificationEvent::Error {
                path,
                caller_ip,
                message,
                ..
            } => EmbedDto {
                title: "Error".to_owned(),
                color: EMBED_COLOUR,
                kind: "rich",
                fields: vec![
                    EmbedFieldDto::new("Path", path.as_str(), true),
                    EmbedFieldDto::new("IP", caller_ip.as_str(), true),
                    EmbedFieldDto::new("Error Message", message.as_str(), false),
                ],
                thumbnail: None,
                timestamp,
            },
        };
        Self {
            embeds: vec![embed],
        }
    }
}

/// Discord rejects empty or oversized field values.
fn field_value(raw: String) -> String {
    if raw.trim().is_empty() {
        return UNKNOWN.to_owned();
    }
    if raw.chars().count() <= FIELD_VALUE_LIMIT {
        return raw;
    }
    let mut truncated: String = raw.chars().take(FIELD_VALUE_LIMIT - 3).collect();
    truncated.push_str("...");
    truncated
}
