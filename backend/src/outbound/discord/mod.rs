//! Discord outbound adapter.
//!
//! This module provides a thin HTTP implementation of the
//! `NotificationChannel` port backed by Discord webhooks.

mod dto;
mod webhook_channel;

pub use webhook_channel::{
    DEFAULT_DISCORD_WEBHOOK_BASE, DiscordWebhookChannel, DiscordWebhookChannelError,
    DiscordWebhooks,
};
