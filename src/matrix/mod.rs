//! Matrix protocol integration for the bot.
//!
//! This module connects the bot to a homeserver with an existing access token
//! and turns the sync stream into [`Event`](crate::commands::Event)s:
//! - Session restoration from the configured token
//! - Real-time event synchronization
//! - Auto-join on invitation
//! - Replies to messages
//!
//! # Architecture
//!
//! The module is structured around the [`MatrixClient`] which owns:
//! - **Sync**: event handling and room synchronization via the sync submodule
//! - **Sending**: Markdown replies quoting the triggering message

mod client;
mod sync;

pub use crate::matrix::client::MatrixClient;

/// Credentials of the bot's Matrix account
#[derive(Debug, Clone)]
pub struct UserCredentials {
    /// Base URL of the homeserver
    pub homeserver_url: String,
    /// User ID of the matrix account
    pub user_id: String,
    /// Device the access token was issued for
    pub device_id: String,
    /// Access token of the matrix account
    pub access_token: String,
}
