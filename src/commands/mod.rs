//! Bot command dispatch and response rendering.
//!
//! This module is the core of the bot: it turns inbound chat events into
//! command invocations and command results into replies.
//!
//! # Overview
//!
//! ```text
//! Matrix event
//!      │
//!      ▼
//! ┌─────────────┐   own message / no prefix / unknown command
//! │ Dispatcher  │ ─────────────────────────────────────────────▶ dropped
//! └─────────────┘
//!      │ resolve token in the CommandRegistry
//!      │ bind arguments (missing required → usage error document)
//!      ▼
//! ┌─────────────┐
//! │ instrument  │  starts the timer
//! └─────────────┘
//!      │
//!      ▼
//! ┌─────────────┐
//! │  handler    │  Gateway lookups → render → Reply
//! └─────────────┘
//!      │
//!      ▼
//! footer = "{elapsed}ms" (documents only) → reply sent in the same room
//! ```
//!
//! # Available Commands
//!
//! | Command | Aliases | Arguments | Description |
//! |---------|---------|-----------|-------------|
//! | `ping` | | None | Replies `Pong!` |
//! | `help` | | None | Lists the commands |
//! | `display_nation` | `nation` | `<nation_id>` | Nation stats |
//! | `display_nation_wars` | `wars` | `<nation_id>` | Active wars |
//! | `display_required_warchest` | `chest` | `<city_count>` | Recommended warchest, 2 to 30 cities |
//! | `find_counters` | `counter` | `<nation_id>` | Allied counters to an aggressor |
//!
//! # Error Handling
//!
//! - **Silent**: messages from the bot itself, messages without the prefix and
//!   unknown commands produce no reply.
//! - **User errors**: missing arguments, invalid numbers, out of range values
//!   and failed lookups produce an error document.
//!
//! # Module Organization
//!
//! - [`dispatcher`] - Event filtering, parsing and argument binding
//! - [`registry`] - Command table
//! - [`instrument`] - Latency wrapper applied to every handler
//! - [`actions`] - Individual command handler implementations
//! - [`document`] - Presentation document and Markdown rendering
//! - [`render`] - Per-command document builders

use std::sync::Arc;

use thiserror::Error;

use crate::pnw::{Gateway, GatewayError};

mod actions;
mod dispatcher;
mod document;
mod instrument;
mod registry;
mod render;

pub use crate::commands::dispatcher::{Dispatcher, Event, MessageEvent};
pub use crate::commands::document::Document;
pub use crate::commands::registry::CommandRegistry;

/// Runtime context shared by every handler.
///
/// Built once at startup and never mutated.
pub struct CommandContext {
    /// Game data access
    pub gateway: Arc<dyn Gateway>,
    /// The command table, used by `help`
    pub registry: Arc<CommandRegistry>,
    /// Command prefix, used to render usage lines
    pub prefix: char,
}

/// What a command sends back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Plain text, sent as is
    Text(String),
    /// Structured document
    Document(Document),
}

impl Reply {
    /// Markdown body sent to the room.
    pub fn to_markdown(&self) -> String {
        match self {
            Reply::Text(text) => text.clone(),
            Reply::Document(document) => document.to_markdown(),
        }
    }
}

/// Errors a handler can end with.
///
/// Each of them is turned into an error document for the user.
#[derive(Debug, Error)]
pub enum CommandError {
    /// An argument is missing or malformed.
    #[error("{0}")]
    Usage(String),

    /// A numeric argument is out of its valid range.
    #[error("`{name}` must be between {min} and {max}, got {got}.")]
    Range {
        name: &'static str,
        min: u32,
        max: u32,
        got: i64,
    },

    /// The lookup failed.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl CommandError {
    /// Message shown to the user.
    ///
    /// Upstream failures are not detailed, the log has them.
    pub fn user_message(&self) -> String {
        match self {
            CommandError::Gateway(GatewayError::NotFound(nation_id)) => {
                format!("Nation {} not found.", nation_id)
            }
            CommandError::Gateway(_) => {
                "Politics and War can't be reached right now, try again later.".to_owned()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_error_message() {
        let error = CommandError::Range {
            name: "city_count",
            min: 2,
            max: 30,
            got: 1,
        };
        assert_eq!(
            error.user_message(),
            "`city_count` must be between 2 and 30, got 1."
        );
    }

    #[test]
    fn test_not_found_message() {
        let error = CommandError::from(GatewayError::NotFound(12345));
        assert_eq!(error.user_message(), "Nation 12345 not found.");
    }

    #[test]
    fn test_upstream_failure_message_hides_details() {
        let error = CommandError::from(GatewayError::Rejected("Invalid API key.".to_string()));
        assert!(!error.user_message().contains("API key"));
    }

    #[test]
    fn test_reply_to_markdown() {
        assert_eq!(Reply::Text("Pong!".to_string()).to_markdown(), "Pong!");

        let document = Document::new().with_title("Warchest");
        assert_eq!(
            Reply::Document(document).to_markdown(),
            "### Warchest"
        );
    }
}
