//! Command action handlers.
//!
//! One handler per command. Every handler has the same shape: read its bound
//! arguments, look data up through the [`Gateway`](crate::pnw::Gateway), render
//! a document and return it as a [`Reply`](crate::commands::Reply).
//!
//! Handlers never measure time nor render their own errors: they return a
//! [`CommandError`] and the latency wrapper deals with both.
//!
//! # Available Handlers
//!
//! - [`handle_ping`] - Plain `Pong!` reply
//! - [`handle_help`] - List of commands
//! - [`handle_display_nation`] - Nation stats
//! - [`handle_display_nation_wars`] - Active wars of a nation
//! - [`handle_display_required_warchest`] - Recommended warchest
//! - [`handle_find_counters`] - Counters to an aggressor

mod counters;
mod help;
mod nation;
mod ping;
mod warchest;
mod wars;

pub use crate::commands::actions::{
    counters::handle_find_counters, help::handle_help, nation::handle_display_nation,
    ping::handle_ping, warchest::handle_display_required_warchest,
    wars::handle_display_nation_wars,
};

use crate::commands::CommandError;

/// Reads the `nation_id` argument, always the first one.
fn parse_nation_id(arguments: &[String]) -> Result<u64, CommandError> {
    let Some(raw) = arguments.first() else {
        return Err(CommandError::Usage("Missing argument `nation_id`.".to_owned()));
    };

    raw.parse::<u64>().map_err(|_| {
        CommandError::Usage(format!(
            "`nation_id` must be a positive whole number, got `{}`.",
            raw
        ))
    })
}

#[cfg(test)]
pub mod test_utils {
    use std::sync::Arc;

    use crate::commands::{CommandContext, CommandRegistry};
    use crate::pnw::{MockGateway, Nation};

    /// Wraps `gateway` in a context with the builtin registry.
    pub fn create_context(gateway: MockGateway) -> Arc<CommandContext> {
        Arc::new(CommandContext {
            gateway: Arc::new(gateway),
            registry: Arc::new(CommandRegistry::builtin().unwrap()),
            prefix: '=',
        })
    }

    pub fn create_nation(id: u64, cities: u32, score: f64) -> Nation {
        Nation {
            id,
            name: format!("Nation {}", id),
            leader: "Ruler".to_string(),
            alliance: "Rose".to_string(),
            cities,
            score,
            ..Default::default()
        }
    }

    /// Expects any number of url lookups and answers with a fake link.
    pub fn expect_urls(gateway: &mut MockGateway) {
        gateway
            .expect_nation_url()
            .returning(|id| format!("http://pnw/nation/id={}", id));
        gateway
            .expect_war_url()
            .returning(|id| format!("http://pnw/war={}", id));
    }
}
