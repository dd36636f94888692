//! Warchest command handler.
//!
//! Validates the city count before anything else: an out of range value never
//! reaches the gateway.

use std::sync::Arc;

use log::debug;

use crate::{
    commands::{
        CommandContext, CommandError, Reply, registry::HandlerFuture, render::render_warchest,
    },
    pnw::{MAX_CITIES, MIN_CITIES},
};

pub fn handle_display_required_warchest(
    context: Arc<CommandContext>,
    arguments: Vec<String>,
) -> HandlerFuture {
    Box::pin(async move {
        let city_count = parse_city_count(&arguments)?;
        debug!("handling display_required_warchest command for {}", city_count);

        let warchest = context.gateway.find_warchest(city_count).await?;

        Ok(Reply::Document(render_warchest(&warchest)))
    })
}

/// Reads the city count and checks it is within [`MIN_CITIES`, `MAX_CITIES`].
fn parse_city_count(arguments: &[String]) -> Result<u32, CommandError> {
    let Some(raw) = arguments.first() else {
        return Err(CommandError::Usage("Missing argument `city_count`.".to_owned()));
    };

    let city_count = raw.parse::<i64>().map_err(|_| {
        CommandError::Usage(format!(
            "`city_count` must be a whole number, got `{}`.",
            raw
        ))
    })?;

    if city_count < i64::from(MIN_CITIES) || city_count > i64::from(MAX_CITIES) {
        return Err(CommandError::Range {
            name: "city_count",
            min: MIN_CITIES,
            max: MAX_CITIES,
            got: city_count,
        });
    }

    // In range, so it fits
    Ok(city_count as u32)
}
