//! Help command handler.
//!
//! Lists every registered command with its aliases and parameters. The list
//! is generated from the registry so it can't drift from what the bot
//! actually answers to.

use std::sync::Arc;

use log::debug;

use crate::commands::{CommandContext, Reply, registry::HandlerFuture, render::format_help};

pub fn handle_help(context: Arc<CommandContext>, _arguments: Vec<String>) -> HandlerFuture {
    Box::pin(async move {
        debug!("handling help command");
        Ok(Reply::Text(format_help(
            context.prefix,
            context.registry.descriptors(),
        )))
    })
}
