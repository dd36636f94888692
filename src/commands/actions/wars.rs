//! Wars command handler.
//!
//! The nation record already lists its active wars, so a single lookup is
//! enough.

use std::sync::Arc;

use log::debug;

use crate::commands::{
    CommandContext, Reply, actions::parse_nation_id, registry::HandlerFuture,
    render::render_wars,
};

pub fn handle_display_nation_wars(
    context: Arc<CommandContext>,
    arguments: Vec<String>,
) -> HandlerFuture {
    Box::pin(async move {
        let nation_id = parse_nation_id(&arguments)?;
        debug!("handling display_nation_wars command for {}", nation_id);

        let nation = context.gateway.find_nation(nation_id).await?;
        let document = render_wars(&nation, context.gateway.nation_url(nation.id), |war_id| {
            context.gateway.war_url(war_id)
        });

        Ok(Reply::Document(document))
    })
}
