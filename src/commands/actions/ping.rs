//! Ping command handler.
//!
//! Answers `Pong!` without touching the gateway. The reply is plain text, so
//! it carries no latency footer.

use std::sync::Arc;

use log::debug;

use crate::commands::{CommandContext, Reply, registry::HandlerFuture};

pub fn handle_ping(_context: Arc<CommandContext>, _arguments: Vec<String>) -> HandlerFuture {
    Box::pin(async {
        debug!("handling ping command");
        Ok(Reply::Text("Pong!".to_owned()))
    })
}

#[cfg(test)]
mod tests {
    use crate::commands::actions::test_utils::create_context;
    use crate::pnw::MockGateway;

    use super::*;

    #[tokio::test]
    async fn test_handle_ping() {
        // No expectation set: any gateway call would panic
        let context = create_context(MockGateway::new());

        let reply = handle_ping(context, vec![]).await.unwrap();
        assert_eq!(reply, Reply::Text("Pong!".to_string()));
    }
}
