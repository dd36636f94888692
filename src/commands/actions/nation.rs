//! Nation command handler.
//!
//! Fetches a nation and displays its stats, military and policies.

use std::sync::Arc;

use log::debug;

use crate::commands::{
    CommandContext, Reply, actions::parse_nation_id, registry::HandlerFuture,
    render::render_nation,
};

pub fn handle_display_nation(context: Arc<CommandContext>, arguments: Vec<String>) -> HandlerFuture {
    Box::pin(async move {
        let nation_id = parse_nation_id(&arguments)?;
        debug!("handling display_nation command for {}", nation_id);

        let nation = context.gateway.find_nation(nation_id).await?;
        let document = render_nation(&nation, context.gateway.nation_url(nation.id));

        Ok(Reply::Document(document))
    })
}

#[cfg(test)]
mod tests {
    use mockall::predicate::eq;

    use crate::commands::{
        CommandError,
        actions::test_utils::{create_context, create_nation, expect_urls},
    };
    use crate::pnw::{GatewayError, MockGateway};

    use super::*;

    #[tokio::test]
    async fn test_handle_display_nation() {
        let mut gateway = MockGateway::new();
        expect_urls(&mut gateway);
        gateway
            .expect_find_nation()
            .with(eq(12345))
            .times(1)
            .returning(|id| Ok(create_nation(id, 10, 500.0)));

        let reply = handle_display_nation(create_context(gateway), vec!["12345".to_string()])
            .await
            .unwrap();

        let Reply::Document(document) = reply else {
            panic!("Expected a document");
        };
        let stats = &document.field("Stats").unwrap().value;
        assert!(stats.contains("10 cities"));
        assert!(stats.contains("500 nation score"));
        assert_eq!(
            document.author.unwrap().url.as_deref(),
            Some("http://pnw/nation/id=12345")
        );
    }

    #[tokio::test]
    async fn test_handle_display_nation_not_found() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_find_nation()
            .times(1)
            .returning(|id| Err(GatewayError::NotFound(id)));

        let result = handle_display_nation(create_context(gateway), vec!["99".to_string()]).await;

        assert!(matches!(
            result,
            Err(CommandError::Gateway(GatewayError::NotFound(99)))
        ));
    }

    #[tokio::test]
    async fn test_handle_display_nation_invalid_id() {
        let result =
            handle_display_nation(create_context(MockGateway::new()), vec!["abc".to_string()])
                .await;

        assert!(matches!(result, Err(CommandError::Usage(_))));
    }
}
