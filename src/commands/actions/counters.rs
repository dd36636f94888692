//! Counters command handler.
//!
//! Two lookups in a row: the aggressor first, then the allied nations able to
//! hit it back.

use std::sync::Arc;

use log::debug;

use crate::commands::{
    CommandContext, Reply, actions::parse_nation_id, registry::HandlerFuture,
    render::render_counters,
};

pub fn handle_find_counters(context: Arc<CommandContext>, arguments: Vec<String>) -> HandlerFuture {
    Box::pin(async move {
        let nation_id = parse_nation_id(&arguments)?;
        debug!("handling find_counters command for {}", nation_id);

        let aggressor = context.gateway.find_nation(nation_id).await?;
        let counters = context.gateway.counter_targets(&aggressor).await?;

        let counters = counters
            .into_iter()
            .map(|counter| {
                let url = context.gateway.nation_url(counter.id);
                (counter, url)
            })
            .collect::<Vec<_>>();

        let document = render_counters(
            &aggressor,
            context.gateway.nation_url(aggressor.id),
            &counters,
        );

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
    async fn test_handle_find_counters() {
        let mut gateway = MockGateway::new();
        expect_urls(&mut gateway);
        gateway
            .expect_find_nation()
            .with(eq(12345))
            .times(1)
            .returning(|id| Ok(create_nation(id, 10, 500.0)));
        gateway
            .expect_counter_targets()
            .withf(|aggressor| aggressor.id == 12345)
            .times(1)
            .returning(|_| Ok(vec![create_nation(7, 11, 520.0), create_nation(8, 9, 480.0)]));

        let reply = handle_find_counters(create_context(gateway), vec!["12345".to_string()])
            .await
            .unwrap();

        let Reply::Document(document) = reply else {
            panic!("Expected a document");
        };
        let counters = &document.field("Counters (2)").unwrap().value;
        assert!(counters.contains("[Nation 7](http://pnw/nation/id=7)"));
        assert!(counters.contains("[Nation 8](http://pnw/nation/id=8)"));
        assert!(document.field("Target").unwrap().value.contains("10 cities"));
    }

    #[tokio::test]
    async fn test_handle_find_counters_unknown_aggressor() {
        let mut gateway = MockGateway::new();
        gateway
            .expect_find_nation()
            .times(1)
            .returning(|id| Err(GatewayError::NotFound(id)));
        gateway.expect_counter_targets().never();

        let result = handle_find_counters(create_context(gateway), vec!["1".to_string()]).await;

        assert!(matches!(
            result,
            Err(CommandError::Gateway(GatewayError::NotFound(1)))
        ));
    }
}
