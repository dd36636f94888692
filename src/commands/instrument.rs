//! Latency instrumentation applied to every handler.
//!
//! [`instrument`] wraps a [`Handler`] into a function that times the whole
//! handler run, lookups included, and writes the elapsed milliseconds in the
//! footer of the resulting document.

use std::sync::Arc;

use futures::future::BoxFuture;
use log::{debug, error, info};
use tokio::time::Instant;

use crate::{
    commands::{CommandContext, CommandError, Reply, registry::Handler, render::render_error},
    pnw::GatewayError,
};

/// Wraps `handler` with latency measurement and error rendering.
///
/// The returned function never fails:
/// - a [`Reply::Document`] gets its footer overwritten with `"{elapsed}ms"`,
/// - a [`Reply::Text`] is returned untouched,
/// - a [`CommandError`] becomes an error document without footer.
pub fn instrument(
    handler: Handler,
) -> impl Fn(Arc<CommandContext>, Vec<String>) -> BoxFuture<'static, Reply> {
    move |context, arguments| {
        Box::pin(async move {
            let start = Instant::now();

            match handler(context, arguments).await {
                Ok(Reply::Document(mut document)) => {
                    let elapsed = start.elapsed().as_millis();
                    debug!("handler completed in {}ms", elapsed);
                    document.footer = Some(format!("{}ms", elapsed));
                    Reply::Document(document)
                }
                Ok(reply) => reply,
                Err(err) => {
                    log_failure(&err);
                    Reply::Document(render_error(&err.user_message()))
                }
            }
        })
    }
}

fn log_failure(err: &CommandError) {
    match err {
        CommandError::Gateway(GatewayError::NotFound(_))
        | CommandError::Usage(_)
        | CommandError::Range { .. } => info!("command rejected: {}", err),
        CommandError::Gateway(_) => error!("command failed: {}", err),
    }
}
