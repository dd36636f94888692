//! Bot module wiring the Matrix connection to the command dispatcher.
//!
//! This module provides the main [`Bot`] implementation. It owns the Matrix
//! client and the [`Dispatcher`], and routes every event of the sync stream
//! to the dispatcher in its own task.
//!
//! # Event Processing Flow
//!
//! ```text
//! Matrix sync → Event → spawn → Dispatcher::on_event → Reply → send_reply
//! ```
//!
//! A slow Politics and War lookup only holds the task of its own message:
//! the sync loop and the other commands keep going.

use std::sync::Arc;

use log::{debug, error, info};

use crate::{
    commands::{CommandContext, CommandRegistry, Dispatcher, Event},
    config::Config,
    matrix::{MatrixClient, UserCredentials},
    pnw::{Gateway, PnwRequester},
};

/// Main bot instance.
pub struct Bot {
    /// Matrix client used to receive events and send replies
    matrix_client: Arc<MatrixClient>,

    /// Routes events to command handlers
    dispatcher: Arc<Dispatcher>,
}

impl Bot {
    /// Creates a new bot from its configuration.
    ///
    /// Builds the command registry and the Politics and War gateway, then
    /// connects to the homeserver.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Two commands share a name or an alias
    /// - The Matrix session can't be restored
    pub async fn new(config: Config) -> Result<Self, anyhow::Error> {
        let gateway: Arc<dyn Gateway> = Arc::new(PnwRequester::new(
            &config.pnw.url,
            &config.pnw.api_key,
            config.pnw.alliance_id,
            config.pnw.counter_limit,
        ));

        let registry = Arc::new(CommandRegistry::builtin()?);
        info!(
            "{} commands registered with prefix {}",
            registry.descriptors().len(),
            config.commands.prefix
        );

        let context = Arc::new(CommandContext {
            gateway,
            registry: Arc::clone(&registry),
            prefix: config.commands.prefix,
        });

        let dispatcher = Arc::new(Dispatcher::new(
            &config.matrix.user_id,
            config.commands.prefix,
            registry,
            context,
        ));

        let matrix_client = Arc::new(
            MatrixClient::new(&UserCredentials {
                homeserver_url: config.matrix.homeserver_url,
                user_id: config.matrix.user_id,
                device_id: config.matrix.device_id,
                access_token: config.matrix.access_token,
            })
            .await?,
        );

        Ok(Bot {
            matrix_client,
            dispatcher,
        })
    }

    /// Starts the bot and runs until the Matrix sync ends.
    pub async fn start(self) {
        let matrix_client = Arc::clone(&self.matrix_client);
        let dispatcher = Arc::clone(&self.dispatcher);

        let on_event = move |event: Event| {
            Self::handle_event(event, Arc::clone(&dispatcher), Arc::clone(&matrix_client));
        };

        if let Err(e) = self.matrix_client.sync(on_event).await {
            error!("matrix sync failed: {:?}", e);
        }
    }

    /// Handles an event in a new task, then sends the reply if there is one.
    ///
    /// Replies always go to the room of the triggering message.
    fn handle_event(event: Event, dispatcher: Arc<Dispatcher>, matrix_client: Arc<MatrixClient>) {
        tokio::spawn(async move {
            let Some(reply) = dispatcher.on_event(&event).await else {
                return;
            };

            let Event::Message(message) = event else {
                return;
            };

            debug!("#{} replying in {}", message.sequence, message.room_id);
            matrix_client
                .send_reply(
                    &message.room_id,
                    &message.sender,
                    &message.event_id,
                    &reply.to_markdown(),
                )
                .await;
        });
    }
}
