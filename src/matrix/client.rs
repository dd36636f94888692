//! Matrix client wrapper for bot messaging and synchronization.
//!
//! This module provides a high-level [`MatrixClient`] interface that wraps the
//! Matrix SDK client and handles session restoration, synchronization and
//! replies.

use log::{error, info};
use matrix_sdk::{
    Client, SessionMeta, SessionTokens,
    authentication::matrix::MatrixSession,
    ruma::{
        EventId, OwnedDeviceId, RoomId, UserId,
        events::room::message::{
            AddMentions, ForwardThread, ReplyMetadata, RoomMessageEventContent,
        },
    },
};

use crate::{
    commands::Event,
    matrix::{UserCredentials, sync::MatrixSync},
};

/// High-level Matrix client for bot messaging operations.
pub struct MatrixClient {
    /// Synchronization service for handling real-time events
    matrix_sync: MatrixSync,
    /// Underlying Matrix SDK client
    client: Client,
}

impl MatrixClient {
    /// Connects to the homeserver and restores the session of the bot.
    ///
    /// No password login happens: the access token must already be valid.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The user ID is malformed
    /// - The homeserver can't be reached
    /// - The session can't be restored
    pub async fn new(user_credentials: &UserCredentials) -> Result<Self, anyhow::Error> {
        let user_id = UserId::parse(&user_credentials.user_id)?;

        let client = Client::builder()
            .homeserver_url(&user_credentials.homeserver_url)
            .build()
            .await?;

        let session = MatrixSession {
            meta: SessionMeta {
                user_id,
                device_id: OwnedDeviceId::from(user_credentials.device_id.as_str()),
            },
            tokens: SessionTokens {
                access_token: user_credentials.access_token.clone(),
                refresh_token: None,
            },
        };

        client.restore_session(session).await?;
        info!(
            "session restored for {} on {}",
            user_credentials.user_id, user_credentials.homeserver_url
        );

        let matrix_sync = MatrixSync::new(&client);

        Ok(MatrixClient {
            matrix_sync,
            client,
        })
    }

    /// Starts the Matrix synchronization loop.
    ///
    /// `on_event` is invoked for every [`Event`]: [`Event::Connected`] first,
    /// [`Event::Ready`] once the initial sync is done, then one
    /// [`Event::Message`] per text message in a joined room.
    ///
    /// # Errors
    ///
    /// Never returns under normal operation. Returns the sync error if the
    /// loop stops on one.
    pub async fn sync<F>(&self, on_event: F) -> Result<(), anyhow::Error>
    where
        F: Fn(Event) + Send + Sync + 'static + Clone,
    {
        self.matrix_sync.sync(on_event).await?;
        info!("matrix sync ended successfully");

        Ok(())
    }

    /// Sends a reply to a specific message.
    ///
    /// The reply quotes the original message and is formatted as Markdown.
    /// Failures are logged, the reply is then lost.
    pub async fn send_reply(&self, room_id: &str, sender_id: &str, event_id: &str, body: &str) {
        let (sender, event) = match (UserId::parse(sender_id), EventId::parse(event_id)) {
            (Ok(sender), Ok(event)) => (sender, event),
            _ => {
                error!("can't reply to {} from {}: invalid ids", event_id, sender_id);
                return;
            }
        };

        let content = RoomMessageEventContent::text_markdown(body).make_reply_to(
            ReplyMetadata::new(&event, &sender, None),
            ForwardThread::No,
            AddMentions::No,
        );

        self.send(room_id, content).await;
    }

    /// Internal helper to send message content to a room.
    async fn send(&self, room_id: &str, content: RoomMessageEventContent) {
        let room_id_obj = match RoomId::parse(room_id) {
            Ok(room_id_obj) => room_id_obj,
            Err(e) => {
                error!("invalid room id {}: {:?}", room_id, e);
                return;
            }
        };

        match self.client.get_room(&room_id_obj) {
            Some(room) => {
                if let Err(e) = room.send(content).await {
                    error!("Failed to send message: {:?}", e);
                }
            }
            None => error!("Failed to send message: unknown room {}", room_id),
        }
    }
}
