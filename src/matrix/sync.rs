//! Matrix client synchronization and event handling.
//!
//! The [`MatrixSync::sync`] method:
//! 1. Reports the connection and sets up auto-join on invitation
//! 2. Performs an initial sync to catch up on offline events (especially invites)
//! 3. Reports readiness, then forwards every new text message
//! 4. Enters a continuous sync loop

use std::sync::{
    Arc,
    atomic::{AtomicU64, Ordering},
};

use anyhow::Result;
use log::{error, info, warn};
use matrix_sdk::{
    Client, Room, RoomState,
    config::SyncSettings,
    ruma::{
        api::client::filter::FilterDefinition,
        events::room::{
            member::StrippedRoomMemberEvent,
            message::{MessageType, OriginalSyncRoomMessageEvent},
        },
    },
};
use tokio::time::{Duration, sleep};

use crate::commands::{Event, MessageEvent};

/// Delay between two attempts of the initial sync
const INITIAL_SYNC_RETRY_DELAY: Duration = Duration::from_secs(5);
/// Delay before the second attempt to join a room
const FIRST_JOIN_RETRY_DELAY: Duration = Duration::from_secs(2);
/// Join attempts stop once the delay would exceed this
const MAX_JOIN_RETRY_DELAY: Duration = Duration::from_secs(3600);

/// Manages Matrix client synchronization and event processing.
pub struct MatrixSync {
    /// The matrix client
    client: Client,
}

impl MatrixSync {
    /// Creates a new MatrixSync instance.
    ///
    /// This does not start the synchronization process; call [`MatrixSync::sync`]
    /// to begin syncing.
    pub fn new(client: &Client) -> Self {
        MatrixSync {
            client: client.to_owned(),
        }
    }

    /// Starts the synchronization process and enters an infinite loop.
    ///
    /// Messages received before the initial sync completes are not forwarded,
    /// so commands sent while the bot was offline are not replayed.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync loop encounters a fatal error.
    pub async fn sync<F>(&self, on_event: F) -> Result<()>
    where
        F: Fn(Event) + Send + Sync + 'static + Clone,
    {
        info!("start syncing");
        on_event(Event::Connected);

        // Auto join rooms when invited
        self.client.add_event_handler(auto_join_rooms);

        // Enable room members lazy-loading
        // See <https://spec.matrix.org/v1.6/client-server-api/#lazy-loading-room-members>.
        let filter = FilterDefinition::with_lazy_loading();
        let mut sync_settings = SyncSettings::default().filter(filter.into());

        // First sync to only get the invitation when the bot is offline
        let response = loop {
            match self.client.sync_once(sync_settings.clone()).await {
                Ok(response) => break response,
                Err(error) => {
                    error!("an error occurred during initial sync: {error}");
                    error!("trying again in {}s", INITIAL_SYNC_RETRY_DELAY.as_secs());
                    sleep(INITIAL_SYNC_RETRY_DELAY).await;
                }
            }
        };

        match self.client.user_id() {
            Some(user_id) => on_event(Event::Ready {
                user_id: user_id.to_string(),
            }),
            None => warn!("could not get user id from client"),
        }

        let on_event_arc = Arc::new(on_event);
        let sequence = Arc::new(AtomicU64::new(0));

        // Listen to incoming room messages. Because we are listening after the sync_once, we only get new messages.
        self.client.add_event_handler({
            let on_event = Arc::clone(&on_event_arc);
            let sequence = Arc::clone(&sequence);
            move |event: OriginalSyncRoomMessageEvent, room: Room| {
                let on_event = Arc::clone(&on_event);
                let sequence = Arc::clone(&sequence);
                async move { on_room_message(event, room, &on_event, &sequence).await }
            }
        });

        // Since we called `sync_once` before we entered our sync loop we must pass
        // that sync token to `sync`
        sync_settings = sync_settings.token(response.next_batch);

        self.client.sync(sync_settings).await?;

        Ok(())
    }
}

/// Joins a room the bot is invited to.
///
/// Synapse can deliver an invite before the room accepts the join
/// (<https://github.com/matrix-org/synapse/issues/4345>), so failed joins are
/// retried with a doubling delay until [`MAX_JOIN_RETRY_DELAY`] is reached.
async fn auto_join_rooms(room_member: StrippedRoomMemberEvent, client: Client, room: Room) {
    let Some(user_id) = client.user_id() else {
        warn!("could not get user id from client");
        return;
    };

    if room_member.state_key != user_id {
        return;
    }

    tokio::spawn(async move {
        let room_id = room.room_id().to_owned();
        info!("invited to {}, joining", room_id);
        let mut delay = FIRST_JOIN_RETRY_DELAY;

        while let Err(err) = room.join().await {
            if delay > MAX_JOIN_RETRY_DELAY {
                error!("giving up on joining {}: {:?}", room_id, err);
                return;
            }

            warn!(
                "join of {} failed ({:?}), next attempt in {}s",
                room_id,
                err,
                delay.as_secs()
            );
            sleep(delay).await;
            delay *= 2;
        }

        info!("joined {}", room_id);
    });
}

/// Forwards text messages of joined rooms as [`Event::Message`].
///
/// Non-text messages (images, files, etc.) are silently ignored.
async fn on_room_message<F>(
    event: OriginalSyncRoomMessageEvent,
    room: Room,
    on_event: &Arc<F>,
    sequence: &AtomicU64,
) where
    F: Fn(Event) + Send + Sync + 'static,
{
    // Ignore messages from non-joined rooms
    if room.state() != RoomState::Joined {
        return;
    }

    // Only handle text messages
    let MessageType::Text(text_content) = event.content.msgtype else {
        return;
    };

    on_event(Event::Message(MessageEvent {
        sender: event.sender.to_string(),
        body: text_content.body,
        room_id: room.room_id().to_string(),
        event_id: event.event_id.to_string(),
        sequence: sequence.fetch_add(1, Ordering::Relaxed) + 1,
    }));
}
