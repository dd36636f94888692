//! Event dispatch.
//!
//! The [`Dispatcher`] receives every event of the chat connection. Lifecycle
//! events are only logged. Messages go through a chain of filters before a
//! command runs:
//!
//! 1. messages sent by the bot itself are dropped,
//! 2. messages not starting with the prefix are dropped,
//! 3. the body is split on whitespace and the first word is resolved in the [`CommandRegistry`], unknown commands
//!    are dropped,
//! 4. the remaining words are bound to the command parameters, a missing
//!    required argument produces a usage error document,
//! 5. the handler runs wrapped by [`instrument`].

use std::sync::Arc;

use command_parser::Parser;
use log::{debug, info, warn};
use thiserror::Error;

use crate::commands::{
    CommandContext, CommandRegistry, Reply,
    instrument::instrument,
    registry::{CommandDescriptor, Handler, ParamKind},
    render::render_error,
};

/// Events delivered by the chat connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The connection to the homeserver is established
    Connected,
    /// The first sync is done, the bot answers from now on
    Ready { user_id: String },
    /// A text message was posted in a joined room
    Message(MessageEvent),
}

/// A text message, as seen by the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageEvent {
    /// Author of the message
    pub sender: String,
    /// Raw text
    pub body: String,
    pub room_id: String,
    pub event_id: String,
    /// Arrival order of the message, for log correlation
    pub sequence: u64,
}

/// Why a message doesn't run a command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DispatchError {
    #[error("message is not a command")]
    NotForBot,

    #[error("message sent by the bot itself")]
    SelfMessage,

    #[error("unknown command `{0}`")]
    UnknownCommand(String),

    /// A required argument is missing. Holds the message for the user.
    #[error("{0}")]
    Usage(String),
}

/// A resolved command, ready to run.
#[derive(Debug)]
pub struct Invocation {
    /// Canonical name of the command
    pub name: &'static str,
    pub handler: Handler,
    /// One entry per declared parameter
    pub arguments: Vec<String>,
}

/// Routes events to command handlers.
pub struct Dispatcher {
    /// User ID of the bot, used to ignore its own messages
    bot_user_id: String,
    prefix: char,
    parser: Parser,
    registry: Arc<CommandRegistry>,
    context: Arc<CommandContext>,
}

impl Dispatcher {
    pub fn new(
        bot_user_id: &str,
        prefix: char,
        registry: Arc<CommandRegistry>,
        context: Arc<CommandContext>,
    ) -> Self {
        Dispatcher {
            bot_user_id: bot_user_id.to_owned(),
            prefix,
            parser: Parser::new(prefix, '-'),
            registry,
            context,
        }
    }

    /// Handles one event.
    ///
    /// Returns the reply to post in the room of the message, if any. Lifecycle
    /// events never produce a reply.
    pub async fn on_event(&self, event: &Event) -> Option<Reply> {
        match event {
            Event::Connected => {
                info!("Connected to the homeserver");
                None
            }
            Event::Ready { user_id } => {
                info!("{} is online", user_id);
                None
            }
            Event::Message(message) => self.on_message(message).await,
        }
    }

    async fn on_message(&self, message: &MessageEvent) -> Option<Reply> {
        let invocation = match self.parse(message) {
            Ok(invocation) => invocation,
            Err(DispatchError::Usage(usage)) => {
                info!("#{} rejected: {}", message.sequence, usage);
                return Some(Reply::Document(render_error(&usage)));
            }
            Err(DispatchError::UnknownCommand(token)) => {
                warn!(
                    "#{} unknown command `{}` from {}",
                    message.sequence, token, message.sender
                );
                return None;
            }
            Err(_) => return None,
        };

        info!(
            "#{} running {} {:?} for {} in {}",
            message.sequence,
            invocation.name,
            invocation.arguments,
            message.sender,
            message.room_id
        );

        let reply = instrument(invocation.handler)(self.context.clone(), invocation.arguments).await;
        Some(reply)
    }

    /// Turns a message into an [`Invocation`].
    ///
    /// # Errors
    ///
    /// See [`DispatchError`]. Only [`DispatchError::Usage`] is meant to be
    /// shown to the user.
    pub fn parse(&self, message: &MessageEvent) -> Result<Invocation, DispatchError> {
        if message.sender == self.bot_user_id {
            return Err(DispatchError::SelfMessage);
        }

        if !message.body.starts_with(self.prefix) {
            return Err(DispatchError::NotForBot);
        }

        // Any whitespace separates words. Arguments stay positional even when
        // they start with `-`, so only the first word goes through the parser.
        let mut words = message.body.split_whitespace();
        let Some(head) = words.next() else {
            return Err(DispatchError::NotForBot);
        };
        let arguments = words.map(str::to_owned).collect::<Vec<String>>();

        // For an unknown reason the parser ignores the last word, so we add a dummy word at the end
        let body = format!("{} dummy", head);

        // A bare prefix or a prefix followed by a space doesn't parse
        let command = self
            .parser
            .parse(&body)
            .map_err(|_| DispatchError::NotForBot)?;

        debug!("Parsed command: {:?} with arguments {:?}", command, arguments);

        let descriptor = self
            .registry
            .resolve(&command.name)
            .map_err(|_| DispatchError::UnknownCommand(command.name.clone()))?;

        let arguments = self.bind_arguments(descriptor, arguments)?;

        Ok(Invocation {
            name: descriptor.name,
            handler: descriptor.handler,
            arguments,
        })
    }

    /// Matches positional arguments with the declared parameters.
    ///
    /// Missing optional parameters take their default, surplus arguments are
    /// dropped.
    fn bind_arguments(
        &self,
        descriptor: &CommandDescriptor,
        mut arguments: Vec<String>,
    ) -> Result<Vec<String>, DispatchError> {
        if arguments.len() > descriptor.params.len() {
            debug!(
                "dropping {} surplus argument(s) of {}",
                arguments.len() - descriptor.params.len(),
                descriptor.name
            );
            arguments.truncate(descriptor.params.len());
        }

        for param in &descriptor.params[arguments.len()..] {
            match param.kind {
                ParamKind::Required => {
                    return Err(DispatchError::Usage(format!(
                        "Missing argument `{}`. Usage: `{}`",
                        param.name,
                        descriptor.usage(self.prefix)
                    )));
                }
                ParamKind::Optional { default } => arguments.push(default.to_owned()),
            }
        }

        Ok(arguments)
    }
}
