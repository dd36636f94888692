//! Command registry.
//!
//! The registry is a plain table mapping command names and aliases to a
//! [`CommandDescriptor`]. It is built once when the bot starts and only read
//! afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::BoxFuture;
use log::debug;
use thiserror::Error;

use crate::commands::{
    CommandContext, CommandError, Reply,
    actions::{
        handle_display_nation, handle_display_nation_wars, handle_display_required_warchest,
        handle_find_counters, handle_help, handle_ping,
    },
};

/// Future returned by every command handler.
pub type HandlerFuture = BoxFuture<'static, Result<Reply, CommandError>>;

/// A command handler.
///
/// Handlers receive their arguments already bound to the declared parameters:
/// one entry per parameter, defaults applied.
pub type Handler = fn(Arc<CommandContext>, Vec<String>) -> HandlerFuture;

/// Errors raised by the registry.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// A name or alias is already taken by another command.
    #[error("`{0}` is already registered")]
    DuplicateAlias(String),

    /// No command answers to this token.
    #[error("unknown command `{0}`")]
    UnknownCommand(String),
}

/// Whether a parameter must be supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamKind {
    Required,
    /// Replaced by `default` when missing
    Optional { default: &'static str },
}

/// One declared parameter of a command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
}

impl ParamSpec {
    pub fn required(name: &'static str) -> Self {
        ParamSpec {
            name,
            kind: ParamKind::Required,
        }
    }

    pub fn optional(name: &'static str, default: &'static str) -> Self {
        ParamSpec {
            name,
            kind: ParamKind::Optional { default },
        }
    }
}

/// Everything the dispatcher needs to know about a command.
#[derive(Clone)]
pub struct CommandDescriptor {
    /// Canonical name
    pub name: &'static str,
    /// Other names the command answers to
    pub aliases: Vec<&'static str>,
    /// Declared parameters, in order
    pub params: Vec<ParamSpec>,
    /// One line description shown by `help`
    pub summary: &'static str,
    /// Function running the command
    pub handler: Handler,
}

impl CommandDescriptor {
    pub fn new(name: &'static str, summary: &'static str, handler: Handler) -> Self {
        CommandDescriptor {
            name,
            aliases: Vec::new(),
            params: Vec::new(),
            summary,
            handler,
        }
    }

    pub fn alias(mut self, alias: &'static str) -> Self {
        self.aliases.push(alias);
        self
    }

    pub fn param(mut self, param: ParamSpec) -> Self {
        self.params.push(param);
        self
    }

    /// Usage line, e.g. `=display_nation <nation_id>`.
    ///
    /// Optional parameters are shown in brackets with their default.
    pub fn usage(&self, prefix: char) -> String {
        let params = self
            .params
            .iter()
            .map(|param| match param.kind {
                ParamKind::Required => format!(" <{}>", param.name),
                ParamKind::Optional { default } => format!(" [{}={}]", param.name, default),
            })
            .collect::<String>();

        format!("{}{}{}", prefix, self.name, params)
    }
}

impl std::fmt::Debug for CommandDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDescriptor")
            .field("name", &self.name)
            .field("aliases", &self.aliases)
            .field("params", &self.params)
            .finish()
    }
}

/// Table of every command the bot answers to.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    /// Descriptors in registration order
    descriptors: Vec<CommandDescriptor>,
    /// Name or alias -> index in `descriptors`
    index: HashMap<&'static str, usize>,
}

impl CommandRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        CommandRegistry::default()
    }

    /// Builds the registry with every command of the bot.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateAlias`] if two commands share a name
    /// or an alias.
    pub fn builtin() -> Result<Self, RegistryError> {
        let mut registry = CommandRegistry::new();

        registry.register(CommandDescriptor::new(
            "ping",
            "check the bot is alive",
            handle_ping,
        ))?;
        registry.register(CommandDescriptor::new(
            "help",
            "show this help message",
            handle_help,
        ))?;
        registry.register(
            CommandDescriptor::new(
                "display_nation",
                "display a nation's stats, military and policies",
                handle_display_nation,
            )
            .alias("nation")
            .param(ParamSpec::required("nation_id")),
        )?;
        registry.register(
            CommandDescriptor::new(
                "display_nation_wars",
                "list a nation's active wars",
                handle_display_nation_wars,
            )
            .alias("wars")
            .param(ParamSpec::required("nation_id")),
        )?;
        registry.register(
            CommandDescriptor::new(
                "display_required_warchest",
                "recommended warchest for a city count between 2 and 30",
                handle_display_required_warchest,
            )
            .alias("chest")
            .param(ParamSpec::required("city_count")),
        )?;
        registry.register(
            CommandDescriptor::new(
                "find_counters",
                "find allied nations able to counter an aggressor",
                handle_find_counters,
            )
            .alias("counter")
            .param(ParamSpec::required("nation_id")),
        )?;

        Ok(registry)
    }

    /// Adds a command to the registry.
    ///
    /// Nothing is added when any of the names is already taken, including a
    /// name repeated within `descriptor` itself.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateAlias`] with the first conflicting name.
    pub fn register(&mut self, descriptor: CommandDescriptor) -> Result<(), RegistryError> {
        let mut keys: Vec<&'static str> = Vec::with_capacity(descriptor.aliases.len() + 1);

        for key in std::iter::once(descriptor.name).chain(descriptor.aliases.iter().copied()) {
            if self.index.contains_key(key) || keys.contains(&key) {
                return Err(RegistryError::DuplicateAlias(key.to_owned()));
            }
            keys.push(key);
        }

        debug!("registering command {:?}", descriptor);

        let position = self.descriptors.len();
        self.descriptors.push(descriptor);
        for key in keys {
            self.index.insert(key, position);
        }

        Ok(())
    }

    /// Finds the command answering to `token`.
    ///
    /// The match is exact and case sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCommand`] if no name or alias matches.
    pub fn resolve(&self, token: &str) -> Result<&CommandDescriptor, RegistryError> {
        self.index
            .get(token)
            .map(|&position| &self.descriptors[position])
            .ok_or_else(|| RegistryError::UnknownCommand(token.to_owned()))
    }

    /// Every registered command, in registration order.
    pub fn descriptors(&self) -> &[CommandDescriptor] {
        &self.descriptors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_: Arc<CommandContext>, _: Vec<String>) -> HandlerFuture {
        Box::pin(async { Ok(Reply::Text("noop".to_string())) })
    }

    #[test]
    fn test_builtin_registry() {
        let registry = CommandRegistry::builtin().unwrap();
        let names = registry
            .descriptors()
            .iter()
            .map(|d| d.name)
            .collect::<Vec<_>>();

        assert_eq!(
            names,
            vec![
                "ping",
                "help",
                "display_nation",
                "display_nation_wars",
                "display_required_warchest",
                "find_counters"
            ]
        );
    }

    #[test]
    fn test_every_alias_resolves_to_its_canonical_command() {
        let registry = CommandRegistry::builtin().unwrap();

        for descriptor in registry.descriptors() {
            let canonical = registry.resolve(descriptor.name).unwrap();
            assert_eq!(canonical.name, descriptor.name);

            for alias in &descriptor.aliases {
                assert_eq!(registry.resolve(alias).unwrap().name, descriptor.name);
            }
        }
    }

    #[test]
    fn test_builtin_aliases() {
        let registry = CommandRegistry::builtin().unwrap();

        assert_eq!(registry.resolve("nation").unwrap().name, "display_nation");
        assert_eq!(registry.resolve("wars").unwrap().name, "display_nation_wars");
        assert_eq!(
            registry.resolve("chest").unwrap().name,
            "display_required_warchest"
        );
        assert_eq!(registry.resolve("counter").unwrap().name, "find_counters");
    }

    #[test]
    fn test_resolve_is_exact_and_case_sensitive() {
        let registry = CommandRegistry::builtin().unwrap();

        assert_eq!(
            registry.resolve("Ping").unwrap_err(),
            RegistryError::UnknownCommand("Ping".to_string())
        );
        assert!(registry.resolve("nat").is_err());
        assert!(registry.resolve("display_nation_").is_err());
    }

    #[test]
    fn test_register_duplicate_name() {
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandDescriptor::new("ping", "", noop))
            .unwrap();

        let result = registry.register(CommandDescriptor::new("ping", "", noop));
        assert_eq!(
            result,
            Err(RegistryError::DuplicateAlias("ping".to_string()))
        );
    }

    #[test]
    fn test_register_alias_clashing_with_existing_name() {
        let mut registry = CommandRegistry::new();
        registry
            .register(CommandDescriptor::new("nation", "", noop))
            .unwrap();

        let result = registry.register(CommandDescriptor::new("display_nation", "", noop).alias("nation"));
        assert_eq!(
            result,
            Err(RegistryError::DuplicateAlias("nation".to_string()))
        );
        // The failed registration left nothing behind
        assert!(registry.resolve("display_nation").is_err());
        assert_eq!(registry.descriptors().len(), 1);
    }

    #[test]
    fn test_register_alias_repeated_within_descriptor() {
        let mut registry = CommandRegistry::new();

        let result = registry.register(CommandDescriptor::new("wars", "", noop).alias("wars"));
        assert_eq!(
            result,
            Err(RegistryError::DuplicateAlias("wars".to_string()))
        );
    }

    #[test]
    fn test_usage() {
        let descriptor = CommandDescriptor::new("raid", "", noop)
            .param(ParamSpec::required("nation_id"))
            .param(ParamSpec::optional("alliance_id", "0"));

        assert_eq!(descriptor.usage('='), "=raid <nation_id> [alliance_id=0]");
    }
}
