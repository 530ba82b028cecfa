//! Command registry: invocation name to (spec, handler).

use gatehouse_core::{CommandSpec, DynCommandHandler, RegistryError};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// A command spec bound to its handler.
pub struct RegisteredCommand {
    spec: CommandSpec,
    handler: Arc<dyn DynCommandHandler>,
}

impl RegisteredCommand {
    /// The command's static metadata.
    pub fn spec(&self) -> &CommandSpec {
        &self.spec
    }

    pub(crate) fn handler(&self) -> &Arc<dyn DynCommandHandler> {
        &self.handler
    }
}

impl std::fmt::Debug for RegisteredCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredCommand")
            .field("spec", &self.spec)
            .finish_non_exhaustive()
    }
}

/// Immutable mapping from invocation name to registered command.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    by_name: HashMap<String, Arc<RegisteredCommand>>,
}

impl CommandRegistry {
    /// Looks up a command by its invocable name.
    pub fn lookup(&self, name: &str) -> Option<&Arc<RegisteredCommand>> {
        self.by_name.get(name)
    }

    /// Number of registered commands.
    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    /// Whether no commands are registered.
    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Builder for [`CommandRegistry`].
///
/// Registration-time validation is the whole point: a duplicate invocation
/// name or command code is a fatal startup error, never a runtime one.
#[derive(Default)]
pub struct CommandRegistryBuilder {
    by_name: HashMap<String, Arc<RegisteredCommand>>,
    codes: HashSet<String>,
}

impl CommandRegistryBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a command.
    pub fn register<H>(&mut self, spec: CommandSpec, handler: H) -> Result<(), RegistryError>
    where
        H: DynCommandHandler,
    {
        if self.by_name.contains_key(spec.name()) {
            return Err(RegistryError::DuplicateName(spec.name().to_owned()));
        }
        if !self.codes.insert(spec.code().to_owned()) {
            return Err(RegistryError::DuplicateCode(spec.code().to_owned()));
        }
        let name = spec.name().to_owned();
        self.by_name.insert(
            name,
            Arc::new(RegisteredCommand {
                spec,
                handler: Arc::new(handler),
            }),
        );
        Ok(())
    }

    /// Finishes the registry.
    pub fn build(self) -> CommandRegistry {
        CommandRegistry {
            by_name: self.by_name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::CommandRegistryBuilder;
    use gatehouse_core::{CommandContext, CommandSpec, RegistryError};

    async fn noop(_ctx: CommandContext) -> Result<(), gatehouse_core::BoxError> {
        Ok(())
    }

    #[test]
    fn lookup_is_by_invocation_name() {
        let mut builder = CommandRegistryBuilder::new();
        builder
            .register(CommandSpec::builder("parse_run", "parse").build(), noop)
            .unwrap();
        let registry = builder.build();

        assert!(registry.lookup("parse").is_some());
        assert!(registry.lookup("parse_run").is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn duplicate_name_is_fatal() {
        let mut builder = CommandRegistryBuilder::new();
        builder
            .register(CommandSpec::builder("a", "parse").build(), noop)
            .unwrap();
        let err = builder
            .register(CommandSpec::builder("b", "parse").build(), noop)
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateName(name) if name == "parse"));
    }

    #[test]
    fn duplicate_code_is_fatal() {
        let mut builder = CommandRegistryBuilder::new();
        builder
            .register(CommandSpec::builder("a", "parse").build(), noop)
            .unwrap();
        let err = builder
            .register(CommandSpec::builder("a", "other").build(), noop)
            .unwrap_err();
        assert!(matches!(err, RegistryError::DuplicateCode(code) if code == "a"));
    }
}
