//! Command specifications and handler context.

use crate::event::CommandEvent;
use crate::permissions::Permissions;
use crate::scope::ScopeSnapshot;
use std::num::NonZeroU32;
use std::time::Duration;

/// Static metadata for one registered command. Immutable after registration.
///
/// Built with [`CommandSpec::builder`]:
///
/// ```
/// use gatehouse_core::{CommandSpec, Permissions};
/// use std::time::Duration;
///
/// let spec = CommandSpec::builder("parse_run", "parse")
///     .cooldown(Duration::from_secs(30))
///     .require_role("Security")
///     .require_caller_permissions(Permissions::KICK_MEMBERS)
///     .require_service_permissions(Permissions::SEND_MESSAGES | Permissions::EMBED_LINKS)
///     .scope_required()
///     .max_concurrent_per_scope(1)
///     .build();
///
/// assert_eq!(spec.code(), "parse_run");
/// assert!(!spec.allow_multiple_runs_per_user());
/// ```
#[derive(Debug, Clone)]
pub struct CommandSpec {
    code: String,
    name: String,
    required_roles: Vec<String>,
    required_caller_permissions: Permissions,
    required_service_permissions: Permissions,
    cooldown: Duration,
    scope_required: bool,
    max_concurrent_per_scope: Option<NonZeroU32>,
    allow_multiple_runs_per_user: bool,
}

impl CommandSpec {
    /// Starts building a spec with the given unique code and invocable name.
    pub fn builder(code: impl Into<String>, name: impl Into<String>) -> CommandSpecBuilder {
        CommandSpecBuilder {
            spec: CommandSpec {
                code: code.into(),
                name: name.into(),
                required_roles: Vec::new(),
                required_caller_permissions: Permissions::empty(),
                required_service_permissions: Permissions::empty(),
                cooldown: Duration::ZERO,
                scope_required: false,
                max_concurrent_per_scope: None,
                allow_multiple_runs_per_user: false,
            },
        }
    }

    /// Unique command code, the key used by block lists and the cooldown and
    /// active-run ledgers.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The name callers invoke.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Role names of which the caller must hold at least one (ANY-of).
    pub fn required_roles(&self) -> &[String] {
        &self.required_roles
    }

    /// Permissions of which the caller must hold at least one (ANY-of).
    pub fn required_caller_permissions(&self) -> Permissions {
        self.required_caller_permissions
    }

    /// Permissions the service must hold in full (ALL-of).
    pub fn required_service_permissions(&self) -> Permissions {
        self.required_service_permissions
    }

    /// Cooldown charged per run.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    /// Whether the command only makes sense inside a bound scope.
    pub fn scope_required(&self) -> bool {
        self.scope_required
    }

    /// Ceiling on simultaneous runs per scope; `None` is unlimited.
    pub fn max_concurrent_per_scope(&self) -> Option<NonZeroU32> {
        self.max_concurrent_per_scope
    }

    /// Whether one caller may hold several simultaneous runs.
    pub fn allow_multiple_runs_per_user(&self) -> bool {
        self.allow_multiple_runs_per_user
    }
}

/// Builder for [`CommandSpec`].
#[derive(Debug)]
pub struct CommandSpecBuilder {
    spec: CommandSpec,
}

impl CommandSpecBuilder {
    /// Sets the cooldown charged per run.
    pub fn cooldown(mut self, cooldown: Duration) -> Self {
        self.spec.cooldown = cooldown;
        self
    }

    /// Adds a role name to the ANY-of caller requirement.
    pub fn require_role(mut self, role: impl Into<String>) -> Self {
        self.spec.required_roles.push(role.into());
        self
    }

    /// Sets the ANY-of caller permission requirement.
    pub fn require_caller_permissions(mut self, permissions: Permissions) -> Self {
        self.spec.required_caller_permissions = permissions;
        self
    }

    /// Sets the ALL-of service permission requirement.
    pub fn require_service_permissions(mut self, permissions: Permissions) -> Self {
        self.spec.required_service_permissions = permissions;
        self
    }

    /// Requires a bound scope for the command to run at all.
    pub fn scope_required(mut self) -> Self {
        self.spec.scope_required = true;
        self
    }

    /// Caps simultaneous runs per scope. A zero limit reads as unlimited.
    pub fn max_concurrent_per_scope(mut self, limit: u32) -> Self {
        self.spec.max_concurrent_per_scope = NonZeroU32::new(limit);
        self
    }

    /// Lets one caller hold several simultaneous runs.
    pub fn allow_multiple_runs(mut self) -> Self {
        self.spec.allow_multiple_runs_per_user = true;
        self
    }

    /// Finishes the spec.
    pub fn build(self) -> CommandSpec {
        self.spec
    }
}

/// Everything a command handler receives for one admitted invocation.
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// The admitted invocation.
    pub event: CommandEvent,
    /// The originating scope's stored configuration, when one was bound and
    /// a document existed for it.
    pub scope: Option<ScopeSnapshot>,
}
