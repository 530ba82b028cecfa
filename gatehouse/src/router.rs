//! The event router: admission-controlled command dispatch and component
//! routing.
//!
//! One [`Dispatcher`] owns the mutable registries (cooldowns, active runs,
//! commands) and holds every external collaborator behind a trait object.
//! All of them are injected at construction — nothing here is an ambient
//! singleton — so the whole pipeline is exercisable with fakes.
//!
//! # Command pipeline
//!
//! A command event walks a fixed gate sequence; each gate either terminates
//! the event with a [`Notice`] (or silence, for unknown names) or falls
//! through to the next. Nothing is retained between events beyond the shared
//! registries.
//!
//! ```text
//! lookup -> scope -> block list -> exclusivity -> occupancy -> cooldown
//!        -> charge cooldown -> permissions -> acquire -> invoke -> release
//! ```
//!
//! The cooldown tick deliberately lands *before* the permission outcome is
//! read: a caller denied by permissions still burns their cooldown, while a
//! caller bounced by the occupancy or exclusivity gates does not. Elevated
//! callers (operator allow-list, administrators) are never charged.
//!
//! # Containment
//!
//! A handler `Err` or panic is caught here, logged, and goes no further; the
//! active-run slot is released by the guard's `Drop` in every case.

use crate::active::{ActiveRunRegistry, RunGuard};
use crate::component::{ComponentRoute, MailboxAction, resolve};
use crate::config::DispatchConfig;
use crate::cooldown::CooldownTracker;
use crate::permit;
use crate::registry::CommandRegistry;
use futures::FutureExt;
use gatehouse_core::{
    AdmissionError, CommandContext, CommandEvent, ComponentEvent, DynCommandHandler,
    DynMailboxGateway, DynResponder, DynScopeDirectory, DynVerificationGateway, InboundEvent,
    MailboxGateway, Notice, Responder, ScopeDirectory, ScopeSnapshot, SessionDirectory,
    VerificationGateway,
};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;

/// Dispatcher construction failures.
#[derive(Debug, Error)]
pub enum DispatcherBuildError {
    /// A required collaborator was never supplied.
    #[error("missing collaborator: {0}")]
    Missing(&'static str),
}

/// The top-level entry point for inbound events.
pub struct Dispatcher {
    commands: CommandRegistry,
    cooldowns: CooldownTracker,
    active: ActiveRunRegistry,
    config: DispatchConfig,
    scopes: Arc<dyn DynScopeDirectory>,
    verification: Arc<dyn DynVerificationGateway>,
    sessions: Arc<dyn SessionDirectory>,
    mailbox: Arc<dyn DynMailboxGateway>,
    responder: Arc<dyn DynResponder>,
}

impl Dispatcher {
    /// Starts building a dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::default()
    }

    /// The active-run registry, exposed for observability and tests.
    pub fn active_runs(&self) -> &ActiveRunRegistry {
        &self.active
    }

    /// The cooldown ledger, exposed for observability and tests.
    pub fn cooldowns(&self) -> &CooldownTracker {
        &self.cooldowns
    }

    /// Processes one inbound event to completion.
    ///
    /// Never returns an error and never panics outward: admission rejections
    /// are answered through the responder, handler faults are logged and
    /// swallowed. This is the containment boundary.
    pub async fn dispatch(&self, event: InboundEvent) {
        match event {
            InboundEvent::Command(event) => self.dispatch_command(event).await,
            InboundEvent::Component(event) => self.dispatch_component(event).await,
            InboundEvent::Other => {}
        }
    }

    async fn dispatch_command(&self, event: CommandEvent) {
        // Unknown names are platform noise, not invocations; stay silent.
        let Some(command) = self.commands.lookup(&event.command_name) else {
            return;
        };
        let spec = command.spec();

        let snapshot = match event.scope {
            Some(scope) => match self.scopes.snapshot_dyn(scope).await {
                Ok(snapshot) => snapshot,
                Err(error) => {
                    tracing::error!(%scope, %error, "scope directory lookup failed");
                    None
                }
            },
            None => None,
        };
        if spec.scope_required() && snapshot.is_none() {
            self.notify(&event, Notice::ScopeRequired).await;
            return;
        }

        if let Some(snapshot) = &snapshot {
            if snapshot.is_command_blocked(spec.code()) {
                self.notify(&event, Notice::CommandDisabled).await;
                return;
            }
        }

        // Exclusivity and occupancy prechecks. Rejections here are advisory
        // reads and charge no cooldown; the authoritative check is the
        // atomic acquire below. Exclusivity is read first so a caller
        // occupying the only slot hears "already running", not "too many".
        if !spec.allow_multiple_runs_per_user()
            && self.active.is_user_active(spec.code(), event.caller.id)
        {
            self.notify(&event, Notice::AlreadyRunning).await;
            return;
        }
        if let Some(limit) = spec.max_concurrent_per_scope() {
            if self.active.occupancy(spec.code(), event.scope) >= limit.get() as usize {
                self.notify(&event, Notice::TooManyConcurrent { limit: limit.get() })
                    .await;
                return;
            }
        }

        // The cooldown read sits after the active-run prechecks so that an
        // overlapping invocation is answered with its real blocker (the run
        // still in flight), and only a completed run's retry surfaces the
        // cooldown armed at admission.
        let remaining = self.cooldowns.remaining(event.caller.id, spec.code());
        if !remaining.is_zero() {
            self.notify(&event, Notice::Cooldown { remaining }).await;
            return;
        }

        let verdict = permit::evaluate(
            &event.caller,
            snapshot
                .as_ref()
                .map(|s| s.service_permissions)
                .unwrap_or_default(),
            spec,
            self.config.is_operator(event.caller.id),
        );
        // The tick lands whatever the permission outcome, unless elevated.
        if !verdict.has_elevated_override {
            self.cooldowns
                .arm(event.caller.id, spec.code(), spec.cooldown());
        }
        if !verdict.can_run {
            self.notify(&event, Notice::MissingRequirements(verdict))
                .await;
            return;
        }

        let guard = match self.active.try_acquire(
            spec.code(),
            event.caller.id,
            event.scope,
            spec.max_concurrent_per_scope(),
            !spec.allow_multiple_runs_per_user(),
        ) {
            Ok(guard) => guard,
            Err(AdmissionError::AlreadyRunning) => {
                self.notify(&event, Notice::AlreadyRunning).await;
                return;
            }
            Err(AdmissionError::ScopeAtCapacity { limit }) => {
                self.notify(&event, Notice::TooManyConcurrent { limit }).await;
                return;
            }
        };

        self.invoke(command.spec().name(), command.handler().clone(), guard, CommandContext {
            event,
            scope: snapshot,
        })
        .await;
    }

    /// Runs the handler with the guard held; the guard's `Drop` is the
    /// unconditional release, panic paths included.
    async fn invoke(
        &self,
        name: &str,
        handler: Arc<dyn DynCommandHandler>,
        guard: RunGuard<'_>,
        ctx: CommandContext,
    ) {
        let outcome = AssertUnwindSafe(handler.run_dyn(ctx)).catch_unwind().await;
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(error)) => {
                tracing::error!(command = name, %error, "command handler failed");
            }
            Err(panic) => {
                tracing::error!(
                    command = name,
                    "command handler panicked: {}",
                    panic_message(panic.as_ref())
                );
            }
        }
        drop(guard);
    }

    async fn dispatch_component(&self, event: ComponentEvent) {
        // Pre-filters: no scope, excluded scope, automated actor or no
        // resolvable channel — reject early, no response.
        let Some(scope) = event.scope else { return };
        if self.config.is_excluded_scope(scope) {
            return;
        }
        if event.caller.is_bot {
            return;
        }
        let Some(channel) = event.channel else { return };

        let snapshot = match self.scopes.snapshot_dyn(scope).await {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return,
            Err(error) => {
                tracing::error!(%scope, %error, "scope directory lookup failed");
                return;
            }
        };

        // Control panels are a higher-trust interaction surface with their
        // own handling; the chain never sees their presses.
        if snapshot.control_panel_channels().any(|panel| panel == channel) {
            return;
        }

        let Some(route) = resolve(&event, channel, &snapshot, self.sessions.as_ref()) else {
            return;
        };
        self.execute_route(route, event, snapshot).await;
    }

    async fn execute_route(
        &self,
        route: ComponentRoute,
        event: ComponentEvent,
        snapshot: ScopeSnapshot,
    ) {
        match route {
            ComponentRoute::ManualVerification(entry) => {
                self.acknowledge(&event).await;
                // Forward off the event's own unit of work; the reviewer
                // already has their acknowledgment.
                let gateway = Arc::clone(&self.verification);
                let actor = event.caller.clone();
                let action_id = event.action_id.clone();
                let message = event.message;
                tokio::spawn(async move {
                    if let Err(error) =
                        gateway.acknowledge_dyn(entry, actor, action_id, message).await
                    {
                        tracing::error!(%error, "manual verification acknowledgment failed");
                    }
                });
            }
            ComponentRoute::Verification(section) => {
                if let Err(error) = self.verification.verify_dyn(event, snapshot, section).await {
                    tracing::error!(%error, "verification flow failed");
                }
            }
            ComponentRoute::Session(handle) => {
                if let Err(error) = handle.handle_interaction_dyn(event).await {
                    tracing::error!(%error, "session interaction handler failed");
                }
            }
            ComponentRoute::Mailbox(action) => {
                self.acknowledge(&event).await;
                let result = match action {
                    Some(MailboxAction::OpenThread) => {
                        self.mailbox
                            .open_thread_dyn(snapshot, event.message, event.caller.clone())
                            .await
                    }
                    Some(MailboxAction::RemoveThread) => {
                        self.mailbox.remove_thread_dyn(event.message, snapshot).await
                    }
                    None => Ok(()),
                };
                if let Err(error) = result {
                    tracing::error!(%error, "mailbox action failed");
                }
            }
        }
    }

    async fn notify(&self, event: &CommandEvent, notice: Notice) {
        tracing::debug!(
            command = %event.command_name,
            caller = %event.caller.id,
            %notice,
            "admission rejected"
        );
        if let Err(error) = self.responder.notify_dyn(event, notice).await {
            tracing::warn!(%error, "failed to deliver admission notice");
        }
    }

    async fn acknowledge(&self, event: &ComponentEvent) {
        if let Err(error) = self.responder.acknowledge_dyn(event).await {
            tracing::warn!(%error, "component acknowledgment failed");
        }
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}

/// Builder for [`Dispatcher`]. Every collaborator is required; registries
/// default to empty ones.
#[derive(Default)]
pub struct DispatcherBuilder {
    commands: Option<CommandRegistry>,
    config: DispatchConfig,
    scopes: Option<Arc<dyn DynScopeDirectory>>,
    verification: Option<Arc<dyn DynVerificationGateway>>,
    sessions: Option<Arc<dyn SessionDirectory>>,
    mailbox: Option<Arc<dyn DynMailboxGateway>>,
    responder: Option<Arc<dyn DynResponder>>,
}

impl DispatcherBuilder {
    /// Sets the command registry.
    pub fn commands(mut self, registry: CommandRegistry) -> Self {
        self.commands = Some(registry);
        self
    }

    /// Sets the deployment configuration.
    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    /// Sets the scope configuration collaborator.
    pub fn scopes(mut self, directory: impl ScopeDirectory) -> Self {
        self.scopes = Some(Arc::new(directory));
        self
    }

    /// Sets the verification subsystem.
    pub fn verification(mut self, gateway: impl VerificationGateway) -> Self {
        self.verification = Some(Arc::new(gateway));
        self
    }

    /// Sets the live-session directory.
    pub fn sessions(mut self, directory: impl SessionDirectory) -> Self {
        self.sessions = Some(Arc::new(directory));
        self
    }

    /// Sets the mailbox subsystem.
    pub fn mailbox(mut self, gateway: impl MailboxGateway) -> Self {
        self.mailbox = Some(Arc::new(gateway));
        self
    }

    /// Sets the platform reply surface.
    pub fn responder(mut self, responder: impl Responder) -> Self {
        self.responder = Some(Arc::new(responder));
        self
    }

    /// Finishes the dispatcher.
    pub fn build(self) -> Result<Dispatcher, DispatcherBuildError> {
        Ok(Dispatcher {
            commands: self.commands.unwrap_or_default(),
            cooldowns: CooldownTracker::new(),
            active: ActiveRunRegistry::new(),
            config: self.config,
            scopes: self
                .scopes
                .ok_or(DispatcherBuildError::Missing("scope directory"))?,
            verification: self
                .verification
                .ok_or(DispatcherBuildError::Missing("verification gateway"))?,
            sessions: self
                .sessions
                .ok_or(DispatcherBuildError::Missing("session directory"))?,
            mailbox: self
                .mailbox
                .ok_or(DispatcherBuildError::Missing("mailbox gateway"))?,
            responder: self
                .responder
                .ok_or(DispatcherBuildError::Missing("responder"))?,
        })
    }
}
