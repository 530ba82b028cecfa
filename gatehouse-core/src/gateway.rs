//! Collaborator seams: the traits the surrounding service implements.
//!
//! The dispatcher treats everything beyond admission control as an external
//! collaborator behind one of these traits: stored scope configuration, the
//! verification flow, live sessions, the mailbox, and the platform reply
//! surface. Each async trait comes in two forms — a statically-dispatched
//! one using native `impl Future` methods, and an object-safe `Dyn*` twin
//! with a blanket implementation — so collaborators implement the pleasant
//! form and the engine stores the dynamic one.

use crate::caller::Caller;
use crate::error::BoxError;
use crate::event::{CommandEvent, ComponentEvent};
use crate::id::{MessageId, ScopeId};
use crate::notice::Notice;
use crate::scope::{ManualVerifyEntry, ScopeSnapshot, VerificationSection};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future alias for the object-safe collaborator traits.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

// ============================================================================
// Scope configuration
// ============================================================================

/// Read-only access to stored scope configuration.
///
/// An absent snapshot means the scope has nothing configured: scope-optional
/// commands proceed ungated, scope-required commands are rejected.
pub trait ScopeDirectory: Send + Sync + 'static {
    /// Fetches the stored snapshot for a scope, if one exists.
    fn snapshot(
        &self,
        scope: ScopeId,
    ) -> impl Future<Output = Result<Option<ScopeSnapshot>, BoxError>> + Send;
}

/// Object-safe form of [`ScopeDirectory`].
pub trait DynScopeDirectory: Send + Sync + 'static {
    /// Fetches the stored snapshot for a scope, if one exists.
    fn snapshot_dyn(&self, scope: ScopeId)
    -> BoxFuture<'_, Result<Option<ScopeSnapshot>, BoxError>>;
}

impl<T: ScopeDirectory> DynScopeDirectory for T {
    fn snapshot_dyn(
        &self,
        scope: ScopeId,
    ) -> BoxFuture<'_, Result<Option<ScopeSnapshot>, BoxError>> {
        Box::pin(self.snapshot(scope))
    }
}

// ============================================================================
// Verification
// ============================================================================

/// The verification subsystem's external contract.
///
/// The dispatcher forwards matched component events here and never inspects
/// the flow's internals.
pub trait VerificationGateway: Send + Sync + 'static {
    /// Records a reviewer's action on an outstanding manual-verification
    /// prompt.
    fn acknowledge(
        &self,
        entry: ManualVerifyEntry,
        actor: Caller,
        action_id: String,
        message: MessageId,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Runs the primary verification flow for a component press on a
    /// verification prompt.
    fn verify(
        &self,
        event: ComponentEvent,
        snapshot: ScopeSnapshot,
        section: VerificationSection,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Object-safe form of [`VerificationGateway`].
pub trait DynVerificationGateway: Send + Sync + 'static {
    /// Records a reviewer's action on an outstanding manual-verification
    /// prompt.
    fn acknowledge_dyn(
        &self,
        entry: ManualVerifyEntry,
        actor: Caller,
        action_id: String,
        message: MessageId,
    ) -> BoxFuture<'_, Result<(), BoxError>>;

    /// Runs the primary verification flow for a component press on a
    /// verification prompt.
    fn verify_dyn(
        &self,
        event: ComponentEvent,
        snapshot: ScopeSnapshot,
        section: VerificationSection,
    ) -> BoxFuture<'_, Result<(), BoxError>>;
}

impl<T: VerificationGateway> DynVerificationGateway for T {
    fn acknowledge_dyn(
        &self,
        entry: ManualVerifyEntry,
        actor: Caller,
        action_id: String,
        message: MessageId,
    ) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(self.acknowledge(entry, actor, action_id, message))
    }

    fn verify_dyn(
        &self,
        event: ComponentEvent,
        snapshot: ScopeSnapshot,
        section: VerificationSection,
    ) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(self.verify(event, snapshot, section))
    }
}

// ============================================================================
// Live sessions
// ============================================================================

/// A live, long-running session addressable by the message that represents
/// it. Lifecycle is owned entirely by the session subsystem.
pub trait SessionHandle: Send + Sync + 'static {
    /// Hands a component press on the session's message to the session.
    fn handle_interaction(
        &self,
        event: ComponentEvent,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Object-safe form of [`SessionHandle`].
pub trait DynSessionHandle: Send + Sync + 'static {
    /// Hands a component press on the session's message to the session.
    fn handle_interaction_dyn(&self, event: ComponentEvent) -> BoxFuture<'_, Result<(), BoxError>>;
}

impl<T: SessionHandle> DynSessionHandle for T {
    fn handle_interaction_dyn(&self, event: ComponentEvent) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(self.handle_interaction(event))
    }
}

/// Lookup from live message identity to running session.
///
/// The registry behind this trait is an in-memory map owned by the session
/// subsystem; lookup is synchronous. The dispatcher only ever reads.
pub trait SessionDirectory: Send + Sync + 'static {
    /// Resolves the session addressed by the given message, if one is live.
    fn find(&self, message: MessageId) -> Option<Arc<dyn DynSessionHandle>>;
}

// ============================================================================
// Mailbox
// ============================================================================

/// The mailbox/thread subsystem's external contract.
pub trait MailboxGateway: Send + Sync + 'static {
    /// Opens a discussion thread for a mailbox-origin message.
    fn open_thread(
        &self,
        snapshot: ScopeSnapshot,
        message: MessageId,
        actor: Caller,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Removes the thread attached to a mailbox-origin message.
    fn remove_thread(
        &self,
        message: MessageId,
        snapshot: ScopeSnapshot,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Object-safe form of [`MailboxGateway`].
pub trait DynMailboxGateway: Send + Sync + 'static {
    /// Opens a discussion thread for a mailbox-origin message.
    fn open_thread_dyn(
        &self,
        snapshot: ScopeSnapshot,
        message: MessageId,
        actor: Caller,
    ) -> BoxFuture<'_, Result<(), BoxError>>;

    /// Removes the thread attached to a mailbox-origin message.
    fn remove_thread_dyn(
        &self,
        message: MessageId,
        snapshot: ScopeSnapshot,
    ) -> BoxFuture<'_, Result<(), BoxError>>;
}

impl<T: MailboxGateway> DynMailboxGateway for T {
    fn open_thread_dyn(
        &self,
        snapshot: ScopeSnapshot,
        message: MessageId,
        actor: Caller,
    ) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(self.open_thread(snapshot, message, actor))
    }

    fn remove_thread_dyn(
        &self,
        message: MessageId,
        snapshot: ScopeSnapshot,
    ) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(self.remove_thread(message, snapshot))
    }
}

// ============================================================================
// Platform replies
// ============================================================================

/// The platform reply surface.
///
/// Rendering a [`Notice`] into platform UI (embeds, ephemeral replies) is
/// this collaborator's business; the dispatcher only decides *that* a notice
/// is owed. Failures are logged by the dispatcher and never fatal.
pub trait Responder: Send + Sync + 'static {
    /// Answers a command invocation with an admission notice.
    fn notify(
        &self,
        event: &CommandEvent,
        notice: Notice,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;

    /// Acknowledges receipt of a component press without replying.
    fn acknowledge(
        &self,
        event: &ComponentEvent,
    ) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Object-safe form of [`Responder`].
pub trait DynResponder: Send + Sync + 'static {
    /// Answers a command invocation with an admission notice.
    fn notify_dyn<'a>(
        &'a self,
        event: &'a CommandEvent,
        notice: Notice,
    ) -> BoxFuture<'a, Result<(), BoxError>>;

    /// Acknowledges receipt of a component press without replying.
    fn acknowledge_dyn<'a>(
        &'a self,
        event: &'a ComponentEvent,
    ) -> BoxFuture<'a, Result<(), BoxError>>;
}

impl<T: Responder> DynResponder for T {
    fn notify_dyn<'a>(
        &'a self,
        event: &'a CommandEvent,
        notice: Notice,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(self.notify(event, notice))
    }

    fn acknowledge_dyn<'a>(
        &'a self,
        event: &'a ComponentEvent,
    ) -> BoxFuture<'a, Result<(), BoxError>> {
        Box::pin(self.acknowledge(event))
    }
}
