//! Test doubles for exercising the dispatcher without a live platform.
//!
//! Every double shares its recorded state across clones, so a test can hand
//! one clone to the dispatcher and keep another to inspect afterwards.

use gatehouse_core::{
    BoxError, Caller, CommandContext, CommandEvent, CommandHandler, ComponentEvent,
    DynSessionHandle, MailboxGateway, ManualVerifyEntry, MessageId, Notice, Responder,
    ScopeDirectory, ScopeId, ScopeSnapshot, SessionDirectory, SessionHandle, UserId,
    VerificationGateway, VerificationSection,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, Semaphore};

// ============================================================================
// Responder
// ============================================================================

/// A responder that records every notice and acknowledgment it is handed.
#[derive(Clone, Default)]
pub struct RecordingResponder {
    notices: Arc<Mutex<Vec<Notice>>>,
    acknowledged: Arc<Mutex<Vec<MessageId>>>,
}

impl RecordingResponder {
    /// A fresh recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All notices delivered so far, in order.
    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    /// The most recent notice, if any.
    pub fn last_notice(&self) -> Option<Notice> {
        self.notices.lock().unwrap().last().cloned()
    }

    /// Messages whose component presses were acknowledged, in order.
    pub fn acknowledged(&self) -> Vec<MessageId> {
        self.acknowledged.lock().unwrap().clone()
    }
}

impl Responder for RecordingResponder {
    async fn notify(&self, _event: &CommandEvent, notice: Notice) -> Result<(), BoxError> {
        self.notices.lock().unwrap().push(notice);
        Ok(())
    }

    async fn acknowledge(&self, event: &ComponentEvent) -> Result<(), BoxError> {
        self.acknowledged.lock().unwrap().push(event.message);
        Ok(())
    }
}

// ============================================================================
// Scope directory
// ============================================================================

/// A scope directory serving fixed snapshots.
#[derive(Clone, Default)]
pub struct StaticScopeDirectory {
    snapshots: HashMap<ScopeId, ScopeSnapshot>,
}

impl StaticScopeDirectory {
    /// A directory with nothing configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a snapshot, keyed by its own scope id.
    pub fn with(mut self, snapshot: ScopeSnapshot) -> Self {
        self.snapshots.insert(snapshot.scope, snapshot);
        self
    }
}

impl ScopeDirectory for StaticScopeDirectory {
    async fn snapshot(&self, scope: ScopeId) -> Result<Option<ScopeSnapshot>, BoxError> {
        Ok(self.snapshots.get(&scope).cloned())
    }
}

// ============================================================================
// Verification
// ============================================================================

/// A verification gateway that records acknowledgments and verify calls.
///
/// Manual-verification forwarding happens on a spawned task; tests await
/// [`RecordingVerification::acknowledged_signal`] before inspecting.
#[derive(Clone, Default)]
pub struct RecordingVerification {
    acknowledged: Arc<Mutex<Vec<(ManualVerifyEntry, UserId, String)>>>,
    verified: Arc<Mutex<Vec<(MessageId, VerificationSection)>>>,
    signal: Arc<Notify>,
}

impl RecordingVerification {
    /// A fresh recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded manual-verification acknowledgments: (entry, actor, action).
    pub fn acknowledgments(&self) -> Vec<(ManualVerifyEntry, UserId, String)> {
        self.acknowledged.lock().unwrap().clone()
    }

    /// Recorded verify calls: (message, section).
    pub fn verified(&self) -> Vec<(MessageId, VerificationSection)> {
        self.verified.lock().unwrap().clone()
    }

    /// Resolves once an acknowledgment has been recorded.
    pub async fn acknowledged_signal(&self) {
        self.signal.notified().await;
    }
}

impl VerificationGateway for RecordingVerification {
    async fn acknowledge(
        &self,
        entry: ManualVerifyEntry,
        actor: Caller,
        action_id: String,
        _message: MessageId,
    ) -> Result<(), BoxError> {
        self.acknowledged
            .lock()
            .unwrap()
            .push((entry, actor.id, action_id));
        self.signal.notify_one();
        Ok(())
    }

    async fn verify(
        &self,
        event: ComponentEvent,
        _snapshot: ScopeSnapshot,
        section: VerificationSection,
    ) -> Result<(), BoxError> {
        self.verified.lock().unwrap().push((event.message, section));
        Ok(())
    }
}

// ============================================================================
// Sessions
// ============================================================================

/// A session that records the component events handed to it.
#[derive(Clone, Default)]
pub struct RecordingSession {
    events: Arc<Mutex<Vec<ComponentEvent>>>,
}

impl RecordingSession {
    /// A fresh recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Events handed to this session, in order.
    pub fn events(&self) -> Vec<ComponentEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl SessionHandle for RecordingSession {
    async fn handle_interaction(&self, event: ComponentEvent) -> Result<(), BoxError> {
        self.events.lock().unwrap().push(event);
        Ok(())
    }
}

/// A session directory over a fixed message-to-session map.
#[derive(Clone, Default)]
pub struct StaticSessionDirectory {
    sessions: HashMap<MessageId, Arc<dyn DynSessionHandle>>,
}

impl StaticSessionDirectory {
    /// A directory with no live sessions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a session under the message that represents it.
    pub fn with(mut self, message: impl Into<MessageId>, session: impl SessionHandle) -> Self {
        self.sessions.insert(message.into(), Arc::new(session));
        self
    }
}

impl SessionDirectory for StaticSessionDirectory {
    fn find(&self, message: MessageId) -> Option<Arc<dyn DynSessionHandle>> {
        self.sessions.get(&message).cloned()
    }
}

// ============================================================================
// Mailbox
// ============================================================================

/// A mailbox gateway that records thread operations.
#[derive(Clone, Default)]
pub struct RecordingMailbox {
    opened: Arc<Mutex<Vec<(MessageId, UserId)>>>,
    removed: Arc<Mutex<Vec<MessageId>>>,
}

impl RecordingMailbox {
    /// A fresh recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Open-thread calls: (message, actor).
    pub fn opened(&self) -> Vec<(MessageId, UserId)> {
        self.opened.lock().unwrap().clone()
    }

    /// Remove-thread calls.
    pub fn removed(&self) -> Vec<MessageId> {
        self.removed.lock().unwrap().clone()
    }
}

impl MailboxGateway for RecordingMailbox {
    async fn open_thread(
        &self,
        _snapshot: ScopeSnapshot,
        message: MessageId,
        actor: Caller,
    ) -> Result<(), BoxError> {
        self.opened.lock().unwrap().push((message, actor.id));
        Ok(())
    }

    async fn remove_thread(
        &self,
        message: MessageId,
        _snapshot: ScopeSnapshot,
    ) -> Result<(), BoxError> {
        self.removed.lock().unwrap().push(message);
        Ok(())
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// A handler that counts invocations and succeeds.
#[derive(Clone, Default)]
pub struct CountingHandler {
    count: Arc<AtomicUsize>,
}

impl CountingHandler {
    /// A fresh counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed invocations.
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl CommandHandler for CountingHandler {
    async fn run(&self, _ctx: CommandContext) -> Result<(), BoxError> {
        self.count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A handler that always fails.
pub struct FailingHandler;

impl CommandHandler for FailingHandler {
    async fn run(&self, _ctx: CommandContext) -> Result<(), BoxError> {
        Err("intentional failure".into())
    }
}

/// A handler that always panics.
pub struct PanickingHandler;

impl CommandHandler for PanickingHandler {
    async fn run(&self, _ctx: CommandContext) -> Result<(), BoxError> {
        panic!("intentional panic");
    }
}

/// A handler that signals when it starts, then parks until the test opens
/// its gate. Built for overlap tests; the semaphores count, so several runs
/// can be parked at once without losing wakeups.
#[derive(Clone)]
pub struct GatedHandler {
    started: Arc<Semaphore>,
    gate: Arc<Semaphore>,
    runs: Arc<AtomicUsize>,
}

impl GatedHandler {
    /// A fresh gated handler.
    pub fn new() -> Self {
        Self {
            started: Arc::new(Semaphore::new(0)),
            gate: Arc::new(Semaphore::new(0)),
            runs: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Resolves once a run has started.
    pub async fn wait_started(&self) {
        self.started.acquire().await.unwrap().forget();
    }

    /// Lets one parked run finish.
    pub fn open_gate(&self) {
        self.gate.add_permits(1);
    }

    /// Number of runs that have started.
    pub fn runs(&self) -> usize {
        self.runs.load(Ordering::SeqCst)
    }
}

impl Default for GatedHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandHandler for GatedHandler {
    async fn run(&self, _ctx: CommandContext) -> Result<(), BoxError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        self.started.add_permits(1);
        self.gate.acquire().await?.forget();
        Ok(())
    }
}
