#![allow(dead_code)]

use gatehouse::testing::{
    RecordingMailbox, RecordingResponder, RecordingVerification, StaticScopeDirectory,
    StaticSessionDirectory,
};
use gatehouse::{CommandRegistry, DispatchConfig, Dispatcher};
use gatehouse_core::{Caller, CommandEvent, InboundEvent};
use std::sync::Arc;

// ============================================================================
// Harness
// ============================================================================

/// A dispatcher wired to recording doubles, with handles kept for assertions.
pub struct Harness {
    pub dispatcher: Arc<Dispatcher>,
    pub responder: RecordingResponder,
    pub verification: RecordingVerification,
    pub mailbox: RecordingMailbox,
}

pub struct HarnessBuilder {
    commands: CommandRegistry,
    config: DispatchConfig,
    scopes: StaticScopeDirectory,
    sessions: StaticSessionDirectory,
}

impl HarnessBuilder {
    pub fn new() -> Self {
        Self {
            commands: CommandRegistry::default(),
            config: DispatchConfig::default(),
            scopes: StaticScopeDirectory::new(),
            sessions: StaticSessionDirectory::new(),
        }
    }

    pub fn commands(mut self, commands: CommandRegistry) -> Self {
        self.commands = commands;
        self
    }

    pub fn config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn scopes(mut self, scopes: StaticScopeDirectory) -> Self {
        self.scopes = scopes;
        self
    }

    pub fn sessions(mut self, sessions: StaticSessionDirectory) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn build(self) -> Harness {
        let responder = RecordingResponder::new();
        let verification = RecordingVerification::new();
        let mailbox = RecordingMailbox::new();
        let dispatcher = Dispatcher::builder()
            .commands(self.commands)
            .config(self.config)
            .scopes(self.scopes)
            .verification(verification.clone())
            .sessions(self.sessions)
            .mailbox(mailbox.clone())
            .responder(responder.clone())
            .build()
            .expect("harness wiring is complete");
        Harness {
            dispatcher: Arc::new(dispatcher),
            responder,
            verification,
            mailbox,
        }
    }
}

// ============================================================================
// Event constructors
// ============================================================================

pub fn caller(id: u64) -> Caller {
    Caller::new(id, format!("caller-{id}"))
}

pub fn command(name: &str, user: u64, scope: Option<u64>) -> InboundEvent {
    let mut event = CommandEvent::new(caller(user), name);
    if let Some(scope) = scope {
        event = event.in_scope(scope);
    }
    InboundEvent::Command(event)
}
