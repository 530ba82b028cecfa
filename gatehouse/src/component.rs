//! Component (button) routing: the ordered, first-match-wins rule chain.
//!
//! Each rule is a plain function from the event and its scope snapshot to an
//! optional [`ComponentRoute`]; [`resolve`] walks the [`RULES`] slice top to
//! bottom and stops at the first hit. Keeping the chain as an explicit
//! ordered list (rather than nested conditionals) keeps the priority
//! auditable and lets the ordering be tested in isolation from the
//! collaborators that execute the routes.

use gatehouse_core::{
    ChannelId, ComponentEvent, DynSessionHandle, ManualVerifyEntry, ScopeSnapshot,
    SessionDirectory, VerificationSection,
};
use std::sync::Arc;

/// Rendered-marker text identifying a manual-verification request message.
pub const MANUAL_VERIFY_MARKER: &str = "Manual Verification Request";
/// Rendered-marker tag identifying verification prompts.
pub const VERIFICATION_TAG: &str = "Verification";
/// Rendered-marker prefix identifying mailbox-origin messages.
pub const MAILBOX_TAG: &str = "Mailbox";
/// Action id of the mailbox open-thread button.
pub const ACTION_OPEN_THREAD: &str = "mailbox_open_thread";
/// Action id of the mailbox remove-thread button.
pub const ACTION_REMOVE_THREAD: &str = "mailbox_remove";

/// A mailbox button's dispatch target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailboxAction {
    /// Open a discussion thread for the message.
    OpenThread,
    /// Remove the thread attached to the message.
    RemoveThread,
}

impl MailboxAction {
    /// Parses a component action id; unrecognized ids are dropped by the
    /// caller after acknowledgment.
    pub fn from_action_id(action_id: &str) -> Option<Self> {
        match action_id {
            ACTION_OPEN_THREAD => Some(Self::OpenThread),
            ACTION_REMOVE_THREAD => Some(Self::RemoveThread),
            _ => None,
        }
    }
}

/// The subsystem a component event resolved to.
pub(crate) enum ComponentRoute {
    /// A reviewer acted on an outstanding manual-verification prompt.
    ManualVerification(ManualVerifyEntry),
    /// A member pressed a verification prompt.
    Verification(VerificationSection),
    /// The message addresses a live session.
    Session(Arc<dyn DynSessionHandle>),
    /// A mailbox-origin message button; `None` when the action id is
    /// unrecognized.
    Mailbox(Option<MailboxAction>),
}

type Matcher =
    fn(&ComponentEvent, ChannelId, &ScopeSnapshot, &dyn SessionDirectory) -> Option<ComponentRoute>;

/// Rule order is a design decision: verification outranks live sessions so
/// a session can never shadow a verification prompt sharing its channel.
const RULES: &[Matcher] = &[
    match_manual_verification,
    match_verification,
    match_session,
    match_mailbox,
];

/// Walks the rule chain; `None` means the event is silently ignored.
pub(crate) fn resolve(
    event: &ComponentEvent,
    channel: ChannelId,
    snapshot: &ScopeSnapshot,
    sessions: &dyn SessionDirectory,
) -> Option<ComponentRoute> {
    RULES
        .iter()
        .find_map(|rule| rule(event, channel, snapshot, sessions))
}

fn match_manual_verification(
    event: &ComponentEvent,
    channel: ChannelId,
    snapshot: &ScopeSnapshot,
    _sessions: &dyn SessionDirectory,
) -> Option<ComponentRoute> {
    let entry = snapshot.manual_verification_entry(channel, event.message)?;
    let marker = event.marker.as_deref()?;
    (marker == MANUAL_VERIFY_MARKER).then(|| ComponentRoute::ManualVerification(entry.clone()))
}

fn match_verification(
    event: &ComponentEvent,
    channel: ChannelId,
    snapshot: &ScopeSnapshot,
    _sessions: &dyn SessionDirectory,
) -> Option<ComponentRoute> {
    if !event.message_author_is_bot {
        return None;
    }
    let section = snapshot.verification_section(channel)?;
    // An ephemeral prompt in the verification channel carries no
    // verification tag; those presses are not for this flow.
    let marker = event.marker.as_deref().unwrap_or("");
    let tagged = match section {
        VerificationSection::Root => marker.contains(VERIFICATION_TAG),
        VerificationSection::Section(_) => marker.ends_with(VERIFICATION_TAG),
    };
    tagged.then_some(ComponentRoute::Verification(section))
}

fn match_session(
    event: &ComponentEvent,
    _channel: ChannelId,
    _snapshot: &ScopeSnapshot,
    sessions: &dyn SessionDirectory,
) -> Option<ComponentRoute> {
    sessions.find(event.message).map(ComponentRoute::Session)
}

fn match_mailbox(
    event: &ComponentEvent,
    channel: ChannelId,
    snapshot: &ScopeSnapshot,
    _sessions: &dyn SessionDirectory,
) -> Option<ComponentRoute> {
    if snapshot.mailbox_channel != Some(channel) {
        return None;
    }
    let marker = event.marker.as_deref()?;
    if !marker.starts_with(MAILBOX_TAG) {
        return None;
    }
    Some(ComponentRoute::Mailbox(MailboxAction::from_action_id(
        &event.action_id,
    )))
}
