//! Inbound event types delivered by the platform listener.

use crate::caller::Caller;
use crate::id::{ChannelId, MessageId, ScopeId};

/// A slash-style command invocation.
#[derive(Debug, Clone)]
pub struct CommandEvent {
    /// Who invoked the command.
    pub caller: Caller,
    /// The scope the invocation is bound to, if any.
    pub scope: Option<ScopeId>,
    /// The channel the invocation originated in, if resolvable.
    pub channel: Option<ChannelId>,
    /// The invoked name, as typed.
    pub command_name: String,
    /// Raw argument text after the command name.
    pub arguments: String,
}

impl CommandEvent {
    /// A bare invocation with no arguments.
    pub fn new(caller: Caller, command_name: impl Into<String>) -> Self {
        Self {
            caller,
            scope: None,
            channel: None,
            command_name: command_name.into(),
            arguments: String::new(),
        }
    }

    /// Binds the invocation to a scope.
    pub fn in_scope(mut self, scope: impl Into<ScopeId>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Records the originating channel.
    pub fn in_channel(mut self, channel: impl Into<ChannelId>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Attaches raw argument text.
    pub fn with_arguments(mut self, arguments: impl Into<String>) -> Self {
        self.arguments = arguments.into();
        self
    }
}

/// A UI-component (button) press on a rendered message.
#[derive(Debug, Clone)]
pub struct ComponentEvent {
    /// Who pressed the component.
    pub caller: Caller,
    /// The scope the press originated in, if any.
    pub scope: Option<ScopeId>,
    /// The channel the pressed message lives in, if resolvable.
    pub channel: Option<ChannelId>,
    /// The message the component is attached to.
    pub message: MessageId,
    /// Whether that message was authored by the service itself.
    pub message_author_is_bot: bool,
    /// The rendered marker on the message (footer-style tag), if any.
    ///
    /// Subsystems tag the messages they render; the component chain matches
    /// on these tags to tell verification prompts, mailbox entries and plain
    /// messages apart.
    pub marker: Option<String>,
    /// The action id baked into the pressed component.
    pub action_id: String,
}

impl ComponentEvent {
    /// A press with no scope, channel or marker resolved.
    pub fn new(caller: Caller, message: impl Into<MessageId>, action_id: impl Into<String>) -> Self {
        Self {
            caller,
            scope: None,
            channel: None,
            message: message.into(),
            message_author_is_bot: false,
            marker: None,
            action_id: action_id.into(),
        }
    }

    /// Binds the press to a scope.
    pub fn in_scope(mut self, scope: impl Into<ScopeId>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Records the originating channel.
    pub fn in_channel(mut self, channel: impl Into<ChannelId>) -> Self {
        self.channel = Some(channel.into());
        self
    }

    /// Marks the pressed message as service-authored.
    pub fn bot_authored(mut self) -> Self {
        self.message_author_is_bot = true;
        self
    }

    /// Attaches the rendered marker.
    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = Some(marker.into());
        self
    }
}

/// Any event the platform listener hands to the dispatcher.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    /// A slash-style command invocation.
    Command(CommandEvent),
    /// A UI-component press.
    Component(ComponentEvent),
    /// Platform noise the dispatcher has no interest in.
    Other,
}

impl From<CommandEvent> for InboundEvent {
    fn from(event: CommandEvent) -> Self {
        Self::Command(event)
    }
}

impl From<ComponentEvent> for InboundEvent {
    fn from(event: ComponentEvent) -> Self {
        Self::Component(event)
    }
}
