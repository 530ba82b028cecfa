//! Read model of a scope's stored configuration.

use crate::id::{ChannelId, MessageId, ScopeId, UserId};
use crate::permissions::Permissions;

/// Channel wiring for one section of a scope.
///
/// A scope always has a root section and may carve out further sections,
/// each with its own verification surface and control panel.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SectionChannels {
    /// Where this section's verification prompts are rendered.
    pub verification_channel: Option<ChannelId>,
    /// This section's control panel, reserved for a higher-trust interaction
    /// surface the component chain never touches.
    pub control_panel_channel: Option<ChannelId>,
}

impl SectionChannels {
    /// Wiring with no channels configured.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the verification channel.
    pub fn with_verification(mut self, channel: impl Into<ChannelId>) -> Self {
        self.verification_channel = Some(channel.into());
        self
    }

    /// Sets the control panel channel.
    pub fn with_control_panel(mut self, channel: impl Into<ChannelId>) -> Self {
        self.control_panel_channel = Some(channel.into());
        self
    }
}

/// A recorded manual-verification prompt awaiting reviewer action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ManualVerifyEntry {
    /// Channel the prompt was rendered into.
    pub channel: ChannelId,
    /// The prompt message itself.
    pub message: MessageId,
    /// The member awaiting verification.
    pub user: UserId,
}

/// Which verification surface a channel belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerificationSection {
    /// The scope's root verification channel.
    Root,
    /// A carved-out section, by index into [`ScopeSnapshot::sections`].
    Section(usize),
}

/// Read-only snapshot of one scope's stored configuration, as served by the
/// storage collaborator. The dispatcher consults it and never writes back.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeSnapshot {
    /// The scope this snapshot describes.
    pub scope: ScopeId,
    /// Command codes the scope has explicitly disabled.
    pub blocked_commands: Vec<String>,
    /// Root section channel wiring.
    pub root: SectionChannels,
    /// Additional section channel wiring.
    pub sections: Vec<SectionChannels>,
    /// Where mailbox-origin messages are rendered.
    pub mailbox_channel: Option<ChannelId>,
    /// Outstanding manual-verification prompts.
    pub manual_verification: Vec<ManualVerifyEntry>,
    /// Permissions the service holds in this scope.
    pub service_permissions: Permissions,
}

impl ScopeSnapshot {
    /// An empty snapshot for the given scope.
    pub fn new(scope: impl Into<ScopeId>) -> Self {
        Self {
            scope: scope.into(),
            blocked_commands: Vec::new(),
            root: SectionChannels::default(),
            sections: Vec::new(),
            mailbox_channel: None,
            manual_verification: Vec::new(),
            service_permissions: Permissions::empty(),
        }
    }

    /// Disables a command code in this scope.
    pub fn block_command(mut self, code: impl Into<String>) -> Self {
        self.blocked_commands.push(code.into());
        self
    }

    /// Sets the root section wiring.
    pub fn with_root(mut self, root: SectionChannels) -> Self {
        self.root = root;
        self
    }

    /// Appends a section.
    pub fn with_section(mut self, section: SectionChannels) -> Self {
        self.sections.push(section);
        self
    }

    /// Sets the mailbox channel.
    pub fn with_mailbox(mut self, channel: impl Into<ChannelId>) -> Self {
        self.mailbox_channel = Some(channel.into());
        self
    }

    /// Records an outstanding manual-verification prompt.
    pub fn with_manual_entry(mut self, entry: ManualVerifyEntry) -> Self {
        self.manual_verification.push(entry);
        self
    }

    /// Sets the service-held permissions.
    pub fn with_service_permissions(mut self, permissions: Permissions) -> Self {
        self.service_permissions = permissions;
        self
    }

    /// Whether the scope has disabled the given command code.
    pub fn is_command_blocked(&self, code: &str) -> bool {
        self.blocked_commands.iter().any(|blocked| blocked == code)
    }

    /// All control panel channels, root section first.
    pub fn control_panel_channels(&self) -> impl Iterator<Item = ChannelId> + '_ {
        self.root
            .control_panel_channel
            .into_iter()
            .chain(self.sections.iter().filter_map(|s| s.control_panel_channel))
    }

    /// Resolves which verification surface a channel belongs to, if any.
    /// Root wins over sections when both claim the channel.
    pub fn verification_section(&self, channel: ChannelId) -> Option<VerificationSection> {
        if self.root.verification_channel == Some(channel) {
            return Some(VerificationSection::Root);
        }
        self.sections
            .iter()
            .position(|s| s.verification_channel == Some(channel))
            .map(VerificationSection::Section)
    }

    /// Looks up the manual-verification entry for an exact channel + message
    /// pair.
    pub fn manual_verification_entry(
        &self,
        channel: ChannelId,
        message: MessageId,
    ) -> Option<&ManualVerifyEntry> {
        self.manual_verification
            .iter()
            .find(|entry| entry.channel == channel && entry.message == message)
    }
}

#[cfg(test)]
mod tests {
    use super::{ManualVerifyEntry, ScopeSnapshot, SectionChannels, VerificationSection};
    use crate::id::{ChannelId, MessageId, UserId};

    fn snapshot() -> ScopeSnapshot {
        ScopeSnapshot::new(1u64)
            .with_root(
                SectionChannels::new()
                    .with_verification(10u64)
                    .with_control_panel(11u64),
            )
            .with_section(SectionChannels::new().with_verification(20u64))
            .with_section(SectionChannels::new().with_control_panel(31u64))
    }

    #[test]
    fn verification_lookup_prefers_root() {
        let snap = snapshot();
        assert_eq!(
            snap.verification_section(ChannelId(10)),
            Some(VerificationSection::Root)
        );
        assert_eq!(
            snap.verification_section(ChannelId(20)),
            Some(VerificationSection::Section(0))
        );
        assert_eq!(snap.verification_section(ChannelId(99)), None);
    }

    #[test]
    fn control_panels_cover_all_sections() {
        let panels: Vec<_> = snapshot().control_panel_channels().collect();
        assert_eq!(panels, vec![ChannelId(11), ChannelId(31)]);
    }

    #[test]
    fn manual_entry_requires_exact_pair() {
        let entry = ManualVerifyEntry {
            channel: ChannelId(5),
            message: MessageId(6),
            user: UserId(7),
        };
        let snap = snapshot().with_manual_entry(entry.clone());
        assert_eq!(
            snap.manual_verification_entry(ChannelId(5), MessageId(6)),
            Some(&entry)
        );
        assert_eq!(snap.manual_verification_entry(ChannelId(5), MessageId(7)), None);
        assert_eq!(snap.manual_verification_entry(ChannelId(6), MessageId(6)), None);
    }

    #[test]
    fn block_list_matches_codes() {
        let snap = ScopeSnapshot::new(1u64).block_command("parse_run");
        assert!(snap.is_command_blocked("parse_run"));
        assert!(!snap.is_command_blocked("parse"));
    }
}
