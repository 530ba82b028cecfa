//! Platform permission sets.

bitflags::bitflags! {
    /// Permissions held by a caller, or granted to the service itself within
    /// a scope.
    ///
    /// Command specifications use this type twice with different semantics:
    /// caller requirements are ANY-of (holding one required flag satisfies
    /// the gate), service requirements are ALL-of (the service must hold
    /// every flag).
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Permissions: u32 {
        /// Full override; carries the elevated cooldown exemption.
        const ADMINISTRATOR = 1 << 0;
        /// Manage the scope's own settings.
        const MANAGE_SCOPE = 1 << 1;
        /// Create, edit and delete channels.
        const MANAGE_CHANNELS = 1 << 2;
        /// Assign and edit roles.
        const MANAGE_ROLES = 1 << 3;
        /// Delete or pin other callers' messages.
        const MANAGE_MESSAGES = 1 << 4;
        /// Create, archive and delete threads.
        const MANAGE_THREADS = 1 << 5;
        /// Remove members from the scope.
        const KICK_MEMBERS = 1 << 6;
        /// Permanently remove members from the scope.
        const BAN_MEMBERS = 1 << 7;
        /// Time out members.
        const MODERATE_MEMBERS = 1 << 8;
        /// Post messages.
        const SEND_MESSAGES = 1 << 9;
        /// Attach rich embeds to messages.
        const EMBED_LINKS = 1 << 10;
        /// Upload files.
        const ATTACH_FILES = 1 << 11;
        /// Add reactions to messages.
        const ADD_REACTIONS = 1 << 12;
        /// See the channel at all.
        const VIEW_CHANNEL = 1 << 13;
    }
}

impl Permissions {
    /// Names of the flags set in `self`, in declaration order.
    ///
    /// Feeds the itemized missing-requirement notices.
    pub fn names(self) -> Vec<String> {
        self.iter_names().map(|(name, _)| name.to_owned()).collect()
    }
}
