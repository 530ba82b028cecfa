//! The actor behind an inbound event.

use crate::id::UserId;
use crate::permissions::Permissions;

/// The resolved actor behind an inbound event: identity plus the roles and
/// permissions they hold in the originating scope.
#[derive(Debug, Clone)]
pub struct Caller {
    /// Platform identity.
    pub id: UserId,
    /// Display name, used only for logging.
    pub display_name: String,
    /// Role names held in the originating scope.
    pub roles: Vec<String>,
    /// Permissions held in the originating scope.
    pub permissions: Permissions,
    /// Whether the actor is an automated account.
    pub is_bot: bool,
}

impl Caller {
    /// A caller with no roles or permissions.
    pub fn new(id: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            roles: Vec::new(),
            permissions: Permissions::empty(),
            is_bot: false,
        }
    }

    /// Adds a held role name.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.push(role.into());
        self
    }

    /// Replaces the held permission set.
    pub fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }

    /// Marks the caller as an automated account.
    pub fn as_bot(mut self) -> Self {
        self.is_bot = true;
        self
    }
}
