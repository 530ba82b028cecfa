//! Permission evaluation outcomes.

/// Outcome of evaluating one caller against one command's requirements.
///
/// The only success shape is `can_run == true` with every missing set empty;
/// any non-empty set implies `can_run == false`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionVerdict {
    /// Whether the caller may run the command.
    pub can_run: bool,
    /// Whether the caller passed via the elevated override (operator
    /// allow-list or administrator permission). Elevated callers are exempt
    /// from cooldown charging.
    pub has_elevated_override: bool,
    /// Caller permissions that would have satisfied the ANY-of requirement.
    pub missing_caller_permissions: Vec<String>,
    /// Caller roles that would have satisfied the ANY-of requirement.
    pub missing_caller_roles: Vec<String>,
    /// Service permissions absent from the ALL-of requirement.
    pub missing_service_permissions: Vec<String>,
}

impl PermissionVerdict {
    /// A plain allow with no override.
    pub fn allowed() -> Self {
        Self {
            can_run: true,
            ..Self::default()
        }
    }

    /// An allow through the elevated override.
    pub fn elevated() -> Self {
        Self {
            can_run: true,
            has_elevated_override: true,
            ..Self::default()
        }
    }

    /// True when no requirement is missing.
    pub fn is_clean(&self) -> bool {
        self.missing_caller_permissions.is_empty()
            && self.missing_caller_roles.is_empty()
            && self.missing_service_permissions.is_empty()
    }
}
