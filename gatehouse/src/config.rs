//! Deployment configuration for the dispatcher.

use gatehouse_core::{ScopeId, UserId};
use serde::Deserialize;
use std::collections::HashSet;

/// Static dispatch-time configuration, loaded once from the deployment
/// document and read-only afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Privileged operators: always pass permission evaluation and are never
    /// charged cooldowns.
    pub operator_ids: HashSet<UserId>,
    /// Scopes whose events are dropped outright.
    pub excluded_scopes: HashSet<ScopeId>,
}

impl DispatchConfig {
    /// Parses the JSON deployment document.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Whether the user is on the operator allow-list.
    pub fn is_operator(&self, user: UserId) -> bool {
        self.operator_ids.contains(&user)
    }

    /// Whether the scope is excluded from dispatch entirely.
    pub fn is_excluded_scope(&self, scope: ScopeId) -> bool {
        self.excluded_scopes.contains(&scope)
    }
}
