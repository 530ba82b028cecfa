//! User-facing admission rejection vocabulary.

use crate::verdict::PermissionVerdict;
use std::fmt;
use std::time::Duration;

/// An admission rejection, ready for the responder to render.
///
/// Every rejection the pipeline emits is specific and itemized; the only
/// silent outcomes are unknown command names and component-chain misses.
/// Rendering to platform UI is the responder's business; the `Display`
/// impl here serves logging.
#[derive(Debug, Clone, PartialEq)]
pub enum Notice {
    /// The caller must wait out their cooldown window.
    Cooldown {
        /// Time left before the next run is admitted.
        remaining: Duration,
    },
    /// The command only works inside a bound scope.
    ScopeRequired,
    /// The scope has explicitly disabled this command.
    CommandDisabled,
    /// The scope is at the command's concurrency ceiling.
    TooManyConcurrent {
        /// The configured ceiling.
        limit: u32,
    },
    /// The caller already has a running instance of this command.
    AlreadyRunning,
    /// The caller or the service is missing required permissions or roles.
    MissingRequirements(PermissionVerdict),
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cooldown { remaining } => {
                write!(f, "on cooldown for another {remaining:?}")
            }
            Self::ScopeRequired => write!(f, "command is not applicable here"),
            Self::CommandDisabled => write!(f, "command is disabled in this scope"),
            Self::TooManyConcurrent { limit } => {
                write!(f, "too many concurrent users (limit {limit})")
            }
            Self::AlreadyRunning => write!(f, "command is already running for this caller"),
            Self::MissingRequirements(verdict) => {
                write!(f, "missing requirements:")?;
                if !verdict.missing_caller_permissions.is_empty() {
                    write!(
                        f,
                        " caller permissions (need >= 1) [{}]",
                        verdict.missing_caller_permissions.join(", ")
                    )?;
                }
                if !verdict.missing_caller_roles.is_empty() {
                    write!(
                        f,
                        " caller roles (need >= 1) [{}]",
                        verdict.missing_caller_roles.join(", ")
                    )?;
                }
                if !verdict.missing_service_permissions.is_empty() {
                    write!(
                        f,
                        " service permissions (need all) [{}]",
                        verdict.missing_service_permissions.join(", ")
                    )?;
                }
                Ok(())
            }
        }
    }
}
