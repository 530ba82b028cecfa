//! Error types shared across the dispatch core.

use thiserror::Error;

/// A boxed error type for collaborator and handler boundaries.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Command registration failures.
///
/// These are startup errors: a duplicate registration is a programming
/// mistake surfaced when the registry is built, never at dispatch time.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// The invocable name is already taken.
    #[error("command name already registered: {0}")]
    DuplicateName(String),

    /// The unique command code is already taken.
    #[error("command code already registered: {0}")]
    DuplicateCode(String),
}

/// Why the active-run registry refused an acquisition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// The caller already holds a run of this command and the command does
    /// not allow multiple simultaneous runs per user.
    #[error("caller already has a running instance of this command")]
    AlreadyRunning,

    /// The scope is at the command's concurrency ceiling.
    #[error("scope is at the concurrency ceiling ({limit})")]
    ScopeAtCapacity {
        /// The configured ceiling.
        limit: u32,
    },
}
