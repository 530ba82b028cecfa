//! # gatehouse-core
//!
//! Contract types for the Gatehouse event dispatch core.
//!
//! This crate has minimal dependencies and is designed to be imported by the
//! stateful subsystems (verification, live sessions, mailbox) that plug into
//! the dispatcher without pulling in the full `gatehouse` engine.
//!
//! # What lives here
//!
//! - **Identity** ([`UserId`], [`ScopeId`], [`ChannelId`], [`MessageId`]):
//!   typed wrappers over platform snowflakes.
//! - **Events** ([`CommandEvent`], [`ComponentEvent`], [`InboundEvent`]): the
//!   inbound surface delivered by the platform listener.
//! - **Command contracts** ([`CommandSpec`], [`CommandHandler`],
//!   [`CommandContext`]): what a command declares and what its handler
//!   receives.
//! - **Admission vocabulary** ([`PermissionVerdict`], [`Notice`],
//!   [`AdmissionError`]): the outcomes the engine produces.
//! - **Scope read model** ([`ScopeSnapshot`]): the slice of stored
//!   configuration the dispatcher consults.
//! - **Collaborator seams** ([`ScopeDirectory`], [`VerificationGateway`],
//!   [`SessionDirectory`], [`MailboxGateway`], [`Responder`]): the traits the
//!   surrounding service implements.
//!
//! # Static vs Dynamic Dispatch
//!
//! Async traits here use native `async`-style `impl Future` methods for
//! zero-cost static dispatch. Each has a `Dyn*` twin for runtime polymorphism
//! (registries, injected collaborators), with a blanket implementation so any
//! static implementation is usable dynamically for free.

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

mod caller;
mod command;
mod error;
mod event;
mod gateway;
mod handler;
mod id;
mod notice;
mod permissions;
mod scope;
mod verdict;

pub use caller::Caller;
pub use command::{CommandContext, CommandSpec, CommandSpecBuilder};
pub use error::{AdmissionError, BoxError, RegistryError};
pub use event::{CommandEvent, ComponentEvent, InboundEvent};
pub use gateway::{
    BoxFuture, DynMailboxGateway, DynResponder, DynScopeDirectory, DynSessionHandle,
    DynVerificationGateway, MailboxGateway, Responder, ScopeDirectory, SessionDirectory,
    SessionHandle, VerificationGateway,
};
pub use handler::{CommandHandler, DynCommandHandler};
pub use id::{ChannelId, MessageId, ScopeId, UserId};
pub use notice::Notice;
pub use permissions::Permissions;
pub use scope::{ManualVerifyEntry, ScopeSnapshot, SectionChannels, VerificationSection};
pub use verdict::PermissionVerdict;
