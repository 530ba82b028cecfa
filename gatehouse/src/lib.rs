//! # gatehouse — admission-controlled event dispatch
//!
//! `gatehouse` is the inbound-event dispatch core of an interactive chat
//! service: it receives slash-style command invocations and UI-component
//! presses from a platform listener and routes each to the right handler
//! while enforcing cooldowns, per-scope concurrency ceilings,
//! at-most-one-run-per-user exclusivity, and permission gates.
//!
//! # Architecture
//!
//! Leaf components first, each independently testable:
//!
//! - [`CooldownTracker`] — per-user, per-command timestamp ledger.
//! - [`ActiveRunRegistry`] — per-command set of currently-executing
//!   (user, scope) pairs; the one place mutual exclusion matters. Admission
//!   hands out a [`RunGuard`] whose `Drop` is the release.
//! - [`permit::evaluate`] — pure permission evaluation, ANY-of caller
//!   requirements and ALL-of service requirements.
//! - [`CommandRegistry`] — invocation name to (spec, handler), validated at
//!   startup.
//! - [`Dispatcher`] — the entry point: the fixed command admission pipeline
//!   and the ordered component rule chain, with every external subsystem
//!   injected behind a `gatehouse-core` trait.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use gatehouse::{CommandRegistryBuilder, Dispatcher, DispatchConfig};
//! use gatehouse_core::{CommandContext, CommandSpec};
//! use std::time::Duration;
//!
//! let mut commands = CommandRegistryBuilder::new();
//! commands.register(
//!     CommandSpec::builder("parse_run", "parse")
//!         .cooldown(Duration::from_secs(30))
//!         .scope_required()
//!         .max_concurrent_per_scope(1)
//!         .build(),
//!     |ctx: CommandContext| async move {
//!         // business logic
//!         Ok(())
//!     },
//! )?;
//!
//! let dispatcher = Dispatcher::builder()
//!     .commands(commands.build())
//!     .config(DispatchConfig::from_json(&raw_config)?)
//!     .scopes(storage)
//!     .verification(verify_manager)
//!     .sessions(session_map)
//!     .mailbox(mailbox_manager)
//!     .responder(platform_replies)
//!     .build()?;
//!
//! dispatcher.dispatch(event).await;
//! ```

#![deny(clippy::wildcard_imports)]
#![warn(missing_docs)]

pub use gatehouse_core;

pub mod active;
pub mod component;
pub mod config;
pub mod cooldown;
pub mod permit;
pub mod registry;
pub mod router;
pub mod testing;

pub use active::{ActiveRunRegistry, RunGuard};
pub use component::MailboxAction;
pub use config::DispatchConfig;
pub use cooldown::CooldownTracker;
pub use registry::{CommandRegistry, CommandRegistryBuilder, RegisteredCommand};
pub use router::{Dispatcher, DispatcherBuildError, DispatcherBuilder};
