//! Command handler traits.

use crate::command::CommandContext;
use crate::error::BoxError;
use crate::gateway::BoxFuture;
use std::future::Future;

/// The business-logic endpoint for one command.
///
/// Handlers receive a fully owned [`CommandContext`] once admission has been
/// granted. An `Err` is caught at the dispatcher boundary, logged and
/// swallowed; it never reaches the caller-facing surface and never skips the
/// active-run release.
///
/// Plain async closures implement this trait directly:
///
/// ```rust,ignore
/// registry.register(spec, |ctx: CommandContext| async move {
///     // business logic
///     Ok(())
/// })?;
/// ```
#[diagnostic::on_unimplemented(
    message = "`{Self}` is not a `CommandHandler`",
    label = "missing `CommandHandler` implementation",
    note = "Implement `run`, or use an async closure taking a `CommandContext`."
)]
pub trait CommandHandler: Send + Sync + 'static {
    /// Executes the command.
    fn run(&self, ctx: CommandContext) -> impl Future<Output = Result<(), BoxError>> + Send;
}

/// Object-safe form of [`CommandHandler`], as stored in the command registry.
pub trait DynCommandHandler: Send + Sync + 'static {
    /// Executes the command (dynamic dispatch version).
    fn run_dyn(&self, ctx: CommandContext) -> BoxFuture<'_, Result<(), BoxError>>;
}

impl<T: CommandHandler> DynCommandHandler for T {
    fn run_dyn(&self, ctx: CommandContext) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(self.run(ctx))
    }
}

// Blanket impl for closures
impl<F, Fut> CommandHandler for F
where
    F: Fn(CommandContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    fn run(&self, ctx: CommandContext) -> impl Future<Output = Result<(), BoxError>> + Send {
        (self)(ctx)
    }
}
