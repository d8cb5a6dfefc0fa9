//! Request lifecycle state for the dashboards.
//!
//! - [`Resource`] wraps one async call with loading/success/error state and
//!   an `execute`/`reset` pair, optionally re-running when its key changes.
//! - [`Mutation`] does the same for create/update/delete calls and refetches
//!   whatever it [`invalidates`](Mutation::invalidates) once the call
//!   succeeds.
//! - [`ListController`] keeps draft and applied filters plus the page
//!   descriptor of a list view and turns them into exactly one fetch per
//!   change.
//!
//! Everything here is single-threaded. Operations that perform I/O return a
//! future; state transitions happen synchronously when the operation is
//! called, and the caller decides how to drive the future (`spawn_local` in
//! the browser, `.await` in tests).

pub mod debounce;
pub mod list;
pub mod listeners;
pub mod mutation;
pub mod resource;
pub mod state;

pub use debounce::Debouncer;
pub use list::{ListConfig, ListController, ListView, Trigger};
pub use listeners::Subscription;
pub use mutation::Mutation;
pub use resource::{Invalidate, Resource, ResourceOptions, Supersession};
pub use state::RequestState;

use futures::future::LocalBoxFuture;

/// A pending fetch. State has already moved to loading when this is
/// returned; polling it to completion applies the response.
pub type Fetch = LocalBoxFuture<'static, ()>;

pub(crate) fn done() -> Fetch {
    Box::pin(futures::future::ready(()))
}
