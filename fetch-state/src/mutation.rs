use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::future::{LocalBoxFuture, join_all};
use payloads::Envelope;

use crate::RequestState;
use crate::listeners::Subscription;
use crate::resource::{Invalidate, Supersession, Tracker};

type Fetcher<A, T> = Rc<dyn Fn(A) -> LocalBoxFuture<'static, Envelope<T>>>;

/// A create/update/delete call that refreshes dependent views.
///
/// On success every registered target is refetched, and `execute` resolves
/// only once those refetches finish, so a caller that awaits it sees fresh
/// lists. Errors stay in the state until `reset` or the next `execute`.
pub struct Mutation<A, T> {
    tracker: Tracker<T>,
    fetcher: Fetcher<A, T>,
    targets: Rc<RefCell<Vec<Rc<dyn Invalidate>>>>,
}

impl<A, T> Clone for Mutation<A, T> {
    fn clone(&self) -> Self {
        Self {
            tracker: self.tracker.clone(),
            fetcher: self.fetcher.clone(),
            targets: self.targets.clone(),
        }
    }
}

impl<A: 'static, T: 'static> Mutation<A, T> {
    pub fn new<F, Fut>(fetcher: F) -> Self
    where
        F: Fn(A) -> Fut + 'static,
        Fut: Future<Output = Envelope<T>> + 'static,
    {
        Self {
            tracker: Tracker::new(Supersession::Latest),
            fetcher: Rc::new(move |args| Box::pin(fetcher(args))),
            targets: Rc::default(),
        }
    }

    /// Refetch `target` after every successful execution.
    pub fn invalidates(&self, target: impl Invalidate + 'static) -> &Self {
        self.targets.borrow_mut().push(Rc::new(target));
        self
    }

    /// Run the mutation, then refresh the registered targets. Resolves to
    /// whether the mutation succeeded.
    pub fn execute(&self, args: A) -> LocalBoxFuture<'static, bool> {
        let ticket = self.tracker.begin();
        let response = (self.fetcher)(args);
        let tracker = self.tracker.clone();
        let targets = self.targets.clone();
        Box::pin(async move {
            let envelope = response.await;
            let success = envelope.is_success();
            if let Some(error) = envelope.error() {
                tracing::warn!("Mutation failed: {error}");
            }
            tracker.finish(ticket, envelope);
            if success {
                // The backend changed even if a newer execution superseded
                // this one, so the targets are stale either way.
                let refetches: Vec<_> = targets
                    .borrow()
                    .iter()
                    .map(|target| target.invalidate())
                    .collect();
                join_all(refetches).await;
            }
            success
        })
    }

    pub fn reset(&self) {
        self.tracker.reset();
    }

    pub fn with_state<R>(&self, f: impl FnOnce(&RequestState<T>) -> R) -> R {
        self.tracker.with_state(f)
    }

    pub fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.tracker.subscribe(listener)
    }
}

impl<A: 'static, T: Clone + 'static> Mutation<A, T> {
    pub fn state(&self) -> RequestState<T> {
        self.with_state(Clone::clone)
    }
}
