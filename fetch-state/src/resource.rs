use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use futures::future::LocalBoxFuture;
use payloads::Envelope;

use crate::listeners::{Listeners, Subscription};
use crate::{Fetch, RequestState, done};

/// What happens when executions overlap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Supersession {
    /// Only the most recently started execution may update state. Responses
    /// from older executions, or from before a `reset`, are discarded.
    #[default]
    Latest,
    /// Whichever response resolves last wins, even if it belongs to an older
    /// execution.
    LastResolved,
}

#[derive(Debug, Clone, Copy)]
pub struct ResourceOptions {
    /// Execute as soon as the key becomes defined, and again whenever it
    /// changes.
    pub immediate: bool,
    pub supersession: Supersession,
}

impl Default for ResourceOptions {
    fn default() -> Self {
        Self {
            immediate: true,
            supersession: Supersession::Latest,
        }
    }
}

/// Something whose data can go stale after a mutation.
pub trait Invalidate {
    /// Fetch fresh data.
    fn invalidate(&self) -> Fetch;
}

impl<I: Invalidate + ?Sized> Invalidate for Rc<I> {
    fn invalidate(&self) -> Fetch {
        (**self).invalidate()
    }
}

struct TrackerInner<T> {
    state: RequestState<T>,
    generation: u64,
}

/// Request state plus the sequence number used to recognise stale
/// responses.
pub(crate) struct Tracker<T> {
    inner: Rc<RefCell<TrackerInner<T>>>,
    listeners: Listeners,
    supersession: Supersession,
}

impl<T> Clone for Tracker<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
            listeners: self.listeners.clone(),
            supersession: self.supersession,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Ticket(u64);

impl<T> Tracker<T> {
    pub(crate) fn new(supersession: Supersession) -> Self {
        Self {
            inner: Rc::new(RefCell::new(TrackerInner {
                state: RequestState::idle(),
                generation: 0,
            })),
            listeners: Listeners::default(),
            supersession,
        }
    }

    pub(crate) fn begin(&self) -> Ticket {
        let ticket = {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.state.begin();
            Ticket(inner.generation)
        };
        self.listeners.notify();
        ticket
    }

    /// Apply a response. Returns false if it was discarded as stale.
    pub(crate) fn finish(&self, ticket: Ticket, envelope: Envelope<T>) -> bool {
        {
            let mut inner = self.inner.borrow_mut();
            if self.supersession == Supersession::Latest
                && ticket.0 != inner.generation
            {
                tracing::debug!(
                    "Discarding stale response {} (latest is {})",
                    ticket.0,
                    inner.generation
                );
                return false;
            }
            match envelope {
                Envelope::Ok { data, .. } => inner.state.succeed(data),
                Envelope::Err(e) => inner.state.fail(e),
            }
        }
        self.listeners.notify();
        true
    }

    pub(crate) fn reset(&self) {
        {
            let mut inner = self.inner.borrow_mut();
            inner.generation += 1;
            inner.state.reset();
        }
        self.listeners.notify();
    }

    pub(crate) fn with_state<R>(&self, f: impl FnOnce(&RequestState<T>) -> R) -> R {
        f(&self.inner.borrow().state)
    }

    pub(crate) fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        self.listeners.subscribe(listener)
    }
}

type Fetcher<K, T> = Rc<dyn Fn(K) -> LocalBoxFuture<'static, Envelope<T>>>;

/// A re-triggerable async call with observable request state.
///
/// The key is whatever the call depends on (an id, a query). An unkeyed
/// resource uses `()` and is always ready to execute. There is no retry or
/// backoff: a failed fetch stays failed until `execute` is called again.
pub struct Resource<K, T> {
    tracker: Tracker<T>,
    key: Rc<RefCell<Option<K>>>,
    fetcher: Fetcher<K, T>,
    options: ResourceOptions,
}

impl<K, T> Clone for Resource<K, T> {
    fn clone(&self) -> Self {
        Self {
            tracker: self.tracker.clone(),
            key: self.key.clone(),
            fetcher: self.fetcher.clone(),
            options: self.options,
        }
    }
}

impl<T: 'static> Resource<(), T> {
    /// A resource with no key. It stays idle until [`start`](Resource::start)
    /// (honouring `immediate`) or [`execute`](Resource::execute) is driven.
    pub fn new<F, Fut>(fetcher: F, options: ResourceOptions) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Envelope<T>> + 'static,
    {
        let resource = Self::keyed(move |()| fetcher(), options);
        *resource.key.borrow_mut() = Some(());
        resource
    }
}

impl<K: Clone + PartialEq + 'static, T: 'static> Resource<K, T> {
    /// A resource whose fetch depends on a key. Nothing is fetched until
    /// the key is set.
    pub fn keyed<F, Fut>(fetcher: F, options: ResourceOptions) -> Self
    where
        F: Fn(K) -> Fut + 'static,
        Fut: Future<Output = Envelope<T>> + 'static,
    {
        Self {
            tracker: Tracker::new(options.supersession),
            key: Rc::new(RefCell::new(None)),
            fetcher: Rc::new(move |key| Box::pin(fetcher(key))),
            options,
        }
    }

    pub fn key(&self) -> Option<K> {
        self.key.borrow().clone()
    }

    /// Update the key. With `immediate`, a change to a defined key starts
    /// exactly one execution; setting the same key again does nothing.
    pub fn set_key(&self, key: Option<K>) -> Fetch {
        let changed = {
            let mut current = self.key.borrow_mut();
            if *current == key {
                false
            } else {
                *current = key;
                true
            }
        };
        if changed && self.options.immediate && self.key.borrow().is_some() {
            self.execute()
        } else {
            done()
        }
    }

    /// The fetch due on mount: one execution when `immediate` is set and the
    /// key is defined, nothing otherwise.
    pub fn start(&self) -> Fetch {
        if self.options.immediate {
            self.execute()
        } else {
            done()
        }
    }

    /// Start the call. State moves to loading immediately; the response is
    /// applied when the returned future completes. Does nothing while the
    /// key is unset.
    pub fn execute(&self) -> Fetch {
        let Some(key) = self.key() else {
            return done();
        };
        let ticket = self.tracker.begin();
        let response = (self.fetcher)(key);
        let tracker = self.tracker.clone();
        Box::pin(async move {
            let envelope = response.await;
            tracker.finish(ticket, envelope);
        })
    }

    /// Back to idle. Under [`Supersession::Latest`] any execution still in
    /// flight will no longer update state.
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

impl<K: Clone + PartialEq + 'static, T: Clone + 'static> Resource<K, T> {
    pub fn state(&self) -> RequestState<T> {
        self.with_state(Clone::clone)
    }
}

impl<K: Clone + PartialEq + 'static, T: 'static> Invalidate for Resource<K, T> {
    fn invalidate(&self) -> Fetch {
        self.execute()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::channel::oneshot;
    use futures::poll;
    use payloads::ClientError;
    use std::cell::Cell;
    use std::task::Poll;

    type Pending = Rc<RefCell<Vec<Option<oneshot::Sender<Envelope<&'static str>>>>>>;

    /// A resource whose responses are released by the test, in any order.
    fn controlled(supersession: Supersession) -> (Resource<(), &'static str>, Pending) {
        let pending: Pending = Rc::default();
        let queue = pending.clone();
        let resource = Resource::new(
            move || {
                let (tx, rx) = oneshot::channel();
                queue.borrow_mut().push(Some(tx));
                async move {
                    rx.await
                        .unwrap_or(Envelope::Err(ClientError::Network("dropped".into())))
                }
            },
            ResourceOptions {
                immediate: true,
                supersession,
            },
        );
        (resource, pending)
    }

    fn respond(pending: &Pending, index: usize, data: &'static str) {
        let tx = pending.borrow_mut()[index]
            .take()
            .expect("request was not issued");
        let _ = tx.send(Envelope::ok(data));
    }

    #[tokio::test]
    async fn execute_moves_through_loading_to_success() {
        let (resource, pending) = controlled(Supersession::Latest);
        assert!(resource.state().is_idle());

        let mut fetch = resource.execute();
        assert!(resource.state().is_loading());
        assert_eq!(poll!(fetch.as_mut()), Poll::Pending);

        respond(&pending, 0, "stores");
        fetch.await;
        let state = resource.state();
        assert!(state.is_success());
        assert_eq!(state.data(), Some(&"stores"));
    }

    #[tokio::test]
    async fn stale_response_is_discarded_under_latest() {
        let (resource, pending) = controlled(Supersession::Latest);
        let mut first = resource.execute();
        let mut second = resource.execute();
        assert_eq!(poll!(first.as_mut()), Poll::Pending);
        assert_eq!(poll!(second.as_mut()), Poll::Pending);

        respond(&pending, 1, "filter B");
        second.await;
        respond(&pending, 0, "filter A");
        first.await;

        assert_eq!(resource.state().data(), Some(&"filter B"));
    }

    #[tokio::test]
    async fn last_resolved_wins_when_configured() {
        let (resource, pending) = controlled(Supersession::LastResolved);
        let mut first = resource.execute();
        let mut second = resource.execute();
        assert_eq!(poll!(first.as_mut()), Poll::Pending);
        assert_eq!(poll!(second.as_mut()), Poll::Pending);

        respond(&pending, 1, "filter B");
        second.await;
        respond(&pending, 0, "filter A");
        first.await;

        assert_eq!(resource.state().data(), Some(&"filter A"));
    }

    #[tokio::test]
    async fn reset_drops_in_flight_response() {
        let (resource, pending) = controlled(Supersession::Latest);
        let mut fetch = resource.execute();
        assert_eq!(poll!(fetch.as_mut()), Poll::Pending);
        resource.reset();
        respond(&pending, 0, "late");
        fetch.await;
        assert!(resource.state().is_idle());
    }

    #[tokio::test]
    async fn failure_stays_until_executed_again() {
        let calls = Rc::new(Cell::new(0));
        let resource = {
            let calls = calls.clone();
            Resource::new(
                move || {
                    calls.set(calls.get() + 1);
                    let attempt = calls.get();
                    async move {
                        if attempt == 1 {
                            Envelope::Err(ClientError::Timeout)
                        } else {
                            Envelope::ok(attempt)
                        }
                    }
                },
                ResourceOptions::default(),
            )
        };
        resource.execute().await;
        assert_eq!(resource.state().error_message().as_deref(), Some("Request timeout"));
        assert_eq!(resource.state().data(), None);
        assert_eq!(calls.get(), 1);

        resource.execute().await;
        assert_eq!(resource.state().data(), Some(&2));
    }

    #[tokio::test]
    async fn keyed_resource_fetches_once_per_key_change() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let resource = {
            let calls = calls.clone();
            Resource::keyed(
                move |id: i64| {
                    calls.borrow_mut().push(id);
                    async move { Envelope::ok(id * 10) }
                },
                ResourceOptions::default(),
            )
        };

        resource.execute().await;
        assert!(calls.borrow().is_empty());

        resource.set_key(Some(1)).await;
        resource.set_key(Some(1)).await;
        resource.set_key(Some(2)).await;
        resource.set_key(None).await;
        assert_eq!(*calls.borrow(), vec![1, 2]);
        assert_eq!(resource.state().data(), Some(&20));
    }

    #[tokio::test]
    async fn keyed_resource_without_immediate_waits_for_execute() {
        let calls = Rc::new(Cell::new(0));
        let resource = {
            let calls = calls.clone();
            Resource::keyed(
                move |id: i64| {
                    calls.set(calls.get() + 1);
                    async move { Envelope::ok(id) }
                },
                ResourceOptions {
                    immediate: false,
                    ..Default::default()
                },
            )
        };
        resource.set_key(Some(5)).await;
        assert_eq!(calls.get(), 0);
        resource.execute().await;
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn listeners_see_every_transition() {
        let (resource, pending) = controlled(Supersession::Latest);
        let seen = Rc::new(RefCell::new(Vec::new()));
        let _subscription = {
            let seen = seen.clone();
            let observed = resource.clone();
            resource.subscribe(Rc::new(move || {
                seen.borrow_mut().push(observed.state().is_loading())
            }))
        };
        let fetch = resource.execute();
        respond(&pending, 0, "done");
        fetch.await;
        resource.reset();
        assert_eq!(*seen.borrow(), vec![true, false, false]);
    }

    fn counting(calls: &Rc<Cell<u32>>, immediate: bool) -> Resource<(), u32> {
        let calls = calls.clone();
        Resource::new(
            move || {
                calls.set(calls.get() + 1);
                let attempt = calls.get();
                async move { Envelope::ok(attempt) }
            },
            ResourceOptions {
                immediate,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn start_executes_only_when_immediate() {
        let calls = Rc::new(Cell::new(0));
        let eager = counting(&calls, true);
        assert!(eager.state().is_idle());
        eager.start().await;
        assert_eq!(calls.get(), 1);
        assert_eq!(eager.state().data(), Some(&1));

        let lazy_calls = Rc::new(Cell::new(0));
        let lazy = counting(&lazy_calls, false);
        lazy.start().await;
        assert_eq!(lazy_calls.get(), 0);
        assert!(lazy.state().is_idle());
        lazy.execute().await;
        assert_eq!(lazy_calls.get(), 1);
    }

    #[tokio::test]
    async fn start_waits_for_a_key() {
        let calls = Rc::new(Cell::new(0));
        let resource = {
            let calls = calls.clone();
            Resource::keyed(
                move |id: i64| {
                    calls.set(calls.get() + 1);
                    async move { Envelope::ok(id) }
                },
                ResourceOptions::default(),
            )
        };
        resource.start().await;
        assert_eq!(calls.get(), 0);
        assert!(resource.state().is_idle());
    }

    #[tokio::test]
    async fn reset_twice_gives_the_same_idle_state() {
        let (resource, pending) = controlled(Supersession::Latest);
        let fetch = resource.execute();
        respond(&pending, 0, "done");
        fetch.await;
        assert!(resource.state().is_success());

        resource.reset();
        let once = resource.state();
        resource.reset();
        assert_eq!(resource.state(), once);
        assert_eq!(once, RequestState::idle());

        // a reset during an in-flight execution lands in the same state
        let mut fetch = resource.execute();
        assert_eq!(poll!(fetch.as_mut()), Poll::Pending);
        resource.reset();
        resource.reset();
        respond(&pending, 1, "late");
        fetch.await;
        assert_eq!(resource.state(), once);
    }
}
