use std::cell::RefCell;
use std::rc::{Rc, Weak};

type Listener = Rc<dyn Fn()>;

#[derive(Default)]
struct ListenerSet {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

/// Change callbacks, used by views to re-render.
#[derive(Clone, Default)]
pub(crate) struct Listeners {
    inner: Rc<RefCell<ListenerSet>>,
}

impl Listeners {
    pub(crate) fn subscribe(&self, listener: Listener) -> Subscription {
        let id = {
            let mut set = self.inner.borrow_mut();
            set.next_id += 1;
            let id = set.next_id;
            set.listeners.push((id, listener));
            id
        };
        let weak: Weak<RefCell<ListenerSet>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(set) = weak.upgrade() {
                set.borrow_mut().listeners.retain(|(other, _)| *other != id);
            }
        })
    }

    /// Call every listener. Listeners are free to read state or subscribe
    /// while being notified.
    pub(crate) fn notify(&self) {
        let listeners: Vec<Listener> = self
            .inner
            .borrow()
            .listeners
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect();
        for listener in listeners {
            listener();
        }
    }
}

/// Keeps a listener registered until dropped.
#[must_use = "the listener is removed when the subscription is dropped"]
pub struct Subscription {
    unsubscribe: Vec<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(unsubscribe: impl FnOnce() + 'static) -> Self {
        Self {
            unsubscribe: vec![Box::new(unsubscribe)],
        }
    }

    /// One subscription that releases all of `parts` when dropped.
    pub fn combine(parts: impl IntoIterator<Item = Subscription>) -> Self {
        let mut unsubscribe = Vec::new();
        for mut part in parts {
            unsubscribe.append(&mut part.unsubscribe);
        }
        Self { unsubscribe }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        for unsubscribe in self.unsubscribe.drain(..) {
            unsubscribe();
        }
    }
}
