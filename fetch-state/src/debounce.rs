use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use payloads::time;

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(500);

/// Collapses a burst of values into the last one.
///
/// Each call to [`schedule`](Debouncer::schedule) cancels the previous one.
/// The returned future resolves to `Some(value)` only if no newer value was
/// scheduled during the quiet period.
#[derive(Clone)]
pub struct Debouncer {
    quiet_period: Duration,
    generation: Rc<Cell<u64>>,
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_PERIOD)
    }
}

impl Debouncer {
    pub fn new(quiet_period: Duration) -> Self {
        Self {
            quiet_period,
            generation: Rc::new(Cell::new(0)),
        }
    }

    pub fn quiet_period(&self) -> Duration {
        self.quiet_period
    }

    pub fn schedule<V: 'static>(&self, value: V) -> LocalBoxFuture<'static, Option<V>> {
        let ticket = self.generation.get() + 1;
        self.generation.set(ticket);
        let generation = self.generation.clone();
        let quiet_period = self.quiet_period;
        Box::pin(async move {
            time::sleep(quiet_period).await;
            (generation.get() == ticket).then_some(value)
        })
    }

    /// Drop whatever is pending.
    pub fn cancel(&self) {
        self.generation.set(self.generation.get() + 1);
    }
}
