use std::future::Future;
use std::rc::Rc;

use fetch_state::{Invalidate, Mutation, RequestState};
use payloads::Envelope;
use yew::platform::spawn_local;
use yew::prelude::*;

pub struct MutationHandle<A, T> {
    pub mutation: Rc<Mutation<A, T>>,
    pub state: RequestState<T>,
}

impl<A, T: Clone> Clone for MutationHandle<A, T> {
    fn clone(&self) -> Self {
        Self {
            mutation: self.mutation.clone(),
            state: self.state.clone(),
        }
    }
}

impl<A: 'static, T: 'static> MutationHandle<A, T> {
    /// Run the mutation in the background. Failures stay in `state` until
    /// [`reset`](Self::reset) or the next run.
    pub fn run(&self, args: A) {
        let execution = self.mutation.execute(args);
        spawn_local(async move {
            execution.await;
        });
    }

    pub fn reset(&self) {
        self.mutation.reset();
    }
}

/// A create/update/delete call owned by the calling component. Every entry
/// in `invalidates` is refetched after each successful call.
#[hook]
pub fn use_mutation<A, T, F, Fut>(
    fetcher: F,
    invalidates: Vec<Rc<dyn Invalidate>>,
) -> MutationHandle<A, T>
where
    A: 'static,
    T: Clone + 'static,
    F: Fn(A) -> Fut + 'static,
    Fut: Future<Output = Envelope<T>> + 'static,
{
    let mutation = use_memo((), move |_| {
        let mutation = Mutation::new(fetcher);
        for target in invalidates {
            mutation.invalidates(target);
        }
        mutation
    });

    {
        let mutation = mutation.clone();
        super::use_rerender_on(move |listener| mutation.subscribe(listener));
    }

    MutationHandle {
        state: mutation.state(),
        mutation,
    }
}
