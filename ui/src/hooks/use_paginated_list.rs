use std::future::Future;
use std::rc::Rc;

use fetch_state::{Fetch, Invalidate, ListConfig, ListController, ListView};
use payloads::{Envelope, ListQuery, PaginatedResult};
use yew::platform::spawn_local;
use yew::prelude::*;

/// A list controller owned by the calling component, with the view it
/// rendered from.
pub struct ListHandle<T> {
    pub controller: Rc<ListController<T>>,
    pub view: ListView<T>,
}

impl<T: Clone> Clone for ListHandle<T> {
    fn clone(&self) -> Self {
        Self {
            controller: self.controller.clone(),
            view: self.view.clone(),
        }
    }
}

impl<T: 'static> ListHandle<T> {
    /// Apply an operation and drive the fetch it starts, if any.
    ///
    /// ```ignore
    /// let on_next = {
    ///     let list = list.clone();
    ///     Callback::from(move |_| list.run(ListController::next_page))
    /// };
    /// ```
    pub fn run(&self, operation: impl FnOnce(&ListController<T>) -> Fetch) {
        spawn_local(operation(&self.controller));
    }

    pub fn callback<E>(
        &self,
        operation: impl Fn(&ListController<T>) -> Fetch + 'static,
    ) -> Callback<E> {
        let controller = self.controller.clone();
        Callback::from(move |_| spawn_local(operation(&controller)))
    }

    /// The list as a mutation target.
    pub fn invalidate_target(&self) -> Rc<dyn Invalidate> {
        self.controller.clone()
    }
}

/// Keep a paginated list for the calling component and fetch its first page
/// on mount. Later fetches happen only through the controller's operations.
#[hook]
pub fn use_paginated_list<T, F, Fut>(config: ListConfig, fetcher: F) -> ListHandle<T>
where
    T: Clone + 'static,
    F: Fn(ListQuery) -> Fut + 'static,
    Fut: Future<Output = Envelope<PaginatedResult<T>>> + 'static,
{
    let controller = use_memo((), move |_| ListController::new(config, fetcher));

    {
        let controller = controller.clone();
        super::use_rerender_on(move |listener| {
            let subscription = controller.subscribe(listener);
            spawn_local(controller.start());
            subscription
        });
    }

    ListHandle {
        view: controller.view(),
        controller,
    }
}
