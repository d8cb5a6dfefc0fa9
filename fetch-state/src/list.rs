use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use std::time::Duration;

use payloads::requests::PAGE_SIZE_MAX;
use payloads::{
    ClientError, Envelope, Filters, ListQuery, PageDescriptor, PaginatedResult,
    SortDirection,
};

use crate::debounce::{DEFAULT_QUIET_PERIOD, Debouncer};
use crate::listeners::{Listeners, Subscription};
use crate::resource::{Invalidate, Resource, ResourceOptions, Supersession};
use crate::{Fetch, RequestState, done};

#[derive(Debug, Clone)]
pub struct ListConfig {
    /// Page descriptor used on mount and restored by `clear`.
    pub default_page: PageDescriptor,
    /// Filter values that mean "no filter", e.g. `status=ALL`. They are
    /// left out of the query.
    pub filter_defaults: Filters,
    pub search_quiet_period: Duration,
    pub supersession: Supersession,
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            default_page: PageDescriptor::default(),
            filter_defaults: Filters::new(),
            search_quiet_period: DEFAULT_QUIET_PERIOD,
            supersession: Supersession::Latest,
        }
    }
}

/// Why the current fetch was issued. Views use it to pick between a full
/// loading overlay and a small page indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Trigger {
    #[default]
    Initial,
    Filter,
    Page,
    Refetch,
}

/// Everything a list page renders.
#[derive(Debug, Clone, PartialEq)]
pub struct ListView<T> {
    pub items: Vec<T>,
    pub total_items: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub page_size: u32,
    pub has_next: bool,
    pub has_previous: bool,
    pub loading: bool,
    pub error: Option<ClientError>,
    pub is_filter_pending: bool,
    pub is_page_pending: bool,
}

struct Controls {
    draft: Filters,
    applied: Filters,
    page: PageDescriptor,
    trigger: Trigger,
    started: bool,
}

/// Draft filters, applied filters and page descriptor of one list view,
/// turned into fetches.
///
/// Editing the draft never fetches. Every other operation computes the
/// query it implies and fetches only if that query differs from the last
/// one requested, so each effective change costs exactly one request.
pub struct ListController<T> {
    config: Rc<ListConfig>,
    controls: Rc<RefCell<Controls>>,
    resource: Resource<ListQuery, PaginatedResult<T>>,
    listeners: Listeners,
    debouncer: Debouncer,
}

impl<T> Clone for ListController<T> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            controls: self.controls.clone(),
            resource: self.resource.clone(),
            listeners: self.listeners.clone(),
            debouncer: self.debouncer.clone(),
        }
    }
}

impl<T: 'static> ListController<T> {
    pub fn new<F, Fut>(config: ListConfig, fetcher: F) -> Self
    where
        F: Fn(ListQuery) -> Fut + 'static,
        Fut: Future<Output = Envelope<PaginatedResult<T>>> + 'static,
    {
        let resource = Resource::keyed(
            fetcher,
            ResourceOptions {
                immediate: true,
                supersession: config.supersession,
            },
        );
        let controls = Controls {
            draft: config.filter_defaults.clone(),
            applied: config.filter_defaults.clone(),
            page: config.default_page.clone(),
            trigger: Trigger::Initial,
            started: false,
        };
        Self {
            debouncer: Debouncer::new(config.search_quiet_period),
            config: Rc::new(config),
            controls: Rc::new(RefCell::new(controls)),
            resource,
            listeners: Listeners::default(),
        }
    }

    /// Fetch the first page. Until this is called, operations only update
    /// the controls.
    pub fn start(&self) -> Fetch {
        self.controls.borrow_mut().started = true;
        self.sync(Trigger::Initial)
    }

    pub fn draft(&self) -> Filters {
        self.controls.borrow().draft.clone()
    }

    pub fn applied(&self) -> Filters {
        self.controls.borrow().applied.clone()
    }

    pub fn page_descriptor(&self) -> PageDescriptor {
        self.controls.borrow().page.clone()
    }

    /// The request the current controls imply.
    pub fn query(&self) -> ListQuery {
        let controls = self.controls.borrow();
        ListQuery::new(
            controls.applied.effective(&self.config.filter_defaults),
            controls.page.clone(),
        )
    }

    pub fn set_draft(&self, key: impl Into<String>, value: impl Into<String>) {
        self.controls.borrow_mut().draft.set(key, value);
        self.listeners.notify();
    }

    /// Copy the draft into the applied filters and go back to the first
    /// page.
    pub fn apply(&self) -> Fetch {
        self.debouncer.cancel();
        {
            let mut controls = self.controls.borrow_mut();
            controls.applied = controls.draft.clone();
            controls.page.page = 0;
        }
        self.sync(Trigger::Filter)
    }

    /// Restore default filters and the default page descriptor.
    pub fn clear(&self) -> Fetch {
        self.debouncer.cancel();
        {
            let mut controls = self.controls.borrow_mut();
            controls.draft = self.config.filter_defaults.clone();
            controls.applied = self.config.filter_defaults.clone();
            controls.page = self.config.default_page.clone();
        }
        self.sync(Trigger::Filter)
    }

    pub fn set_page(&self, page: u32) -> Fetch {
        self.controls.borrow_mut().page.page = page;
        self.sync(Trigger::Page)
    }

    pub fn next_page(&self) -> Fetch {
        let has_next = self
            .resource
            .with_state(|state| state.data().is_some_and(PaginatedResult::has_next));
        if !has_next {
            return done();
        }
        let page = self.controls.borrow().page.page;
        self.set_page(page + 1)
    }

    pub fn previous_page(&self) -> Fetch {
        let page = self.controls.borrow().page.page;
        if page == 0 {
            return done();
        }
        self.set_page(page - 1)
    }

    pub fn set_page_size(&self, size: u32) -> Fetch {
        {
            let mut controls = self.controls.borrow_mut();
            controls.page.size = size.clamp(1, PAGE_SIZE_MAX);
            controls.page.page = 0;
        }
        self.sync(Trigger::Filter)
    }

    pub fn set_sort(&self, sort_by: impl Into<String>, direction: SortDirection) -> Fetch {
        {
            let mut controls = self.controls.borrow_mut();
            controls.page.sort_by = sort_by.into();
            controls.page.sort_direction = direction;
            controls.page.page = 0;
        }
        self.sync(Trigger::Filter)
    }

    pub fn set_sort_direction(&self, direction: SortDirection) -> Fetch {
        {
            let mut controls = self.controls.borrow_mut();
            controls.page.sort_direction = direction;
            controls.page.page = 0;
        }
        self.sync(Trigger::Filter)
    }

    /// Sort by `sort_by`, flipping the direction if it is already the sort
    /// column. A new column starts ascending.
    pub fn toggle_sort(&self, sort_by: &str) -> Fetch {
        let direction = {
            let controls = self.controls.borrow();
            if controls.page.sort_by == sort_by {
                controls.page.sort_direction.toggled()
            } else {
                SortDirection::Asc
            }
        };
        self.set_sort(sort_by, direction)
    }

    /// Type-ahead filter. The draft updates immediately; the applied filter
    /// follows once no further keystroke arrives within the quiet period.
    /// Only `key` is folded into the applied filters.
    pub fn search(&self, key: impl Into<String>, value: impl Into<String>) -> Fetch {
        let key = key.into();
        let value = value.into();
        self.set_draft(key.clone(), value.clone());
        let pending = self.debouncer.schedule((key, value));
        let this = self.clone();
        Box::pin(async move {
            let Some((key, value)) = pending.await else {
                return;
            };
            {
                let mut controls = this.controls.borrow_mut();
                controls.applied.set(key, value);
                controls.page.page = 0;
            }
            this.sync(Trigger::Filter).await;
        })
    }

    /// Fetch the current query again, whether or not anything changed.
    pub fn refetch(&self) -> Fetch {
        if !self.controls.borrow().started {
            return done();
        }
        self.controls.borrow_mut().trigger = Trigger::Refetch;
        let fetch = self.resource.execute();
        let this = self.clone();
        Box::pin(async move {
            fetch.await;
            this.clamp_past_end().await;
        })
    }

    pub fn trigger(&self) -> Trigger {
        self.controls.borrow().trigger
    }

    pub fn with_state<R>(
        &self,
        f: impl FnOnce(&RequestState<PaginatedResult<T>>) -> R,
    ) -> R {
        self.resource.with_state(f)
    }

    /// Notified on every draft edit and every request state change.
    pub fn subscribe(&self, listener: Rc<dyn Fn()>) -> Subscription {
        Subscription::combine([
            self.listeners.subscribe(listener.clone()),
            self.resource.subscribe(listener),
        ])
    }

    fn sync(&self, trigger: Trigger) -> Fetch {
        if !self.controls.borrow().started {
            self.listeners.notify();
            return done();
        }
        let query = self.query();
        if self.resource.key().as_ref() == Some(&query) {
            self.listeners.notify();
            return done();
        }
        tracing::debug!("List query changed: {:?}", query.to_pairs());
        self.controls.borrow_mut().trigger = trigger;
        let fetch = self.resource.set_key(Some(query));
        let this = self.clone();
        Box::pin(async move {
            fetch.await;
            this.clamp_past_end().await;
        })
    }

    /// After rows disappear the requested page can lie beyond the last one.
    /// Move to the last page that exists and fetch it once.
    fn clamp_past_end(&self) -> Fetch {
        let past_end = self.resource.with_state(|state| {
            state
                .data()
                .filter(|result| result.is_past_end())
                .map(|result| (result.page(), result.last_valid_page()))
        });
        let current = self.controls.borrow().page.page;
        match past_end {
            Some((page, last)) if page == current => {
                tracing::debug!("Page {page} is past the end, moving to {last}");
                self.controls.borrow_mut().page.page = last;
                self.sync(Trigger::Page)
            }
            _ => done(),
        }
    }
}

impl<T: Clone + 'static> ListController<T> {
    pub fn state(&self) -> RequestState<PaginatedResult<T>> {
        self.resource.state()
    }

    pub fn view(&self) -> ListView<T> {
        let controls = self.controls.borrow();
        self.resource.with_state(|state| {
            let loading = state.is_loading();
            let (items, total_items, total_pages, has_next) = match state.data() {
                Some(result) => (
                    result.content().to_vec(),
                    result.total_elements(),
                    result.total_pages(),
                    result.has_next(),
                ),
                None => (Vec::new(), 0, 0, false),
            };
            ListView {
                items,
                total_items,
                total_pages,
                current_page: controls.page.page,
                page_size: controls.page.size,
                has_next,
                has_previous: controls.page.page > 0,
                loading,
                error: state.error().cloned(),
                is_filter_pending: loading && controls.trigger != Trigger::Page,
                is_page_pending: loading && controls.trigger == Trigger::Page,
            }
        })
    }
}

impl<T: 'static> Invalidate for ListController<T> {
    fn invalidate(&self) -> Fetch {
        self.refetch()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A list backend over `0..n`, recording every query it receives.
    #[derive(Clone)]
    struct FakeRows {
        rows: Rc<RefCell<Vec<u32>>>,
        queries: Rc<RefCell<Vec<ListQuery>>>,
    }

    impl FakeRows {
        fn new(count: u32) -> Self {
            Self {
                rows: Rc::new(RefCell::new((0..count).collect())),
                queries: Rc::default(),
            }
        }

        fn controller(&self, config: ListConfig) -> ListController<u32> {
            let backend = self.clone();
            ListController::new(config, move |query: ListQuery| {
                backend.queries.borrow_mut().push(query.clone());
                let rows = backend.rows.borrow();
                let size = query.page.size as usize;
                let start = query.page.page as usize * size;
                let content = rows.iter().skip(start).take(size).copied().collect();
                let result = PaginatedResult::new(
                    content,
                    rows.len() as u64,
                    query.page.page,
                    query.page.size,
                );
                async move { Envelope::ok(result) }
            })
        }

        fn fetches(&self) -> usize {
            self.queries.borrow().len()
        }

        fn last_query(&self) -> ListQuery {
            self.queries.borrow().last().cloned().unwrap_or_default()
        }
    }

    fn small_pages() -> ListConfig {
        ListConfig {
            default_page: PageDescriptor::new(10),
            filter_defaults: Filters::new().with("status", "ALL"),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn draft_edits_do_not_fetch() {
        let backend = FakeRows::new(25);
        let list = backend.controller(small_pages());
        list.start().await;
        assert_eq!(backend.fetches(), 1);

        list.set_draft("search", "pizza");
        list.set_draft("status", "ACTIVE");
        assert_eq!(backend.fetches(), 1);
        assert_eq!(list.draft().get("search"), Some("pizza"));
        assert!(list.applied().get("search").is_none());
    }

    #[tokio::test]
    async fn apply_and_sort_return_to_first_page() {
        let backend = FakeRows::new(40);
        let list = backend.controller(small_pages());
        list.start().await;
        list.set_page(3).await;
        assert_eq!(list.view().current_page, 3);

        list.set_draft("status", "ACTIVE");
        list.apply().await;
        assert_eq!(backend.last_query().page.page, 0);
        assert_eq!(backend.last_query().filters.get("status"), Some("ACTIVE"));

        list.set_page(2).await;
        list.toggle_sort("price").await;
        let query = backend.last_query();
        assert_eq!(query.page.page, 0);
        assert_eq!(query.page.sort_by, "price");
        assert_eq!(query.page.sort_direction, SortDirection::Asc);

        list.toggle_sort("price").await;
        assert_eq!(backend.last_query().page.sort_direction, SortDirection::Desc);
    }

    #[tokio::test]
    async fn one_fetch_per_effective_change() {
        let backend = FakeRows::new(40);
        let list = backend.controller(small_pages());
        list.start().await;

        // applying an unchanged draft, or the default status, is a no-op
        list.apply().await;
        list.set_draft("status", "ALL");
        list.set_draft("search", "  ");
        list.apply().await;
        assert_eq!(backend.fetches(), 1);

        list.set_page(1).await;
        list.set_page(1).await;
        assert_eq!(backend.fetches(), 2);
        assert!(backend.last_query().filters.is_empty());
    }

    #[tokio::test]
    async fn nothing_is_fetched_before_start() {
        let backend = FakeRows::new(5);
        let list = backend.controller(small_pages());
        list.set_draft("search", "pho");
        list.apply().await;
        list.refetch().await;
        assert_eq!(backend.fetches(), 0);

        list.start().await;
        assert_eq!(backend.last_query().filters.get("search"), Some("pho"));
    }

    #[tokio::test]
    async fn clear_restores_defaults() {
        let backend = FakeRows::new(40);
        let list = backend.controller(small_pages());
        list.start().await;
        list.set_draft("search", "com");
        list.apply().await;
        list.set_page_size(20).await;
        list.clear().await;

        assert_eq!(list.draft(), Filters::new().with("status", "ALL"));
        assert_eq!(list.page_descriptor(), PageDescriptor::new(10));
        assert_eq!(backend.last_query(), ListQuery::new(Filters::new(), PageDescriptor::new(10)));
    }

    #[tokio::test]
    async fn page_navigation_stays_in_range() {
        let backend = FakeRows::new(15);
        let list = backend.controller(small_pages());
        list.start().await;
        list.previous_page().await;
        assert_eq!(backend.fetches(), 1);

        list.next_page().await;
        let view = list.view();
        assert_eq!(view.current_page, 1);
        assert_eq!(view.items, (10..15).collect::<Vec<_>>());
        assert!(!view.has_next);
        assert!(view.has_previous);

        list.next_page().await;
        assert_eq!(backend.fetches(), 2);
    }

    #[tokio::test]
    async fn pending_flags_follow_the_trigger() {
        let backend = FakeRows::new(30);
        let list = backend.controller(small_pages());
        let initial = list.start();
        assert!(list.view().is_filter_pending);
        initial.await;

        let paging = list.set_page(1);
        let view = list.view();
        assert!(view.loading);
        assert!(view.is_page_pending);
        assert!(!view.is_filter_pending);
        assert_eq!(view.items, (0..10).collect::<Vec<_>>());
        paging.await;

        let filtering = list.set_sort("name", SortDirection::Asc);
        assert!(list.view().is_filter_pending);
        filtering.await;
        let view = list.view();
        assert!(!view.is_filter_pending);
        assert!(!view.is_page_pending);
    }

    #[tokio::test(start_paused = true)]
    async fn debounced_search_applies_once() {
        let backend = FakeRows::new(30);
        let list = backend.controller(small_pages());
        list.start().await;
        list.set_page(2).await;
        list.set_draft("status", "ACTIVE");

        let p = list.search("search", "p");
        let pi = list.search("search", "pi");
        let piz = list.search("search", "piz");
        assert_eq!(list.draft().get("search"), Some("piz"));
        futures::future::join3(p, pi, piz).await;

        assert_eq!(backend.fetches(), 3);
        let query = backend.last_query();
        assert_eq!(query.filters.get("search"), Some("piz"));
        assert_eq!(query.filters.get("status"), None);
        assert_eq!(query.page.page, 0);
    }

    #[tokio::test]
    async fn refetch_past_the_end_clamps_to_last_page() {
        let backend = FakeRows::new(21);
        let list = backend.controller(small_pages());
        list.start().await;
        list.set_page(2).await;
        assert_eq!(list.view().items, vec![20]);

        backend.rows.borrow_mut().pop();
        list.refetch().await;

        let pages: Vec<u32> = backend
            .queries
            .borrow()
            .iter()
            .map(|query| query.page.page)
            .collect();
        assert_eq!(pages, vec![0, 2, 2, 1]);
        let view = list.view();
        assert_eq!(view.current_page, 1);
        assert_eq!(view.total_items, 20);
        assert_eq!(view.items.len(), 10);
    }

    #[tokio::test]
    async fn empty_list_does_not_clamp_forever() {
        let backend = FakeRows::new(0);
        let list = backend.controller(small_pages());
        list.start().await;
        list.set_page(4).await;
        assert_eq!(backend.fetches(), 3);
        assert_eq!(list.view().current_page, 0);
        assert_eq!(list.view().total_pages, 0);
    }
}
