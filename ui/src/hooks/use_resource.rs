use std::future::Future;
use std::rc::Rc;

use fetch_state::{RequestState, Resource, ResourceOptions};
use payloads::Envelope;
use yew::platform::spawn_local;
use yew::prelude::*;

/// A resource owned by the calling component.
pub struct ResourceHandle<K, T> {
    pub resource: Rc<Resource<K, T>>,
    pub state: RequestState<T>,
}

impl<K, T: Clone> Clone for ResourceHandle<K, T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
            state: self.state.clone(),
        }
    }
}

impl<K: Clone + PartialEq + 'static, T: 'static> ResourceHandle<K, T> {
    /// Run the fetch again with the current key.
    pub fn on_retry(&self) -> Callback<()> {
        let resource = self.resource.clone();
        Callback::from(move |_| spawn_local(resource.execute()))
    }
}

/// Fetch `fetcher(key)` whenever `key` changes to a defined value.
///
/// A `None` key leaves the resource idle, which is how detail views wait
/// for a route parameter.
#[hook]
pub fn use_resource<K, T, F, Fut>(key: Option<K>, fetcher: F) -> ResourceHandle<K, T>
where
    K: Clone + PartialEq + 'static,
    T: Clone + 'static,
    F: Fn(K) -> Fut + 'static,
    Fut: Future<Output = Envelope<T>> + 'static,
{
    let resource =
        use_memo((), move |_| Resource::keyed(fetcher, ResourceOptions::default()));

    {
        let resource = resource.clone();
        super::use_rerender_on(move |listener| resource.subscribe(listener));
    }

    {
        let resource = resource.clone();
        use_effect_with(key, move |key| spawn_local(resource.set_key(key.clone())));
    }

    ResourceHandle {
        state: resource.state(),
        resource,
    }
}
