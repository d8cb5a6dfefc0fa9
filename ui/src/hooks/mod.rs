pub mod use_authentication;
pub mod use_logout;
pub mod use_mutation;
pub mod use_paginated_list;
pub mod use_resource;

pub use use_authentication::use_authentication;
pub use use_logout::use_logout;
pub use use_mutation::{MutationHandle, use_mutation};
pub use use_paginated_list::{ListHandle, use_paginated_list};
pub use use_resource::{ResourceHandle, use_resource};

use std::rc::Rc;

use fetch_state::Subscription;
use yew::prelude::*;

/// Re-render the calling component whenever `subscribe` reports a change,
/// for as long as the component is mounted.
#[hook]
fn use_rerender_on<S>(subscribe: S)
where
    S: FnOnce(Rc<dyn Fn()>) -> Subscription + 'static,
{
    let update = use_force_update();
    use_effect_with((), move |_| {
        let subscription = subscribe(Rc::new(move || update.force_update()));
        move || drop(subscription)
    });
}
