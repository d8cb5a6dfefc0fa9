mod list;
mod mutation;
mod resource;

use std::rc::Rc;

use fetch_state::{ListConfig, ListController};
use payloads::{APIClient, Filters, PageDescriptor, Product};

/// A product list wired to the live stub, the way the products page builds
/// it.
pub fn product_list(client: Rc<APIClient>, size: u32) -> ListController<Product> {
    let config = ListConfig {
        default_page: PageDescriptor::new(size),
        filter_defaults: Filters::new().with("status", "ALL"),
        ..Default::default()
    };
    ListController::new(config, move |query| {
        let client = client.clone();
        async move { client.list_products(&query).await }
    })
}
