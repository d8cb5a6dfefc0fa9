use fetch_state::{ListConfig, ListController};
use payloads::{
    Filters, PageDescriptor, Product, ProductId, ProductStatus, SortDirection,
};
use web_sys::{HtmlInputElement, HtmlSelectElement};
use yew::prelude::*;

use crate::components::{
    ErrorBanner, PaginationControls, RequestStatus, RequireAuth,
};
use crate::get_api_client;
use crate::hooks::{use_mutation, use_paginated_list, use_resource};

/// Filter value meaning "any status".
const ALL: &str = "ALL";

fn list_config() -> ListConfig {
    ListConfig {
        default_page: PageDescriptor::new(10)
            .with_sort("createdAt", SortDirection::Desc),
        filter_defaults: Filters::new().with("status", ALL).with("search", ""),
        ..Default::default()
    }
}

#[function_component]
pub fn ProductsPage() -> Html {
    html! {
        <RequireAuth>
            <ProductList />
        </RequireAuth>
    }
}

#[function_component]
fn ProductList() -> Html {
    let client = use_memo((), |_| get_api_client());

    let list = {
        let client = client.clone();
        use_paginated_list(list_config(), move |query| {
            let client = client.clone();
            async move { client.list_products(&query).await }
        })
    };

    let selected = use_state(|| None::<ProductId>);

    let delete = {
        let client = client.clone();
        use_mutation(
            move |product_id: ProductId| {
                let client = client.clone();
                async move { client.delete_product(product_id).await }
            },
            vec![list.invalidate_target()],
        )
    };

    let on_search = {
        let list = list.clone();
        Callback::from(move |e: InputEvent| {
            let value = e.target_unchecked_into::<HtmlInputElement>().value();
            list.run(|c| c.search("search", value));
        })
    };

    let on_status = {
        let list = list.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            list.controller.set_draft("status", value);
        })
    };

    let sort_header = |column: &'static str, label: &'static str| {
        let page = list.controller.page_descriptor();
        let arrow = match (page.sort_by == column, page.sort_direction) {
            (false, _) => "",
            (true, SortDirection::Asc) => " ▲",
            (true, SortDirection::Desc) => " ▼",
        };
        html! {
            <th class="px-3 py-2 text-left">
                <button onclick={list.callback(move |c| c.toggle_sort(column))}>
                    {format!("{label}{arrow}")}
                </button>
            </th>
        }
    };

    let draft = list.controller.draft();
    let view = &list.view;

    let rows = view.items.iter().map(|product| {
        let on_delete = {
            let delete = delete.clone();
            let product_id = product.id;
            Callback::from(move |_: MouseEvent| delete.run(product_id))
        };
        let on_view = {
            let selected = selected.clone();
            let product_id = product.id;
            Callback::from(move |_: MouseEvent| selected.set(Some(product_id)))
        };
        html! {
            <tr key={product.id.0} class="border-t border-neutral-200 dark:border-neutral-700">
                <td class="px-3 py-2">{product.name.clone()}</td>
                <td class="px-3 py-2">{product.store_name.clone().unwrap_or_default()}</td>
                <td class="px-3 py-2">{format_price(product)}</td>
                <td class="px-3 py-2">{product.quantity.to_string()}</td>
                <td class="px-3 py-2">{product.status.as_str()}</td>
                <td class="px-3 py-2 text-right space-x-3">
                    <button onclick={on_view} class="text-sm underline">{"View"}</button>
                    <button
                        onclick={on_delete}
                        disabled={delete.state.is_loading()}
                        class="text-sm text-red-700 dark:text-red-400 underline"
                    >
                        {"Delete"}
                    </button>
                </td>
            </tr>
        }
    });

    html! {
        <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
            <h1 class="text-2xl font-bold mb-4">{"Products"}</h1>

            <ErrorBanner
                message={delete.state.error().map(|e| e.user_message())}
                on_dismiss={{
                    let delete = delete.clone();
                    Callback::from(move |_: ()| delete.reset())
                }}
            />

            <div class="flex flex-wrap gap-3 mb-4">
                <input
                    type="search"
                    placeholder="Search products"
                    value={draft.get("search").unwrap_or_default().to_string()}
                    oninput={on_search}
                    class="px-3 py-2 border border-neutral-300 rounded-md"
                />
                <select onchange={on_status} class="px-3 py-2 border border-neutral-300 rounded-md">
                    <option value={ALL} selected={draft.get("status") == Some(ALL)}>
                        {"All statuses"}
                    </option>
                    { for ProductStatus::ALL.iter().map(|status| html! {
                        <option
                            value={status.as_str()}
                            selected={draft.get("status") == Some(status.as_str())}
                        >
                            {status.as_str()}
                        </option>
                    }) }
                </select>
                <button onclick={list.callback(ListController::apply)} class="px-3 py-2 border rounded-md">
                    {"Apply"}
                </button>
                <button onclick={list.callback(ListController::clear)} class="px-3 py-2 border rounded-md">
                    {"Clear"}
                </button>
            </div>

            <RequestStatus
                context="products"
                loading={view.loading}
                is_page_pending={view.is_page_pending}
                error={view.error.clone()}
                on_retry={list.callback(ListController::refetch)}
            >
                if view.items.is_empty() && !view.loading && view.error.is_none() {
                    <p class="text-neutral-600 dark:text-neutral-400 py-8 text-center">
                        {"No products found"}
                    </p>
                } else {
                    <table class="w-full text-sm">
                        <thead>
                            <tr>
                                {sort_header("name", "Name")}
                                <th class="px-3 py-2 text-left">{"Store"}</th>
                                {sort_header("price", "Price")}
                                {sort_header("quantity", "Qty")}
                                <th class="px-3 py-2 text-left">{"Status"}</th>
                                <th></th>
                            </tr>
                        </thead>
                        <tbody>{ for rows }</tbody>
                    </table>
                }
            </RequestStatus>

            if let Some(product_id) = *selected {
                <ProductDetail
                    {product_id}
                    on_close={{
                        let selected = selected.clone();
                        Callback::from(move |_: ()| selected.set(None))
                    }}
                />
            }

            <PaginationControls
                current_page={view.current_page}
                total_pages={view.total_pages}
                total_items={view.total_items}
                has_next={view.has_next}
                has_previous={view.has_previous}
                is_loading={view.loading}
                on_previous={list.callback(ListController::previous_page)}
                on_next={list.callback(ListController::next_page)}
            />
        </main>
    }
}

#[derive(Properties, PartialEq)]
struct ProductDetailProps {
    product_id: ProductId,
    on_close: Callback<()>,
}

/// Side panel with the full record of one product. Switching to another
/// product refetches; a response for the previous one is dropped.
#[function_component]
fn ProductDetail(props: &ProductDetailProps) -> Html {
    let client = use_memo((), |_| get_api_client());
    let detail = use_resource(Some(props.product_id), move |product_id| {
        let client = client.clone();
        async move { client.get_product(product_id).await }
    });

    let on_close = {
        let on_close = props.on_close.clone();
        Callback::from(move |_: MouseEvent| on_close.emit(()))
    };

    let body = match detail.state.data() {
        Some(product) => html! {
            <dl class="grid grid-cols-2 gap-2 text-sm">
                <dt>{"Name"}</dt><dd>{product.name.clone()}</dd>
                <dt>{"Category"}</dt><dd>{product.category.clone().unwrap_or_default()}</dd>
                <dt>{"Store"}</dt><dd>{product.store_name.clone().unwrap_or_default()}</dd>
                <dt>{"Price"}</dt><dd>{format_price(product)}</dd>
                <dt>{"Quantity"}</dt><dd>{product.quantity.to_string()}</dd>
                <dt>{"Status"}</dt><dd>{product.status.as_str()}</dd>
                <dt>{"Description"}</dt><dd>{product.description.clone().unwrap_or_default()}</dd>
            </dl>
        },
        None => html! {},
    };

    html! {
        <aside class="mt-6 p-4 border border-neutral-200 dark:border-neutral-700 rounded-md">
            <div class="flex justify-between mb-3">
                <h2 class="font-semibold">{"Product details"}</h2>
                <button onclick={on_close} class="text-sm underline">{"Close"}</button>
            </div>
            <RequestStatus
                context="product"
                loading={detail.state.is_loading()}
                error={detail.state.error().cloned()}
                on_retry={detail.on_retry()}
            >
                {body}
            </RequestStatus>
        </aside>
    }
}

fn format_price(product: &Product) -> String {
    match product.original_price {
        Some(original) if original > product.price => {
            format!("{} ₫ (was {} ₫)", product.price, original)
        }
        _ => format!("{} ₫", product.price),
    }
}
