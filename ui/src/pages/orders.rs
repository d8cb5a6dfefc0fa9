use fetch_state::{ListConfig, ListController};
use payloads::{Filters, Order, OrderId, OrderStatus, PageDescriptor};
use web_sys::HtmlSelectElement;
use yew::prelude::*;

use crate::components::{
    ErrorBanner, PaginationControls, RequestStatus, RequireAuth,
};
use crate::get_api_client;
use crate::hooks::{use_mutation, use_paginated_list};

const ALL: &str = "ALL";

#[function_component]
pub fn OrdersPage() -> Html {
    html! {
        <RequireAuth>
            <OrderList />
        </RequireAuth>
    }
}

#[function_component]
fn OrderList() -> Html {
    let client = use_memo((), |_| get_api_client());

    let list = {
        let client = client.clone();
        let config = ListConfig {
            default_page: PageDescriptor::new(20),
            filter_defaults: Filters::new().with("status", ALL),
            ..Default::default()
        };
        use_paginated_list(config, move |query| {
            let client = client.clone();
            async move { client.list_orders(&query).await }
        })
    };

    let update_status = {
        let client = client.clone();
        use_mutation(
            move |(order_id, status): (OrderId, OrderStatus)| {
                let client = client.clone();
                async move { client.update_order_status(order_id, status).await }
            },
            vec![list.invalidate_target()],
        )
    };

    // The status filter applies as soon as it changes.
    let on_status_filter = {
        let list = list.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            list.controller.set_draft("status", value);
            list.run(ListController::apply);
        })
    };

    let status_filter = list
        .controller
        .applied()
        .get("status")
        .unwrap_or(ALL)
        .to_string();
    let view = &list.view;

    let rows = view.items.iter().map(|order| {
        html! {
            <tr key={order.id.0} class="border-t border-neutral-200 dark:border-neutral-700">
                <td class="px-3 py-2">{order_code(order)}</td>
                <td class="px-3 py-2">{order.customer_name.clone().unwrap_or_default()}</td>
                <td class="px-3 py-2">{order.store_name.clone().unwrap_or_default()}</td>
                <td class="px-3 py-2">{format!("{} ₫", order.total_amount)}</td>
                <td class="px-3 py-2">
                    <StatusSelect
                        order_id={order.id}
                        status={order.status}
                        disabled={update_status.state.is_loading()}
                        on_change={{
                            let update_status = update_status.clone();
                            Callback::from(move |args: (OrderId, OrderStatus)| {
                                update_status.run(args)
                            })
                        }}
                    />
                </td>
            </tr>
        }
    });

    html! {
        <main class="max-w-7xl mx-auto px-4 sm:px-6 lg:px-8 py-8">
            <h1 class="text-2xl font-bold mb-4">{"Orders"}</h1>

            <ErrorBanner
                message={update_status.state.error().map(|e| e.user_message())}
                on_dismiss={{
                    let update_status = update_status.clone();
                    Callback::from(move |_: ()| update_status.reset())
                }}
            />

            <div class="mb-4">
                <select onchange={on_status_filter} class="px-3 py-2 border border-neutral-300 rounded-md">
                    <option value={ALL} selected={status_filter == ALL}>{"All statuses"}</option>
                    { for OrderStatus::ALL.iter().map(|status| html! {
                        <option value={status.as_str()} selected={status_filter == status.as_str()}>
                            {status.as_str()}
                        </option>
                    }) }
                </select>
            </div>

            <RequestStatus
                context="orders"
                loading={view.loading}
                is_page_pending={view.is_page_pending}
                error={view.error.clone()}
                on_retry={list.callback(ListController::refetch)}
            >
                <table class="w-full text-sm">
                    <thead>
                        <tr>
                            <th class="px-3 py-2 text-left">{"Order"}</th>
                            <th class="px-3 py-2 text-left">{"Customer"}</th>
                            <th class="px-3 py-2 text-left">{"Store"}</th>
                            <th class="px-3 py-2 text-left">{"Total"}</th>
                            <th class="px-3 py-2 text-left">{"Status"}</th>
                        </tr>
                    </thead>
                    <tbody>{ for rows }</tbody>
                </table>
            </RequestStatus>

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

fn order_code(order: &Order) -> String {
    order
        .order_code
        .clone()
        .unwrap_or_else(|| format!("#{}", order.id))
}

#[derive(Properties, PartialEq)]
struct StatusSelectProps {
    order_id: OrderId,
    status: OrderStatus,
    disabled: bool,
    on_change: Callback<(OrderId, OrderStatus)>,
}

/// Moves an order to another status. Final orders can't be changed.
#[function_component]
fn StatusSelect(props: &StatusSelectProps) -> Html {
    let onchange = {
        let order_id = props.order_id;
        let on_change = props.on_change.clone();
        Callback::from(move |e: Event| {
            let value = e.target_unchecked_into::<HtmlSelectElement>().value();
            if let Some(status) =
                OrderStatus::ALL.into_iter().find(|s| s.as_str() == value)
            {
                on_change.emit((order_id, status));
            }
        })
    };

    html! {
        <select
            {onchange}
            disabled={props.disabled || props.status.is_terminal()}
            class="px-2 py-1 border border-neutral-300 rounded-md"
        >
            { for OrderStatus::ALL.iter().map(|status| html! {
                <option value={status.as_str()} selected={*status == props.status}>
                    {status.as_str()}
                </option>
            }) }
        </select>
    }
}
