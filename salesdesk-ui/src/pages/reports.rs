//! Reports Page
//!
//! Sales analytics for a date range. Reports the chat agent generates are
//! pushed here over the relay and replace whatever is on screen.

use chrono::{Duration, Local, NaiveDate};
use leptos::*;

use crate::api::{self, ReportData, ReportRequest};
use crate::components::{BarChart, LineChart, Loading, NoData, SummaryCard};
use crate::components::chart::SERIES_COLORS;
use crate::state::global::GlobalState;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Bars shown per ranking chart
const TOP_N: usize = 10;

/// `(start, end)` for the last `days` days ending on `today`
pub fn quick_range(days: i64, today: NaiveDate) -> (String, String) {
    let start = today - Duration::days(days);
    (
        start.format(DATE_FORMAT).to_string(),
        today.format(DATE_FORMAT).to_string(),
    )
}

/// Toast shown when a pushed report replaces the one on screen
pub const REPORT_UPDATED_MESSAGE: &str = "Report Updated: dashboard updated from chat";

/// The pushed report to show, if any
///
/// The effect's first run sees whatever was pushed before the page opened,
/// which is stale.
pub fn fresh_push(first_run: bool, latest: Option<ReportData>) -> Option<ReportData> {
    if first_run {
        None
    } else {
        latest
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Reports page component
#[component]
pub fn Reports() -> impl IntoView {
    let state = use_context::<GlobalState>().expect("GlobalState not found");

    let report = create_rw_signal(None::<ReportData>);
    let (loading, set_loading) = create_signal(false);
    let (start_date, set_start_date) = create_signal(String::new());
    let (end_date, set_end_date) = create_signal(String::new());

    let state_for_fetch = state.clone();
    let fetch_report = move |request: ReportRequest| {
        let state = state_for_fetch.clone();
        set_loading.set(true);
        spawn_local(async move {
            match api::generate_report(&request).await {
                Ok(data) => report.set(Some(data)),
                Err(e) => {
                    web_sys::console::error_1(&format!("Error fetching report: {}", e).into());
                    state.show_error(&format!("Failed to load report: {}", e));
                }
            }
            set_loading.set(false);
        });
    };

    // Today's report on first render
    let (start, end) = quick_range(0, today());
    fetch_report(ReportRequest::for_range(&start, &end));

    // Reports pushed by the gateway
    let pushed = state.pushed_report;
    let state_for_push = state.clone();
    create_effect(move |previous: Option<()>| {
        let latest = pushed.get();
        if let Some(data) = fresh_push(previous.is_none(), latest) {
            report.set(Some(data));
            state_for_push.show_success(REPORT_UPDATED_MESSAGE);
        }
    });

    let on_quick = {
        let fetch_report = fetch_report.clone();
        move |days: i64| {
            let (start, end) = quick_range(days, today());
            set_start_date.set(start.clone());
            set_end_date.set(end.clone());
            fetch_report(ReportRequest::for_range(&start, &end));
        }
    };

    let on_all_time = {
        let fetch_report = fetch_report.clone();
        move |_| {
            set_start_date.set(String::new());
            set_end_date.set(String::new());
            fetch_report(ReportRequest::all_time());
        }
    };

    let on_generate = move |_| {
        fetch_report(ReportRequest::from_inputs(
            &start_date.get_untracked(),
            &end_date.get_untracked(),
        ));
    };

    let quick_today = on_quick.clone();
    let quick_week = on_quick.clone();
    let quick_month = on_quick;

    view! {
        <div class="space-y-6">
            <div>
                <h1 class="text-3xl sm:text-4xl font-bold">"Sales Analytics"</h1>
                <p class="text-gray-400 mt-1">
                    {move || report.get()
                        .and_then(|r| r.date_range)
                        .unwrap_or_else(|| "Loading...".to_string())}
                </p>
            </div>

            <section class="bg-gray-800 rounded-xl p-6 space-y-4">
                <div class="grid grid-cols-1 sm:grid-cols-2 gap-4">
                    <DateInput label="Start Date" value=start_date set_value=set_start_date />
                    <DateInput label="End Date" value=end_date set_value=set_end_date />
                </div>

                <div class="flex flex-wrap gap-2">
                    <FilterButton label="Today" on_click=move |_| quick_today(0) />
                    <FilterButton label="This Week" on_click=move |_| quick_week(7) />
                    <FilterButton label="This Month" on_click=move |_| quick_month(30) />
                    <FilterButton label="All Time" on_click=on_all_time />
                </div>

                <button
                    on:click=on_generate
                    disabled=move || loading.get()
                    class="bg-emerald-600 hover:bg-emerald-700 disabled:bg-gray-600 rounded-lg px-6 py-2 font-semibold"
                >
                    {move || if loading.get() { "Loading..." } else { "Generate Report" }}
                </button>
            </section>

            {move || {
                if loading.get() {
                    return view! { <Loading message="Loading report data..." /> }.into_view();
                }
                match report.get() {
                    Some(data) if data.has_data() => view! { <ReportView report=data /> }.into_view(),
                    _ => view! { <NoData /> }.into_view(),
                }
            }}
        </div>
    }
}

#[component]
fn ReportView(report: ReportData) -> impl IntoView {
    let summary = report.summary.clone().unwrap_or_default();
    let series = report.series();

    let customers: Vec<_> = series.top_customers.iter().take(TOP_N).cloned().collect();
    let products: Vec<_> = series.top_products.iter().take(TOP_N).cloned().collect();

    let statuses: Vec<_> = series
        .delivery_status
        .iter()
        .enumerate()
        .map(|(idx, status)| {
            (
                status.name.clone(),
                status.value,
                report.percent_of_orders(status.value),
                SERIES_COLORS[idx % SERIES_COLORS.len()],
            )
        })
        .collect();

    view! {
        <div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-4 gap-4">
            <SummaryCard title="Total Orders" value=summary.total_orders.to_string() icon="📦" color="#3b82f6" />
            <SummaryCard title="Total Quantity" value=summary.total_quantity.to_string() icon="📈" color="#14b8a6" />
            <SummaryCard
                title="Delivery Rate"
                value=format!("{:.1}%", summary.delivery_rate)
                icon="🚚"
                color="#10b981"
            />
            <SummaryCard title="Top Product" value=summary.top_product.clone() icon="⭐" color="#8b5cf6" />
        </div>

        <div class="grid grid-cols-1 lg:grid-cols-2 gap-6">
            {(!series.monthly_trend.is_empty()).then(|| view! {
                <ChartCard title="Monthly Sales Trend">
                    <LineChart trend=series.monthly_trend.clone() />
                </ChartCard>
            })}

            {(!customers.is_empty()).then(|| view! {
                <ChartCard title="Top Customers">
                    <BarChart bars=customers.clone() color="#8b5cf6" horizontal=true />
                </ChartCard>
            })}

            {(!products.is_empty()).then(|| view! {
                <ChartCard title="Top Products">
                    <BarChart bars=products.clone() color="#14b8a6" />
                </ChartCard>
            })}

            {(!statuses.is_empty()).then(|| view! {
                <ChartCard title="Delivery Status">
                    <div class="space-y-3">
                        {statuses.iter().map(|(name, value, percent, color)| view! {
                            <div>
                                <div class="flex justify-between text-sm mb-1">
                                    <span>{name.clone()}</span>
                                    <span class="text-gray-400">{format!("{} ({:.1}%)", value, percent)}</span>
                                </div>
                                <div class="w-full bg-gray-700 rounded-full h-3">
                                    <div
                                        class="h-3 rounded-full"
                                        style=format!("width: {:.1}%; background-color: {}", percent.min(100.0), color)
                                    />
                                </div>
                            </div>
                        }).collect_view()}
                    </div>
                </ChartCard>
            })}
        </div>
    }
}

#[component]
fn ChartCard(title: &'static str, children: Children) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-xl p-6">
            <h3 class="text-xl font-semibold mb-4">{title}</h3>
            {children()}
        </div>
    }
}

#[component]
fn DateInput(
    label: &'static str,
    value: ReadSignal<String>,
    set_value: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="space-y-2">
            <label class="block text-sm font-medium">{label}</label>
            <input
                type="date"
                prop:value=move || value.get()
                on:input=move |ev| set_value.set(event_target_value(&ev))
                class="w-full bg-gray-700 rounded-lg px-4 py-2 text-white border border-gray-600"
            />
        </div>
    }
}

#[component]
fn FilterButton(
    label: &'static str,
    on_click: impl Fn(web_sys::MouseEvent) + 'static,
) -> impl IntoView {
    view! {
        <button
            on:click=on_click
            class="px-4 py-2 rounded-lg text-sm font-medium bg-gray-700 text-gray-300 hover:bg-gray-600 transition-colors"
        >
            {label}
        </button>
    }
}
