//! Summary Card Component
//!
//! One headline figure of a sales report.

use leptos::*;

#[component]
pub fn SummaryCard(
    #[prop(into)]
    title: String,
    #[prop(into)]
    value: String,
    icon: &'static str,
    color: &'static str,
) -> impl IntoView {
    view! {
        <div
            class="bg-gray-800 rounded-xl p-6"
            style=format!("border-left: 3px solid {}", color)
        >
            <div class="flex items-center gap-4">
                <div class="p-3 rounded-lg bg-gray-700 text-xl" style=format!("color: {}", color)>
                    {icon}
                </div>
                <div class="flex-1">
                    <p class="text-sm font-medium text-gray-400 mb-1">{title}</p>
                    <p class="text-2xl font-bold">{value}</p>
                </div>
            </div>
        </div>
    }
}
