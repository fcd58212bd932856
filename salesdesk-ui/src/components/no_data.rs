//! Empty report state

use leptos::*;
use leptos_router::*;

#[component]
pub fn NoData() -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-xl p-12 flex flex-col items-center justify-center text-center min-h-[400px]">
            <div class="text-6xl text-gray-600 mb-4">"📊"</div>
            <h2 class="text-2xl font-semibold mb-2">"No Data Available"</h2>
            <p class="text-gray-400 max-w-md mb-6">
                "There are no sales records for the selected date range. "
                "Try selecting a different date range or create some orders first."
            </p>
            <A
                href="/"
                class="px-6 py-3 bg-emerald-600 hover:bg-emerald-700 rounded-lg font-medium transition-colors"
            >
                "Create Order →"
            </A>
        </div>
    }
}
