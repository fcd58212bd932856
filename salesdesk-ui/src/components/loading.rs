//! Loading Component

use leptos::*;

/// Spinner with a caption, sized like the content it stands in for
#[component]
pub fn Loading(
    #[prop(into)]
    message: String,
) -> impl IntoView {
    view! {
        <div class="bg-gray-800 rounded-xl p-12 flex flex-col items-center justify-center min-h-[400px]">
            <div class="loading-spinner w-16 h-16 mb-4" />
            <p class="text-gray-400 font-medium">{message}</p>
        </div>
    }
}
