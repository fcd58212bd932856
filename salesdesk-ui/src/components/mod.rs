//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod chart;
pub mod chat_widget;
pub mod loading;
pub mod nav;
pub mod no_data;
pub mod summary_card;
pub mod toast;

pub use chart::{BarChart, LineChart};
pub use chat_widget::ChatWidget;
pub use loading::Loading;
pub use nav::Nav;
pub use no_data::NoData;
pub use summary_card::SummaryCard;
pub use toast::Toast;
