//! UI Components
//!
//! Leptos views rendered from the board view-model.

mod activity_log;
mod card_view;
mod category_column;

pub use activity_log::ActivityLog;
pub use card_view::CardView;
pub use category_column::CategoryColumn;
