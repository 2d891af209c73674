//! Kanban Board Frontend Entry Point

mod app;
mod board;
mod components;
mod config;
mod context;
mod controller;
mod error;
mod models;
mod store;

use app::App;
use config::BoardConfig;
use leptos::prelude::*;
use rolling_logger::RollingConfig;

fn main() {
    console_error_panic_hook::set_once();
    let logs = rolling_logger::init(RollingConfig::default()).ok();
    let config = BoardConfig::from_env();
    tracing::info!("[APP] cards endpoint {}", config.cards_endpoint());
    mount_to_body(move || view! { <App config=config.clone() logs=logs.clone() /> });
}
