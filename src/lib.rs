//! # Anew
//!
//! A terminal client for Anew, a news summary service that presents every story
//! from two perspectives.
//!
//! ## Features
//!
//! - **Shape-tolerant decoding**: every payload shape the backend has served decodes into one `SummaryPayload`
//! - **Explicit page state**: `Loading`, `Error` or `Content`, derived once per fetch
//! - **Two surfaces**: a ratatui TUI and plain, colored stdout output

pub mod client;
pub mod config;
pub mod logging;
pub mod render;
pub mod summary;
pub mod ui;
pub mod view;

pub use client::ApiClient;
pub use config::Config;
pub use summary::{SummaryPayload, Topic};
pub use view::{HomeView, ViewState};
