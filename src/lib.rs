//! # chaosdash-rs: Chaos Experiment Dashboard
//!
//! A native dashboard for a chaos-engineering platform. Operators browse
//! fault-injection experiments against a backend API and inspect the
//! experiment/event history on an interactive timeline chart.
//!
//! ## Architecture
//!
//! - **Chart**: the event timeline engine, hand-painted on egui's drawing
//!   primitives (scales, axes, zoom transform, tooltip, legend)
//! - **Codegen**: a build-time pipeline turning OpenAPI-generated type
//!   declarations into declarative form-field metadata per chaos kind
//! - **Api**: the backend collaborator boundary, fetched off-thread over
//!   crossbeam channels
//!
//! ## Example
//!
//! ```ignore
//! use chaosdash_rs::{api::{DemoSource, FetchBridge}, app::DashboardApp, config::AppConfig};
//!
//! fn main() -> eframe::Result<()> {
//!     let config = AppConfig::load_or_default();
//!     let bridge = FetchBridge::spawn(DemoSource);
//!
//!     eframe::run_native(
//!         "Chaos Dashboard",
//!         eframe::NativeOptions::default(),
//!         Box::new(|cc| Ok(Box::new(DashboardApp::new(cc, bridge, config)))),
//!     )
//! }
//! ```

pub mod api;
pub mod app;
pub mod chart;
pub mod codegen;
pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use app::DashboardApp;
pub use chart::EventsChart;
pub use config::{AppConfig, ChartConfig};
pub use error::{DashboardError, Result};
pub use types::{Archive, Event, Experiment, Schedule};
