pub mod config;
pub mod core;
pub mod dashboard;
pub mod domain;
pub mod html;
pub mod print;
pub mod utils;

pub use crate::config::cli::LocalStorage;
pub use crate::config::dashboard_config::DashboardConfig;
pub use crate::config::export_config::ExportConfig;
pub use crate::core::{engine::ExportEngine, export_pipeline::GuideExportPipeline};
pub use crate::dashboard::page::{DashboardSession, Layout, PageConfig};
pub use crate::utils::error::{ReportError, Result};
