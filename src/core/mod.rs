pub mod engine;
pub mod export_pipeline;

pub use crate::domain::model::{ExportReceipt, PrintBlock, PrintDocument};
pub use crate::domain::ports::{ExportConfigProvider, ExportPipeline, Storage};
pub use crate::utils::error::Result;
