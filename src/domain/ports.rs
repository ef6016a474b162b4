use crate::domain::model::{ExportReceipt, PrintDocument};
use crate::print::style::PrintStyle;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

/// Configuration consumed by the guide export pipeline. Implemented by the
/// CLI arguments and by the TOML job file.
pub trait ExportConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn output_path(&self) -> &str;
    fn style(&self) -> &PrintStyle;
}

#[async_trait]
pub trait ExportPipeline: Send + Sync {
    /// Reads the source HTML. Must fail before any write when the input is
    /// missing.
    async fn extract(&self) -> Result<String>;
    /// Applies the print style and flattens the guide into linear blocks.
    async fn transform(&self, html: String) -> Result<PrintDocument>;
    /// Renders the blocks to PDF and writes the output file.
    async fn load(&self, document: PrintDocument) -> Result<ExportReceipt>;
}
