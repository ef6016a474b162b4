use crate::core::ExportPipeline;
use crate::domain::model::ExportReceipt;
use crate::utils::error::Result;

pub struct ExportEngine<P: ExportPipeline> {
    pipeline: P,
}

impl<P: ExportPipeline> ExportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<ExportReceipt> {
        println!("Starting guide export...");

        println!("Reading source document...");
        let html = self.pipeline.extract().await?;
        println!("Read {} bytes", html.len());

        println!("Composing print layout...");
        let document = self.pipeline.transform(html).await?;
        println!("Composed {} blocks", document.content_blocks());

        println!("Rendering PDF...");
        let receipt = self.pipeline.load(document).await?;
        println!(
            "Output saved to: {} ({} pages)",
            receipt.output_path, receipt.pages
        );

        Ok(receipt)
    }
}
