use crate::domain::model::{ExportReceipt, HeadingLevel, PrintBlock, PrintDocument};
use crate::domain::ports::{ExportConfigProvider, ExportPipeline, Storage};
use crate::html;
use crate::print::render::PdfRenderer;
use crate::print::style::PrintStyle;
use crate::utils::error::{ReportError, Result};
use std::path::Path;

pub struct GuideExportPipeline<S: Storage, C: ExportConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ExportConfigProvider> GuideExportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ExportConfigProvider> ExportPipeline for GuideExportPipeline<S, C> {
    async fn extract(&self) -> Result<String> {
        let path = self.config.input_path();
        // Existence is checked up front so a missing input can never leave a
        // partial output file behind.
        if !Path::new(path).exists() {
            return Err(ReportError::DocumentNotFound {
                path: path.to_string(),
            });
        }

        tracing::debug!("Reading guide HTML from: {}", path);
        let bytes = self.storage.read_file(path).await?;
        String::from_utf8(bytes)
            .map_err(|_| ReportError::render("input document is not valid UTF-8"))
    }

    async fn transform(&self, html_source: String) -> Result<PrintDocument> {
        compose_print_document(&html_source, self.config.style())
    }

    async fn load(&self, document: PrintDocument) -> Result<ExportReceipt> {
        let renderer = PdfRenderer::new(self.config.style().clone());
        let rendered = renderer.render(&document)?;

        tracing::debug!(
            "Writing PDF ({} bytes, {} pages) to: {}",
            rendered.bytes.len(),
            rendered.pages,
            self.config.output_path()
        );
        self.storage
            .write_file(self.config.output_path(), &rendered.bytes)
            .await?;

        Ok(ExportReceipt {
            output_path: self.config.output_path().to_string(),
            pages: rendered.pages,
            bytes_written: rendered.bytes.len(),
        })
    }
}

/// Flattens the guide HTML into linear print blocks according to the style:
/// hidden containers are dropped, everything else prints in source order,
/// and a page break is inserted before each configured anchor.
pub fn compose_print_document(source: &str, style: &PrintStyle) -> Result<PrintDocument> {
    if !html::looks_like_html(source) {
        return Err(ReportError::render(
            "input does not look like an HTML document",
        ));
    }

    let hidden_ranges = html::container_ranges(source, &style.hidden_classes);
    let mut break_offsets: Vec<usize> = style
        .break_before_ids
        .iter()
        .filter_map(|id| html::anchor_offset(source, id))
        .collect();
    break_offsets.sort_unstable();

    let title = html::document_title(source)
        .unwrap_or_else(|| "FID Finance - Odoo 19 Boekhouding Gids".to_string());
    let mut document = PrintDocument::new(title);
    let mut pending_breaks = break_offsets.into_iter().peekable();

    for block in html::parse_blocks(source) {
        while let Some(&anchor) = pending_breaks.peek() {
            if block.offset < anchor {
                break;
            }
            // A break before the very first block would only produce a blank
            // leading page.
            if !document.is_empty() {
                document.push(PrintBlock::PageBreak);
            }
            pending_breaks.next();
        }

        let in_hidden_container = hidden_ranges
            .iter()
            .any(|(start, end)| block.offset >= *start && block.offset < *end);
        if in_hidden_container {
            continue;
        }
        if block
            .classes
            .iter()
            .any(|class| style.hidden_classes.contains(class))
        {
            continue;
        }

        let print_block = match block.tag.as_str() {
            "h1" => PrintBlock::Heading {
                level: HeadingLevel::Title,
                text: block.text,
            },
            "h2" => PrintBlock::Heading {
                level: HeadingLevel::Section,
                text: block.text,
            },
            "h3" => PrintBlock::Heading {
                level: HeadingLevel::Sub,
                text: block.text,
            },
            "li" => PrintBlock::ListItem(block.text),
            _ => PrintBlock::Paragraph(block.text),
        };
        document.push(print_block);
    }

    if document.content_blocks() == 0 {
        return Err(ReportError::render("no printable content found"));
    }

    Ok(document)
}
