//! PDF assembly for flattened guide documents.
//!
//! Rendering happens in two passes: the first pass produces a throwaway PDF
//! whose page count is read back with `lopdf`, the second pass renders the
//! final bytes with the total substituted into the running footer. The
//! footer occupies a fixed reserved height, so the page count is identical
//! in both passes.

use genpdf::elements::{PageBreak, Paragraph};
use genpdf::error::ErrorKind;
use genpdf::style::{Color, Style};
use genpdf::{Alignment, Element, Margins, Mm, PageDecorator, Position};

use crate::domain::model::{HeadingLevel, PrintBlock, PrintDocument};
use crate::print::fonts;
use crate::print::style::PrintStyle;
use crate::utils::error::Result;

pub struct RenderedPdf {
    pub bytes: Vec<u8>,
    pub pages: usize,
}

pub struct PdfRenderer {
    style: PrintStyle,
}

impl PdfRenderer {
    pub fn new(style: PrintStyle) -> Self {
        Self { style }
    }

    /// Renders the document, resolving the total page count for the footer.
    pub fn render(&self, document: &PrintDocument) -> Result<RenderedPdf> {
        let probe = self.render_pass(document, 0)?;
        let pages = count_pages(&probe)?;
        let bytes = self.render_pass(document, pages)?;
        Ok(RenderedPdf { bytes, pages })
    }

    fn render_pass(&self, document: &PrintDocument, total_pages: usize) -> Result<Vec<u8>> {
        let family = fonts::guide_font_family()?;
        let mut pdf = genpdf::Document::new(family);
        pdf.set_title(document.title.clone());
        pdf.set_paper_size(genpdf::PaperSize::A4);
        pdf.set_font_size(self.style.type_scale.base_pt);
        pdf.set_line_spacing(self.style.type_scale.line_spacing);
        pdf.set_page_decorator(FooterDecorator::new(&self.style, total_pages));

        let gap = Margins::trbl(0.0, 0.0, self.style.type_scale.block_gap_mm, 0.0);
        for block in &document.blocks {
            match block {
                PrintBlock::Heading { level, text } => {
                    let mut style = Style::new();
                    style.set_bold();
                    style.set_font_size(self.heading_size(*level));
                    pdf.push(Paragraph::new(text.clone()).styled(style).padded(gap));
                }
                PrintBlock::Paragraph(text) => {
                    pdf.push(Paragraph::new(text.clone()).padded(gap));
                }
                PrintBlock::ListItem(text) => {
                    let indent = Margins::trbl(0.0, 0.0, self.style.type_scale.block_gap_mm, 4.0);
                    pdf.push(Paragraph::new(format!("• {}", text)).padded(indent));
                }
                PrintBlock::PageBreak => {
                    pdf.push(PageBreak::new());
                }
            }
        }

        let mut bytes = Vec::new();
        pdf.render(&mut bytes)?;
        Ok(bytes)
    }

    fn heading_size(&self, level: HeadingLevel) -> u8 {
        match level {
            HeadingLevel::Title => self.style.type_scale.title_pt,
            HeadingLevel::Section => self.style.type_scale.section_pt,
            HeadingLevel::Sub => self.style.type_scale.sub_pt,
        }
    }
}

/// Counts the pages of a rendered PDF.
pub fn count_pages(bytes: &[u8]) -> Result<usize> {
    let document = lopdf::Document::load_mem(bytes)?;
    Ok(document.get_pages().len())
}

/// Page decorator applying the configured margins and the running footer
/// with `Pagina {page} van {total}` counters.
struct FooterDecorator {
    page: usize,
    total_pages: usize,
    margins: Margins,
    footer_height: Mm,
    footer_style: Style,
    style: PrintStyle,
}

impl FooterDecorator {
    fn new(style: &PrintStyle, total_pages: usize) -> Self {
        let margins = Margins::trbl(
            style.margins.top_mm,
            style.margins.right_mm,
            style.margins.bottom_mm,
            style.margins.left_mm,
        );
        let [r, g, b] = style.footer.color;
        let mut footer_style = Style::new();
        footer_style.set_font_size(style.footer.font_size_pt);
        footer_style.set_color(Color::Rgb(r, g, b));

        Self {
            page: 0,
            total_pages,
            margins,
            footer_height: style.footer.height_mm.into(),
            footer_style,
            style: style.clone(),
        }
    }
}

impl PageDecorator for FooterDecorator {
    fn decorate_page<'a>(
        &mut self,
        context: &genpdf::Context,
        mut area: genpdf::render::Area<'a>,
        style: Style,
    ) -> std::result::Result<genpdf::render::Area<'a>, genpdf::error::Error> {
        self.page += 1;
        area.add_margins(self.margins);

        let available = area.size().height;
        if self.footer_height > available {
            return Err(genpdf::error::Error::new(
                "Footer height exceeds available space",
                ErrorKind::InvalidData,
            ));
        }

        let mut footer_area = area.clone();
        footer_area.add_offset(Position::new(0, available - self.footer_height));
        let mut line = Paragraph::new(self.style.footer_line(self.page, self.total_pages));
        line.set_alignment(Alignment::Center);
        let mut footer = line.styled(self.footer_style);
        let result = footer.render(context, footer_area, style)?;
        if result.has_more {
            return Err(genpdf::error::Error::new(
                "Footer line does not fit into the reserved space",
                ErrorKind::PageSizeExceeded,
            ));
        }

        area.set_height(available - self.footer_height);
        Ok(area)
    }
}
