//! Typed print style resource.
//!
//! The guide used to carry its print rules as an embedded CSS string; here
//! they are a named, versioned value that can be loaded from TOML and tested
//! on its own. Only rules that change the flattened output are represented:
//! page setup, the running footer, visibility overrides and page-break
//! anchors. Collapsed and tabbed content needs no explicit override because
//! the linear rendering prints every visible block by construction.

use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_range, Validate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageMargins {
    pub top_mm: f64,
    pub bottom_mm: f64,
    pub left_mm: f64,
    pub right_mm: f64,
}

impl Default for PageMargins {
    fn default() -> Self {
        // A4 with "margin: 20mm 15mm" from the original print rules.
        Self {
            top_mm: 20.0,
            bottom_mm: 20.0,
            left_mm: 15.0,
            right_mm: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FooterStyle {
    /// Running footer template; `{page}` and `{total}` are substituted per
    /// page.
    pub template: String,
    pub font_size_pt: u8,
    pub color: [u8; 3],
    /// Height reserved at the bottom of every page.
    pub height_mm: f64,
}

impl Default for FooterStyle {
    fn default() -> Self {
        Self {
            template: "FID Finance - Odoo 19 Boekhouding Gids | Pagina {page} van {total}"
                .to_string(),
            font_size_pt: 8,
            color: [0x6c, 0x6c, 0x7a],
            height_mm: 10.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeScale {
    pub base_pt: u8,
    pub title_pt: u8,
    pub section_pt: u8,
    pub sub_pt: u8,
    pub line_spacing: f64,
    /// Vertical gap between blocks, kept tight for print density.
    pub block_gap_mm: f64,
}

impl Default for TypeScale {
    fn default() -> Self {
        Self {
            base_pt: 10,
            title_pt: 15,
            section_pt: 12,
            sub_pt: 11,
            line_spacing: 1.15,
            block_gap_mm: 2.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintStyle {
    pub name: String,
    pub version: String,
    pub margins: PageMargins,
    pub footer: FooterStyle,
    /// Elements with one of these classes (including their content) are
    /// dropped from print output.
    pub hidden_classes: Vec<String>,
    /// Anchor ids that force a page break before the element.
    pub break_before_ids: Vec<String>,
    pub type_scale: TypeScale,
}

impl Default for PrintStyle {
    fn default() -> Self {
        Self {
            name: "odoo-gids-print".to_string(),
            version: "1".to_string(),
            margins: PageMargins::default(),
            footer: FooterStyle::default(),
            hidden_classes: vec![
                "nav-tabs".to_string(),
                "section-toggle".to_string(),
                "action-bar".to_string(),
                "progress-mini".to_string(),
                "version-badge".to_string(),
            ],
            break_before_ids: vec!["tab-operations".to_string(), "tab-reference".to_string()],
            type_scale: TypeScale::default(),
        }
    }
}

impl PrintStyle {
    /// The built-in style used for the boekhouding gids.
    pub fn guide() -> Self {
        Self::default()
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let style: Self = toml::from_str(content).map_err(|e| {
            crate::utils::error::ReportError::ConfigValidationError {
                field: "style".to_string(),
                message: format!("TOML parsing error: {}", e),
            }
        })?;
        style.validate()?;
        Ok(style)
    }

    /// Renders the footer line for one page.
    pub fn footer_line(&self, page: usize, total: usize) -> String {
        self.footer
            .template
            .replace("{page}", &page.to_string())
            .replace("{total}", &total.to_string())
    }
}

impl Validate for PrintStyle {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("style.name", &self.name)?;
        validate_non_empty_string("style.footer.template", &self.footer.template)?;
        validate_range("style.footer.font_size_pt", self.footer.font_size_pt, 4, 24)?;
        validate_range("style.footer.height_mm", self.footer.height_mm, 4.0, 40.0)?;
        validate_range("style.margins.top_mm", self.margins.top_mm, 0.0, 60.0)?;
        validate_range("style.margins.bottom_mm", self.margins.bottom_mm, 0.0, 60.0)?;
        validate_range("style.margins.left_mm", self.margins.left_mm, 0.0, 60.0)?;
        validate_range("style.margins.right_mm", self.margins.right_mm, 0.0, 60.0)?;
        validate_range("style.type_scale.base_pt", self.type_scale.base_pt, 6, 18)?;
        validate_range(
            "style.type_scale.line_spacing",
            self.type_scale.line_spacing,
            0.8,
            2.0,
        )?;
        Ok(())
    }
}
