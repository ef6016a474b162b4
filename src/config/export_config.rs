use crate::config::substitute_env_vars;
use crate::domain::ports::ExportConfigProvider;
use crate::print::style::PrintStyle;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{validate_file_extensions, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Job file for the guide exporter. All sections have defaults that
/// reproduce the original export (gids HTML in, gids PDF out, built-in
/// print style), so an empty file is a valid job.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    pub job: JobConfig,
    pub input: InputConfig,
    pub output: OutputConfig,
    pub style: PrintStyle,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct JobConfig {
    pub name: String,
    pub description: String,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            name: "odoo-gids-print".to_string(),
            description: "Print export van de Odoo 19 boekhouding gids".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub html_path: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            html_path: "odoo-boekhouding-gids.html".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub pdf_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            pdf_path: "odoo-boekhouding-gids.pdf".to_string(),
        }
    }
}

impl ExportConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;
        toml::from_str(&processed).map_err(|e| ReportError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }
}

impl ExportConfigProvider for ExportConfig {
    fn input_path(&self) -> &str {
        &self.input.html_path
    }

    fn output_path(&self) -> &str {
        &self.output.pdf_path
    }

    fn style(&self) -> &PrintStyle {
        &self.style
    }
}

impl Validate for ExportConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("job.name", &self.job.name)?;
        crate::utils::validation::validate_path("input.html_path", &self.input.html_path)?;
        validate_file_extensions(
            "input.html_path",
            &[self.input.html_path.clone()],
            &["html", "htm"],
        )?;
        crate::utils::validation::validate_path("output.pdf_path", &self.output.pdf_path)?;
        validate_file_extensions("output.pdf_path", &[self.output.pdf_path.clone()], &["pdf"])?;
        self.style.validate()
    }
}
