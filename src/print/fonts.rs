//! Font discovery for the PDF renderer.
//!
//! The guide prints in Plus Jakarta Sans. The font files are not committed;
//! they are looked up in `assets/fonts/` (see the README there) or in the
//! directory named by `LAB_REPORTING_FONTS_DIR`. Render-dependent tests call
//! [`fonts_available`] and skip when the files are missing.

use std::path::PathBuf;

use genpdf::fonts::{self, FontData, FontFamily};

use crate::utils::error::{ReportError, Result};

pub const FONT_FAMILY_NAME: &str = "PlusJakartaSans";
pub const FONTS_DIR_ENV: &str = "LAB_REPORTING_FONTS_DIR";

const FONT_FILES: &[&str] = &[
    "PlusJakartaSans-Regular.ttf",
    "PlusJakartaSans-Bold.ttf",
    "PlusJakartaSans-Italic.ttf",
    "PlusJakartaSans-BoldItalic.ttf",
];

fn font_directory() -> PathBuf {
    std::env::var_os(FONTS_DIR_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("assets/fonts"))
}

/// Whether all font files needed by the renderer are present.
pub fn fonts_available() -> bool {
    let directory = font_directory();
    directory.exists()
        && FONT_FILES
            .iter()
            .map(|name| directory.join(name))
            .all(|path| path.is_file())
}

/// Loads the guide font family, reporting missing files as render errors.
pub fn guide_font_family() -> Result<FontFamily<FontData>> {
    let directory = font_directory();

    let missing: Vec<String> = FONT_FILES
        .iter()
        .map(|name| directory.join(name))
        .filter(|candidate| !candidate.is_file())
        .map(|path| path.display().to_string())
        .collect();
    if !missing.is_empty() {
        return Err(ReportError::render(format!(
            "missing font files: {}. See assets/fonts/README.md or set {}",
            missing.join(", "),
            FONTS_DIR_ENV
        )));
    }

    fonts::from_files(&directory, FONT_FAMILY_NAME, None).map_err(|err| {
        ReportError::render(format!(
            "failed to load font family '{}' from {}: {}",
            FONT_FAMILY_NAME,
            directory.display(),
            err
        ))
    })
}
