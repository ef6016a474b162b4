//! Page session bootstrap.
//!
//! The presentation shell (title, icon, layout) is configured exactly once
//! per session, before anything is rendered. The session is an explicit
//! context value threaded through the dashboard code rather than ambient
//! process state, which makes the single-call invariant enforceable.

use crate::utils::error::{ReportError, Result};
use crate::utils::validation::validate_non_empty_string;
use std::fmt;
use std::str::FromStr;

/// Content width of the hosted page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Layout {
    Centered,
    #[default]
    Wide,
}

impl Layout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Centered => "centered",
            Self::Wide => "wide",
        }
    }
}

impl FromStr for Layout {
    type Err = ReportError;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "centered" => Ok(Self::Centered),
            "wide" => Ok(Self::Wide),
            other => Err(ReportError::InvalidConfigValueError {
                field: "page.layout".to_string(),
                value: other.to_string(),
                reason: "Supported layouts: centered, wide".to_string(),
            }),
        }
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageConfig {
    pub title: String,
    pub icon: String,
    pub layout: Layout,
    pub sidebar_expanded: bool,
}

impl PageConfig {
    pub fn new(title: impl Into<String>, icon: impl Into<String>, layout: Layout) -> Self {
        Self {
            title: title.into(),
            icon: icon.into(),
            layout,
            sidebar_expanded: true,
        }
    }

    pub fn with_sidebar_expanded(mut self, expanded: bool) -> Self {
        self.sidebar_expanded = expanded;
        self
    }
}

/// One user session of the hosted dashboard page.
#[derive(Debug, Default)]
pub struct DashboardSession {
    page: Option<PageConfig>,
    render_started: bool,
}

impl DashboardSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the page configuration. Fails once rendering has begun or
    /// when a configuration is already in place; the first configuration
    /// stays in effect in both cases.
    pub fn configure_page(&mut self, config: PageConfig) -> Result<()> {
        if self.render_started {
            return Err(ReportError::configuration(
                "configure_page must run before any rendering call",
            ));
        }
        if self.page.is_some() {
            return Err(ReportError::configuration(
                "page already configured for this session",
            ));
        }

        validate_non_empty_string("page.title", &config.title)?;
        validate_non_empty_string("page.icon", &config.icon)?;
        self.page = Some(config);
        Ok(())
    }

    pub fn page(&self) -> Option<&PageConfig> {
        self.page.as_ref()
    }

    pub fn render_started(&self) -> bool {
        self.render_started
    }

    /// Marks the session as rendering and hands out the installed page
    /// configuration.
    pub fn begin_render(&mut self) -> Result<&PageConfig> {
        if self.page.is_none() {
            return Err(ReportError::configuration(
                "configure_page must run before rendering",
            ));
        }
        self.render_started = true;
        self.page
            .as_ref()
            .ok_or_else(|| ReportError::configuration("page configuration missing"))
    }
}
