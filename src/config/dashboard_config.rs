use crate::config::substitute_env_vars;
use crate::dashboard::page::{Layout, PageConfig};
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_range, validate_required_field, validate_url, Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub page: PageSection,
    pub odoo: OdooSection,
    pub cache: CacheSection,
    pub close: CloseSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PageSection {
    pub title: String,
    pub icon: String,
    pub layout: String,
    pub sidebar_expanded: bool,
}

impl Default for PageSection {
    fn default() -> Self {
        Self {
            title: "LAB Groep Dashboard".to_string(),
            icon: "📊".to_string(),
            layout: "wide".to_string(),
            sidebar_expanded: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OdooSection {
    pub url: String,
    pub database: String,
    pub uid: i64,
    pub api_key: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for OdooSection {
    fn default() -> Self {
        Self {
            url: "https://lab.odoo.works/jsonrpc".to_string(),
            database: "bluezebra-works-nl-vestingh-production-13415483".to_string(),
            uid: 37,
            api_key: None,
            timeout_seconds: 120,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSection {
    /// TTL for aggregated revenue/cost metrics.
    pub metrics_ttl_seconds: u64,
    /// TTL for balance lookups, which should stay close to live.
    pub balances_ttl_seconds: u64,
}

impl Default for CacheSection {
    fn default() -> Self {
        Self {
            metrics_ttl_seconds: 3600,
            balances_ttl_seconds: 300,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CloseSection {
    /// Password for the maandafsluiting view. Unset means the view stays
    /// locked but the rest of the dashboard keeps working.
    pub password: Option<String>,
}

impl DashboardConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content)?;
        let mut config: Self =
            toml::from_str(&processed).map_err(|e| ReportError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.drop_unresolved_secrets();
        Ok(config)
    }

    /// A `${VAR}` left in a secret after substitution means the variable was
    /// not set; treat that as absent instead of using the placeholder.
    fn drop_unresolved_secrets(&mut self) {
        if matches!(&self.odoo.api_key, Some(key) if key.contains("${")) {
            self.odoo.api_key = None;
        }
        if matches!(&self.close.password, Some(pw) if pw.contains("${")) {
            self.close.password = None;
        }
    }

    /// Builds the typed page configuration, rejecting unknown layouts before
    /// anything is rendered.
    pub fn page_config(&self) -> Result<PageConfig> {
        let layout = Layout::from_str(&self.page.layout)?;
        Ok(
            PageConfig::new(self.page.title.clone(), self.page.icon.clone(), layout)
                .with_sidebar_expanded(self.page.sidebar_expanded),
        )
    }
}

impl Validate for DashboardConfig {
    fn validate(&self) -> Result<()> {
        validate_url("odoo.url", &self.odoo.url)?;
        validate_non_empty_string("odoo.database", &self.odoo.database)?;
        if self.odoo.uid < 1 {
            return Err(ReportError::InvalidConfigValueError {
                field: "odoo.uid".to_string(),
                value: self.odoo.uid.to_string(),
                reason: "Odoo uid must be a positive user id".to_string(),
            });
        }
        validate_required_field("odoo.api_key", &self.odoo.api_key)?;
        validate_range("odoo.timeout_seconds", self.odoo.timeout_seconds, 1, 600)?;
        validate_range(
            "cache.metrics_ttl_seconds",
            self.cache.metrics_ttl_seconds,
            1,
            86_400,
        )?;
        validate_range(
            "cache.balances_ttl_seconds",
            self.cache.balances_ttl_seconds,
            1,
            86_400,
        )?;
        validate_non_empty_string("page.title", &self.page.title)?;
        Layout::from_str(&self.page.layout)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_lab_odoo_instance() {
        let config = DashboardConfig::default();
        assert_eq!(config.odoo.url, "https://lab.odoo.works/jsonrpc");
        assert_eq!(config.odoo.uid, 37);
        assert_eq!(config.cache.metrics_ttl_seconds, 3600);
        assert_eq!(config.page.title, "LAB Groep Dashboard");
    }

    #[test]
    fn api_key_is_required_for_validation() {
        let config = DashboardConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ReportError::MissingConfigError { .. })
        ));

        let mut with_key = DashboardConfig::default();
        with_key.odoo.api_key = Some("secret".to_string());
        assert!(with_key.validate().is_ok());
    }

    #[test]
    fn unresolved_env_placeholder_counts_as_absent() {
        let config = DashboardConfig::from_toml_str(
            r#"
[odoo]
api_key = "${LAB_REPORTING_UNSET_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.odoo.api_key, None);
    }

    #[test]
    fn api_key_resolves_from_environment() {
        std::env::set_var("LAB_REPORTING_TEST_KEY", "odoo-key");
        let config = DashboardConfig::from_toml_str(
            r#"
[odoo]
api_key = "${LAB_REPORTING_TEST_KEY}"
"#,
        )
        .unwrap();
        assert_eq!(config.odoo.api_key.as_deref(), Some("odoo-key"));
        std::env::remove_var("LAB_REPORTING_TEST_KEY");
    }

    #[test]
    fn unknown_layout_is_rejected_before_rendering() {
        let config = DashboardConfig::from_toml_str(
            r#"
[page]
layout = "fullscreen"
"#,
        )
        .unwrap();
        assert!(config.page_config().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn page_config_carries_the_sidebar_flag() {
        let config = DashboardConfig::from_toml_str(
            r#"
[page]
title = "LAB Groep Dashboard"
icon = "📊"
layout = "wide"
sidebar_expanded = false
"#,
        )
        .unwrap();
        let page = config.page_config().unwrap();
        assert_eq!(page.layout, Layout::Wide);
        assert!(!page.sidebar_expanded);
    }
}
