pub mod cli;
pub mod dashboard_config;
pub mod export_config;

use crate::utils::error::Result;

/// Replaces `${VAR_NAME}` placeholders with environment values. Unresolved
/// placeholders are left in place so validation can flag them with the field
/// they belong to.
pub(crate) fn substitute_env_vars(content: &str) -> Result<String> {
    use regex::Regex;
    let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

    let result = re.replace_all(content, |caps: &regex::Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    });

    Ok(result.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_vars_are_substituted() {
        std::env::set_var("LAB_REPORTING_TEST_VAR", "resolved");
        let output = substitute_env_vars("key = \"${LAB_REPORTING_TEST_VAR}\"").unwrap();
        assert_eq!(output, "key = \"resolved\"");
        std::env::remove_var("LAB_REPORTING_TEST_VAR");
    }

    #[test]
    fn unknown_vars_stay_in_place() {
        let output = substitute_env_vars("key = \"${LAB_REPORTING_MISSING_VAR}\"").unwrap();
        assert!(output.contains("${LAB_REPORTING_MISSING_VAR}"));
    }
}
