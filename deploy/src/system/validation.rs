//! Input validation utilities

use regex::Regex;
use std::sync::LazyLock;

use crate::config::split_sites;

type Pattern = LazyLock<Result<Regex, regex::Error>>;

static USERNAME: Pattern = LazyLock::new(|| Regex::new(r"^[a-z_][a-z0-9_-]{0,31}$"));
static HOSTNAME: Pattern = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?(\.[A-Za-z0-9]([A-Za-z0-9-]{0,61}[A-Za-z0-9])?)*$")
});
static EMAIL: Pattern = LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$"));
static PROJECT_NAME: Pattern = LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9_-]*$"));

fn is_match(pattern: &Pattern, value: &str) -> Result<bool, String> {
    pattern
        .as_ref()
        .map(|re| re.is_match(value))
        .map_err(|e| format!("validation pattern failed to compile: {e}"))
}

/// Validate a POSIX-style login name
pub fn validate_username(username: &str) -> Result<(), String> {
    if is_match(&USERNAME, username)? {
        Ok(())
    } else {
        Err(format!(
            "Invalid username '{username}'. Use lowercase letters, digits, dash or underscore (1-32 chars)."
        ))
    }
}

/// Validate a comma-separated list of site host names
pub fn validate_sites(sites: &str) -> Result<(), String> {
    let list = split_sites(sites);
    if list.is_empty() {
        return Err("At least one site name is required.".to_string());
    }
    for site in list {
        if !is_match(&HOSTNAME, site)? {
            return Err(format!("'{site}' is not a valid site name."));
        }
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), String> {
    if is_match(&EMAIL, email)? {
        Ok(())
    } else {
        Err(format!("'{email}' is not a valid email address."))
    }
}

/// Validate a compose project name
pub fn validate_project_name(name: &str) -> Result<(), String> {
    if is_match(&PROJECT_NAME, name)? {
        Ok(())
    } else {
        Err(format!(
            "Invalid project name '{name}'. Use lowercase letters, digits, dash or underscore, starting with a letter or digit."
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        for pattern in [&USERNAME, &HOSTNAME, &EMAIL, &PROJECT_NAME] {
            assert!(pattern.is_ok());
        }
    }

    #[test]
    fn test_username() {
        assert!(validate_username("frappe").is_ok());
        assert!(validate_username("erp_user-1").is_ok());
        assert!(validate_username("").is_err());
        assert!(validate_username("Root").is_err());
        assert!(validate_username("1user").is_err());
        assert!(validate_username(&"a".repeat(33)).is_err());
    }

    #[test]
    fn test_sites() {
        assert!(validate_sites("shop.example.com").is_ok());
        assert!(validate_sites("a.example.com, b.example.com").is_ok());
        assert!(validate_sites("localhost").is_ok());
        assert!(validate_sites("").is_err());
        assert!(validate_sites(" , ").is_err());
        assert!(validate_sites("shop example.com").is_err());
        assert!(validate_sites("-bad.example.com").is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("admin@example.com").is_ok());
        assert!(validate_email("admin@localhost").is_err());
        assert!(validate_email("admin.example.com").is_err());
    }

    #[test]
    fn test_project_name() {
        assert!(validate_project_name("erpnext_docker").is_ok());
        assert!(validate_project_name("shop-1").is_ok());
        assert!(validate_project_name("_shop").is_err());
        assert!(validate_project_name("Shop").is_err());
        assert!(validate_project_name("").is_err());
    }
}
