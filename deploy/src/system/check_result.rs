//! Prerequisite check result structures

use colored::*;

/// Result of a single prerequisite check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckItem {
    pub name: String,
    pub status: CheckStatus,
    pub message: String,
}

/// Status of a prerequisite check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Ok,
    Warning,
    Error,
}

impl CheckItem {
    pub fn ok(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Ok, message)
    }

    pub fn warning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Warning, message)
    }

    pub fn error(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::with_status(name, CheckStatus::Error, message)
    }

    fn with_status(name: impl Into<String>, status: CheckStatus, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            message: message.into(),
        }
    }

    /// Get the status icon
    pub fn icon(&self) -> &'static str {
        match self.status {
            CheckStatus::Ok => "✅",
            CheckStatus::Warning => "⚠️ ",
            CheckStatus::Error => "❌",
        }
    }
}

/// Collected prerequisite results
#[derive(Debug, Default)]
pub struct PrerequisiteReport {
    pub items: Vec<CheckItem>,
}

impl PrerequisiteReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_item(&mut self, item: CheckItem) {
        self.items.push(item);
    }

    pub fn all_critical_ok(&self) -> bool {
        self.items.iter().all(|item| item.status != CheckStatus::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CheckItem> {
        self.items.iter().filter(|item| item.status == CheckStatus::Warning)
    }

    pub fn render(&self) -> String {
        let mut lines: Vec<String> = self
            .items
            .iter()
            .map(|item| format!("{} {}: {}", item.icon(), item.name, item.message))
            .collect();
        lines.push(String::new());
        lines.push(if self.all_critical_ok() {
            "🎉 All prerequisites are satisfied!".bright_green().bold().to_string()
        } else {
            "❌ Some prerequisites are missing!".bright_red().bold().to_string()
        });
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_tracks_errors_and_warnings() {
        let mut report = PrerequisiteReport::new();
        report.add_item(CheckItem::ok("Privileges", "running as root"));
        report.add_item(CheckItem::warning("Environment file", "no .env, using empty defaults"));
        assert!(report.all_critical_ok());
        assert_eq!(report.warnings().count(), 1);

        report.add_item(CheckItem::error("Command", "git (missing)"));
        assert!(!report.all_critical_ok());
        assert!(report.render().contains("❌ Command: git (missing)"));
    }
}
