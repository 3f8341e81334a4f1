//! Negotiated deployment configuration

use std::fmt;

use crate::envfile::{self, EnvFile};

/// Release line installed by the deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallVersion {
    Edge,
    Version13,
    Version12,
}

impl InstallVersion {
    /// Menu order
    pub const ALL: [InstallVersion; 3] = [
        InstallVersion::Edge,
        InstallVersion::Version13,
        InstallVersion::Version12,
    ];

    /// Value written to the `VERSION` key
    pub fn as_str(&self) -> &'static str {
        match self {
            InstallVersion::Edge => "edge",
            InstallVersion::Version13 => "version-13",
            InstallVersion::Version12 => "version-12",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.as_str() == value.trim())
    }
}

impl fmt::Display for InstallVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the stack is reachable from outside the host.
///
/// Certificate automation only exists as a refinement of public networking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Exposure {
    /// No externally reachable networking
    Local,
    /// Published ports, no certificate automation
    Public,
    /// Published ports with Let's Encrypt certificates for `email`
    PublicWithCertificates { email: String },
}

/// Settings for one deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub install_version: InstallVersion,
    pub mysql_root_password: String,
    pub sites: String,
    pub exposure: Exposure,
}

impl Configuration {
    pub fn setup_networking(&self) -> bool {
        !matches!(self.exposure, Exposure::Local)
    }

    pub fn setup_letsencrypt(&self) -> bool {
        matches!(self.exposure, Exposure::PublicWithCertificates { .. })
    }

    pub fn letsencrypt_email(&self) -> Option<&str> {
        match &self.exposure {
            Exposure::PublicWithCertificates { email } => Some(email),
            _ => None,
        }
    }

    /// Site names listed in `sites`, in order
    pub fn site_list(&self) -> Vec<&str> {
        split_sites(&self.sites)
    }

    /// Persisted form. `LETSENCRYPT_EMAIL` is only present with certificates.
    pub fn to_env_file(&self) -> EnvFile {
        let mut env = EnvFile::new();
        env.set(envfile::VERSION, self.install_version.as_str());
        env.set(envfile::MYSQL_ROOT_PASSWORD, &self.mysql_root_password);
        env.set(envfile::SITES, &self.sites);
        if let Some(email) = self.letsencrypt_email() {
            env.set(envfile::LETSENCRYPT_EMAIL, email);
        }
        env
    }

    /// Human readable summary with the password masked
    pub fn summary(&self) -> String {
        let yes_no = |b: bool| if b { "yes" } else { "no" };
        let mut lines = vec![
            "📋 Configuration Summary:".to_string(),
            format!("  • Version: {}", self.install_version),
            format!(
                "  • MySQL root password: {}",
                "*".repeat(self.mysql_root_password.chars().count().clamp(1, 12))
            ),
            format!("  • Sites: {}", self.sites),
            format!("  • Networking: {}", yes_no(self.setup_networking())),
            format!("  • Let's Encrypt: {}", yes_no(self.setup_letsencrypt())),
        ];
        if let Some(email) = self.letsencrypt_email() {
            lines.push(format!("  • Let's Encrypt email: {email}"));
        }
        lines.join("\n")
    }

    /// Freeze the configuration together with its serialized file content
    pub fn confirm(self) -> ConfirmedConfiguration {
        let snapshot = self.to_env_file().render();
        ConfirmedConfiguration {
            config: self,
            snapshot,
        }
    }
}

/// Configuration accepted by the user, immutable from here on.
///
/// `snapshot` is the exact environment file content written at the end of the
/// wizard and reused by the deployment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmedConfiguration {
    config: Configuration,
    snapshot: String,
}

impl ConfirmedConfiguration {
    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn snapshot(&self) -> &str {
        &self.snapshot
    }
}

pub(crate) fn split_sites(sites: &str) -> Vec<&str> {
    sites
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(exposure: Exposure) -> Configuration {
        Configuration {
            install_version: InstallVersion::Edge,
            mysql_root_password: "secret123".to_string(),
            sites: "shop.example.com".to_string(),
            exposure,
        }
    }

    #[test]
    fn test_letsencrypt_implies_networking() {
        let local = config(Exposure::Local);
        assert!(!local.setup_networking());
        assert!(!local.setup_letsencrypt());

        let public = config(Exposure::Public);
        assert!(public.setup_networking());
        assert!(!public.setup_letsencrypt());

        let certs = config(Exposure::PublicWithCertificates {
            email: "admin@example.com".to_string(),
        });
        assert!(certs.setup_networking());
        assert!(certs.setup_letsencrypt());
    }

    #[test]
    fn test_email_line_only_with_certificates() {
        let env = config(Exposure::Public).to_env_file();
        assert!(!env.contains(envfile::LETSENCRYPT_EMAIL));
        assert!(!env.render().contains("LETSENCRYPT_EMAIL"));

        let env = config(Exposure::PublicWithCertificates {
            email: "admin@example.com".to_string(),
        })
        .to_env_file();
        assert_eq!(
            env.render(),
            "VERSION=edge\nMYSQL_ROOT_PASSWORD=secret123\nSITES=shop.example.com\nLETSENCRYPT_EMAIL=admin@example.com\n"
        );
    }

    #[test]
    fn test_summary_masks_password() {
        let summary = config(Exposure::Local).summary();
        assert!(!summary.contains("secret123"));
        assert!(summary.contains("*********"));
        assert!(summary.contains("shop.example.com"));
        assert!(!summary.contains("email"));
    }

    #[test]
    fn test_confirm_snapshot_matches_rendered_file() {
        let cfg = config(Exposure::Public);
        let expected = cfg.to_env_file().render();
        let confirmed = cfg.clone().confirm();
        assert_eq!(confirmed.snapshot(), expected);
        assert_eq!(confirmed.config(), &cfg);
    }

    #[test]
    fn test_version_strings() {
        assert_eq!(InstallVersion::parse("edge"), Some(InstallVersion::Edge));
        assert_eq!(InstallVersion::parse("version-12"), Some(InstallVersion::Version12));
        assert_eq!(InstallVersion::parse("v13"), None);
    }

    #[test]
    fn test_site_list_splits_and_trims() {
        let mut cfg = config(Exposure::Local);
        cfg.sites = " a.example.com , ,b.example.com".to_string();
        assert_eq!(cfg.site_list(), vec!["a.example.com", "b.example.com"]);
    }
}
