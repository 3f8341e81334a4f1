//! Compose fragment selection

use std::fmt;

use crate::config::Configuration;

/// One compose file of the stack, relative to the deployment checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeFragment {
    /// Framework services (workers, scheduler, socketio, redis)
    Core,
    /// Application services
    Application,
    /// Database and shared volumes
    Common,
    /// Published ports and the proxy network
    Networking,
}

impl ComposeFragment {
    pub fn path(&self) -> &'static str {
        match self {
            ComposeFragment::Core => "installation/docker-compose-frappe.yml",
            ComposeFragment::Application => "installation/docker-compose-erpnext.yml",
            ComposeFragment::Common => "installation/docker-compose-common.yml",
            ComposeFragment::Networking => "installation/erpnext-publish.yml",
        }
    }
}

impl fmt::Display for ComposeFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Ordered fragments for one run.
///
/// Later fragments are layered over earlier ones by compose, so the order is
/// part of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeSelection {
    fragments: Vec<ComposeFragment>,
}

impl ComposeSelection {
    pub fn new(setup_networking: bool) -> Self {
        let mut fragments = vec![
            ComposeFragment::Core,
            ComposeFragment::Application,
            ComposeFragment::Common,
        ];
        if setup_networking {
            fragments.push(ComposeFragment::Networking);
        }
        Self { fragments }
    }

    pub fn for_configuration(config: &Configuration) -> Self {
        Self::new(config.setup_networking())
    }

    pub fn fragments(&self) -> &[ComposeFragment] {
        &self.fragments
    }

    /// `-f <path>` pairs in selection order
    pub fn file_args(&self) -> Vec<String> {
        self.fragments
            .iter()
            .flat_map(|fragment| ["-f".to_string(), fragment.path().to_string()])
            .collect()
    }
}
