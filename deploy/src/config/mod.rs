//! Configuration: installer settings, the negotiated deployment configuration
//! and the wizard producing it

mod configuration;
mod settings;
mod wizard;

pub use configuration::{Configuration, ConfirmedConfiguration, Exposure, InstallVersion};
pub(crate) use configuration::split_sites;
pub use settings::InstallerSettings;
pub use wizard::{ConfigWizard, WizardDefaults};
