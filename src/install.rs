//! Package installation through the host package manager.

use crate::error::Result;
use crate::host::{InstallOutcome, PackageHost};

/// Build the source reference submitted to the host package manager.
///
/// Format: `<name>@<repoURL>#v<version>`.
pub fn source_ref(package_name: &str, version: &str, repo_url: &str) -> String {
    format!("{}@{}#v{}", package_name, repo_url, version)
}

/// Installs or upgrades packages via a [`PackageHost`].
pub struct Installer<'a> {
    host: &'a dyn PackageHost,
}

impl<'a> Installer<'a> {
    /// Create an installer backed by the given host.
    pub fn new(host: &'a dyn PackageHost) -> Self {
        Self { host }
    }

    /// Install `package_name` at `version` from `repo_url`, blocking until
    /// the host reports a terminal state.
    ///
    /// Returns `Ok(true)` on reported success and `Ok(false)` on reported
    /// failure (the failure is logged here). Only unexpected transport
    /// errors propagate as `Err`.
    pub fn install(&self, package_name: &str, version: &str, repo_url: &str) -> Result<bool> {
        let source = source_ref(package_name, version, repo_url);
        tracing::info!("Installing package: {}", source);

        match self.host.add_package(&source)? {
            InstallOutcome::Installed { package_id } => {
                tracing::info!("Package added successfully: {}", package_id);
                Ok(true)
            }
            InstallOutcome::Failed { message } => {
                tracing::error!("Failed to add package {}: {}", package_name, message);
                Ok(false)
            }
        }
    }
}
