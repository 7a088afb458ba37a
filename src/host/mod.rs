//! Host collaborator interfaces.
//!
//! The host editor's package manager, workbench (asset index, diagnostics
//! console, main tool window) and compiler-define store are external
//! collaborators. They are modeled as traits so the core can be driven
//! against the real host in a plugin context, against a shell-command
//! implementation from the CLI, or against recording mocks in tests.

pub mod mock;

pub use mock::{MockDefineStore, MockPackageHost, MockWorkbench};

use crate::error::{PlugsyncError, Result};
use std::process::Command;

/// Terminal outcome of a package install request.
///
/// The host package manager's add request is asynchronous on the host side;
/// implementations of [`PackageHost`] block until one of these terminal
/// states is reached. A reported failure is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    /// The host reported success and identified the installed package.
    Installed { package_id: String },
    /// The host reported failure with a message.
    Failed { message: String },
}

/// The host's package-manager API.
pub trait PackageHost {
    /// Submit an add/upgrade request for a source reference of the form
    /// `<name>@<repoURL>#v<version>` and block until it reaches a terminal
    /// state.
    ///
    /// Returns `Err` only for unexpected transport failures; a failure
    /// reported by the host is returned as [`InstallOutcome::Failed`].
    fn add_package(&self, source_ref: &str) -> Result<InstallOutcome>;
}

/// The host editor's workbench surface.
///
/// All three operations are best-effort from the orchestrator's point of
/// view: failures are logged and never abort a check run.
pub trait Workbench {
    /// Rebuild the host's asset index after packages changed.
    fn refresh_assets(&self) -> Result<()>;

    /// Clear the host's diagnostics console.
    fn clear_diagnostics(&self) -> Result<()>;

    /// Open (or focus, if already open) the host's main tool window.
    ///
    /// Returns `true` if a window was opened or focused. The host is
    /// expected to look up existing instances first, making repeat calls
    /// safe.
    fn open_main_window(&self) -> Result<bool>;
}

/// The host's compiler-define list for the active build-target group.
pub trait DefineStore {
    /// Read the current define tokens.
    fn defines(&self) -> Result<Vec<String>>;

    /// Replace the define tokens. Host define-list writes are idempotent,
    /// so writing an unchanged list is acceptable.
    fn set_defines(&mut self, defines: &[String]) -> Result<()>;
}

/// [`PackageHost`] implementation that delegates to a shell command.
///
/// The command is a template with a `{source}` placeholder substituted
/// with the package source reference, e.g.
/// `vpm add "{source}"`. The command's exit status is the terminal state:
/// zero maps to [`InstallOutcome::Installed`], non-zero to
/// [`InstallOutcome::Failed`].
pub struct ShellPackageHost {
    command_template: String,
}

impl ShellPackageHost {
    /// Create a host that runs the given command template through `sh -c`.
    pub fn new(command_template: impl Into<String>) -> Self {
        Self {
            command_template: command_template.into(),
        }
    }

    fn render(&self, source_ref: &str) -> String {
        self.command_template.replace("{source}", source_ref)
    }
}

impl PackageHost for ShellPackageHost {
    fn add_package(&self, source_ref: &str) -> Result<InstallOutcome> {
        let command = self.render(source_ref);
        tracing::debug!("Running install command: {}", command);

        let output = Command::new("sh")
            .arg("-c")
            .arg(&command)
            .output()
            .map_err(|e| PlugsyncError::Install {
                package: source_ref.to_string(),
                message: format!("failed to spawn install command: {}", e),
            })?;

        if output.status.success() {
            Ok(InstallOutcome::Installed {
                package_id: source_ref.to_string(),
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            Ok(InstallOutcome::Failed {
                message: if stderr.trim().is_empty() {
                    format!("install command exited with {}", output.status)
                } else {
                    stderr.trim().to_string()
                },
            })
        }
    }
}

/// [`Workbench`] implementation for headless CLI use.
///
/// There is no editor attached, so refresh/clear/open are logged no-ops.
#[derive(Debug, Default)]
pub struct LoggingWorkbench;

impl Workbench for LoggingWorkbench {
    fn refresh_assets(&self) -> Result<()> {
        tracing::info!("Asset refresh requested (no host editor attached)");
        Ok(())
    }

    fn clear_diagnostics(&self) -> Result<()> {
        tracing::debug!("Diagnostics clear requested (no host editor attached)");
        Ok(())
    }

    fn open_main_window(&self) -> Result<bool> {
        tracing::debug!("Main window open requested (no host editor attached)");
        Ok(false)
    }
}
