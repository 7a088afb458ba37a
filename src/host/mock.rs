//! Recording mock implementations of the host collaborator traits.
//!
//! Used by unit and scenario tests to script host behavior and assert on
//! the calls the core made.

use super::{DefineStore, InstallOutcome, PackageHost, Workbench};
use crate::error::{PlugsyncError, Result};
use std::cell::RefCell;
use std::collections::HashMap;

/// A scripted [`PackageHost`] that records every submitted source reference.
pub struct MockPackageHost {
    /// Source refs received, in order.
    pub requests: RefCell<Vec<String>>,
    /// Outcome per source ref; refs without an entry use `default_outcome`.
    outcomes: HashMap<String, InstallOutcome>,
    default_outcome: InstallOutcome,
    /// When set, every call returns this error instead of an outcome.
    fail_transport: Option<String>,
}

impl MockPackageHost {
    /// A host where every install succeeds.
    pub fn succeeding() -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            outcomes: HashMap::new(),
            default_outcome: InstallOutcome::Installed {
                package_id: "mock".to_string(),
            },
            fail_transport: None,
        }
    }

    /// A host where every install is reported as failed.
    pub fn failing(message: &str) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            outcomes: HashMap::new(),
            default_outcome: InstallOutcome::Failed {
                message: message.to_string(),
            },
            fail_transport: None,
        }
    }

    /// A host whose submissions fail at the transport level.
    pub fn broken(message: &str) -> Self {
        Self {
            requests: RefCell::new(Vec::new()),
            outcomes: HashMap::new(),
            default_outcome: InstallOutcome::Failed {
                message: String::new(),
            },
            fail_transport: Some(message.to_string()),
        }
    }

    /// Script a specific outcome for one source reference.
    pub fn with_outcome(mut self, source_ref: &str, outcome: InstallOutcome) -> Self {
        self.outcomes.insert(source_ref.to_string(), outcome);
        self
    }

    /// Number of install requests received.
    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl PackageHost for MockPackageHost {
    fn add_package(&self, source_ref: &str) -> Result<InstallOutcome> {
        self.requests.borrow_mut().push(source_ref.to_string());

        if let Some(message) = &self.fail_transport {
            return Err(PlugsyncError::Install {
                package: source_ref.to_string(),
                message: message.clone(),
            });
        }

        Ok(self
            .outcomes
            .get(source_ref)
            .cloned()
            .unwrap_or_else(|| self.default_outcome.clone()))
    }
}

/// A [`Workbench`] that counts calls to each operation.
#[derive(Default)]
pub struct MockWorkbench {
    pub refreshes: RefCell<usize>,
    pub clears: RefCell<usize>,
    pub window_opens: RefCell<usize>,
    /// When true, refresh and clear return errors (still best-effort for
    /// the orchestrator).
    pub fail_maintenance: bool,
}

impl MockWorkbench {
    pub fn new() -> Self {
        Self::default()
    }

    /// A workbench whose refresh/clear operations fail.
    pub fn failing_maintenance() -> Self {
        Self {
            fail_maintenance: true,
            ..Self::default()
        }
    }

    pub fn refresh_count(&self) -> usize {
        *self.refreshes.borrow()
    }

    pub fn clear_count(&self) -> usize {
        *self.clears.borrow()
    }

    pub fn window_open_count(&self) -> usize {
        *self.window_opens.borrow()
    }
}

impl Workbench for MockWorkbench {
    fn refresh_assets(&self) -> Result<()> {
        *self.refreshes.borrow_mut() += 1;
        if self.fail_maintenance {
            return Err(PlugsyncError::Other(anyhow::anyhow!("refresh failed")));
        }
        Ok(())
    }

    fn clear_diagnostics(&self) -> Result<()> {
        *self.clears.borrow_mut() += 1;
        if self.fail_maintenance {
            return Err(PlugsyncError::Other(anyhow::anyhow!("clear failed")));
        }
        Ok(())
    }

    fn open_main_window(&self) -> Result<bool> {
        *self.window_opens.borrow_mut() += 1;
        Ok(true)
    }
}

/// An in-memory [`DefineStore`] that counts writes.
#[derive(Debug, Default)]
pub struct MockDefineStore {
    defines: Vec<String>,
    pub writes: usize,
}

impl MockDefineStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing define list.
    pub fn with_defines(defines: &[&str]) -> Self {
        Self {
            defines: defines.iter().map(|s| s.to_string()).collect(),
            writes: 0,
        }
    }

    /// Current define list.
    pub fn current(&self) -> &[String] {
        &self.defines
    }
}

impl DefineStore for MockDefineStore {
    fn defines(&self) -> Result<Vec<String>> {
        Ok(self.defines.clone())
    }

    fn set_defines(&mut self, defines: &[String]) -> Result<()> {
        self.defines = defines.to_vec();
        self.writes += 1;
        Ok(())
    }
}
