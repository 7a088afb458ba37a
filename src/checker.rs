//! Dependency check orchestration.
//!
//! [`DependencyChecker`] drives one check run: fetch every tracked
//! dependency's remote version, short-circuit when the persisted cache
//! already matches, otherwise compare against the local manifest and
//! install whatever is missing or outdated. Finalization (asset refresh,
//! diagnostics clear, cache write) is guarded so it runs exactly once per
//! run, no matter how the run ends.
//!
//! A run is not re-entrant: `run` takes `&mut self`, so a single checker
//! instance can only have one run in flight.

use std::collections::BTreeMap;

use crate::cache::CheckCache;
use crate::config::TrackedDependency;
use crate::error::PlugsyncError;
use crate::host::{PackageHost, Workbench};
use crate::install::Installer;
use crate::manifest::ManifestReader;
use crate::remote::VersionFetcher;

/// Terminal state of one tracked dependency within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyOutcome {
    /// Covered by a fresh cached check; nothing was inspected or installed.
    Fresh,
    /// Already installed at the remote version; no install issued.
    Skipped,
    /// Installed or upgraded successfully this run.
    Installed,
    /// The host reported an install failure (or the submission itself
    /// failed); will be retried next run.
    Failed,
    /// The remote version could not be fetched; excluded from the cache
    /// write so the next run retries.
    Unresolved,
}

/// Per-dependency result of a check run.
#[derive(Debug, Clone)]
pub struct DependencyReport {
    pub name: String,
    /// Remote version, when the fetch succeeded.
    pub remote_version: Option<String>,
    pub outcome: DependencyOutcome,
}

/// Summary of one completed check run.
#[derive(Debug, Clone, Default)]
pub struct CheckReport {
    pub dependencies: Vec<DependencyReport>,
    /// Dependencies that needed an install this run.
    pub total_updates_needed: usize,
    /// Installs the host reported as successful.
    pub updates_completed: usize,
    /// Whole run was satisfied by the cached check.
    pub fresh: bool,
}

impl CheckReport {
    /// True when every needed update completed (vacuously true for a fresh
    /// or all-skipped run).
    pub fn fully_updated(&self) -> bool {
        self.updates_completed == self.total_updates_needed
    }
}

/// Transient per-run counters and the finalize guard.
///
/// Constructed fresh at the start of every run and discarded with it, so
/// no state leaks across runs.
#[derive(Debug, Default)]
struct CheckRun {
    total_updates_needed: usize,
    updates_completed: usize,
    finalized: bool,
}

impl CheckRun {
    fn note_needed(&mut self) {
        self.total_updates_needed += 1;
    }

    fn note_completed(&mut self) {
        self.updates_completed += 1;
        debug_assert!(self.updates_completed <= self.total_updates_needed);
    }

    fn all_completed(&self) -> bool {
        self.updates_completed == self.total_updates_needed
    }
}

/// Verifies and repairs the tracked companion packages.
pub struct DependencyChecker<'a> {
    dependencies: Vec<TrackedDependency>,
    fetcher: VersionFetcher,
    manifest: ManifestReader,
    cache: CheckCache,
    host: &'a dyn PackageHost,
    workbench: &'a dyn Workbench,
    window_opened: bool,
}

impl<'a> DependencyChecker<'a> {
    /// Create a checker over a fixed set of tracked dependencies.
    pub fn new(
        dependencies: Vec<TrackedDependency>,
        fetcher: VersionFetcher,
        manifest: ManifestReader,
        cache: CheckCache,
        host: &'a dyn PackageHost,
        workbench: &'a dyn Workbench,
    ) -> Self {
        Self {
            dependencies,
            fetcher,
            manifest,
            cache,
            host,
            workbench,
            window_opened: false,
        }
    }

    /// The tracked dependency set.
    pub fn dependencies(&self) -> &[TrackedDependency] {
        &self.dependencies
    }

    /// Startup sequence: run the check, then open the host's main tool
    /// window once per checker instance.
    ///
    /// The window opens whatever the check outcome was; check problems are
    /// surfaced only through logs.
    pub fn run_at_startup(&mut self) -> CheckReport {
        let report = self.run();
        self.open_window_once();
        report
    }

    /// Execute one check run.
    ///
    /// Never fails: every error is handled where it occurs (logged, and
    /// reflected in the per-dependency outcome) and finalization always
    /// happens.
    pub fn run(&mut self) -> CheckReport {
        tracing::info!(
            "Checking {} tracked dependencies",
            self.dependencies.len()
        );

        // Fetch all remote versions up front. Finalize's cache payload is
        // derived from this map, so an early finalize writes the same
        // content as the final one.
        let fetched = self.fetch_remote_versions();
        let obtained: BTreeMap<String, String> = fetched
            .iter()
            .filter_map(|(dep, version)| {
                version.as_ref().map(|v| (dep.name.clone(), v.clone()))
            })
            .collect();

        let mut run = CheckRun::default();

        // Fresh-check short circuit: only when every tracked dependency
        // resolved a remote version, since an unresolved one can never be
        // skipped.
        if obtained.len() == self.dependencies.len() && self.cache.has_fresh_check(&obtained) {
            tracing::info!("Dependency check is fresh; no installation needed");
            let dependencies = fetched
                .into_iter()
                .map(|(dep, version)| DependencyReport {
                    name: dep.name,
                    remote_version: version,
                    outcome: DependencyOutcome::Fresh,
                })
                .collect();
            self.finalize(&mut run, &obtained);
            return CheckReport {
                dependencies,
                total_updates_needed: 0,
                updates_completed: 0,
                fresh: true,
            };
        }

        let mut reports = Vec::with_capacity(fetched.len());
        for (dep, version) in &fetched {
            let outcome = match version {
                Some(version) => self.check_one(dep, version, &mut run, &obtained),
                None => DependencyOutcome::Unresolved,
            };
            reports.push(DependencyReport {
                name: dep.name.clone(),
                remote_version: version.clone(),
                outcome,
            });
        }

        self.finalize(&mut run, &obtained);

        if run.updates_completed < run.total_updates_needed {
            tracing::warn!(
                "Not all updates were completed ({}/{})",
                run.updates_completed,
                run.total_updates_needed
            );
        }

        CheckReport {
            dependencies: reports,
            total_updates_needed: run.total_updates_needed,
            updates_completed: run.updates_completed,
            fresh: false,
        }
    }

    /// Fetch remote versions for lookups without side effects.
    ///
    /// Used by the CLI's `status` command; failures are logged and yield
    /// `None` just as in a full run.
    pub fn fetch_remote_versions(&self) -> Vec<(TrackedDependency, Option<String>)> {
        self.dependencies
            .iter()
            .map(|dep| {
                let version = match self.fetcher.fetch_version(&dep.manifest_url) {
                    Ok(version) => {
                        tracing::debug!("{} remote version: {}", dep.name, version);
                        Some(version)
                    }
                    Err(e) => {
                        tracing::error!("Could not fetch version for {}: {}", dep.name, e);
                        None
                    }
                };
                (dep.clone(), version)
            })
            .collect()
    }

    /// Check whether `name` is installed at `version` in the local manifest.
    ///
    /// A missing or unreadable manifest means nothing is installed, which
    /// forces an install attempt.
    pub fn is_installed_locally(&self, name: &str, version: &str) -> bool {
        match self.manifest.is_installed_at(name, version) {
            Ok(installed) => installed,
            Err(PlugsyncError::ManifestMissing { path }) => {
                tracing::warn!(
                    "Local manifest not found at {}; treating {} as not installed",
                    path.display(),
                    name
                );
                false
            }
            Err(e) => {
                tracing::warn!(
                    "Could not read local manifest ({}); treating {} as not installed",
                    e,
                    name
                );
                false
            }
        }
    }

    fn check_one(
        &self,
        dep: &TrackedDependency,
        version: &str,
        run: &mut CheckRun,
        obtained: &BTreeMap<String, String>,
    ) -> DependencyOutcome {
        if self.is_installed_locally(&dep.name, version) {
            tracing::debug!("{} already at {}", dep.name, version);
            return DependencyOutcome::Skipped;
        }

        run.note_needed();
        let installer = Installer::new(self.host);
        match installer.install(&dep.name, version, &dep.repo_url) {
            Ok(true) => {
                run.note_completed();
                if run.all_completed() {
                    // The counters can balance before later dependencies
                    // were examined; finalize is idempotent so this early
                    // trigger is harmless.
                    self.finalize(run, obtained);
                }
                DependencyOutcome::Installed
            }
            Ok(false) => DependencyOutcome::Failed,
            Err(e) => {
                tracing::error!("Install submission for {} failed: {}", dep.name, e);
                DependencyOutcome::Failed
            }
        }
    }

    /// Refresh the host asset index, clear diagnostics, and persist the
    /// verified versions. Runs its effects at most once per [`CheckRun`];
    /// every step is best-effort.
    fn finalize(&self, run: &mut CheckRun, obtained: &BTreeMap<String, String>) {
        if run.finalized {
            return;
        }
        run.finalized = true;

        tracing::info!("Finalizing dependency check");
        if let Err(e) = self.workbench.refresh_assets() {
            tracing::warn!("Asset refresh failed: {}", e);
        }
        if let Err(e) = self.workbench.clear_diagnostics() {
            tracing::warn!("Could not clear diagnostics: {}", e);
        }
        if let Err(e) = self.cache.save(obtained) {
            tracing::error!("Failed to write check cache: {}", e);
        }
    }

    fn open_window_once(&mut self) {
        if self.window_opened {
            return;
        }
        self.window_opened = true;

        match self.workbench.open_main_window() {
            Ok(true) => tracing::info!("Host main window opened"),
            Ok(false) => tracing::debug!("Host declined to open a main window"),
            Err(e) => tracing::error!("Could not open host main window: {}", e),
        }
    }
}
