//! Command-line interface.
//!
//! Defines the clap argument structures and the command dispatcher the
//! binary entry point drives. The CLI wires the library's checker to a
//! shell-command package host and a headless workbench; in a real host
//! plugin those collaborators come from the host editor instead.

use crate::cache::CheckCache;
use crate::checker::DependencyChecker;
use crate::config::SyncConfig;
use crate::error::{PlugsyncError, Result};
use crate::host::{LoggingWorkbench, ShellPackageHost};
use crate::manifest::ManifestReader;
use crate::remote::VersionFetcher;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Plugsync - companion-package synchronization for host plugin projects.
#[derive(Debug, Parser)]
#[command(name = "plugsync")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default plugsync.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Check tracked packages and install what is missing (default)
    Sync,

    /// Show local vs remote versions without installing anything
    Status,

    /// Manage the check cache
    Cache(CacheArgs),
}

/// Arguments for the `cache` command.
#[derive(Debug, clap::Args)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub command: CacheCommand,
}

/// Cache subcommands.
#[derive(Debug, Subcommand)]
pub enum CacheCommand {
    /// Print the last-verified versions
    Show,
    /// Delete the check cache so the next sync re-verifies everything
    Clear,
}

/// Routes parsed arguments to command implementations.
pub struct CommandDispatcher {
    project_root: PathBuf,
}

impl CommandDispatcher {
    /// Create a dispatcher rooted at the given project directory.
    pub fn new(project_root: PathBuf) -> Self {
        Self { project_root }
    }

    /// Execute the selected command, returning the process exit code.
    pub fn dispatch(&self, cli: &Cli) -> Result<u8> {
        let config_path = cli
            .config
            .clone()
            .unwrap_or_else(|| self.project_root.join(SyncConfig::DEFAULT_FILE));
        let config = SyncConfig::load(&config_path)?;

        match cli.command.as_ref().unwrap_or(&Commands::Sync) {
            Commands::Sync => self.run_sync(&config),
            Commands::Status => self.run_status(&config),
            Commands::Cache(args) => self.run_cache(&config, args),
        }
    }

    fn run_sync(&self, config: &SyncConfig) -> Result<u8> {
        let install_command = config.install_command.as_deref().ok_or_else(|| {
            PlugsyncError::ConfigParseError {
                path: self.project_root.join(SyncConfig::DEFAULT_FILE),
                message: "install_command is required for sync".to_string(),
            }
        })?;

        let host = ShellPackageHost::new(install_command);
        let workbench = LoggingWorkbench;
        let mut checker = DependencyChecker::new(
            config.dependencies.clone(),
            VersionFetcher::default(),
            ManifestReader::new(self.project_root.join(&config.manifest_path)),
            CheckCache::new(self.project_root.join(&config.cache_path)),
            &host,
            &workbench,
        );

        let report = checker.run_at_startup();

        if report.fresh {
            println!("All tracked packages verified (cached check is fresh).");
        } else {
            for dep in &report.dependencies {
                let version = dep.remote_version.as_deref().unwrap_or("?");
                println!("{:<40} {:<10} {:?}", dep.name, version, dep.outcome);
            }
            println!(
                "Updates: {}/{} completed",
                report.updates_completed, report.total_updates_needed
            );
        }

        Ok(if report.fully_updated() { 0 } else { 1 })
    }

    fn run_status(&self, config: &SyncConfig) -> Result<u8> {
        let manifest = ManifestReader::new(self.project_root.join(&config.manifest_path));
        let fetcher = VersionFetcher::default();

        let mut out_of_date = false;
        for dep in &config.dependencies {
            match fetcher.fetch_version(&dep.manifest_url) {
                Ok(version) => {
                    let installed = manifest
                        .is_installed_at(&dep.name, &version)
                        .unwrap_or(false);
                    let state = if installed { "up to date" } else { "needs update" };
                    out_of_date |= !installed;
                    println!("{:<40} {:<10} {}", dep.name, version, state);
                }
                Err(e) => {
                    out_of_date = true;
                    println!("{:<40} {:<10} unresolved ({})", dep.name, "?", e);
                }
            }
        }

        Ok(if out_of_date { 1 } else { 0 })
    }

    fn run_cache(&self, config: &SyncConfig, args: &CacheArgs) -> Result<u8> {
        let cache = CheckCache::new(self.project_root.join(&config.cache_path));

        match args.command {
            CacheCommand::Show => match cache.cached_versions() {
                Some(versions) => {
                    for (name, version) in versions {
                        println!("{:<40} {}", name, version);
                    }
                }
                None => println!("No check cache present."),
            },
            CacheCommand::Clear => {
                cache.clear()?;
                println!("Check cache cleared.");
            }
        }

        Ok(0)
    }
}
