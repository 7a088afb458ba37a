//! Plugsync - companion-package synchronization and build hooks for host
//! plugin ecosystems.
//!
//! A host application's plugin often ships with companion packages that
//! must be installed at the versions published remotely. Plugsync verifies
//! them before the plugin's main window is shown, installs or upgrades
//! what is missing, and caches the verified version set so repeat checks
//! are skipped. A second, independent component toggles a build-time
//! define token around host build lifecycle events.
//!
//! # Modules
//!
//! - [`buildflag`] - Define-token toggling around build start/finish
//! - [`cache`] - Persisted dependency-check cache
//! - [`checker`] - The check/install orchestrator
//! - [`cli`] - Command-line interface and dispatch
//! - [`config`] - Tracked-dependency configuration
//! - [`error`] - Error types and result alias
//! - [`host`] - Host collaborator traits and implementations
//! - [`install`] - Package installation through the host package manager
//! - [`manifest`] - Local dependency manifest inspection
//! - [`remote`] - Remote version manifest fetching
//!
//! # Example
//!
//! ```
//! use plugsync::buildflag::BuildFlagToggler;
//! use plugsync::host::MockDefineStore;
//!
//! let toggler = BuildFlagToggler::new("EA_ONBUILD");
//! let mut defines = MockDefineStore::new();
//! toggler.on_build_start(&mut defines).unwrap();
//! assert!(defines.current().contains(&"EA_ONBUILD".to_string()));
//! ```
//!
//! For the full check/install flow, see [`checker::DependencyChecker`].

pub mod buildflag;
pub mod cache;
pub mod checker;
pub mod cli;
pub mod config;
pub mod error;
pub mod host;
pub mod install;
pub mod manifest;
pub mod remote;

pub use error::{PlugsyncError, Result};
