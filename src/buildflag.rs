//! Build-time define flag toggling.
//!
//! Application code compiled against the host can branch on a define token
//! to behave differently while a host build is running. The toggler sets
//! the token when a build starts and clears it when the build finishes.
//! Both transitions are idempotent; the define list is written back even
//! when unchanged, since host define-list writes are idempotent.

use crate::error::Result;
use crate::host::DefineStore;

/// Toggles a define token around host build lifecycle events.
#[derive(Debug, Clone)]
pub struct BuildFlagToggler {
    token: String,
}

impl BuildFlagToggler {
    /// Create a toggler for the given define token (e.g. `EA_ONBUILD`).
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// The tracked define token.
    pub fn token(&self) -> &str {
        &self.token
    }

    /// Build started: ensure the token is present in the define list.
    pub fn on_build_start(&self, store: &mut dyn DefineStore) -> Result<()> {
        self.set_flag(store, true)?;
        tracing::info!("Build started; {} flag set", self.token);
        Ok(())
    }

    /// Build finished: ensure the token is absent from the define list.
    pub fn on_build_finish(&self, store: &mut dyn DefineStore) -> Result<()> {
        self.set_flag(store, false)?;
        tracing::info!("Build finished; {} flag cleared", self.token);
        Ok(())
    }

    fn set_flag(&self, store: &mut dyn DefineStore, enable: bool) -> Result<()> {
        let mut defines = store.defines()?;

        if enable {
            if !defines.iter().any(|d| d == &self.token) {
                defines.push(self.token.clone());
            }
        } else {
            defines.retain(|d| d != &self.token);
        }

        store.set_defines(&defines)
    }
}
