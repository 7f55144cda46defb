//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::{Arc, Mutex};

use tracing::debug;

use crate::Session;
use crate::error::Error;
use crate::path::ConfigPath;
use crate::tree::ConfigTree;

// Running configuration shared between sessions and observers.
pub type SharedConfig = Arc<Mutex<ConfigTree>>;

// Candidate validation callback. An error rejects the whole commit.
pub type Validator = Box<dyn Fn(&ConfigTree) -> Result<(), String> + Send>;

// Transactional configuration session kept entirely in memory.
//
// Changes are staged on a private candidate copy of the running
// configuration. A successful commit replaces the shared running
// configuration with the candidate in a single step.
pub struct MemorySession {
    running: SharedConfig,
    candidate: ConfigTree,
    validator: Option<Validator>,
    active: bool,
}

// ===== impl MemorySession =====

impl MemorySession {
    // Creates a session over an empty running configuration.
    pub fn new() -> MemorySession {
        MemorySession::with_running(Default::default())
    }

    // Creates a session over an existing running configuration.
    pub fn with_running(running: SharedConfig) -> MemorySession {
        let candidate = running.lock().unwrap().clone();
        MemorySession {
            running,
            candidate,
            validator: None,
            active: true,
        }
    }

    // Installs a validator that is run against the candidate on every commit.
    #[must_use]
    pub fn with_validator<F>(mut self, validator: F) -> MemorySession
    where
        F: Fn(&ConfigTree) -> Result<(), String> + Send + 'static,
    {
        self.validator = Some(Box::new(validator));
        self
    }

    // Returns a handle to the running configuration.
    pub fn running(&self) -> SharedConfig {
        self.running.clone()
    }

    // Returns the candidate configuration with all staged changes.
    pub fn candidate(&self) -> &ConfigTree {
        &self.candidate
    }

    // Drops all staged changes.
    pub fn discard(&mut self) {
        self.candidate = self.running.lock().unwrap().clone();
    }

    fn check_active(&self) -> Result<(), Error> {
        if !self.active {
            return Err(Error::Inactive);
        }
        Ok(())
    }
}

impl Default for MemorySession {
    fn default() -> MemorySession {
        MemorySession::new()
    }
}

impl std::fmt::Debug for MemorySession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemorySession")
            .field("candidate", &self.candidate)
            .field("validator", &self.validator.is_some())
            .field("active", &self.active)
            .finish()
    }
}

impl Session for MemorySession {
    fn set(&mut self, path: &ConfigPath) -> Result<(), Error> {
        self.check_active()?;
        debug!(%path, "set");
        self.candidate.set(path);
        Ok(())
    }

    fn delete(&mut self, path: &ConfigPath) -> Result<(), Error> {
        self.check_active()?;
        debug!(%path, "delete");
        if !self.candidate.delete(path) {
            debug!(%path, "nothing to delete");
        }
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Error> {
        self.check_active()?;
        if let Some(validator) = &self.validator {
            validator(&self.candidate).map_err(Error::Validation)?;
        }

        let mut running = self.running.lock().unwrap();
        *running = self.candidate.clone();
        debug!("commit");

        Ok(())
    }

    fn teardown(&mut self) -> Result<(), Error> {
        self.check_active()?;
        self.active = false;
        self.discard();
        Ok(())
    }
}
