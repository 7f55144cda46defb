//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::process::Command;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::Session;
use crate::error::{Error, Operation};
use crate::path::ConfigPath;

// Locations of the router's configuration shell helpers.
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields, rename_all = "kebab-case")]
pub struct CliConfig {
    pub shell_api: String,
    pub set: String,
    pub delete: String,
    pub commit: String,
}

// Configuration session driven through the router's configuration shell.
//
// Every session gets its own private edit environment, identified by the
// session ID. Staged changes are only visible to this session until they are
// committed.
#[derive(Debug)]
pub struct CliSession {
    id: u32,
    config: CliConfig,
    env: Vec<(String, String)>,
    active: bool,
}

// ===== impl CliConfig =====

impl Default for CliConfig {
    fn default() -> CliConfig {
        CliConfig {
            shell_api: "/bin/cli-shell-api".to_owned(),
            set: "/opt/vyatta/sbin/my_set".to_owned(),
            delete: "/opt/vyatta/sbin/my_delete".to_owned(),
            commit: "/opt/vyatta/sbin/my_commit".to_owned(),
        }
    }
}

// ===== impl CliSession =====

impl CliSession {
    // Sets up a new configuration session with the given ID.
    pub fn new(id: u32, config: CliConfig) -> Result<CliSession, Error> {
        let mut session = CliSession {
            id,
            config,
            env: vec![],
            active: false,
        };

        // Obtain the session environment.
        let id_str = id.to_string();
        let output = session.run(
            Operation::Setup,
            &session.config.shell_api,
            &["getSessionEnv", id_str.as_str()],
            None,
        )?;
        session.env = parse_session_env(&output)?;

        // Create the session.
        session.run(
            Operation::Setup,
            &session.config.shell_api,
            &["setupSession"],
            None,
        )?;
        session.active = true;
        debug!(id = %session.id, "configuration session created");

        Ok(session)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    // Runs one of the configuration shell helpers within the session
    // environment, returning its standard output.
    fn run(
        &self,
        op: Operation,
        program: &str,
        args: &[&str],
        path: Option<&ConfigPath>,
    ) -> Result<String, Error> {
        let output = Command::new(program)
            .args(args)
            .args(path.into_iter().flat_map(|path| path.iter()))
            .envs(self.env.iter().map(|(name, value)| (name, value)))
            .output()
            .map_err(|error| Error::Spawn {
                program: program.to_owned(),
                error,
            })?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Command {
                op,
                path: path.cloned(),
                status: output.status.code(),
                output: format!("{}{}", stdout, stderr).trim().to_owned(),
            });
        }

        Ok(stdout)
    }

    fn check_active(&self) -> Result<(), Error> {
        if !self.active {
            return Err(Error::Inactive);
        }
        Ok(())
    }
}

impl Session for CliSession {
    fn set(&mut self, path: &ConfigPath) -> Result<(), Error> {
        self.check_active()?;
        debug!(%path, "set");
        self.run(Operation::Set, &self.config.set, &[], Some(path))?;
        Ok(())
    }

    fn delete(&mut self, path: &ConfigPath) -> Result<(), Error> {
        self.check_active()?;
        debug!(%path, "delete");
        self.run(Operation::Delete, &self.config.delete, &[], Some(path))?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Error> {
        self.check_active()?;
        debug!("commit");
        self.run(Operation::Commit, &self.config.commit, &[], None)?;
        Ok(())
    }

    fn teardown(&mut self) -> Result<(), Error> {
        self.check_active()?;
        self.active = false;
        self.run(
            Operation::Teardown,
            &self.config.shell_api,
            &["teardownSession"],
            None,
        )?;
        debug!(id = %self.id, "configuration session removed");
        Ok(())
    }
}

impl Drop for CliSession {
    fn drop(&mut self) {
        if !self.active {
            return;
        }

        if let Err(error) = self.teardown() {
            warn!(id = %self.id, %error, "failed to tear down session");
        }
    }
}

// ===== helper functions =====

// Parses the environment printed by "getSessionEnv", a list of shell
// statements such as:
//
//   declare -x -r VYATTA_CHANGES_ONLY_DIR=/opt/vyatta/config/tmp/changes_only_42;
//
// Statements other than declarations are ignored.
fn parse_session_env(output: &str) -> Result<Vec<(String, String)>, Error> {
    let mut env = vec![];
    for stmt in output.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        let Some(rest) = stmt.strip_prefix("declare ") else {
            debug!(%stmt, "ignoring session environment statement");
            continue;
        };

        // Skip attribute flags.
        let mut rest = rest.trim_start();
        while rest.starts_with('-') {
            rest = match rest.split_once(char::is_whitespace) {
                Some((_, rest)) => rest.trim_start(),
                None => "",
            };
        }

        let Some((name, value)) = rest.split_once('=') else {
            return Err(Error::Environment(stmt.to_owned()));
        };
        if name.is_empty() || name.contains(char::is_whitespace) {
            return Err(Error::Environment(stmt.to_owned()));
        }
        let value = value.trim().trim_matches(|c| c == '"' || c == '\'');
        env.push((name.to_owned(), value.to_owned()));
    }

    if env.is_empty() {
        let error = "empty session environment".to_owned();
        return Err(Error::Environment(error));
    }

    Ok(env)
}
