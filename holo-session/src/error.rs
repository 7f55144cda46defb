//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use crate::path::ConfigPath;

#[derive(Debug)]
pub enum Error {
    Spawn {
        program: String,
        error: std::io::Error,
    },
    Command {
        op: Operation,
        path: Option<ConfigPath>,
        status: Option<i32>,
        output: String,
    },
    Environment(String),
    Validation(String),
    Inactive,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Operation {
    Setup,
    Set,
    Delete,
    Commit,
    Teardown,
}

// ===== impl Error =====

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Spawn { program, error } => {
                write!(f, "failed to execute {}: {}", program, error)
            }
            Error::Command {
                op,
                path,
                status,
                output,
            } => {
                write!(f, "{} failed", op)?;
                if let Some(path) = path {
                    write!(f, " [{}]", path)?;
                }
                if let Some(status) = status {
                    write!(f, " (exit status {})", status)?;
                }
                if !output.is_empty() {
                    write!(f, ": {}", output)?;
                }
                Ok(())
            }
            Error::Environment(stmt) => {
                write!(f, "invalid session environment: {}", stmt)
            }
            Error::Validation(reason) => {
                write!(f, "configuration validation failed: {}", reason)
            }
            Error::Inactive => {
                write!(f, "configuration session was already torn down")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Spawn { error, .. } => Some(error),
            _ => None,
        }
    }
}

// ===== impl Operation =====

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::Setup => write!(f, "session setup"),
            Operation::Set => write!(f, "set"),
            Operation::Delete => write!(f, "delete"),
            Operation::Commit => write!(f, "commit"),
            Operation::Teardown => write!(f, "session teardown"),
        }
    }
}
