//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod cli;
pub mod error;
pub mod memory;
pub mod path;
pub mod tree;

pub use crate::cli::{CliConfig, CliSession};
pub use crate::error::{Error, Operation};
pub use crate::memory::{MemorySession, SharedConfig};
pub use crate::path::ConfigPath;
pub use crate::tree::ConfigTree;

// A configuration session on the router.
//
// Changes are staged with `set` and `delete` and only become visible once
// `commit` succeeds. A commit applies all staged changes or none of them.
pub trait Session: std::fmt::Debug {
    // Stages the creation of the given configuration path.
    fn set(&mut self, path: &ConfigPath) -> Result<(), Error>;

    // Stages the removal of the given configuration subtree.
    fn delete(&mut self, path: &ConfigPath) -> Result<(), Error>;

    // Atomically applies all staged changes.
    fn commit(&mut self) -> Result<(), Error>;

    // Releases the session. No other method may be called afterwards.
    fn teardown(&mut self) -> Result<(), Error>;
}

impl<S: Session + ?Sized> Session for Box<S> {
    fn set(&mut self, path: &ConfigPath) -> Result<(), Error> {
        (**self).set(path)
    }

    fn delete(&mut self, path: &ConfigPath) -> Result<(), Error> {
        (**self).delete(path)
    }

    fn commit(&mut self) -> Result<(), Error> {
        (**self).commit()
    }

    fn teardown(&mut self) -> Result<(), Error> {
        (**self).teardown()
    }
}
