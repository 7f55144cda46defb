//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::path::{Path, PathBuf};

use tracing::trace;

use crate::error::Error;

// Reader for the per-interface attribute files under /sys/class/net.
#[derive(Clone, Debug)]
pub struct SysfsReader {
    root: PathBuf,
}

// ===== impl SysfsReader =====

impl SysfsReader {
    const DFLT_ROOT: &'static str = "/sys/class/net";

    pub fn new(root: impl Into<PathBuf>) -> SysfsReader {
        SysfsReader { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    // Returns true if the interface has a sysfs directory.
    pub fn exists(&self, ifname: &str) -> bool {
        self.root.join(ifname).is_dir()
    }

    // Reads "<root>/<ifname>/<attr>" with trailing whitespace removed.
    pub fn read_attribute(
        &self,
        ifname: &str,
        attr: &str,
    ) -> Result<String, Error> {
        if !self.exists(ifname) {
            return Err(Error::NoSuchInterface(ifname.to_owned()));
        }

        let path = self.root.join(ifname).join(attr);
        let value = std::fs::read_to_string(&path).map_err(|error| {
            Error::Attribute {
                ifname: ifname.to_owned(),
                attr: attr.to_owned(),
                error,
            }
        })?;
        let value = value.trim_end().to_owned();
        trace!(%ifname, %attr, %value, "read interface attribute");
        Ok(value)
    }
}

impl Default for SysfsReader {
    fn default() -> SysfsReader {
        SysfsReader::new(SysfsReader::DFLT_ROOT)
    }
}
