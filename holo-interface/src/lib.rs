//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod error;
pub mod netlink;
pub mod sysfs;

use std::str::FromStr;

use holo_utils::ip::{AddressFamilies, AddressMatch};
use ipnetwork::IpNetwork;
use tracing::trace;

pub use crate::error::Error;
pub use crate::netlink::NetlinkProbe;
pub use crate::sysfs::SysfsReader;

// Read-only view of the kernel's interface state.
pub trait InterfaceProbe: std::fmt::Debug {
    // Reads an interface attribute file ("mtu", "ifalias", ...), without the
    // trailing newline.
    fn read_attribute(&self, ifname: &str, attr: &str) -> Result<String, Error>;

    // Returns all addresses bound to the interface, per address family.
    fn addresses(
        &self,
        ifname: &str,
    ) -> Result<AddressFamilies<Vec<IpNetwork>>, Error>;

    // Returns the interface description.
    fn ifalias(&self, ifname: &str) -> Result<String, Error> {
        self.read_attribute(ifname, "ifalias")
    }

    // Returns the interface MTU, as reported by the kernel.
    fn mtu(&self, ifname: &str) -> Result<String, Error> {
        self.read_attribute(ifname, "mtu")
    }

    // Returns whether the given address is assigned to the interface.
    //
    // With a prefix length ("192.0.2.1/26") both the address and the prefix
    // length must match, otherwise only the address is compared. A missing
    // interface has no addresses.
    fn is_addr_assigned(&self, ifname: &str, addr: &str) -> Result<bool, Error> {
        let addr = AddressMatch::from_str(addr)
            .map_err(|_| Error::InvalidAddress(addr.to_owned()))?;

        let addrs = match self.addresses(ifname) {
            Ok(addrs) => addrs,
            Err(Error::NoSuchInterface(_)) => return Ok(false),
            Err(error) => return Err(error),
        };

        let assigned = addrs
            .get(addr.address_family())
            .iter()
            .any(|assigned| addr.matches(assigned));
        trace!(%ifname, %addr, %assigned, "address lookup");
        Ok(assigned)
    }
}

// Probe for the local host: attributes come from sysfs, addresses from
// netlink.
#[derive(Debug)]
pub struct HostProbe {
    sysfs: SysfsReader,
    netlink: NetlinkProbe,
}

// ===== impl HostProbe =====

impl HostProbe {
    pub fn new() -> Result<HostProbe, Error> {
        Ok(HostProbe {
            sysfs: SysfsReader::default(),
            netlink: NetlinkProbe::new()?,
        })
    }

    // Reads interface attributes from an alternate sysfs directory.
    #[must_use]
    pub fn with_sysfs(mut self, sysfs: SysfsReader) -> HostProbe {
        self.sysfs = sysfs;
        self
    }
}

impl InterfaceProbe for HostProbe {
    fn read_attribute(&self, ifname: &str, attr: &str) -> Result<String, Error> {
        self.sysfs.read_attribute(ifname, attr)
    }

    fn addresses(
        &self,
        ifname: &str,
    ) -> Result<AddressFamilies<Vec<IpNetwork>>, Error> {
        self.netlink.addresses(ifname)
    }
}
