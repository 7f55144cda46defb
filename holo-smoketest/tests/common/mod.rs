//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(dead_code)]

use std::collections::BTreeSet;

use const_addrs::net;
use holo_interface::{Error, InterfaceProbe};
use holo_session::{ConfigPath, ConfigTree, SharedConfig};
use holo_utils::ip::AddressFamilies;
use ipnetwork::IpNetwork;

pub const DFLT_MTU: &str = "1500";

// Simulated host whose interface state follows the committed configuration
// of an interface category.
#[derive(Debug)]
pub struct SimHost {
    running: SharedConfig,
    base_path: ConfigPath,
    // Interfaces that exist even when unconfigured.
    permanent: BTreeSet<String>,
    pub link_local: bool,
    pub faults: Faults,
}

// Kernel misbehavior to inject.
#[derive(Debug, Default)]
pub struct Faults {
    pub ignore_mtu: bool,
    pub truncate_description: bool,
    pub drop_address: Option<IpNetwork>,
}

// ===== impl SimHost =====

impl SimHost {
    pub fn new(running: SharedConfig, base_path: &[&str]) -> SimHost {
        SimHost {
            running,
            base_path: ConfigPath::from(base_path),
            permanent: Default::default(),
            link_local: true,
            faults: Default::default(),
        }
    }

    pub fn permanent(mut self, ifname: &str) -> SimHost {
        self.permanent.insert(ifname.to_owned());
        self
    }

    // Runs `f` over the configuration node of the given interface or
    // sub-interface ("eth0.100").
    fn with_node<T>(
        &self,
        ifname: &str,
        f: impl FnOnce(&ConfigTree) -> T,
    ) -> Result<T, Error> {
        let running = self.running.lock().unwrap();
        let path = match ifname.split_once('.') {
            Some((parent, vlan)) => {
                self.base_path.child(parent).join(["vif", vlan])
            }
            None => self.base_path.child(ifname),
        };

        match running.get(&path) {
            Some(node) => Ok(f(node)),
            None if self.permanent.contains(ifname) => {
                Ok(f(&ConfigTree::new()))
            }
            None => Err(Error::NoSuchInterface(ifname.to_owned())),
        }
    }
}

impl InterfaceProbe for SimHost {
    fn read_attribute(&self, ifname: &str, attr: &str) -> Result<String, Error> {
        let leaf = match attr {
            "ifalias" => "description",
            "mtu" => "mtu",
            _ => return Err(Error::NoSuchInterface(ifname.to_owned())),
        };
        let value = self.with_node(ifname, |node| {
            node.get(&ConfigPath::from([leaf]))
                .and_then(ConfigTree::value)
                .map(str::to_owned)
        })?;

        let value = match attr {
            "mtu" if self.faults.ignore_mtu => DFLT_MTU.to_owned(),
            "mtu" => value.unwrap_or_else(|| DFLT_MTU.to_owned()),
            _ => {
                let mut value = value.unwrap_or_default();
                if self.faults.truncate_description {
                    value.truncate(value.len() / 2);
                }
                value
            }
        };

        Ok(value)
    }

    fn addresses(
        &self,
        ifname: &str,
    ) -> Result<AddressFamilies<Vec<IpNetwork>>, Error> {
        let configured = self.with_node(ifname, |node| {
            node.get(&ConfigPath::from(["address"]))
                .map(|addrs| {
                    addrs
                        .values()
                        .filter_map(|addr| addr.parse::<IpNetwork>().ok())
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        })?;

        let mut addrs = AddressFamilies::<Vec<IpNetwork>>::default();
        for addr in configured {
            if self.faults.drop_address == Some(addr) {
                continue;
            }
            addrs.push(addr);
        }
        if self.link_local {
            addrs.push(net!("fe80::1/64"));
        }

        Ok(addrs)
    }
}
