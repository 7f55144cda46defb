//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use const_addrs::net;
use holo_interface::InterfaceProbe;
use holo_session::{ConfigPath, Session};
use holo_utils::ip::IpAddrExt;
use ipnetwork::IpNetwork;
use tracing::{debug, info};

use crate::context::{TestCase, TestContext};
use crate::error::{CheckError, Error};

pub const SINGLE_ADDRESS: &str = "192.0.2.0/31";
pub const TEST_MTU: &str = "1280";
pub const VLAN_IDS: [u16; 4] = [100, 200, 300, 2000];
pub const VLAN_ADDRESS: &str = "192.0.2.1/24";

// Runs the test cases of one scenario over a configuration session,
// verifying each commit against the kernel state reported by the probe.
#[derive(Debug)]
pub struct Fixture<'a, S: Session, P: InterfaceProbe + ?Sized> {
    ctx: &'a TestContext,
    session: S,
    probe: &'a P,
    test_addrs: Vec<IpNetwork>,
}

// ===== impl Fixture =====

impl<'a, S, P> Fixture<'a, S, P>
where
    S: Session,
    P: InterfaceProbe + ?Sized,
{
    pub fn setup(ctx: &'a TestContext, session: S, probe: &'a P) -> Self {
        debug!(scenario = %ctx.name, base_path = %ctx.base_path, "setup");

        Fixture {
            ctx,
            session,
            probe,
            test_addrs: test_addresses(),
        }
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    pub fn run(&mut self, case: TestCase) -> Result<(), Error> {
        match case {
            TestCase::Description => self.add_description(),
            TestCase::AddressSingle => self.add_address_single(),
            TestCase::AddressMulti => self.add_address_multi(),
            TestCase::Mtu => self.change_mtu(),
            TestCase::Vlan8021q => self.vlan_8021q(),
        }
    }

    // Sets a description on every interface and checks its alias.
    pub fn add_description(&mut self) -> Result<(), Error> {
        let ctx = self.ctx;
        for ifname in &ctx.interfaces {
            let path = ctx
                .interface_path(ifname)
                .join(["description".to_owned(), description(ifname)]);
            self.set(&path)?;
        }
        self.apply_options()?;
        self.commit()?;

        for ifname in &ctx.interfaces {
            let expected = description(ifname);
            let actual = self.probe.ifalias(ifname)?;
            if actual != expected {
                return Err(CheckError::DescriptionMismatch {
                    ifname: ifname.clone(),
                    expected,
                    actual,
                }
                .into());
            }
        }

        Ok(())
    }

    // Assigns one IPv4 address to every interface.
    pub fn add_address_single(&mut self) -> Result<(), Error> {
        let ctx = self.ctx;
        for ifname in &ctx.interfaces {
            let path = ctx
                .interface_path(ifname)
                .join(["address", SINGLE_ADDRESS]);
            self.set(&path)?;
        }
        self.apply_options()?;
        self.commit()?;

        for ifname in &ctx.interfaces {
            self.check_address(ifname, SINGLE_ADDRESS)?;
        }

        Ok(())
    }

    // Assigns all test addresses to every interface at once.
    //
    // Every address the kernel reports for the interface must be known to
    // the address query, except IPv6 link-local ones which the kernel adds
    // by itself.
    pub fn add_address_multi(&mut self) -> Result<(), Error> {
        let ctx = self.ctx;
        let test_addrs = self.test_addrs.clone();
        for ifname in &ctx.interfaces {
            for addr in &test_addrs {
                let path = ctx
                    .interface_path(ifname)
                    .join(["address".to_owned(), addr.to_string()]);
                self.set(&path)?;
            }
        }
        self.apply_options()?;
        self.commit()?;

        for ifname in &ctx.interfaces {
            let addrs = self.probe.addresses(ifname)?;
            for addr in addrs.all() {
                if addr.ip().is_ipv6_link_local() {
                    continue;
                }
                self.check_address(ifname, &addr.to_string())?;
            }
            for addr in &test_addrs {
                self.check_address(ifname, &addr.to_string())?;
            }
        }

        Ok(())
    }

    pub fn change_mtu(&mut self) -> Result<(), Error> {
        let ctx = self.ctx;
        for ifname in &ctx.interfaces {
            let path = ctx.interface_path(ifname).join(["mtu", TEST_MTU]);
            self.set(&path)?;
        }
        self.apply_options()?;
        self.commit()?;

        for ifname in &ctx.interfaces {
            self.check_mtu(ifname)?;
        }

        Ok(())
    }

    // Creates 802.1Q sub-interfaces on every interface, each with an address
    // and a custom MTU.
    pub fn vlan_8021q(&mut self) -> Result<(), Error> {
        let ctx = self.ctx;
        for ifname in &ctx.interfaces {
            for vlan in VLAN_IDS {
                let base = ctx
                    .interface_path(ifname)
                    .join(["vif".to_owned(), vlan.to_string()]);
                self.set(&base.join(["address", VLAN_ADDRESS]))?;
                self.set(&base.join(["mtu", TEST_MTU]))?;
            }
        }
        self.apply_options()?;
        self.commit()?;

        for ifname in &ctx.interfaces {
            for vlan in VLAN_IDS {
                let vif = format!("{}.{}", ifname, vlan);
                self.check_mtu(&vif)?;
                self.check_address(&vif, VLAN_ADDRESS)?;
            }
        }

        Ok(())
    }

    // Reverts the configuration under test and releases the session.
    //
    // Permanent interfaces are reset to an empty definition, anything else
    // is removed altogether. The session is released even if the reset
    // fails.
    pub fn teardown(mut self) -> Result<(), Error> {
        let reset = self.reset();
        let release = self.session.teardown();
        debug!(scenario = %self.ctx.name, "teardown");
        reset?;
        release?;
        Ok(())
    }

    fn reset(&mut self) -> Result<(), Error> {
        let ctx = self.ctx;
        if ctx.is_permanent() {
            for ifname in &ctx.interfaces {
                let path = ctx.interface_path(ifname);
                self.delete(&path)?;
                self.set(&path)?;
            }
        } else {
            let path = ctx.base_path.clone();
            self.delete(&path)?;
        }
        self.commit()
    }

    // Stages the extra settings some interfaces need to be valid.
    fn apply_options(&mut self) -> Result<(), Error> {
        let ctx = self.ctx;
        for ifname in &ctx.interfaces {
            for option in ctx.options(ifname) {
                let path = ctx.interface_path(ifname).join(option);
                self.set(&path)?;
            }
        }
        Ok(())
    }

    fn check_address(&self, ifname: &str, addr: &str) -> Result<(), Error> {
        if !self.probe.is_addr_assigned(ifname, addr)? {
            return Err(CheckError::AddressNotAssigned {
                ifname: ifname.to_owned(),
                addr: addr.to_owned(),
            }
            .into());
        }
        Ok(())
    }

    fn check_mtu(&self, ifname: &str) -> Result<(), Error> {
        let actual = self.probe.mtu(ifname)?;
        if actual != TEST_MTU {
            return Err(CheckError::MtuMismatch {
                ifname: ifname.to_owned(),
                expected: TEST_MTU.to_owned(),
                actual,
            }
            .into());
        }
        Ok(())
    }

    fn set(&mut self, path: &ConfigPath) -> Result<(), Error> {
        debug!(%path, "set");
        self.session.set(path)?;
        Ok(())
    }

    fn delete(&mut self, path: &ConfigPath) -> Result<(), Error> {
        debug!(%path, "delete");
        self.session.delete(path)?;
        Ok(())
    }

    fn commit(&mut self) -> Result<(), Error> {
        debug!("commit");
        self.session.commit()?;
        info!(scenario = %self.ctx.name, "configuration committed");
        Ok(())
    }
}

// ===== global functions =====

// Returns the addresses assigned by the multi-address test case.
pub fn test_addresses() -> Vec<IpNetwork> {
    vec![
        net!("192.0.2.1/26"),
        net!("192.0.2.255/31"),
        net!("192.0.2.64/32"),
        net!("2001:db8:1::ffff/64"),
        net!("2001:db8:101::1/112"),
    ]
}

// Returns the description the description test case sets on an interface.
pub fn description(ifname: &str) -> String {
    format!("Description-Test-{}", ifname)
}
