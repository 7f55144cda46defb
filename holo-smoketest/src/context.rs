//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::str::FromStr;

use bitflags::bitflags;
use holo_session::ConfigPath;

bitflags! {
    // Optional checks a scenario opts into.
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct Capabilities: u8 {
        const MTU = 0x01;
        const VLAN = 0x02;
    }
}

// Interface configuration scenario.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestContext {
    pub name: String,
    // Configuration node holding the interfaces under test.
    pub base_path: ConfigPath,
    pub interfaces: Vec<String>,
    // Extra settings some interfaces need before they accept an address,
    // relative to the interface node.
    pub options: BTreeMap<String, Vec<ConfigPath>>,
    pub capabilities: Capabilities,
}

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum TestCase {
    Description,
    AddressSingle,
    AddressMulti,
    Mtu,
    Vlan8021q,
}

// ===== impl TestContext =====

impl TestContext {
    pub fn new(name: &str, base_path: ConfigPath) -> TestContext {
        TestContext {
            name: name.to_owned(),
            base_path,
            interfaces: vec![],
            options: Default::default(),
            capabilities: Capabilities::empty(),
        }
    }

    #[must_use]
    pub fn interface(mut self, ifname: &str) -> TestContext {
        self.interfaces.push(ifname.to_owned());
        self
    }

    // Adds a whitespace-separated option ("member interface eth0") for the
    // given interface.
    #[must_use]
    pub fn option(mut self, ifname: &str, option: &str) -> TestContext {
        let option = option.split_whitespace().collect();
        self.options
            .entry(ifname.to_owned())
            .or_default()
            .push(option);
        self
    }

    #[must_use]
    pub fn capabilities(mut self, capabilities: Capabilities) -> TestContext {
        self.capabilities.insert(capabilities);
        self
    }

    // Restricts the scenario to a single dedicated interface, when given.
    //
    // Only scenarios over permanent interfaces are affected, since those are
    // the only ones that can't be created on demand.
    #[must_use]
    pub fn with_dedicated_interface(
        mut self,
        ifname: Option<&str>,
    ) -> TestContext {
        let Some(ifname) = ifname else {
            return self;
        };
        if self.is_permanent() {
            self.interfaces = vec![ifname.to_owned()];
            self.options.retain(|name, _| name == ifname);
        }
        self
    }

    // Returns the extra options of the given interface.
    pub fn options(&self, ifname: &str) -> &[ConfigPath] {
        self.options.get(ifname).map(Vec::as_slice).unwrap_or_default()
    }

    // Returns the configuration path of the given interface.
    pub fn interface_path(&self, ifname: &str) -> ConfigPath {
        self.base_path.child(ifname)
    }

    // Returns true if the interfaces under test can't be removed from the
    // system's inventory (physical Ethernet ports).
    pub fn is_permanent(&self) -> bool {
        self.base_path.contains("ethernet")
    }
}

// ===== impl TestCase =====

impl TestCase {
    pub const ALL: [TestCase; 5] = [
        TestCase::Description,
        TestCase::AddressSingle,
        TestCase::AddressMulti,
        TestCase::Mtu,
        TestCase::Vlan8021q,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TestCase::Description => "add_description",
            TestCase::AddressSingle => "add_address_single",
            TestCase::AddressMulti => "add_address_multi",
            TestCase::Mtu => "change_mtu",
            TestCase::Vlan8021q => "8021q_vlan",
        }
    }

    // Returns the capabilities a scenario must declare for this test case to
    // run.
    pub fn required(&self) -> Capabilities {
        match self {
            TestCase::Description
            | TestCase::AddressSingle
            | TestCase::AddressMulti => Capabilities::empty(),
            TestCase::Mtu => Capabilities::MTU,
            TestCase::Vlan8021q => Capabilities::VLAN,
        }
    }
}

impl std::fmt::Display for TestCase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for TestCase {
    type Err = String;

    fn from_str(s: &str) -> Result<TestCase, String> {
        TestCase::ALL
            .into_iter()
            .find(|case| case.name() == s)
            .ok_or_else(|| format!("unknown test case: {s}"))
    }
}
