//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use holo_session::ConfigPath;

use crate::context::{Capabilities, TestContext};

// Returns the built-in scenarios.
pub fn presets() -> Vec<TestContext> {
    vec![dummy(), ethernet(), bridge(), bonding()]
}

// Looks up a built-in scenario by name.
pub fn preset(name: &str) -> Option<TestContext> {
    presets().into_iter().find(|ctx| ctx.name == name)
}

// ===== helper functions =====

fn dummy() -> TestContext {
    TestContext::new("dummy", ConfigPath::from(["interfaces", "dummy"]))
        .interface("dum435")
        .interface("dum8677")
        .interface("dum509")
        .interface("dum300")
        .capabilities(Capabilities::MTU)
}

fn ethernet() -> TestContext {
    TestContext::new("ethernet", ConfigPath::from(["interfaces", "ethernet"]))
        .interface("eth0")
        .interface("eth1")
        .capabilities(Capabilities::MTU | Capabilities::VLAN)
}

fn bridge() -> TestContext {
    TestContext::new("bridge", ConfigPath::from(["interfaces", "bridge"]))
        .interface("br0")
        .interface("br1")
        .capabilities(Capabilities::MTU | Capabilities::VLAN)
}

// A bond needs at least one member before it accepts any address.
fn bonding() -> TestContext {
    TestContext::new("bonding", ConfigPath::from(["interfaces", "bonding"]))
        .interface("bond0")
        .option("bond0", "member interface eth0")
        .capabilities(Capabilities::MTU | Capabilities::VLAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preset_lookup() {
        let names = presets()
            .into_iter()
            .map(|ctx| ctx.name)
            .collect::<Vec<_>>();
        assert_eq!(names, ["dummy", "ethernet", "bridge", "bonding"]);

        let bonding = preset("bonding").unwrap();
        assert_eq!(
            bonding.options("bond0"),
            &[ConfigPath::from(["member", "interface", "eth0"])]
        );
        assert!(preset("wireguard").is_none());
    }

    #[test]
    fn preset_capabilities() {
        let dummy = preset("dummy").unwrap();
        assert_eq!(dummy.capabilities, Capabilities::MTU);
        assert!(!dummy.is_permanent());
        assert_eq!(dummy.interfaces.len(), 4);

        let ethernet = preset("ethernet").unwrap();
        assert!(ethernet.capabilities.contains(Capabilities::VLAN));
        assert!(ethernet.is_permanent());
    }
}
