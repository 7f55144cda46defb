//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::{IpAddr, Ipv6Addr};
use std::str::FromStr;

use ipnetwork::{IpNetwork, IpNetworkError};

// Address Family identifier.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum AddressFamily {
    Ipv4,
    Ipv6,
}

// Container for storing separate values for IPv4 and IPv6.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct AddressFamilies<T> {
    pub ipv4: T,
    pub ipv6: T,
}

// An address as accepted by assignment queries.
//
// When the prefix length is given, both the address and the prefix length
// must match. A bare address matches regardless of the prefix length.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum AddressMatch {
    Host(IpAddr),
    Prefix(IpNetwork),
}

// Extension methods for IpAddr.
pub trait IpAddrExt {
    // Returns the address family of this address.
    fn address_family(&self) -> AddressFamily;

    // Returns true if this is an IPv6 link-local unicast address (fe80::/10).
    fn is_ipv6_link_local(&self) -> bool;
}

// ===== impl AddressFamily =====

impl std::fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressFamily::Ipv4 => write!(f, "IPv4"),
            AddressFamily::Ipv6 => write!(f, "IPv6"),
        }
    }
}

// ===== impl AddressFamilies =====

impl<T> AddressFamilies<T> {
    // Returns a reference to the value corresponding to the given address
    // family.
    pub fn get(&self, af: AddressFamily) -> &T {
        match af {
            AddressFamily::Ipv4 => &self.ipv4,
            AddressFamily::Ipv6 => &self.ipv6,
        }
    }

    // Returns a mutable reference to the value corresponding to the given
    // address family.
    pub fn get_mut(&mut self, af: AddressFamily) -> &mut T {
        match af {
            AddressFamily::Ipv4 => &mut self.ipv4,
            AddressFamily::Ipv6 => &mut self.ipv6,
        }
    }
}

impl AddressFamilies<Vec<IpNetwork>> {
    // Files the given address under its address family.
    pub fn push(&mut self, addr: IpNetwork) {
        self.get_mut(addr.ip().address_family()).push(addr);
    }

    // Returns an iterator over the addresses of both families.
    pub fn all(&self) -> impl Iterator<Item = &IpNetwork> {
        self.ipv4.iter().chain(self.ipv6.iter())
    }
}

// ===== impl AddressMatch =====

impl AddressMatch {
    pub fn address_family(&self) -> AddressFamily {
        self.ip().address_family()
    }

    pub fn ip(&self) -> IpAddr {
        match self {
            AddressMatch::Host(addr) => *addr,
            AddressMatch::Prefix(prefix) => prefix.ip(),
        }
    }

    // Returns true if the given interface address satisfies this match.
    pub fn matches(&self, addr: &IpNetwork) -> bool {
        match self {
            AddressMatch::Host(host) => addr.ip() == *host,
            AddressMatch::Prefix(prefix) => {
                addr.ip() == prefix.ip() && addr.prefix() == prefix.prefix()
            }
        }
    }
}

impl FromStr for AddressMatch {
    type Err = IpNetworkError;

    fn from_str(s: &str) -> Result<AddressMatch, IpNetworkError> {
        let s = strip_scope(s.trim());
        if s.contains('/') {
            IpNetwork::from_str(s).map(AddressMatch::Prefix)
        } else {
            IpAddr::from_str(s)
                .map(AddressMatch::Host)
                .map_err(|_| IpNetworkError::InvalidAddr(s.to_owned()))
        }
    }
}

impl std::fmt::Display for AddressMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AddressMatch::Host(addr) => write!(f, "{addr}"),
            AddressMatch::Prefix(prefix) => write!(f, "{prefix}"),
        }
    }
}

// ===== impl IpAddr =====

impl IpAddrExt for IpAddr {
    fn address_family(&self) -> AddressFamily {
        match self {
            IpAddr::V4(_) => AddressFamily::Ipv4,
            IpAddr::V6(_) => AddressFamily::Ipv6,
        }
    }

    fn is_ipv6_link_local(&self) -> bool {
        match self {
            IpAddr::V4(_) => false,
            IpAddr::V6(addr) => addr.is_ipv6_link_local(),
        }
    }
}

impl IpAddrExt for Ipv6Addr {
    fn address_family(&self) -> AddressFamily {
        AddressFamily::Ipv6
    }

    fn is_ipv6_link_local(&self) -> bool {
        self.is_unicast_link_local()
    }
}

// ===== helper functions =====

// Removes the zone index ("fe80::1%eth0") from a textual address, keeping
// any prefix length that follows it.
fn strip_scope(s: &str) -> &str {
    match s.split_once('%') {
        Some((addr, _)) => addr,
        None => s,
    }
}
