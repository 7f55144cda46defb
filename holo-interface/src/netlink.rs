//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use futures::TryStreamExt;
use holo_utils::ip::AddressFamilies;
use ipnetwork::IpNetwork;
use netlink_packet_route::address::{AddressAttribute, AddressMessage};
use rtnetlink::{Handle, new_connection};
use tracing::trace;

use crate::error::Error;

// Synchronous netlink client for interface address queries.
//
// The order of the fields in this struct is important. They must be ordered
// such that when `NetlinkProbe` is dropped the handle is dropped before the
// runtime driving its connection.
#[derive(Debug)]
pub struct NetlinkProbe {
    handle: Handle,
    runtime: tokio::runtime::Runtime,
}

// ===== impl NetlinkProbe =====

impl NetlinkProbe {
    pub fn new() -> Result<NetlinkProbe, Error> {
        // Initialize tokio runtime.
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(Error::Runtime)?;

        // Create netlink socket. The connection task only makes progress
        // while a request is being blocked on.
        let handle = {
            let _guard = runtime.enter();
            let (conn, handle, _) = new_connection().map_err(Error::Runtime)?;
            runtime.spawn(conn);
            handle
        };

        Ok(NetlinkProbe { handle, runtime })
    }

    // Returns all addresses bound to the given interface.
    pub fn addresses(
        &self,
        ifname: &str,
    ) -> Result<AddressFamilies<Vec<IpNetwork>>, Error> {
        self.runtime.block_on(async {
            let ifindex = link_index(&self.handle, ifname).await?;

            let mut addrs = AddressFamilies::<Vec<IpNetwork>>::default();
            let mut stream = self
                .handle
                .address()
                .get()
                .set_link_index_filter(ifindex)
                .execute();
            while let Some(msg) = stream.try_next().await? {
                if msg.header.index != ifindex {
                    continue;
                }
                if let Some(addr) = parse_address(msg) {
                    trace!(%ifname, %addr, "interface address");
                    addrs.push(addr);
                }
            }

            Ok::<_, Error>(addrs)
        })
    }
}

// ===== helper functions =====

async fn link_index(handle: &Handle, ifname: &str) -> Result<u32, Error> {
    let mut links =
        handle.link().get().match_name(ifname.to_owned()).execute();
    match links.try_next().await {
        Ok(Some(msg)) => Ok(msg.header.index),
        Ok(None) => Err(Error::NoSuchInterface(ifname.to_owned())),
        Err(rtnetlink::Error::NetlinkError(msg))
            if msg.raw_code() == -libc::ENODEV =>
        {
            Err(Error::NoSuchInterface(ifname.to_owned()))
        }
        Err(error) => Err(Error::Netlink(error)),
    }
}

// Extracts the interface address from an RTM_NEWADDR message.
//
// On point-to-point links IFA_ADDRESS holds the peer, so IFA_LOCAL takes
// precedence when present.
fn parse_address(msg: AddressMessage) -> Option<IpNetwork> {
    let mut local = None;
    let mut address = None;
    for attr in msg.attributes {
        match attr {
            AddressAttribute::Local(addr) => local = Some(addr),
            AddressAttribute::Address(addr) => address = Some(addr),
            _ => (),
        }
    }

    let addr = local.or(address)?;
    IpNetwork::new(addr, msg.header.prefix_len).ok()
}

#[cfg(test)]
mod tests {
    use const_addrs::{ip, net};
    use netlink_packet_route::AddressFamily;

    use super::*;

    fn address_msg(
        family: AddressFamily,
        prefix_len: u8,
        attributes: Vec<AddressAttribute>,
    ) -> AddressMessage {
        let mut msg = AddressMessage::default();
        msg.header.family = family;
        msg.header.prefix_len = prefix_len;
        msg.header.index = 2;
        msg.attributes = attributes;
        msg
    }

    #[test]
    fn parse_ipv4_address() {
        let msg = address_msg(
            AddressFamily::Inet,
            26,
            vec![
                AddressAttribute::Address(ip!("192.0.2.1")),
                AddressAttribute::Local(ip!("192.0.2.1")),
                AddressAttribute::Label("dum0".to_owned()),
            ],
        );
        assert_eq!(parse_address(msg), Some(net!("192.0.2.1/26")));
    }

    #[test]
    fn parse_point_to_point_address() {
        let msg = address_msg(
            AddressFamily::Inet,
            32,
            vec![
                AddressAttribute::Address(ip!("192.0.2.2")),
                AddressAttribute::Local(ip!("192.0.2.1")),
            ],
        );
        assert_eq!(parse_address(msg), Some(net!("192.0.2.1/32")));
    }

    #[test]
    fn parse_ipv6_address() {
        let msg = address_msg(
            AddressFamily::Inet6,
            112,
            vec![AddressAttribute::Address(ip!("2001:db8:101::1"))],
        );
        assert_eq!(parse_address(msg), Some(net!("2001:db8:101::1/112")));
    }

    #[test]
    fn parse_invalid_address() {
        let msg = address_msg(AddressFamily::Inet, 26, vec![]);
        assert_eq!(parse_address(msg), None);

        let msg = address_msg(
            AddressFamily::Inet,
            33,
            vec![AddressAttribute::Address(ip!("192.0.2.1"))],
        );
        assert_eq!(parse_address(msg), None);
    }
}
