//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#[derive(Debug)]
pub enum Error {
    Attribute {
        ifname: String,
        attr: String,
        error: std::io::Error,
    },
    NoSuchInterface(String),
    Netlink(rtnetlink::Error),
    Runtime(std::io::Error),
    InvalidAddress(String),
}

// ===== impl Error =====

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Attribute { ifname, attr, error } => {
                write!(f, "failed to read {} of {}: {}", attr, ifname, error)
            }
            Error::NoSuchInterface(ifname) => {
                write!(f, "interface {} not found", ifname)
            }
            Error::Netlink(error) => {
                write!(f, "netlink request failed: {}", error)
            }
            Error::Runtime(error) => {
                write!(f, "failed to initialize netlink: {}", error)
            }
            Error::InvalidAddress(addr) => {
                write!(f, "invalid address: {}", addr)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Attribute { error, .. } => Some(error),
            Error::Netlink(error) => Some(error),
            Error::Runtime(error) => Some(error),
            _ => None,
        }
    }
}

impl From<rtnetlink::Error> for Error {
    fn from(error: rtnetlink::Error) -> Error {
        Error::Netlink(error)
    }
}
