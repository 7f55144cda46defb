//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#[derive(Debug)]
pub enum Error {
    Session(holo_session::Error),
    Probe(holo_interface::Error),
    Check(CheckError),
}

// Mismatch between the committed configuration and the kernel state.
#[derive(Debug, Eq, PartialEq)]
pub enum CheckError {
    DescriptionMismatch {
        ifname: String,
        expected: String,
        actual: String,
    },
    AddressNotAssigned {
        ifname: String,
        addr: String,
    },
    MtuMismatch {
        ifname: String,
        expected: String,
        actual: String,
    },
}

// ===== impl Error =====

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Session(error) => {
                write!(f, "configuration session error: {}", error)
            }
            Error::Probe(error) => {
                write!(f, "failed to read interface state: {}", error)
            }
            Error::Check(error) => error.fmt(f),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Session(error) => Some(error),
            Error::Probe(error) => Some(error),
            Error::Check(error) => Some(error),
        }
    }
}

impl From<holo_session::Error> for Error {
    fn from(error: holo_session::Error) -> Error {
        Error::Session(error)
    }
}

impl From<holo_interface::Error> for Error {
    fn from(error: holo_interface::Error) -> Error {
        Error::Probe(error)
    }
}

impl From<CheckError> for Error {
    fn from(error: CheckError) -> Error {
        Error::Check(error)
    }
}

// ===== impl CheckError =====

impl std::fmt::Display for CheckError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CheckError::DescriptionMismatch {
                ifname,
                expected,
                actual,
            } => {
                write!(
                    f,
                    "{}: description is {:?}, expected {:?}",
                    ifname, actual, expected
                )
            }
            CheckError::AddressNotAssigned { ifname, addr } => {
                write!(f, "{}: address {} is not assigned", ifname, addr)
            }
            CheckError::MtuMismatch {
                ifname,
                expected,
                actual,
            } => {
                write!(f, "{}: MTU is {}, expected {}", ifname, actual, expected)
            }
        }
    }
}

impl std::error::Error for CheckError {}
