//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

pub mod config;
pub mod context;
pub mod error;
pub mod fixture;
pub mod presets;
pub mod runner;

pub use crate::context::{Capabilities, TestCase, TestContext};
pub use crate::error::{CheckError, Error};
pub use crate::fixture::Fixture;
pub use crate::runner::{Outcome, Report, TestResult, run_all, run_case};
