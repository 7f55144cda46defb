//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(clippy::derivable_impls)]

use std::collections::BTreeMap;

use holo_session::{CliConfig, ConfigPath};
use serde::Deserialize;

use crate::context::{Capabilities, TestContext};
use crate::presets;

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub logging: Logging,
    pub session: CliConfig,
    #[serde(rename = "scenario")]
    pub scenarios: Vec<ScenarioConfig>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub journald: LoggingJournald,
    pub file: LoggingFile,
    pub stdout: LoggingStdout,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingJournald {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFile {
    pub enabled: bool,
    pub dir: String,
    pub name: String,
    pub rotation: LoggingFileRotation,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingStdout {
    pub enabled: bool,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFmt {
    pub style: LoggingFmtStyle,
    pub colors: bool,
    pub show_thread_id: bool,
    pub show_source: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFileRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFmtStyle {
    Compact,
    Full,
    Json,
    Pretty,
}

// Scenario definition.
//
// A scenario named after a built-in preset inherits its settings, and any
// field given here replaces the preset's.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ScenarioConfig {
    pub name: String,
    pub base_path: Option<ConfigPath>,
    pub interfaces: Option<Vec<String>>,
    pub capabilities: Option<Vec<Capability>>,
    #[serde(default)]
    pub options: BTreeMap<String, Vec<String>>,
}

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Capability {
    Mtu,
    Vlan,
}

// ===== impl Config =====

impl Config {
    const DFLT_FILEPATH: &'static str = "/etc/holo-smoketest.toml";

    pub fn load(config_file: Option<&str>) -> Result<Config, toml::de::Error> {
        let config_file = config_file.unwrap_or(Config::DFLT_FILEPATH);

        match std::fs::read_to_string(config_file) {
            Ok(config_str) => toml::from_str(&config_str),
            Err(err) => {
                eprintln!("Failed to load configuration file: {err}");
                eprintln!("Falling back to default configuration...");
                Ok(Config::default())
            }
        }
    }

    // Returns the configured scenarios, or the built-in ones when none is
    // configured.
    pub fn scenarios(&self) -> Result<Vec<TestContext>, String> {
        if self.scenarios.is_empty() {
            return Ok(presets::presets());
        }

        self.scenarios
            .iter()
            .map(ScenarioConfig::to_context)
            .collect()
    }
}

// ===== impl LoggingJournald =====

impl Default for LoggingJournald {
    fn default() -> LoggingJournald {
        LoggingJournald { enabled: false }
    }
}

// ===== impl LoggingFile =====

impl Default for LoggingFile {
    fn default() -> LoggingFile {
        LoggingFile {
            enabled: false,
            dir: "/var/log".to_owned(),
            name: "holo-smoketest.log".to_owned(),
            rotation: Default::default(),
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingStdout =====

impl Default for LoggingStdout {
    fn default() -> LoggingStdout {
        LoggingStdout {
            enabled: true,
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingFmt =====

impl Default for LoggingFmt {
    fn default() -> LoggingFmt {
        LoggingFmt {
            style: LoggingFmtStyle::Full,
            colors: false,
            show_thread_id: false,
            show_source: false,
        }
    }
}

// ===== impl ScenarioConfig =====

impl ScenarioConfig {
    pub fn to_context(&self) -> Result<TestContext, String> {
        let mut ctx = match (presets::preset(&self.name), &self.base_path) {
            (Some(ctx), None) => ctx,
            (Some(ctx), Some(base_path)) => TestContext {
                base_path: base_path.clone(),
                ..ctx
            },
            (None, Some(base_path)) => {
                TestContext::new(&self.name, base_path.clone())
            }
            (None, None) => {
                return Err(format!(
                    "scenario {}: missing base-path",
                    self.name
                ));
            }
        };

        if let Some(interfaces) = &self.interfaces {
            ctx.interfaces = interfaces.clone();
        }
        if let Some(capabilities) = &self.capabilities {
            ctx.capabilities = capabilities
                .iter()
                .map(|capability| capability.flag())
                .collect();
        }
        for (ifname, options) in &self.options {
            let options = options
                .iter()
                .map(|option| {
                    option.split_whitespace().collect::<ConfigPath>()
                })
                .collect::<Vec<_>>();
            ctx.options.insert(ifname.clone(), options);
        }

        if ctx.interfaces.is_empty() {
            return Err(format!("scenario {}: no interfaces", self.name));
        }

        Ok(ctx)
    }
}

// ===== impl Capability =====

impl Capability {
    pub fn flag(&self) -> Capabilities {
        match self {
            Capability::Mtu => Capabilities::MTU,
            Capability::Vlan => Capabilities::VLAN,
        }
    }
}
