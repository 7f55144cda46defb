//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use clap::{App, Arg};
use holo_interface::HostProbe;
use holo_session::CliSession;
use holo_smoketest::config::{
    self, Config, LoggingFileRotation, LoggingFmtStyle,
};
use holo_smoketest::{TestCase, TestContext, run_all};
use itertools::Itertools;
use nix::unistd::Uid;
use tracing::level_filters::LevelFilter;
use tracing::{error, info};
use tracing_appender::rolling;
use tracing_subscriber::Layer;
use tracing_subscriber::prelude::*;

// Environment variable naming the only Ethernet interface the tests may
// touch.
const TEST_ETH_ENV: &str = "TEST_ETH";

fn init_tracing(config: &config::Logging) {
    // Enable logging to journald.
    let journald = config.journald.enabled.then(|| {
        tracing_journald::layer().expect("couldn't connect to journald")
    });

    // Enable logging to a file.
    let file = config.file.enabled.then(|| {
        let file_appender = match config.file.rotation {
            LoggingFileRotation::Never => {
                rolling::never(&config.file.dir, &config.file.name)
            }
            LoggingFileRotation::Hourly => {
                rolling::hourly(&config.file.dir, &config.file.name)
            }
            LoggingFileRotation::Daily => {
                rolling::daily(&config.file.dir, &config.file.name)
            }
        };

        let log_level_filter = LevelFilter::from_level(tracing::Level::TRACE);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(file_appender)
            .with_target(false)
            .with_thread_ids(config.file.fmt.show_thread_id)
            .with_file(config.file.fmt.show_source)
            .with_line_number(config.file.fmt.show_source)
            .with_ansi(config.file.fmt.colors);
        let layer = match config.file.fmt.style {
            LoggingFmtStyle::Compact => layer.compact().boxed(),
            LoggingFmtStyle::Full => layer.boxed(),
            LoggingFmtStyle::Json => layer.json().boxed(),
            LoggingFmtStyle::Pretty => layer.pretty().boxed(),
        };
        layer.with_filter(log_level_filter)
    });

    // Enable logging to stdout.
    let stdout = config.stdout.enabled.then(|| {
        let log_level_filter = LevelFilter::from_level(tracing::Level::TRACE);
        let layer = tracing_subscriber::fmt::layer()
            .with_target(false)
            .with_thread_ids(config.stdout.fmt.show_thread_id)
            .with_file(config.stdout.fmt.show_source)
            .with_line_number(config.stdout.fmt.show_source)
            .with_ansi(config.stdout.fmt.colors);
        let layer = match config.stdout.fmt.style {
            LoggingFmtStyle::Compact => layer.compact().boxed(),
            LoggingFmtStyle::Full => layer.boxed(),
            LoggingFmtStyle::Json => layer.json().boxed(),
            LoggingFmtStyle::Pretty => layer.pretty().boxed(),
        };
        layer.with_filter(log_level_filter)
    });

    let env_filter = tracing_subscriber::EnvFilter::builder()
        .with_default_directive("holo=debug".parse().unwrap())
        .from_env_lossy();
    tracing_subscriber::registry()
        .with(env_filter)
        .with(journald)
        .with(file)
        .with(stdout)
        .init();
}

// Keeps the scenarios selected on the command line, in the order given.
fn select_scenarios<'a>(
    scenarios: Vec<TestContext>,
    names: impl Iterator<Item = &'a str>,
) -> Result<Vec<TestContext>, String> {
    let names = names.collect::<Vec<_>>();
    if names.is_empty() {
        return Ok(scenarios);
    }

    names
        .into_iter()
        .map(|name| {
            scenarios
                .iter()
                .find(|ctx| ctx.name == name)
                .cloned()
                .ok_or_else(|| format!("unknown scenario: {name}"))
        })
        .collect()
}

fn print_list(scenarios: &[TestContext], cases: &[TestCase]) {
    println!("scenarios:");
    for ctx in scenarios {
        println!(
            "  {}: {} [{}]",
            ctx.name,
            ctx.base_path,
            ctx.interfaces.iter().join(", ")
        );
    }
    println!("tests:");
    for case in cases {
        println!("  {}", case);
    }
}

// ===== main =====

fn main() {
    let test_names = TestCase::ALL.map(|case| case.name());

    // Parse command-line parameters.
    let matches = App::new("Holo interface configuration smoke tests")
        .version(env!("CARGO_PKG_VERSION"))
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("file")
                .help("Specify an alternative configuration file."),
        )
        .arg(
            Arg::with_name("scenario")
                .short("s")
                .long("scenario")
                .value_name("name")
                .multiple(true)
                .number_of_values(1)
                .help("Run only the given scenario (may be repeated)."),
        )
        .arg(
            Arg::with_name("test")
                .short("t")
                .long("test")
                .value_name("name")
                .multiple(true)
                .number_of_values(1)
                .possible_values(&test_names)
                .help("Run only the given test case (may be repeated)."),
        )
        .arg(
            Arg::with_name("list")
                .short("l")
                .long("list")
                .help("List the available scenarios and test cases."),
        )
        .get_matches();

    // Read configuration file.
    let config_file = matches.value_of("config");
    let config = match Config::load(config_file) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("Failed to parse configuration file: {error}");
            std::process::exit(1);
        }
    };

    // Select scenarios and test cases.
    let test_eth = std::env::var(TEST_ETH_ENV).ok();
    let scenarios = config.scenarios().and_then(|scenarios| {
        let names = matches.values_of("scenario").into_iter().flatten();
        select_scenarios(scenarios, names)
    });
    let scenarios = match scenarios {
        Ok(scenarios) => scenarios
            .into_iter()
            .map(|ctx| ctx.with_dedicated_interface(test_eth.as_deref()))
            .collect::<Vec<_>>(),
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        }
    };
    let cases = match matches.values_of("test") {
        Some(names) => names
            .filter_map(|name| name.parse::<TestCase>().ok())
            .collect::<Vec<_>>(),
        None => TestCase::ALL.to_vec(),
    };

    if matches.is_present("list") {
        print_list(&scenarios, &cases);
        return;
    }

    // Check for root privileges.
    if !Uid::effective().is_root() {
        eprintln!("need privileged user");
        std::process::exit(1);
    }

    // Initialize tracing.
    init_tracing(&config.logging);

    let probe = match HostProbe::new() {
        Ok(probe) => probe,
        Err(error) => {
            error!(%error, "failed to initialize interface probe");
            std::process::exit(1);
        }
    };

    info!(scenarios = scenarios.len(), tests = cases.len(), "starting up");

    // Every test case gets its own session, keyed by our process ID.
    let session_id = std::process::id();
    let session_factory =
        || CliSession::new(session_id, config.session.clone());
    let report = run_all(&scenarios, &cases, session_factory, &probe);

    for result in &report.results {
        println!("{}", result);
    }
    println!("\n{}", report);

    info!("exiting");
    if !report.success() {
        std::process::exit(1);
    }
}
