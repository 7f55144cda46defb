//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use derive_new::new;
use enum_as_inner::EnumAsInner;
use holo_interface::InterfaceProbe;
use holo_session::Session;
use tracing::{error, info, info_span, warn};

use crate::context::{TestCase, TestContext};
use crate::error::Error;
use crate::fixture::Fixture;

#[derive(Debug, EnumAsInner)]
pub enum Outcome {
    Passed,
    Skipped,
    Failed(Error),
}

#[derive(Debug, new)]
pub struct TestResult {
    pub scenario: String,
    pub case: TestCase,
    pub outcome: Outcome,
}

#[derive(Debug, Default)]
pub struct Report {
    pub results: Vec<TestResult>,
}

// ===== impl Outcome =====

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Passed => write!(f, "ok"),
            Outcome::Skipped => write!(f, "skipped"),
            Outcome::Failed(error) => write!(f, "FAILED: {}", error),
        }
    }
}

// ===== impl TestResult =====

impl std::fmt::Display for TestResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}::{} ... {}", self.scenario, self.case, self.outcome)
    }
}

// ===== impl Report =====

impl Report {
    pub fn passed(&self) -> usize {
        self.count(Outcome::is_passed)
    }

    pub fn skipped(&self) -> usize {
        self.count(Outcome::is_skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(Outcome::is_failed)
    }

    // Returns true if no test case failed.
    pub fn success(&self) -> bool {
        self.failed() == 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &TestResult> {
        self.results
            .iter()
            .filter(|result| result.outcome.is_failed())
    }

    fn count(&self, f: impl Fn(&Outcome) -> bool) -> usize {
        self.results
            .iter()
            .filter(|result| f(&result.outcome))
            .count()
    }
}

impl std::fmt::Display for Report {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "test result: {}. {} passed; {} failed; {} skipped",
            if self.success() { "ok" } else { "FAILED" },
            self.passed(),
            self.failed(),
            self.skipped()
        )
    }
}

// ===== global functions =====

// Runs a single test case of a scenario over a fresh session.
//
// Test cases whose required capabilities the scenario doesn't declare are
// skipped without opening a session. Otherwise the configuration is always
// torn down, and the first error is the one reported.
pub fn run_case<S, F, P>(
    ctx: &TestContext,
    case: TestCase,
    session_factory: &mut F,
    probe: &P,
) -> Outcome
where
    S: Session,
    F: FnMut() -> Result<S, holo_session::Error>,
    P: InterfaceProbe + ?Sized,
{
    let span = info_span!("test", scenario = %ctx.name, %case);
    let _span_guard = span.enter();

    if !ctx.capabilities.contains(case.required()) {
        info!("skipped");
        return Outcome::Skipped;
    }

    let session = match session_factory() {
        Ok(session) => session,
        Err(error) => {
            error!(%error, "failed to open configuration session");
            return Outcome::Failed(error.into());
        }
    };

    let mut fixture = Fixture::setup(ctx, session, probe);
    let result = fixture.run(case);
    let teardown = fixture.teardown();

    match (result, teardown) {
        (Ok(()), Ok(())) => {
            info!("passed");
            Outcome::Passed
        }
        (Ok(()), Err(error)) => {
            error!(%error, "teardown failed");
            Outcome::Failed(error)
        }
        (Err(error), teardown) => {
            error!(%error, "failed");
            if let Err(teardown_error) = teardown {
                warn!(error = %teardown_error, "teardown failed");
            }
            Outcome::Failed(error)
        }
    }
}

// Runs the given test cases over all scenarios, in order.
pub fn run_all<S, F, P>(
    scenarios: &[TestContext],
    cases: &[TestCase],
    mut session_factory: F,
    probe: &P,
) -> Report
where
    S: Session,
    F: FnMut() -> Result<S, holo_session::Error>,
    P: InterfaceProbe + ?Sized,
{
    let mut report = Report::default();
    for ctx in scenarios {
        for case in cases {
            let outcome = run_case(ctx, *case, &mut session_factory, probe);
            report
                .results
                .push(TestResult::new(ctx.name.clone(), *case, outcome));
        }
    }
    report
}
