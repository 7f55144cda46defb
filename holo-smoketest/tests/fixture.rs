//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

mod common;

use std::cell::Cell;

use common::SimHost;
use const_addrs::net;
use holo_session::{ConfigPath, MemorySession, SharedConfig};
use holo_smoketest::presets::preset;
use holo_smoketest::{
    CheckError, Error, Fixture, Outcome, TestCase, TestContext, run_all,
    run_case,
};

fn path(s: &str) -> ConfigPath {
    s.parse().unwrap()
}

fn session_factory(
    running: &SharedConfig,
) -> impl FnMut() -> Result<MemorySession, holo_session::Error> + '_ {
    move || Ok(MemorySession::with_running(running.clone()))
}

fn dummy() -> (TestContext, SharedConfig, SimHost) {
    let running = SharedConfig::default();
    let host = SimHost::new(running.clone(), &["interfaces", "dummy"]);
    (preset("dummy").unwrap(), running, host)
}

fn ethernet() -> (TestContext, SharedConfig, SimHost) {
    let running = SharedConfig::default();
    let host = SimHost::new(running.clone(), &["interfaces", "ethernet"])
        .permanent("eth0")
        .permanent("eth1");
    (preset("ethernet").unwrap(), running, host)
}

#[test]
fn dummy_interfaces() {
    let (ctx, running, host) = dummy();

    let report =
        run_all(&[ctx], &TestCase::ALL, session_factory(&running), &host);
    assert_eq!(report.passed(), 4);
    assert_eq!(report.skipped(), 1);
    assert!(report.success());
    assert!(
        report.results[4].outcome.is_skipped()
            && report.results[4].case == TestCase::Vlan8021q
    );

    // Dummy interfaces are removed altogether.
    assert!(!running.lock().unwrap().exists(&path("interfaces dummy")));
}

#[test]
fn ethernet_interfaces() {
    let (ctx, running, host) = ethernet();

    let report =
        run_all(&[ctx], &TestCase::ALL, session_factory(&running), &host);
    assert_eq!(report.passed(), 5);
    assert!(report.success());

    // Ethernet interfaces are reset to an empty definition.
    let running = running.lock().unwrap();
    for ifname in ["eth0", "eth1"] {
        let intf = running
            .get(&path("interfaces ethernet").child(ifname))
            .unwrap();
        assert!(intf.is_empty());
    }
}

#[test]
fn dedicated_ethernet_interface() {
    let (ctx, running, host) = ethernet();
    let ctx = ctx.with_dedicated_interface(Some("eth1"));

    let mut factory = session_factory(&running);
    let outcome = run_case(&ctx, TestCase::Mtu, &mut factory, &host);
    assert!(outcome.is_passed());

    let running = running.lock().unwrap();
    assert_eq!(
        running.leaf_paths(),
        vec![path("interfaces ethernet eth1")]
    );
}

#[test]
fn description_mismatch() {
    let (ctx, running, mut host) = dummy();
    host.faults.truncate_description = true;

    let mut factory = session_factory(&running);
    let outcome = run_case(&ctx, TestCase::Description, &mut factory, &host);
    let error = outcome.into_failed().unwrap();
    assert!(matches!(
        error,
        Error::Check(CheckError::DescriptionMismatch { ref ifname, .. })
            if ifname == "dum435"
    ));
    assert!(!running.lock().unwrap().exists(&path("interfaces dummy")));
}

#[test]
fn mtu_mismatch() {
    let (ctx, running, mut host) = dummy();
    host.faults.ignore_mtu = true;

    let mut factory = session_factory(&running);
    let outcome = run_case(&ctx, TestCase::Mtu, &mut factory, &host);
    let Ok(Error::Check(error)) = outcome.into_failed() else {
        panic!("unexpected outcome");
    };
    assert_eq!(
        error,
        CheckError::MtuMismatch {
            ifname: "dum435".to_owned(),
            expected: "1280".to_owned(),
            actual: "1500".to_owned(),
        }
    );
}

#[test]
fn address_not_assigned() {
    let (ctx, running, mut host) = dummy();
    host.faults.drop_address = Some(net!("2001:db8:101::1/112"));

    let mut factory = session_factory(&running);
    let outcome = run_case(&ctx, TestCase::AddressMulti, &mut factory, &host);
    let Ok(Error::Check(error)) = outcome.into_failed() else {
        panic!("unexpected outcome");
    };
    assert_eq!(
        error,
        CheckError::AddressNotAssigned {
            ifname: "dum435".to_owned(),
            addr: "2001:db8:101::1/112".to_owned(),
        }
    );

    // The single address test doesn't use the dropped address.
    let outcome = run_case(&ctx, TestCase::AddressSingle, &mut factory, &host);
    assert!(outcome.is_passed());
}

#[test]
fn link_local_addresses_are_ignored() {
    let (ctx, running, mut host) = dummy();

    let mut factory = session_factory(&running);
    for link_local in [true, false] {
        host.link_local = link_local;
        let outcome =
            run_case(&ctx, TestCase::AddressMulti, &mut factory, &host);
        assert!(outcome.is_passed());
    }
}

#[test]
fn missing_capability_skips_without_session() {
    let (ctx, running, host) = dummy();

    let calls = Cell::new(0);
    let mut factory = || {
        calls.set(calls.get() + 1);
        Ok::<_, holo_session::Error>(MemorySession::with_running(
            running.clone(),
        ))
    };
    let outcome = run_case(&ctx, TestCase::Vlan8021q, &mut factory, &host);
    assert!(outcome.is_skipped());
    assert_eq!(calls.get(), 0);

    let outcome = run_case(&ctx, TestCase::Mtu, &mut factory, &host);
    assert!(outcome.is_passed());
    assert_eq!(calls.get(), 1);
}

#[test]
fn session_failure() {
    let (ctx, _, host) = dummy();

    let mut factory = || {
        Err::<MemorySession, _>(holo_session::Error::Environment(
            "no session environment".to_owned(),
        ))
    };
    let outcome = run_case(&ctx, TestCase::Description, &mut factory, &host);
    assert!(matches!(
        outcome,
        Outcome::Failed(Error::Session(holo_session::Error::Environment(_)))
    ));
}

#[test]
fn rejected_commit_still_tears_down() {
    let (ctx, running, host) = dummy();

    let mut factory = || {
        let session = MemorySession::with_running(running.clone())
            .with_validator(|candidate| {
                let mtu_set = candidate
                    .leaf_paths()
                    .iter()
                    .any(|path| path.contains("mtu"));
                match mtu_set {
                    true => Err("MTU can't be changed".to_owned()),
                    false => Ok(()),
                }
            });
        Ok::<_, holo_session::Error>(session)
    };

    let outcome = run_case(&ctx, TestCase::AddressSingle, &mut factory, &host);
    assert!(outcome.is_passed());

    let outcome = run_case(&ctx, TestCase::Mtu, &mut factory, &host);
    assert!(matches!(
        outcome,
        Outcome::Failed(Error::Session(holo_session::Error::Validation(_)))
    ));
    assert!(!running.lock().unwrap().exists(&path("interfaces dummy")));
}

#[test]
fn teardown_failure_is_reported() {
    let (ctx, running, host) = ethernet();

    // Reject any Ethernet interface without a description.
    let mut factory = || {
        let session = MemorySession::with_running(running.clone())
            .with_validator(|candidate| {
                let Some(intfs) = candidate.get(&path("interfaces ethernet"))
                else {
                    return Ok(());
                };
                for (ifname, intf) in intfs.children() {
                    if !intf.exists(&path("description")) {
                        return Err(format!("{}: missing description", ifname));
                    }
                }
                Ok(())
            });
        Ok::<_, holo_session::Error>(session)
    };

    let outcome = run_case(&ctx, TestCase::Description, &mut factory, &host);
    assert!(matches!(
        outcome,
        Outcome::Failed(Error::Session(holo_session::Error::Validation(_)))
    ));

    // The rejected reset left the committed descriptions in place.
    assert!(
        running
            .lock()
            .unwrap()
            .exists(&path("interfaces ethernet eth0 description"))
    );
}

#[test]
fn options_are_applied() {
    let running = SharedConfig::default();
    let host = SimHost::new(running.clone(), &["interfaces", "bonding"]);
    let bonding = preset("bonding").unwrap();
    let without_member = TestContext {
        options: Default::default(),
        ..bonding.clone()
    };

    // A bond without members doesn't accept any address.
    let mut factory = || {
        let session = MemorySession::with_running(running.clone())
            .with_validator(|candidate| {
                let Some(intfs) = candidate.get(&path("interfaces bonding"))
                else {
                    return Ok(());
                };
                for (ifname, intf) in intfs.children() {
                    if !intf.exists(&path("member interface")) {
                        return Err(format!("{}: no member interface", ifname));
                    }
                }
                Ok(())
            });
        Ok::<_, holo_session::Error>(session)
    };

    for case in TestCase::ALL {
        let outcome = run_case(&bonding, case, &mut factory, &host);
        assert!(outcome.is_passed(), "{}: {}", case, outcome);

        let outcome = run_case(&without_member, case, &mut factory, &host);
        assert!(outcome.is_failed(), "{}: {}", case, outcome);
    }
}

#[test]
fn teardown_then_setup_is_clean() {
    let (ctx, running, host) = dummy();

    let mut snapshots = vec![];
    for case in [TestCase::Description, TestCase::Description] {
        let session = MemorySession::with_running(running.clone());
        assert!(!session.candidate().exists(&path("interfaces dummy")));

        let mut fixture = Fixture::setup(&ctx, session, &host);
        fixture.run(case).unwrap();
        assert!(
            fixture
                .session()
                .candidate()
                .exists(&path("interfaces dummy dum300 description"))
        );
        fixture.teardown().unwrap();

        snapshots.push(running.lock().unwrap().clone());
    }

    assert_eq!(snapshots[0], snapshots[1]);
}

#[test]
fn vlan_sub_interfaces() {
    let (ctx, running, host) = ethernet();

    let session = MemorySession::with_running(running.clone());
    let mut fixture = Fixture::setup(&ctx, session, &host);
    fixture.vlan_8021q().unwrap();
    {
        let running = running.lock().unwrap();
        for vlan in ["100", "200", "300", "2000"] {
            let vif = path("interfaces ethernet eth1 vif").child(vlan);
            assert!(running.exists(&vif.join(["address", "192.0.2.1/24"])));
            assert!(running.exists(&vif.join(["mtu", "1280"])));
        }
    }
    fixture.teardown().unwrap();
}

#[test]
fn report_summary() {
    let (ctx, running, mut host) = dummy();
    host.faults.ignore_mtu = true;

    let report =
        run_all(&[ctx], &TestCase::ALL, session_factory(&running), &host);
    assert!(!report.success());
    assert_eq!(
        report.to_string(),
        "test result: FAILED. 3 passed; 1 failed; 1 skipped"
    );

    let failures = report.failures().collect::<Vec<_>>();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].case, TestCase::Mtu);
    assert!(
        failures[0]
            .to_string()
            .starts_with("dummy::change_mtu ... FAILED: dum435: MTU is 1500")
    );
}
