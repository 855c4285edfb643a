//! Orchestrator Scenario Tests
//!
//! Drives several fake bulbs at once and checks that failures, hangs and
//! panics stay confined to the device that caused them.

mod common;

use common::{device, Behavior, RecordingController};
use std::sync::Arc;
use std::time::{Duration, Instant};
use weatherlight::device::DeviceError;
use weatherlight::lighting::LightingPattern;
use weatherlight::Orchestrator;

fn pulse() -> LightingPattern {
    LightingPattern::PulseEffect {
        red: 160,
        green: 200,
        blue: 255,
        pulse_duration_ms: 200,
        repeat_count: 300,
    }
}

fn steady() -> LightingPattern {
    LightingPattern::SteadyColor {
        hue: 50,
        saturation: 100,
        brightness: 100,
        hold_duration_secs: 60,
    }
}

#[tokio::test]
async fn middle_device_failure_is_isolated() {
    let devices = vec![device(1), device(2), device(3)];
    let controller = Arc::new(RecordingController::default().with(
        &devices[1],
        Behavior::Fail(DeviceError::Unreachable("connection refused".to_string())),
    ));
    let orchestrator = Orchestrator::new(controller.clone(), Duration::from_secs(5));

    let report = orchestrator.run(devices.clone(), &pulse()).await;

    assert_eq!(report.total(), 3);
    assert_eq!(report.succeeded(), 2);
    assert_eq!(report.failed(), 1);

    let failures: Vec<_> = report.failures().collect();
    assert_eq!(failures[0].0, &devices[1]);
    assert!(matches!(failures[0].1, DeviceError::Unreachable(_)));

    assert_eq!(controller.calls_for(&devices[0]), vec!["power_on", "start_flow"]);
    assert_eq!(controller.calls_for(&devices[1]), vec!["power_on"]);
    assert_eq!(controller.calls_for(&devices[2]), vec!["power_on", "start_flow"]);
}

#[tokio::test]
async fn empty_device_list_completes_immediately() {
    let controller = Arc::new(RecordingController::default());
    let orchestrator = Orchestrator::new(controller.clone(), Duration::from_secs(5));

    let report = orchestrator.run(Vec::new(), &steady()).await;

    assert_eq!(report.total(), 0);
    assert_eq!(report.failed(), 0);
    assert!(controller.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn hanging_device_times_out_without_stalling_others() {
    let devices = vec![device(10), device(11)];
    let controller = Arc::new(RecordingController::default().with(&devices[0], Behavior::Hang));
    let timeout = Duration::from_millis(200);
    let orchestrator = Orchestrator::new(controller.clone(), timeout);

    let started = Instant::now();
    let report = orchestrator.run(devices.clone(), &steady()).await;

    assert!(started.elapsed() < Duration::from_secs(3));
    assert_eq!(report.succeeded(), 1);
    assert_eq!(report.outcomes[0].result, Err(DeviceError::Timeout(timeout)));
    assert!(report.outcomes[1].is_success());
}

#[tokio::test]
async fn panicking_device_is_reported_as_failure() {
    let devices = vec![device(20), device(21), device(22)];
    let controller = Arc::new(RecordingController::default().with(&devices[2], Behavior::Panic));
    let orchestrator = Orchestrator::new(controller.clone(), Duration::from_secs(5));

    let report = orchestrator.run(devices.clone(), &pulse()).await;

    assert_eq!(report.succeeded(), 2);
    assert!(matches!(
        report.outcomes[2].result,
        Err(DeviceError::TaskFailed(_))
    ));
    assert_eq!(report.outcomes[2].device, devices[2]);
}

#[tokio::test]
async fn devices_are_driven_concurrently() {
    let devices: Vec<_> = (30..38).map(device).collect();
    let delay = Duration::from_millis(300);
    let controller = devices.iter().fold(RecordingController::default(), |c, d| {
        c.with(d, Behavior::Delay(delay))
    });
    let orchestrator = Orchestrator::new(Arc::new(controller), Duration::from_secs(10));

    let started = Instant::now();
    let report = orchestrator.run(devices, &steady()).await;

    // Sequential execution would take 8 devices x 2 commands x 300 ms.
    assert!(started.elapsed() < Duration::from_millis(2400));
    assert_eq!(report.succeeded(), 8);
}

#[tokio::test]
async fn every_device_receives_the_same_flow() {
    let devices = vec![device(40), device(41), device(42)];
    let controller = Arc::new(RecordingController::default());
    let orchestrator = Orchestrator::new(controller.clone(), Duration::from_secs(5));

    orchestrator.run(devices, &pulse()).await;

    let flows = controller.flows.lock().unwrap();
    assert_eq!(flows.len(), 3);
    assert!(flows.iter().all(|f| *f == flows[0]));
    assert_eq!(flows[0].count, 300);
    assert_eq!(flows[0].transitions.len(), 2);
}
