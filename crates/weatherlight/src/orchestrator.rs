//! Fan-out of a lighting pattern to every device.
//!
//! Each device gets its own task bounded by a timeout. All tasks are spawned
//! up front and joined once; a failing, hanging or panicking device only
//! affects its own entry in the [`RunReport`].

use futures::future::join_all;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::device::{Device, DeviceError, Flow, LightController};
use crate::lighting::LightingPattern;

/// Result of driving one device.
#[derive(Debug, Clone)]
pub struct DeviceOutcome {
    pub device: Device,
    pub result: Result<(), DeviceError>,
    pub elapsed: Duration,
}

impl DeviceOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Outcomes of one run, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub outcomes: Vec<DeviceOutcome>,
}

impl RunReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failed(&self) -> usize {
        self.total() - self.succeeded()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Device, &DeviceError)> {
        self.outcomes
            .iter()
            .filter_map(|o| o.result.as_ref().err().map(|e| (&o.device, e)))
    }

    /// Log one line per device and a closing summary.
    pub fn log_summary(&self) {
        for outcome in &self.outcomes {
            match &outcome.result {
                Ok(()) => log::info!(
                    "  [ok]     {} ({} ms)",
                    outcome.device,
                    outcome.elapsed.as_millis()
                ),
                Err(e) => log::warn!("  [failed] {}: {}", outcome.device, e),
            }
        }
        log::info!(
            "{} device(s): {} succeeded, {} failed",
            self.total(),
            self.succeeded(),
            self.failed()
        );
    }
}

/// Drives devices concurrently with a shared controller.
pub struct Orchestrator {
    controller: Arc<dyn LightController>,
    device_timeout: Duration,
}

impl Orchestrator {
    pub fn new(controller: Arc<dyn LightController>, device_timeout: Duration) -> Self {
        Self {
            controller,
            device_timeout,
        }
    }

    /// Power on every device and start the pattern on it.
    ///
    /// Returns once every device task has finished or timed out.
    pub async fn run(&self, devices: Vec<Device>, pattern: &LightingPattern) -> RunReport {
        if devices.is_empty() {
            log::info!("No devices to drive");
            return RunReport::default();
        }

        let flow = Arc::new(Flow::from_pattern(pattern));
        log::info!("Driving {} device(s) with {}", devices.len(), pattern);

        let tasks: Vec<_> = devices
            .into_iter()
            .map(|device| {
                let controller = Arc::clone(&self.controller);
                let flow = Arc::clone(&flow);
                let timeout = self.device_timeout;
                let task_device = device.clone();
                let handle = tokio::spawn(async move {
                    drive_device(controller.as_ref(), &task_device, &flow, timeout).await
                });
                (device, handle)
            })
            .collect();

        let (devices, handles): (Vec<_>, Vec<_>) = tasks.into_iter().unzip();
        let joined = join_all(handles).await;

        let outcomes = devices
            .into_iter()
            .zip(joined)
            .map(|(device, joined)| {
                let (result, elapsed) = match joined {
                    Ok(outcome) => outcome,
                    Err(e) => (Err(DeviceError::TaskFailed(e.to_string())), Duration::ZERO),
                };
                if let Err(e) = &result {
                    log::debug!("Device {} failed: {}", device, e);
                }
                DeviceOutcome {
                    device,
                    result,
                    elapsed,
                }
            })
            .collect();

        RunReport { outcomes }
    }
}

async fn drive_device(
    controller: &dyn LightController,
    device: &Device,
    flow: &Flow,
    timeout: Duration,
) -> (Result<(), DeviceError>, Duration) {
    let started = Instant::now();
    let commands = async {
        controller.power_on(device).await?;
        controller.start_flow(device, flow).await
    };

    let result = match tokio::time::timeout(timeout, commands).await {
        Ok(result) => result,
        Err(_) => Err(DeviceError::Timeout(timeout)),
    };
    let elapsed = started.elapsed();
    log::debug!("Device {} finished in {:?}", device, elapsed);
    (result, elapsed)
}
