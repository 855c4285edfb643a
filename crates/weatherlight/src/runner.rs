//! Wiring of a full run: forecast, pattern, devices.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::Config;
use crate::device::{DeviceDiscovery, SsdpDiscovery, StaticDiscovery, YeelightController};
use crate::error::Result;
use crate::lighting::{select_pattern, LightingPattern, Palette};
use crate::orchestrator::{Orchestrator, RunReport};
use crate::weather::{aggregate, DaySummary, ForecastSource, MetOfficeClient, Thresholds};

/// Initialize logging with env_logger.
///
/// Respects RUST_LOG environment variable. Defaults to "info" level.
pub fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
}

/// The day's decision, before any device is touched.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    pub summary: DaySummary,
    pub pattern: LightingPattern,
}

/// Everything a completed run produced.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub plan: Plan,
    pub report: RunReport,
}

pub struct Runner {
    source: Arc<dyn ForecastSource>,
    discovery: Arc<dyn DeviceDiscovery>,
    orchestrator: Orchestrator,
    thresholds: Thresholds,
    hold_duration_secs: u32,
    palette: Palette,
}

impl Runner {
    pub fn new(
        source: Arc<dyn ForecastSource>,
        discovery: Arc<dyn DeviceDiscovery>,
        orchestrator: Orchestrator,
        config: &Config,
    ) -> Self {
        Self {
            source,
            discovery,
            orchestrator,
            thresholds: config.thresholds,
            hold_duration_secs: config.lighting.hold_duration_secs,
            palette: config.lighting.palette.clone(),
        }
    }

    /// Build the Met Office / Yeelight runner described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let source = Arc::new(MetOfficeClient::new(config.weather.clone())?);

        let static_devices = config.devices.static_devices()?;
        let discovery: Arc<dyn DeviceDiscovery> = if static_devices.is_empty() {
            Arc::new(SsdpDiscovery::new(config.devices.discovery_timeout()))
        } else {
            log::info!("Using {} configured device(s)", static_devices.len());
            Arc::new(StaticDiscovery::new(static_devices))
        };

        let controller = Arc::new(YeelightController::new(config.devices.device_timeout()));
        let orchestrator = Orchestrator::new(controller, config.devices.device_timeout());

        Ok(Self::new(source, discovery, orchestrator, config))
    }

    /// Fetch the forecast and decide the pattern.
    pub async fn plan(&self) -> Result<Plan> {
        let samples = self.source.fetch().await?;
        log::info!("Received {} forecast period(s)", samples.len());

        let summary = aggregate(&samples, &self.thresholds)?;
        log::info!(
            "Day summary: precipitation={}, heavy_rain={}, heavy_snow={}, feels like {:.1}..{:.1}°C",
            summary.precipitation,
            summary.heavy_rain,
            summary.heavy_snow,
            summary.min_temp,
            summary.max_temp
        );

        let pattern = select_pattern(&summary, self.hold_duration_secs, &self.palette)?;
        log::info!("Selected pattern: {}", pattern);

        Ok(Plan { summary, pattern })
    }

    /// One complete run. Device failures end up in the report; only the
    /// forecast and discovery stages can fail the run.
    pub async fn run_once(&self) -> Result<RunOutcome> {
        let plan = self.plan().await?;

        let devices = self.discovery.discover().await?;
        log::info!("Discovered {} device(s)", devices.len());

        let report = self.orchestrator.run(devices, &plan.pattern).await;
        report.log_summary();

        Ok(RunOutcome { plan, report })
    }

    /// Repeat runs every `interval` until the shutdown signal fires.
    ///
    /// A failed run is logged and retried at the next tick.
    pub async fn run_scheduled(&self, interval: Duration, mut shutdown: watch::Receiver<()>) {
        log::info!("Repeating every {:?}. Press Ctrl+C to stop.", interval);
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                result = self.run_once() => {
                    if let Err(e) = result {
                        log::error!("Run failed: {}", e);
                    }
                }
            }

            tokio::select! {
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(interval) => {}
            }
        }
        log::info!("Scheduler stopped");
    }
}
