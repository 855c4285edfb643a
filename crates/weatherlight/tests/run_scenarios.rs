//! End-to-end runs over fake forecast, discovery and bulbs.

mod common;

use common::{device, sample, Behavior, FakeDiscovery, FakeSource, RecordingController};
use std::sync::Arc;
use std::time::Duration;
use weatherlight::device::{Device, DeviceError};
use weatherlight::lighting::LightingPattern;
use weatherlight::weather::{DaySummary, ForecastError, ForecastSample, SourceError};
use weatherlight::{Config, Error, Orchestrator, Runner};

fn runner(
    samples: Option<Vec<ForecastSample>>,
    devices: Option<Vec<Device>>,
    controller: Arc<RecordingController>,
    config: &Config,
) -> Runner {
    Runner::new(
        Arc::new(FakeSource { samples }),
        Arc::new(FakeDiscovery { devices }),
        Orchestrator::new(controller, config.devices.device_timeout()),
        config,
    )
}

#[tokio::test]
async fn rainy_day_pulses_fast_on_every_bulb() {
    let config = Config::default();
    let controller = Arc::new(RecordingController::default());
    let runner = runner(
        Some(vec![sample(60, 10, 0, 5.0), sample(70, 80, 0, 8.0)]),
        Some(vec![device(1), device(2)]),
        controller.clone(),
        &config,
    );

    let outcome = runner.run_once().await.unwrap();

    assert_eq!(
        outcome.plan.summary,
        DaySummary {
            precipitation: true,
            heavy_rain: true,
            heavy_snow: false,
            min_temp: 5.0,
            max_temp: 8.0,
        }
    );
    assert!(matches!(
        outcome.plan.pattern,
        LightingPattern::PulseEffect {
            pulse_duration_ms: 200,
            repeat_count: 300,
            ..
        }
    ));
    assert_eq!(outcome.report.succeeded(), 2);
    assert_eq!(controller.flows.lock().unwrap().len(), 2);
}

#[tokio::test]
async fn dry_warm_day_holds_steady_color() {
    let config = Config::parse(
        r#"
lighting:
  hold_duration_secs: 90
  palette:
    warm:
      hue: 15
      saturation: 35
"#,
    )
    .unwrap();
    let runner = runner(
        Some(vec![sample(10, 0, 0, 14.0), sample(20, 0, 0, 22.5)]),
        Some(vec![device(3)]),
        Arc::new(RecordingController::default()),
        &config,
    );

    let plan = runner.plan().await.unwrap();

    assert_eq!(
        plan.pattern,
        LightingPattern::SteadyColor {
            hue: 15,
            saturation: 35,
            brightness: 100,
            hold_duration_secs: 90,
        }
    );
}

#[tokio::test]
async fn configured_thresholds_reach_the_aggregator() {
    let config = Config::parse("thresholds:\n  precipitation: 80\n").unwrap();
    let runner = runner(
        Some(vec![sample(60, 0, 0, 12.0), sample(70, 0, 0, 15.0)]),
        Some(Vec::new()),
        Arc::new(RecordingController::default()),
        &config,
    );

    let plan = runner.plan().await.unwrap();

    assert!(!plan.summary.precipitation);
    assert!(matches!(plan.pattern, LightingPattern::SteadyColor { hue: 50, .. }));
}

#[tokio::test]
async fn device_failures_do_not_fail_the_run() {
    let config = Config::default();
    let devices = vec![device(1), device(2), device(3)];
    let controller = Arc::new(RecordingController::default().with(
        &devices[1],
        Behavior::Fail(DeviceError::Protocol("unsupported method".to_string())),
    ));
    let runner = runner(
        Some(vec![sample(0, 0, 0, -3.0)]),
        Some(devices),
        controller,
        &config,
    );

    let outcome = runner.run_once().await.unwrap();

    assert_eq!(outcome.report.succeeded(), 2);
    assert_eq!(outcome.report.failed(), 1);
}

#[tokio::test]
async fn no_devices_is_still_a_successful_run() {
    let config = Config::default();
    let runner = runner(
        Some(vec![sample(0, 0, 0, 18.0)]),
        Some(Vec::new()),
        Arc::new(RecordingController::default()),
        &config,
    );

    let outcome = runner.run_once().await.unwrap();

    assert_eq!(outcome.report.total(), 0);
}

#[tokio::test]
async fn empty_forecast_aborts_before_discovery() {
    let config = Config::default();
    let controller = Arc::new(RecordingController::default());
    let runner = runner(Some(Vec::new()), None, controller.clone(), &config);

    let err = runner.run_once().await.unwrap_err();

    assert!(matches!(err, Error::Forecast(ForecastError::EmptyForecast)));
    assert!(controller.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn unreachable_weather_source_aborts() {
    let config = Config::default();
    let runner = runner(
        None,
        Some(vec![device(1)]),
        Arc::new(RecordingController::default()),
        &config,
    );

    let err = runner.run_once().await.unwrap_err();

    assert!(matches!(err, Error::Source(SourceError::Api { status: 503, .. })));
}

#[tokio::test]
async fn failed_discovery_aborts() {
    let config = Config::default();
    let runner = runner(
        Some(vec![sample(0, 0, 0, 18.0)]),
        None,
        Arc::new(RecordingController::default()),
        &config,
    );

    let err = runner.run_once().await.unwrap_err();

    assert!(matches!(err, Error::Discovery(_)));
}

#[tokio::test]
async fn scheduled_runs_stop_on_shutdown() {
    let config = Config::default();
    let controller = Arc::new(RecordingController::default());
    let runner = runner(
        Some(vec![sample(0, 0, 0, 18.0)]),
        Some(vec![device(9)]),
        controller.clone(),
        &config,
    );
    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());

    let stop_after_first_run = async {
        while controller.calls_for(&device(9)).len() < 2 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        shutdown_tx.send(()).unwrap();
    };

    tokio::time::timeout(Duration::from_secs(5), async {
        tokio::join!(
            runner.run_scheduled(Duration::from_secs(3600), shutdown_rx),
            stop_after_first_run
        )
    })
    .await
    .expect("scheduler did not stop");

    assert_eq!(controller.calls_for(&device(9)), vec!["power_on", "start_flow"]);
}
