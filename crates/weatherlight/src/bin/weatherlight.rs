use argh::FromArgs;
use std::time::Duration;
use weatherlight::{setup_logging, Config, Runner};

#[derive(FromArgs)]
/// Show today's weather on the Yeelight bulbs of the local network
struct Args {
    /// path to the configuration file (defaults are used if it is missing)
    #[argh(option, short = 'c', default = "String::from(\"weatherlight.yaml\")")]
    config: String,

    /// fetch the forecast and print the pattern without touching any device
    #[argh(switch)]
    dry_run: bool,

    /// run once even when a schedule is configured
    #[argh(switch)]
    once: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let args: Args = argh::from_env();

    let mut config = match Config::load_or_default(&args.config) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config from '{}': {}", args.config, e);
            std::process::exit(1);
        }
    };
    config.apply_env();

    let runner = Runner::from_config(&config)?;

    if args.dry_run {
        let plan = runner.plan().await?;
        println!("{}", serde_json::to_string_pretty(&plan.summary)?);
        println!("{}", serde_json::to_string_pretty(&plan.pattern)?);
        return Ok(());
    }

    match config.schedule.interval_secs {
        Some(secs) if !args.once => {
            let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(());
            ctrlc::set_handler(move || {
                log::info!("Received Ctrl+C, shutting down gracefully...");
                shutdown_tx.send(()).ok();
            })?;

            runner
                .run_scheduled(Duration::from_secs(secs), shutdown_rx)
                .await;
        }
        _ => {
            let outcome = runner.run_once().await?;
            if outcome.report.failed() > 0 {
                log::warn!(
                    "{} of {} device(s) could not be updated",
                    outcome.report.failed(),
                    outcome.report.total()
                );
            }
        }
    }

    Ok(())
}
