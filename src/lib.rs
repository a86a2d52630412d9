pub mod config;
pub mod errors;
pub mod executor;
pub mod perception;
pub mod scenario;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::errors::ProbeResult;
use crate::executor::input::{EnigoDevice, InputDevice};
use crate::scenario::session::PlayerSession;
use crate::scenario::state::{Scenario, ScenarioReport};

/// Launches a fresh player for every scenario and collects the reports.
/// A scenario whose player fails to launch is reported as failed.
pub async fn run_scenarios(config: &AppConfig, scenarios: &[Scenario]) -> ProbeResult<Vec<ScenarioReport>> {
    let device: Arc<dyn InputDevice> = Arc::new(EnigoDevice::new(config.timing.drag_step_delay()));
    let mut reports = Vec::with_capacity(scenarios.len());

    for scenario in scenarios {
        let started_at = chrono::Utc::now();
        let session = match PlayerSession::launch(config).await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(scenario = %scenario.name, error = %e, "player launch failed");
                reports.push(ScenarioReport::new(&scenario.name, Err(&e), Vec::new(), started_at));
                continue;
            }
        };
        tracing::debug!(trace = %session.trace().path().display(), "session ready");
        let report = match session.runner(config, device.clone()) {
            Ok(mut runner) => runner.run(scenario).await,
            Err(e) => {
                session.shutdown().await;
                return Err(e);
            }
        };
        session.shutdown().await;
        reports.push(report);
    }

    Ok(reports)
}

/// Entry point for the `playerprobe` binary. Returns whether every scenario passed.
pub async fn run(names: Vec<String>) -> ProbeResult<bool> {
    // Load .env file if present (ignore error if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = config::load_config()?;
    let scenarios = scenario::select_scenarios(&config.scenarios, &names)?;
    tracing::info!(count = scenarios.len(), "running scenarios");

    let reports = run_scenarios(&config, &scenarios).await?;
    println!("{}", serde_json::to_string_pretty(&reports)?);

    let failed = reports.iter().filter(|r| !r.passed).count();
    if failed > 0 {
        tracing::error!(failed, total = reports.len(), "scenarios failed");
    } else {
        tracing::info!(total = reports.len(), "all scenarios passed");
    }
    Ok(failed == 0)
}
