use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use anyhow::{Context, Result};
use tokio::{
    signal::unix::{SignalKind, signal},
    task::{JoinError, JoinHandle},
};

use bouncer::{
    admission::AdmissionController,
    arrival::ArrivalGenerator,
    cli::args_from_env,
    config::Config,
    driver::{RunDriver, RunOutcome},
    error::BouncerError,
    logging::init_tracing,
    simulation::LocalSimulationHarness,
};

type RunResult = Result<RunOutcome, BouncerError>;

#[tokio::main]
async fn main() -> Result<()> {
    let args = args_from_env()?;
    let config = Config::load(&args.config_path)
        .with_context(|| format!("failed to load config from {}", args.config_path.display()))?;
    let logging = init_tracing(&config.logging).context("failed to initialize logging")?;

    let scenario = config
        .run
        .resolve_scenario()
        .context("failed to resolve scenario")?;
    let strategy = config
        .policy
        .strategy_for(&scenario)
        .context("failed to select admission strategy")?;

    let seed = args.seed.or(config.run.seed);
    let generator = match seed {
        Some(seed) => ArrivalGenerator::seeded(Arc::clone(&scenario.model), seed),
        None => ArrivalGenerator::from_entropy(Arc::clone(&scenario.model)),
    };
    let mut harness = LocalSimulationHarness::new(
        scenario.label.clone(),
        scenario.constraints.clone(),
        Arc::clone(&scenario.model),
        Box::new(generator),
        config.run.harness_config(),
    )
    .context("failed to build simulation harness")?;

    let controller = AdmissionController::from_config(&strategy, config.policy.scoring.clone());
    let driver = RunDriver::new(controller, harness.capacity());
    let cancel = driver.cancel_handle();

    tracing::info!(
        target: "bouncer",
        process_run_id = %logging.run_id(),
        scenario = %scenario.label,
        strategy = ?strategy,
        seed = ?seed,
        "simulation_starting"
    );

    let label = scenario.label.clone();
    let mut run_task: JoinHandle<RunResult> =
        tokio::task::spawn_blocking(move || driver.run(&mut harness, &label));

    let mut sigint =
        signal(SignalKind::interrupt()).context("unable to listen for SIGINT (Ctrl+C)")?;
    let mut sigterm = signal(SignalKind::terminate()).context("unable to listen for SIGTERM")?;

    let joined = tokio::select! {
        joined = &mut run_task => joined,
        _ = sigint.recv() => stop_at_boundary(&cancel, "SIGINT", &mut run_task).await,
        _ = sigterm.recv() => stop_at_boundary(&cancel, "SIGTERM", &mut run_task).await,
    };

    let outcome = joined.context("run task join failed")??;
    let rendered =
        serde_json::to_string_pretty(&outcome).context("failed to serialize run outcome")?;
    println!("{rendered}");
    Ok(())
}

async fn stop_at_boundary(
    cancel: &AtomicBool,
    signal_name: &str,
    run_task: &mut JoinHandle<RunResult>,
) -> Result<RunResult, JoinError> {
    tracing::warn!(target: "bouncer", signal = signal_name, "stop_requested");
    eprintln!("received {signal_name}; stopping at the next candidate");
    cancel.store(true, Ordering::SeqCst);
    run_task.await
}
