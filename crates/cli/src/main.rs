use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};

use tether_cli::{cli::Cli, host, logging};
use tether_runtime::{
    ActionScheduler, CommandDispatcher, SchedulerEvent, SessionManager, WebSocketConnector,
};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init_logging(cli.verbose);

    if let Err(err) = run(cli).await {
        error!(target: "tether", error = %err, "agent failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let scheduler = Arc::new(ActionScheduler::new(Arc::new(host::LoggedTapExecutor)));
    let dispatcher = CommandDispatcher::new(Arc::new(host::ProcessLauncher), scheduler.clone());
    let device = Arc::new(host::SystemDeviceInfo::new(cli.device_id));
    let session = SessionManager::new(cli.url, Arc::new(WebSocketConnector), device, dispatcher);

    // Tap outcomes are observed locally; the controller only gets the
    // submission ack, never a per-tap reply.
    let mut plans = scheduler.subscribe();
    tokio::spawn(async move {
        while let Some(event) = plans.recv().await {
            match event {
                SchedulerEvent::StepFired {
                    index,
                    x,
                    y,
                    dispatched,
                } => {
                    info!(target: "tether", index, x, y, dispatched, "tap fired");
                }
                SchedulerEvent::PlanCompleted { steps } => {
                    info!(target: "tether", steps, "plan completed");
                }
                SchedulerEvent::PlanCancelled { fired, total } => {
                    info!(target: "tether", fired, total, "plan cancelled");
                }
            }
        }
    });

    session.start();
    info!(target: "tether", "agent running, press Ctrl-C to stop");

    tokio::signal::ctrl_c().await?;
    info!(target: "tether", "shutting down");
    session.stop().await;

    Ok(())
}
