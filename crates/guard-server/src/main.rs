use anyhow::Context;
use clap::Parser;
use guard_config::GuardConfig;
use guard_db::service::GuardService;
use guard_server::cli::Cli;
use guard_server::{AppState, router};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("cloudguard error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_level())?;

    let mut config = GuardConfig::load_with_dotenv(cli.config.as_deref())
        .context("failed to load configuration")?;
    cli.apply(&mut config);
    for warning in config.warnings() {
        warn!("{warning}");
    }

    let location = config.store_location()?;
    let service = GuardService::new_local(&location.as_path_str())
        .await
        .context("failed to open the compliance store")?;

    if config.demo_seed {
        let report = service.seed_demo_data().await.context("demo seed failed")?;
        info!(
            policies = report.policies,
            accounts = report.accounts,
            evaluations = report.evaluations,
            skipped = report.skipped,
            "demo data seeded"
        );
    }

    let state = AppState::from_config(&config, service)?;
    let app = router(state, &config.cors_origins);

    let addr = cli.bind_addr(config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(app = %config.app_name, %addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("server stopped");
    Ok(())
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_env("CLOUDGUARD_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(error) = tokio::signal::ctrl_c().await {
        warn!(%error, "failed to listen for ctrl-c");
    }
}
