use std::process::ExitCode;

use sidekick_forecast::{SidekickConfig, web};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn init_tracing(format: &str) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sidekick_forecast=info,tower_http=info"));

    let registry = tracing_subscriber::registry().with(filter);
    if format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false).compact())
            .init();
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let config = match SidekickConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{err}. Exiting...");
            return ExitCode::FAILURE;
        }
    };

    init_tracing(&config.logging.format);
    tracing::debug!("Loaded configuration: {:?}", config);

    if let Err(err) = web::run(&config).await {
        tracing::error!("{:#}", err);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
