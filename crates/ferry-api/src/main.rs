use clap::Parser;
use ferry_api::cli::Cli;
use ferry_core::Config;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();

    // Defaults, then .env and environment, then flags
    let mut config = Config::from_env()?;
    cli.apply(&mut config);

    ferry_infra::init_telemetry(cli.log_json || config.is_production())
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    let app = ferry_api::setup::initialize_app(config.clone())?;

    ferry_api::setup::server::start_server(&config, app).await?;

    Ok(())
}
