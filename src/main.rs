use shootout_player::{RegistrationClient, RegistrationConfig, ReqwestTransport};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // A local .env is optional; CI provides real environment variables
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "shootout_player=info,shootout_register=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    // Operator diagnostics go to stdout so RUST_LOG cannot hide them
    let config = RegistrationConfig::load()?;
    println!("[register] {}", config.presence());

    let settings = config.validate()?;
    for line in settings.diagnostics() {
        println!("[register] {}", line);
    }
    info!("Sending registration for '{}'", settings.player_name());

    let client = RegistrationClient::new(ReqwestTransport::new()?, settings);
    let outcome = client.register().await?;
    println!("{}", outcome);

    Ok(())
}
