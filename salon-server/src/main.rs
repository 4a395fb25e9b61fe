use salon_server::{Config, Server, ServerState, init_logger_with_file, print_banner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. .env and logging (before config so its warnings are visible)
    dotenv::dotenv().ok();
    let log_level = std::env::var("LOG_LEVEL").ok();
    let log_dir = std::env::var("LOG_DIR").ok();
    init_logger_with_file(log_level.as_deref(), log_dir.as_deref());
    print_banner();

    // 2. configuration
    let config = Config::from_env()?;
    tracing::info!(environment = %config.environment, timezone = %config.timezone, "Salon server starting...");

    // 3. state (database, admin account, jwt)
    let state = ServerState::initialize(&config).await?;

    // 4. serve
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
