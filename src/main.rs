// Entrypoint for the CLI application.
// - Loads configuration and sets up logging on stderr.
// - Resolves the backend URL once; the app does not start without one.
// - Hands a `Shell` to the UI loop.

use anyhow::Context;
use credit_risk_cli::{
    api::ApiClient, chat::ChatClient, config::Config, discovery, shell::Shell, ui::main_menu,
};
use reqwest::blocking::Client;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let config = Config::load().context("Failed to load configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .context("Invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let client = Client::builder()
        .build()
        .context("Failed to build HTTP client")?;

    let backend_url = discovery::resolve_backend_url(&client, &config).context(
        "Could not determine the backend URL; make sure the tunnel agent is running or set CREDIT_RISK_BACKEND_URL",
    )?;
    info!(backend_url = %backend_url, "starting");

    let api = ApiClient::with_client(client, backend_url);
    let chat = ChatClient::from_config(&config.chat)?;
    main_menu(Shell::new(api).with_chat(chat))?;
    Ok(())
}
