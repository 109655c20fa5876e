mod api;
mod auth;
mod config;
mod error;
mod main_lib;

#[cfg(test)]
mod test_support;

use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = config::ServerConfig::from_env();
    main_lib::serve(config).await
}
