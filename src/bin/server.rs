use anyhow::Context;
use book_author_service::{
    cli_args::CliArgs,
    server::{Server, ServerConfig},
};
use clap::Parser;

fn init_tracing() -> anyhow::Result<()> {
    tracing::subscriber::set_global_default(
        tracing_subscriber::fmt::Subscriber::builder()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .finish(),
    )
    .context("Failed to set global tracing subscriber")?;

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    if std::env::var_os("RUST_LOG").is_none() {
        std::env::set_var(
            "RUST_LOG",
            "server=trace,book_author_service=trace,tower_http=trace",
        );
    }

    init_tracing()?;

    let args = CliArgs::parse();

    let server_config = match &args.config_file {
        Some(config_file) => {
            tracing::info!(%config_file, "Loading config");

            ServerConfig::from_config_file(config_file)
                .await
                .context("Invalid config")?
        }
        None => ServerConfig::from_cli_args(&args),
    };

    tracing::info!("Starting ...");

    Server::new(server_config).run().await?;

    Ok(())
}
