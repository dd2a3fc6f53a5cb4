//! Command implementations for the Playslip CLI

use tokio::net::TcpListener;
use tracing::info;

use playslip::config::Config;
use playslip::{Error, PlayRequest, Result, UserId};

use crate::app_state::PlayslipApp;

/// Serve the REST API until Ctrl-C
pub async fn serve_command(app: &PlayslipApp) -> Result<()> {
    let addr = format!(
        "{}:{}",
        app.config.server.listen_address, app.config.server.listen_port
    );
    let listener = TcpListener::bind(&addr).await?;
    info!(address = %listener.local_addr()?, "play API listening");

    axum::serve(listener, app.api().router())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("play API stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}

/// Register one play and print it
pub async fn create_play_command(
    app: &PlayslipApp,
    request: PlayRequest,
    locale: Option<&str>,
) -> Result<()> {
    match app.service.create_play(request).await {
        Ok(play) => {
            println!("{}", serde_json::to_string_pretty(&play)?);
            Ok(())
        }
        Err(Error::PlayRejected(kind)) => {
            eprintln!("{}", app.messages.message(kind, locale));
            Err(Error::PlayRejected(kind))
        }
        Err(e) => Err(e),
    }
}

/// Print a user's latest plays
pub async fn latest_command(app: &PlayslipApp, user_id: UserId) -> Result<()> {
    let summaries = app.service.find_latest_plays(user_id).await?;
    println!("{}", serde_json::to_string_pretty(&summaries)?);
    Ok(())
}

/// Apply pending schema migrations
#[cfg(feature = "sqlite")]
pub async fn migrate_command(config: &Config) -> Result<()> {
    use playslip::database::migrations::MigrationManager;
    use playslip::database::DatabasePool;

    let pool = DatabasePool::open(config.database.clone())?;
    let version = pool
        .with_connection(|conn| MigrationManager::current_version(conn))
        .await?;
    println!("play store at schema version {}", version);
    Ok(())
}

#[cfg(not(feature = "sqlite"))]
pub async fn migrate_command(_config: &Config) -> Result<()> {
    Err(Error::Config(
        "migrations need the sqlite feature".to_string(),
    ))
}
