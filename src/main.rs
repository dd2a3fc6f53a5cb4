use tracing::info;

use playslip::logging::{self, LoggingConfig};
use playslip::{PlayRequest, Result};

mod app_config;
mod app_state;
mod commands;

use app_config::{Cli, Commands};
use app_state::PlayslipApp;
use commands as cmd;

#[tokio::main]
async fn main() -> Result<()> {
    use clap::Parser;

    let cli = Cli::parse();
    let config = cli.load_config()?;

    logging::init(&LoggingConfig {
        json_format: cli.json_logs,
        ..LoggingConfig::with_level(config.app.log_level.clone())
    })?;

    info!(
        command = cli.command.name(),
        environment = ?config.app.environment,
        "starting {}",
        config.app.name
    );

    match cli.command {
        Commands::Serve => {
            let app = PlayslipApp::new(config, None).await?;
            cmd::serve_command(&app).await?;
        }

        Commands::CreatePlay {
            user_id,
            bet_id,
            choice_id,
            amount,
            bets_file,
            locale,
        } => {
            let app = PlayslipApp::new(config, bets_file.as_deref()).await?;
            let request = PlayRequest {
                user_id,
                bet_id,
                choice_id,
                amount,
            };
            cmd::create_play_command(&app, request, locale.as_deref()).await?;
        }

        Commands::Latest { user_id, bets_file } => {
            let app = PlayslipApp::new(config, bets_file.as_deref()).await?;
            cmd::latest_command(&app, user_id).await?;
        }

        Commands::Migrate => {
            cmd::migrate_command(&config).await?;
        }
    }

    Ok(())
}
