//! Application state and initialization
//!
//! Wires the play store, the bet catalog and the message bundles together
//! into a ready [`PlayService`].

use std::path::Path;
use std::sync::Arc;
use tracing::info;

use playslip::catalog::{BetLookup, HttpBetCatalog, InMemoryBetCatalog};
use playslip::config::Config;
use playslip::database::PlayStore;
use playslip::{MessageService, PlayApi, PlayService, Result};

/// Main Playslip application
pub struct PlayslipApp {
    pub config: Config,
    pub service: Arc<PlayService>,
    pub messages: Arc<MessageService>,
}

impl PlayslipApp {
    /// Build the application; `bets_file` replaces the catalog service
    pub async fn new(config: Config, bets_file: Option<&Path>) -> Result<Self> {
        let bets: Arc<dyn BetLookup> = match bets_file {
            Some(path) => {
                info!(path = %path.display(), "using bets from file");
                Arc::new(InMemoryBetCatalog::from_json_file(path)?)
            }
            None => {
                info!(url = %config.catalog.base_url, "using bet catalog service");
                Arc::new(HttpBetCatalog::new(&config.catalog)?)
            }
        };

        let plays = open_store(&config)?;
        let messages = Arc::new(MessageService::from_config(&config.messages)?);
        let service = Arc::new(PlayService::new(bets, plays, config.plays.clone()));

        Ok(Self {
            config,
            service,
            messages,
        })
    }

    pub fn api(&self) -> PlayApi {
        PlayApi::new(
            self.service.clone(),
            self.messages.clone(),
            self.config.server.request_timeout,
        )
    }
}

#[cfg(feature = "sqlite")]
fn open_store(config: &Config) -> Result<Arc<dyn PlayStore>> {
    use playslip::database::{DatabasePool, PlayRepository};

    let pool = DatabasePool::open(config.database.clone())?;
    info!(url = %config.database.url, connections = pool.size(), "opened play store");
    Ok(Arc::new(PlayRepository::new(Arc::new(pool))))
}

#[cfg(not(feature = "sqlite"))]
fn open_store(_config: &Config) -> Result<Arc<dyn PlayStore>> {
    tracing::warn!("built without sqlite, plays are kept in memory");
    Ok(Arc::new(playslip::database::InMemoryPlayStore::new()))
}
