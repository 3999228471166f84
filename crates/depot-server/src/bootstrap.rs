//! Process wiring
//!
//! Loads the shared configuration document, publishes it, and builds the
//! statistics facade configured by it.

use crate::config::ServerConfig;
use crate::error::{Result, ServerError};
use chrono::{Local, NaiveDate};
use depot_settings::{SettingsHandle, SharedConfiguration};
use depot_statistics::{InMemoryStatisticsRepository, StatisticsFacade};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Running Depot instance
pub struct Depot {
    settings_path: PathBuf,
    settings: Arc<SettingsHandle>,
    statistics: Arc<StatisticsFacade>,
}

impl Depot {
    /// Load the configuration document and wire statistics
    ///
    /// A missing document falls back to the defaults, written to disk first
    /// when `write_default_settings` is set.
    pub fn bootstrap(config: &ServerConfig) -> Result<Self> {
        let path = config.settings_path.clone();
        let document = load_document(&path, config.write_default_settings)?;

        info!(
            "Configuration '{}' loaded: {} repositories, base path '{}'",
            document.id,
            document.repositories.len(),
            document.base_path
        );
        for (name, repository) in &document.repositories {
            debug!(
                "  {} ({}): storage '{}', {} proxied",
                name,
                repository.visibility(),
                repository.storage().keyword(),
                repository.proxied().len()
            );
        }

        let statistics = StatisticsFacade::new(
            Arc::new(InMemoryStatisticsRepository::new()),
            document.statistics.resolved_requests_interval,
        );

        Ok(Self {
            settings_path: path,
            settings: Arc::new(SettingsHandle::new(document)),
            statistics: Arc::new(statistics),
        })
    }

    pub fn settings(&self) -> &Arc<SettingsHandle> {
        &self.settings
    }

    pub fn statistics(&self) -> &Arc<StatisticsFacade> {
        &self.statistics
    }

    /// Re-read the configuration document and publish it
    ///
    /// On failure the running configuration is kept.
    pub fn reload(&self) -> Result<u64> {
        let version = self
            .settings
            .reload_from_file(&self.settings_path)
            .map_err(|source| ServerError::Settings {
                path: self.settings_path.clone(),
                source,
            })?;

        let interval = self.settings.current().document().statistics.resolved_requests_interval;
        self.statistics.set_interval(interval);
        Ok(version)
    }

    /// Flush pending statistics under today's local date
    pub fn flush_statistics(&self) -> usize {
        self.flush_statistics_at(Local::now().date_naive())
    }

    pub fn flush_statistics_at(&self, today: NaiveDate) -> usize {
        self.statistics.flush(today)
    }

    /// Flush statistics every `period` until `shutdown` completes, then once more
    pub async fn run_until<F>(&self, period: Duration, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut ticker = tokio::time::interval(period);
        // The first tick completes immediately
        ticker.tick().await;
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let flushed = self.flush_statistics();
                    if flushed > 0 {
                        debug!("Periodic flush stored {} counters", flushed);
                    }
                }
                _ = &mut shutdown => break,
            }
        }

        let flushed = self.flush_statistics();
        info!("Final statistics flush stored {} counters", flushed);
    }
}

fn load_document(path: &Path, write_default: bool) -> Result<SharedConfiguration> {
    if path.exists() {
        return SharedConfiguration::from_file(path).map_err(|source| ServerError::Settings {
            path: path.to_path_buf(),
            source,
        });
    }

    let document = SharedConfiguration::default();
    if write_default {
        document
            .write_to(path)
            .map_err(|source| ServerError::WriteDefaults {
                path: path.to_path_buf(),
                source,
            })?;
        info!("Wrote default configuration to {}", path.display());
    } else {
        warn!("{} not found, using default configuration", path.display());
    }
    Ok(document)
}
