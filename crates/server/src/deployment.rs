use std::sync::Arc;

use config::{Config, ReportSourceMode, load_config_from_file};
use db::{DBService, DbErr};
use reports::{AutoSource, LiveStore, ReportSource, StaticFallback};
use thiserror::Error;
use utils_core::assets::config_path;

#[derive(Debug, Error)]
pub enum DeploymentError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Shared application state handed to every route.
#[derive(Clone)]
pub struct DeploymentImpl {
    db: DBService,
    config: Arc<Config>,
    reports: Arc<dyn ReportSource>,
}

impl DeploymentImpl {
    /// Loads `config.json` from the asset dir and opens the database.
    pub async fn new() -> Result<Self, DeploymentError> {
        let config = load_config_from_file(&config_path()).await;
        let db = DBService::new().await?;
        Ok(Self::from_parts(db, config))
    }

    pub fn from_parts(db: DBService, config: Config) -> Self {
        let reports = report_source_for(&config, &db);
        Self {
            db,
            config: Arc::new(config),
            reports,
        }
    }

    pub fn db(&self) -> &DBService {
        &self.db
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn report_source(&self) -> &dyn ReportSource {
        self.reports.as_ref()
    }
}

fn report_source_for(config: &Config, db: &DBService) -> Arc<dyn ReportSource> {
    let mock_dir = config.resolved_mock_data_dir();
    tracing::info!(
        mode = %config.report_source,
        mock_dir = %mock_dir.display(),
        "Report source selected"
    );
    let live = LiveStore::new(db.pool.clone());
    let fallback = StaticFallback::new(mock_dir);
    match config.report_source {
        ReportSourceMode::Live => Arc::new(live),
        ReportSourceMode::Fallback => Arc::new(fallback),
        ReportSourceMode::Auto => Arc::new(AutoSource::new(live, fallback)),
    }
}
