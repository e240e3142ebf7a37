use std::path::PathBuf;

use async_trait::async_trait;
use db::{DbPool, models::ticket::Ticket};

use crate::{MockData, ReportError, Snapshot};

/// Data a report is computed from.
#[derive(Debug, Clone)]
pub enum ReportData {
    Live(Snapshot),
    Fallback(MockData),
}

impl ReportData {
    pub fn is_live(&self) -> bool {
        matches!(self, ReportData::Live(_))
    }
}

/// Provider of report inputs, picked once by the composition root.
#[async_trait]
pub trait ReportSource: Send + Sync {
    async fn load(&self) -> Result<ReportData, ReportError>;
}

/// Always reads the ticket store.
#[derive(Clone)]
pub struct LiveStore {
    pool: DbPool,
}

impl LiveStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    pub async fn has_tickets(&self) -> Result<bool, ReportError> {
        Ok(Ticket::count(&self.pool).await? > 0)
    }
}

#[async_trait]
impl ReportSource for LiveStore {
    async fn load(&self) -> Result<ReportData, ReportError> {
        Ok(ReportData::Live(Snapshot::load(&self.pool).await?))
    }
}

/// Always reads the mock JSON snapshots in `dir`.
#[derive(Clone, Debug)]
pub struct StaticFallback {
    dir: PathBuf,
}

impl StaticFallback {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl ReportSource for StaticFallback {
    async fn load(&self) -> Result<ReportData, ReportError> {
        Ok(ReportData::Fallback(MockData::load(&self.dir).await))
    }
}

/// The live store once it holds a ticket, the mock snapshots until then.
#[derive(Clone)]
pub struct AutoSource {
    live: LiveStore,
    fallback: StaticFallback,
}

impl AutoSource {
    pub fn new(live: LiveStore, fallback: StaticFallback) -> Self {
        Self { live, fallback }
    }
}

#[async_trait]
impl ReportSource for AutoSource {
    async fn load(&self) -> Result<ReportData, ReportError> {
        if self.live.has_tickets().await? {
            self.live.load().await
        } else {
            tracing::debug!("Ticket store is empty, reading mock data");
            self.fallback.load().await
        }
    }
}
