mod db;
pub mod lists;
pub mod local_store;
pub mod session;

use std::sync::Arc;

use serde::Serialize;

use showtrack_api::{CatalogService, TvdbClient};
use showtrack_core::config::AppConfig;
use showtrack_core::error::ShowtrackError;
use showtrack_core::models::{Episode, Identity, ShowDetail, ShowKind, ShowRef, ShowSummary};

pub use db::DbHandle;
pub use lists::{ListCounts, ListItem, ListStatus, ListSync};
pub use local_store::LocalStore;
pub use session::{AuthError, Session};

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("store error: {0}")]
    Store(#[from] ShowtrackError),
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("not signed in")]
    NotAuthenticated,
    #[error("config error: {0}")]
    Config(String),
}

/// First page of both catalogs, as shown on the home screen.
#[derive(Debug, Clone, Default, Serialize)]
pub struct HomeFeed {
    pub movies: Vec<ShowSummary>,
    pub series: Vec<ShowSummary>,
}

/// Everything one running instance needs, built once and passed around
/// explicitly.
pub struct AppContext<C: CatalogService = TvdbClient> {
    config: AppConfig,
    catalog: Arc<C>,
    session: Session,
    lists: ListSync<C>,
}

impl AppContext<TvdbClient> {
    /// Open the database and local store named by `config`, restore any
    /// saved session and load its lists.
    pub async fn new(config: AppConfig) -> Result<Self, RuntimeError> {
        let ctx = Self::open(config).await?;
        ctx.reload_if_signed_in().await;
        Ok(ctx)
    }

    /// Like [`AppContext::new`], but the lists stay empty until [`AppContext::reload`].
    pub async fn open(config: AppConfig) -> Result<Self, RuntimeError> {
        let db = DbHandle::open(&config.ensure_db_path()?)?;
        let local = LocalStore::open(&config.local_dir())?;
        let catalog = TvdbClient::from_config(&config.catalog);
        Self::with_parts_unloaded(config, db, local, catalog).await
    }
}

impl<C: CatalogService> AppContext<C> {
    pub async fn with_parts(
        config: AppConfig,
        db: DbHandle,
        local: LocalStore,
        catalog: C,
    ) -> Result<Self, RuntimeError> {
        let ctx = Self::with_parts_unloaded(config, db, local, catalog).await?;
        ctx.reload_if_signed_in().await;
        Ok(ctx)
    }

    /// Build from parts and restore the saved session without touching the catalog.
    pub async fn with_parts_unloaded(
        config: AppConfig,
        db: DbHandle,
        local: LocalStore,
        catalog: C,
    ) -> Result<Self, RuntimeError> {
        let catalog = Arc::new(catalog);
        let session = Session::new(db.clone(), local);
        let lists = ListSync::new(db, Arc::clone(&catalog), session.subscribe());
        let ctx = Self {
            config,
            catalog,
            session,
            lists,
        };

        if ctx.config.demo.enabled {
            if let Err(e) = ctx.session.ensure_demo_identity(&ctx.config.demo).await {
                tracing::warn!("Failed to prepare demo identity: {e}");
            }
        }
        ctx.session.restore().await;
        Ok(ctx)
    }

    async fn reload_if_signed_in(&self) {
        if self.session.is_authenticated() {
            self.reload().await;
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn lists(&self) -> &ListSync<C> {
        &self.lists
    }

    /// Pick up the identity saved by an earlier run and load its lists.
    pub async fn restore(&self) -> Option<Identity> {
        let identity = self.session.restore().await?;
        self.reload().await;
        Some(identity)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Identity, RuntimeError> {
        let identity = self.session.login(email, password).await?;
        self.reload().await;
        Ok(identity)
    }

    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        confirm: &str,
    ) -> Result<Identity, RuntimeError> {
        let identity = self
            .session
            .register(name, email, password, confirm)
            .await?;
        self.reload().await;
        Ok(identity)
    }

    pub fn logout(&self) {
        self.session.logout();
        self.lists.clear();
    }

    /// Full list reload. Failures are recorded on the list layer, not returned.
    pub async fn reload(&self) {
        if let Err(e) = self.ensure_catalog().await {
            tracing::warn!("Catalog unavailable, lists will be empty: {e}");
        }
        if let Err(e) = self.lists.load_user_data().await {
            tracing::warn!("Failed to load lists: {e}");
        }
    }

    async fn ensure_catalog(&self) -> Result<(), RuntimeError> {
        if !self.catalog.is_authenticated().await {
            self.catalog.login().await.map_err(catalog_error)?;
        }
        Ok(())
    }

    /// The first page of movies and series, fetched together.
    pub async fn home(&self) -> Result<HomeFeed, RuntimeError> {
        self.ensure_catalog().await?;
        let (movies, series) = tokio::try_join!(
            self.catalog.fetch_summary_page(ShowKind::Movie, 1),
            self.catalog.fetch_summary_page(ShowKind::Series, 1),
        )
        .map_err(catalog_error)?;
        Ok(HomeFeed { movies, series })
    }

    pub async fn browse(&self, kind: ShowKind, page: u32) -> Result<Vec<ShowSummary>, RuntimeError> {
        self.ensure_catalog().await?;
        self.catalog
            .fetch_summary_page(kind, page)
            .await
            .map_err(catalog_error)
    }

    pub async fn details(&self, show: ShowRef) -> Result<Option<ShowDetail>, RuntimeError> {
        self.ensure_catalog().await?;
        self.catalog.fetch_detail(show).await.map_err(catalog_error)
    }

    pub async fn episodes(&self, series_id: u64, page: u32) -> Result<Vec<Episode>, RuntimeError> {
        self.ensure_catalog().await?;
        self.catalog
            .fetch_episodes(series_id, page)
            .await
            .map_err(catalog_error)
    }

    pub async fn search(
        &self,
        query: &str,
        kind: Option<ShowKind>,
    ) -> Result<Vec<ShowSummary>, RuntimeError> {
        self.ensure_catalog().await?;
        self.catalog.search(query, kind).await.map_err(catalog_error)
    }

    /// Drop caches and release the store. The DB thread exits once the last handle is gone.
    pub fn shutdown(self) {
        self.lists.clear();
        tracing::debug!("App context shut down");
    }
}

fn catalog_error(e: impl std::fmt::Display) -> RuntimeError {
    RuntimeError::Catalog(e.to_string())
}
