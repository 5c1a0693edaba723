use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use showtrack_core::config::CatalogConfig;
use showtrack_core::models::{Episode, ShowDetail, ShowKind, ShowRef, ShowSummary};

use super::auth;
use super::error::TvdbError;
use super::types::{
    Envelope, RawEpisodesPage, RawMovieExtended, RawSearchResult, RawSeriesExtended, RawSummary,
};
use crate::traits::CatalogService;

const BASE_URL: &str = "https://api4.thetvdb.com/v4";
const ARTWORK_BASE_URL: &str = "https://artworks.thetvdb.com/";
const PAGE_LIMIT: usize = 10;

/// TheTVDB v4 REST client.
///
/// The bearer token lives behind a lock so a shared client can log in
/// while other tasks keep reading.
pub struct TvdbClient {
    base_url: String,
    artwork_base: String,
    api_key: Option<String>,
    page_limit: usize,
    token: RwLock<Option<String>>,
    http: Client,
}

impl TvdbClient {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(BASE_URL, ARTWORK_BASE_URL, api_key)
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        let mut client = Self::with_base_url(
            &config.base_url,
            &config.artwork_base_url,
            config.api_key.clone(),
        );
        // Pages never exceed PAGE_LIMIT items, whatever the config says.
        client.page_limit = config.page_limit.clamp(1, PAGE_LIMIT);
        client
    }

    /// Point the client at another host, e.g. a mock server in tests.
    pub fn with_base_url(base_url: &str, artwork_base: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            artwork_base: artwork_base.to_string(),
            api_key,
            page_limit: PAGE_LIMIT,
            token: RwLock::new(None),
            http: Client::new(),
        }
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, TvdbError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(body);
            Err(TvdbError::Api { status, message })
        }
    }

    async fn bearer(&self) -> Result<String, TvdbError> {
        self.token
            .read()
            .await
            .as_ref()
            .map(|t| format!("Bearer {t}"))
            .ok_or(TvdbError::NotAuthenticated)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, TvdbError> {
        let resp = self
            .http
            .get(format!("{}{path}", self.base_url))
            .header("Authorization", self.bearer().await?)
            .header("Accept", "application/json")
            .query(query)
            .send()
            .await?;

        let resp = Self::check_response(resp).await?;
        let body: Envelope<T> = resp
            .json()
            .await
            .map_err(|e| TvdbError::Parse(e.to_string()))?;
        Ok(body.data)
    }
}

impl CatalogService for TvdbClient {
    type Error = TvdbError;

    async fn login(&self) -> Result<(), TvdbError> {
        let Some(api_key) = self.api_key.as_deref().filter(|k| !k.trim().is_empty()) else {
            *self.token.write().await = None;
            return Err(TvdbError::Auth("no API key configured".into()));
        };

        match auth::login(&self.http, &self.base_url, api_key, None).await {
            Ok(token) => {
                *self.token.write().await = Some(token);
                tracing::info!("Logged in to catalog");
                Ok(())
            }
            Err(e) => {
                *self.token.write().await = None;
                tracing::warn!(error = %e, "Catalog login failed");
                Err(match e {
                    TvdbError::Auth(_) => e,
                    other => TvdbError::Auth(other.to_string()),
                })
            }
        }
    }

    async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    async fn fetch_summary_page(
        &self,
        kind: ShowKind,
        page: u32,
    ) -> Result<Vec<ShowSummary>, TvdbError> {
        let path = match kind {
            ShowKind::Movie => "/movies",
            ShowKind::Series => "/series",
        };
        let raw: Vec<RawSummary> = self
            .get_json(path, &[("page", page.to_string())])
            .await
            .map_err(|e| match e {
                TvdbError::Api { status, message } => TvdbError::Api {
                    status,
                    message: format!("{kind}: {message}"),
                },
                other => other,
            })?;

        let items: Vec<ShowSummary> = raw
            .into_iter()
            .take(self.page_limit)
            .map(|r| r.into_summary(kind, &self.artwork_base))
            .collect();
        tracing::debug!(%kind, page, count = items.len(), "Fetched summary page");
        Ok(items)
    }

    async fn fetch_detail(&self, show: ShowRef) -> Result<Option<ShowDetail>, TvdbError> {
        if !self.is_authenticated().await {
            return Ok(None);
        }
        let detail = match show.kind {
            ShowKind::Movie => self
                .get_json::<RawMovieExtended>(&format!("/movies/{}/extended", show.id), &[])
                .await?
                .into_detail(&self.artwork_base),
            ShowKind::Series => self
                .get_json::<RawSeriesExtended>(&format!("/series/{}/extended", show.id), &[])
                .await?
                .into_detail(&self.artwork_base),
        };
        Ok(Some(detail))
    }

    async fn fetch_episodes(&self, series_id: u64, page: u32) -> Result<Vec<Episode>, TvdbError> {
        let raw: RawEpisodesPage = self
            .get_json(
                &format!("/series/{series_id}/episodes/default"),
                &[("page", page.to_string())],
            )
            .await?;
        Ok(raw
            .episodes
            .into_iter()
            .map(|e| e.into_episode(series_id, &self.artwork_base))
            .collect())
    }

    async fn search(
        &self,
        query: &str,
        kind: Option<ShowKind>,
    ) -> Result<Vec<ShowSummary>, TvdbError> {
        let mut params = vec![("query", query.to_string())];
        if let Some(kind) = kind {
            params.push(("type", kind.as_db_str().to_string()));
        }
        let raw: Vec<RawSearchResult> = self.get_json("/search", &params).await?;
        Ok(raw
            .into_iter()
            .filter_map(|r| r.into_summary(&self.artwork_base))
            .filter(|s| kind.map_or(true, |k| s.show.kind == k))
            .collect())
    }
}
