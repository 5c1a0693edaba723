//! The catalog interface consumed by the list synchronization layer.
//!
//! Implementations resolve raw API payloads into the typed show models at
//! this boundary, so nothing downstream sees untyped records.

use std::future::Future;

use showtrack_core::models::{Episode, ShowDetail, ShowKind, ShowRef, ShowSummary};

/// A movie/series metadata catalog.
pub trait CatalogService: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Exchange the configured credentials for a session token.
    fn login(&self) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Whether a session token is currently held.
    fn is_authenticated(&self) -> impl Future<Output = bool> + Send;

    /// One page of movie or series summaries, each tagged with `kind`.
    fn fetch_summary_page(
        &self,
        kind: ShowKind,
        page: u32,
    ) -> impl Future<Output = Result<Vec<ShowSummary>, Self::Error>> + Send;

    /// Extended metadata for one show, or `None` when not yet authenticated.
    fn fetch_detail(
        &self,
        show: ShowRef,
    ) -> impl Future<Output = Result<Option<ShowDetail>, Self::Error>> + Send;

    /// One page of a series' episodes in default order.
    fn fetch_episodes(
        &self,
        series_id: u64,
        page: u32,
    ) -> impl Future<Output = Result<Vec<Episode>, Self::Error>> + Send;

    /// Free-text search, optionally restricted to one kind.
    fn search(
        &self,
        query: &str,
        kind: Option<ShowKind>,
    ) -> impl Future<Output = Result<Vec<ShowSummary>, Self::Error>> + Send;
}
