//! Mirrors the signed-in user's list memberships into local caches.
//!
//! The store is authoritative: toggles ask it whether a show is present
//! before mutating, and the cache is only updated after the store accepts
//! the change. Full reloads hydrate every row with catalog details.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::Serialize;
use tokio::sync::watch;

use showtrack_api::CatalogService;
use showtrack_core::models::{
    Episode, Identity, ListKind, Membership, NewWatchedEpisode, Rating, ShowDetail, ShowRef,
    ShowSummary, WatchNote, WatchedEpisode,
};

use crate::db::DbHandle;
use crate::RuntimeError;

/// One cached list entry.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListItem {
    pub show: ShowRef,
    pub name: String,
    pub image_url: Option<String>,
    pub added_at: DateTime<Utc>,
    pub rating: Option<Rating>,
    pub notes: Option<String>,
    /// Present after a full reload; entries added by a toggle carry only summary fields.
    pub detail: Option<ShowDetail>,
}

impl ListItem {
    fn from_summary(summary: &ShowSummary, note: &WatchNote) -> Self {
        Self {
            show: summary.show,
            name: summary.name.clone(),
            image_url: summary.image_url.clone(),
            added_at: Utc::now(),
            rating: note.rating,
            notes: note.notes.clone(),
            detail: None,
        }
    }

    fn hydrated(membership: Membership, detail: ShowDetail) -> Self {
        Self {
            show: membership.show,
            name: detail.name().to_string(),
            image_url: detail.common().image_url.clone(),
            added_at: membership.created_at,
            rating: membership.rating,
            notes: membership.notes,
            detail: Some(detail),
        }
    }
}

/// Membership of one show across all three lists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListStatus {
    pub favorite: bool,
    pub watchlist: bool,
    pub watched: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ListCounts {
    pub favorites: usize,
    pub watchlist: usize,
    pub watched: usize,
}

#[derive(Default)]
struct Caches {
    lists: [Vec<ListItem>; 3],
}

/// A cache change made while a reload was in flight.
#[derive(Debug, Clone)]
enum CacheChange {
    Insert(ListKind, ListItem),
    Remove(ListKind, ShowRef),
}

impl CacheChange {
    fn apply(&self, lists: &mut [Vec<ListItem>; 3]) {
        match self {
            CacheChange::Insert(list, item) => {
                let items = &mut lists[list.index()];
                if !items.iter().any(|i| i.show == item.show) {
                    items.insert(0, item.clone());
                }
            }
            CacheChange::Remove(list, show) => {
                lists[list.index()].retain(|i| i.show != *show);
            }
        }
    }
}

pub struct ListSync<C> {
    db: DbHandle,
    catalog: Arc<C>,
    identity: watch::Receiver<Option<Identity>>,
    caches: RwLock<Caches>,
    toggle_locks: [tokio::sync::Mutex<()>; 3],
    generation: AtomicU64,
    /// Reloads in flight.
    loading: AtomicUsize,
    /// Sequence number of the last cache change.
    changes: AtomicU64,
    /// Changes made while `loading > 0`, replayed over each finishing reload.
    journal: Mutex<Vec<(u64, CacheChange)>>,
    error: Mutex<Option<String>>,
}

impl<C: CatalogService> ListSync<C> {
    pub fn new(db: DbHandle, catalog: Arc<C>, identity: watch::Receiver<Option<Identity>>) -> Self {
        Self {
            db,
            catalog,
            identity,
            caches: RwLock::new(Caches::default()),
            toggle_locks: Default::default(),
            generation: AtomicU64::new(0),
            loading: AtomicUsize::new(0),
            changes: AtomicU64::new(0),
            journal: Mutex::new(Vec::new()),
            error: Mutex::new(None),
        }
    }

    fn user_id(&self) -> Result<String, RuntimeError> {
        self.identity
            .borrow()
            .as_ref()
            .map(|i| i.id.clone())
            .ok_or(RuntimeError::NotAuthenticated)
    }

    /// Authoritative membership check against the store.
    pub async fn check(&self, list: ListKind, show: ShowRef) -> Result<bool, RuntimeError> {
        let user_id = self.user_id()?;
        let result = self.db.membership_exists(&user_id, show, list).await;
        self.record(result.map_err(Into::into))
    }

    /// Membership according to the local cache only.
    pub fn is_cached(&self, list: ListKind, show: ShowRef) -> bool {
        self.read_caches(|c| c.lists[list.index()].iter().any(|i| i.show == show))
    }

    /// All three checks at once. Store failures degrade to "not a member".
    pub async fn check_all(&self, show: ShowRef) -> ListStatus {
        let (favorite, watchlist, watched) = tokio::join!(
            self.check(ListKind::Favorite, show),
            self.check(ListKind::Watchlist, show),
            self.check(ListKind::Watched, show),
        );
        match (favorite, watchlist, watched) {
            (Ok(favorite), Ok(watchlist), Ok(watched)) => ListStatus {
                favorite,
                watchlist,
                watched,
            },
            _ => {
                tracing::warn!(%show, "Membership check failed, reporting none");
                ListStatus::default()
            }
        }
    }

    /// Flip membership of `summary.show` in `list`. Returns the new state.
    pub async fn toggle(
        &self,
        list: ListKind,
        summary: &ShowSummary,
        note: WatchNote,
    ) -> Result<bool, RuntimeError> {
        let _guard = self.toggle_locks[list.index()].lock().await;
        let result: Result<bool, RuntimeError> = async {
            let user_id = self.user_id()?;
            let present = self
                .db
                .membership_exists(&user_id, summary.show, list)
                .await?;
            if present {
                self.db
                    .remove_membership(&user_id, summary.show, list)
                    .await?;
                self.uncache(list, summary.show);
            } else {
                self.db
                    .add_membership(&user_id, summary.show, list, note.clone())
                    .await?;
                self.cache(list, ListItem::from_summary(summary, &note));
            }
            tracing::info!(show = %summary.show, list = list.as_db_str(), member = !present, "Toggled");
            Ok(!present)
        }
        .await;
        self.record(result)
    }

    /// Add to a list. Returns false when it was already there.
    pub async fn add(
        &self,
        list: ListKind,
        summary: &ShowSummary,
        note: WatchNote,
    ) -> Result<bool, RuntimeError> {
        let _guard = self.toggle_locks[list.index()].lock().await;
        let result: Result<bool, RuntimeError> = async {
            let user_id = self.user_id()?;
            let inserted = self
                .db
                .add_membership(&user_id, summary.show, list, note.clone())
                .await?;
            self.cache(list, ListItem::from_summary(summary, &note));
            Ok(inserted)
        }
        .await;
        self.record(result)
    }

    /// Remove from a list. Returns false when it wasn't there.
    pub async fn remove(&self, list: ListKind, show: ShowRef) -> Result<bool, RuntimeError> {
        let _guard = self.toggle_locks[list.index()].lock().await;
        let result: Result<bool, RuntimeError> = async {
            let user_id = self.user_id()?;
            let removed = self.db.remove_membership(&user_id, show, list).await?;
            self.uncache(list, show);
            Ok(removed)
        }
        .await;
        self.record(result)
    }

    /// Re-read all three lists from the store and hydrate them from the catalog.
    ///
    /// Rows whose detail fetch fails or comes back empty are left out. The
    /// caches are replaced in one assignment, unless a [`ListSync::clear`]
    /// happened while the reload was in flight. Toggles, adds and removes
    /// that land after the store was read are replayed over the new lists.
    pub async fn load_user_data(&self) -> Result<(), RuntimeError> {
        let generation = self.generation.load(Ordering::SeqCst);
        let user_id = self.user_id()?;
        self.loading.fetch_add(1, Ordering::SeqCst);
        let since = self.changes.load(Ordering::SeqCst);

        let result = self.fetch_hydrated(&user_id).await;

        let replaced = {
            let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);
            let mut journal = self.journal.lock().unwrap_or_else(PoisonError::into_inner);
            let replaced = match result {
                Ok(_) if self.generation.load(Ordering::SeqCst) != generation => Ok(false),
                Ok(mut lists) => {
                    for (_, change) in journal.iter().filter(|(seq, _)| *seq > since) {
                        change.apply(&mut lists);
                    }
                    caches.lists = lists;
                    Ok(true)
                }
                Err(e) => Err(e),
            };
            if self.loading.fetch_sub(1, Ordering::SeqCst) == 1 {
                journal.clear();
            }
            replaced
        };

        if self.record(replaced)? {
            tracing::info!(counts = ?self.counts(), "Loaded user lists");
        } else {
            tracing::debug!("Discarding reload finished after a clear");
        }
        Ok(())
    }

    async fn fetch_hydrated(&self, user_id: &str) -> Result<[Vec<ListItem>; 3], RuntimeError> {
        let (favorites, watchlist, watched) = tokio::try_join!(
            self.db.list_memberships(user_id, ListKind::Favorite),
            self.db.list_memberships(user_id, ListKind::Watchlist),
            self.db.list_memberships(user_id, ListKind::Watched),
        )?;

        let mut shows: Vec<ShowRef> = favorites
            .iter()
            .chain(&watchlist)
            .chain(&watched)
            .map(|m| m.show)
            .collect();
        shows.sort_by_key(|s| (s.kind.as_db_str(), s.id));
        shows.dedup();

        let fetched = join_all(shows.iter().map(|&show| self.catalog.fetch_detail(show))).await;
        let details: HashMap<ShowRef, ShowDetail> = shows
            .into_iter()
            .zip(fetched)
            .filter_map(|(show, result)| match result {
                Ok(Some(detail)) => Some((show, detail)),
                Ok(None) => None,
                Err(e) => {
                    tracing::warn!(%show, error = %e, "Dropping entry with failed detail fetch");
                    None
                }
            })
            .collect();

        let hydrate = |rows: Vec<Membership>| -> Vec<ListItem> {
            rows.into_iter()
                .filter_map(|m| {
                    let detail = details.get(&m.show)?.clone();
                    Some(ListItem::hydrated(m, detail))
                })
                .collect()
        };
        Ok([hydrate(favorites), hydrate(watchlist), hydrate(watched)])
    }

    /// Empty all caches and invalidate any reload in flight.
    pub fn clear(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut caches) = self.caches.write() {
            *caches = Caches::default();
        }
    }

    pub fn items(&self, list: ListKind) -> Vec<ListItem> {
        self.read_caches(|c| c.lists[list.index()].clone())
    }

    pub fn counts(&self) -> ListCounts {
        self.read_caches(|c| ListCounts {
            favorites: c.lists[ListKind::Favorite.index()].len(),
            watchlist: c.lists[ListKind::Watchlist.index()].len(),
            watched: c.lists[ListKind::Watched.index()].len(),
        })
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst) > 0
    }

    pub fn last_error(&self) -> Option<String> {
        self.error.lock().ok().and_then(|e| e.clone())
    }

    pub fn clear_error(&self) {
        if let Ok(mut error) = self.error.lock() {
            *error = None;
        }
    }

    // ── Episodes ────────────────────────────────────────────────

    /// Flip the watched state of one episode. Returns the new state.
    pub async fn toggle_episode(
        &self,
        episode: &Episode,
        note: WatchNote,
    ) -> Result<bool, RuntimeError> {
        let _guard = self.toggle_locks[ListKind::Watched.index()].lock().await;
        let result: Result<bool, RuntimeError> = async {
            let user_id = self.user_id()?;
            let present = self
                .db
                .watched_episode_exists(&user_id, episode.series_id, episode.id)
                .await?;
            if present {
                self.db
                    .remove_watched_episode(&user_id, episode.series_id, episode.id)
                    .await?;
            } else {
                self.db
                    .add_watched_episode(
                        &user_id,
                        NewWatchedEpisode {
                            series_id: episode.series_id,
                            episode_id: episode.id,
                            season_number: episode.season_number,
                            episode_number: episode.number,
                            note,
                        },
                    )
                    .await?;
            }
            tracing::info!(
                series = episode.series_id,
                episode = episode.id,
                watched = !present,
                "Toggled episode"
            );
            Ok(!present)
        }
        .await;
        self.record(result)
    }

    pub async fn is_episode_watched(
        &self,
        series_id: u64,
        episode_id: u64,
    ) -> Result<bool, RuntimeError> {
        let user_id = self.user_id()?;
        let result = self
            .db
            .watched_episode_exists(&user_id, series_id, episode_id)
            .await;
        self.record(result.map_err(Into::into))
    }

    pub async fn watched_episodes(&self, series_id: u64) -> Result<Vec<WatchedEpisode>, RuntimeError> {
        let user_id = self.user_id()?;
        let result = self.db.watched_episodes(&user_id, series_id).await;
        self.record(result.map_err(Into::into))
    }

    // ── Internals ───────────────────────────────────────────────

    fn cache(&self, list: ListKind, item: ListItem) {
        self.apply_change(CacheChange::Insert(list, item));
    }

    fn uncache(&self, list: ListKind, show: ShowRef) {
        self.apply_change(CacheChange::Remove(list, show));
    }

    /// Apply to the live caches, and journal it for any reload still running.
    fn apply_change(&self, change: CacheChange) {
        let mut caches = self.caches.write().unwrap_or_else(PoisonError::into_inner);
        change.apply(&mut caches.lists);
        if self.loading.load(Ordering::SeqCst) > 0 {
            let seq = self.changes.fetch_add(1, Ordering::SeqCst) + 1;
            self.journal
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push((seq, change));
        }
    }

    fn read_caches<T: Default>(&self, f: impl FnOnce(&Caches) -> T) -> T {
        self.caches.read().map(|c| f(&c)).unwrap_or_default()
    }

    fn record<T>(&self, result: Result<T, RuntimeError>) -> Result<T, RuntimeError> {
        if let Err(e) = &result {
            if let Ok(mut error) = self.error.lock() {
                *error = Some(e.to_string());
            }
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use showtrack_core::models::ShowKind;
    use tokio::sync::Notify;

    use super::*;
    use crate::testing::{detail, FakeCatalog};

    struct Fixture {
        lists: ListSync<FakeCatalog>,
        db: DbHandle,
        identity: watch::Sender<Option<Identity>>,
        user: Identity,
    }

    async fn fixture(catalog: FakeCatalog) -> Fixture {
        let db = DbHandle::open_memory().unwrap();
        let user = db
            .insert_identity("Alice", "alice@x.com", "digest".into())
            .await
            .unwrap();
        let (identity, rx) = watch::channel(Some(user.clone()));
        Fixture {
            lists: ListSync::new(db.clone(), Arc::new(catalog), rx),
            db,
            identity,
            user,
        }
    }

    fn summary(show: ShowRef) -> ShowSummary {
        ShowSummary::bare(show)
    }

    #[tokio::test]
    async fn test_toggle_flips_membership() {
        let f = fixture(FakeCatalog::default()).await;
        let show = summary(ShowRef::movie(42));

        assert!(f
            .lists
            .toggle(ListKind::Favorite, &show, WatchNote::default())
            .await
            .unwrap());
        assert!(f.lists.check(ListKind::Favorite, show.show).await.unwrap());
        assert!(f.lists.is_cached(ListKind::Favorite, show.show));

        assert!(!f
            .lists
            .toggle(ListKind::Favorite, &show, WatchNote::default())
            .await
            .unwrap());
        assert!(!f.lists.check(ListKind::Favorite, show.show).await.unwrap());
        assert!(!f.lists.is_cached(ListKind::Favorite, show.show));
    }

    #[tokio::test]
    async fn test_even_toggles_restore_state() {
        let f = fixture(FakeCatalog::default()).await;
        for list in ListKind::ALL {
            for kind in ShowKind::ALL {
                let show = summary(ShowRef::new(9, *kind));
                let before = f.lists.check(*list, show.show).await.unwrap();
                for _ in 0..4 {
                    f.lists
                        .toggle(*list, &show, WatchNote::default())
                        .await
                        .unwrap();
                }
                assert_eq!(f.lists.check(*list, show.show).await.unwrap(), before);
            }
        }
    }

    #[tokio::test]
    async fn test_toggle_uses_store_not_cache() {
        let f = fixture(FakeCatalog::default()).await;
        let show = ShowRef::series(5);
        // Added by another session; this cache has never seen it.
        f.db.add_membership(&f.user.id, show, ListKind::Watchlist, WatchNote::default())
            .await
            .unwrap();
        assert!(!f.lists.is_cached(ListKind::Watchlist, show));

        let now = f
            .lists
            .toggle(ListKind::Watchlist, &summary(show), WatchNote::default())
            .await
            .unwrap();
        assert!(!now);
        assert!(!f.lists.check(ListKind::Watchlist, show).await.unwrap());
    }

    #[tokio::test]
    async fn test_add_and_remove_are_idempotent() {
        let f = fixture(FakeCatalog::default()).await;
        let show = summary(ShowRef::movie(1));
        let note = WatchNote {
            rating: Some(Rating::new(8).unwrap()),
            notes: Some("great".into()),
        };

        assert!(f.lists.add(ListKind::Watched, &show, note.clone()).await.unwrap());
        assert!(!f.lists.add(ListKind::Watched, &show, note).await.unwrap());
        assert_eq!(f.lists.counts().watched, 1);
        assert_eq!(
            f.lists.items(ListKind::Watched)[0].rating,
            Some(Rating::new(8).unwrap())
        );

        assert!(f.lists.remove(ListKind::Watched, show.show).await.unwrap());
        assert!(!f.lists.remove(ListKind::Watched, show.show).await.unwrap());
        assert_eq!(f.lists.counts(), ListCounts::default());
    }

    #[tokio::test]
    async fn test_anonymous_operations_fail() {
        let f = fixture(FakeCatalog::default()).await;
        f.identity.send_replace(None);
        let show = summary(ShowRef::movie(1));
        assert!(matches!(
            f.lists
                .toggle(ListKind::Favorite, &show, WatchNote::default())
                .await,
            Err(RuntimeError::NotAuthenticated)
        ));
        assert!(f.lists.last_error().is_some());
        assert_eq!(f.lists.check_all(show.show).await, ListStatus::default());
    }

    #[tokio::test]
    async fn test_check_all() {
        let f = fixture(FakeCatalog::default()).await;
        let show = summary(ShowRef::series(3));
        f.lists
            .add(ListKind::Favorite, &show, WatchNote::default())
            .await
            .unwrap();
        f.lists
            .add(ListKind::Watched, &show, WatchNote::default())
            .await
            .unwrap();
        assert_eq!(
            f.lists.check_all(show.show).await,
            ListStatus {
                favorite: true,
                watchlist: false,
                watched: true
            }
        );
    }

    #[tokio::test]
    async fn test_load_drops_failed_hydration() {
        let catalog = FakeCatalog::default()
            .with_detail(detail(ShowRef::movie(1), "Dune"))
            .with_detail(detail(ShowRef::series(2), "Dark"))
            .failing(ShowRef::movie(3));
        let f = fixture(catalog).await;
        for show in [ShowRef::movie(1), ShowRef::series(2), ShowRef::movie(3), ShowRef::movie(4)] {
            f.db.add_membership(&f.user.id, show, ListKind::Favorite, WatchNote::default())
                .await
                .unwrap();
        }
        f.db.add_membership(&f.user.id, ShowRef::series(2), ListKind::Watched, WatchNote::default())
            .await
            .unwrap();

        f.lists.load_user_data().await.unwrap();

        let favorites = f.lists.items(ListKind::Favorite);
        let mut shows: Vec<ShowRef> = favorites.iter().map(|i| i.show).collect();
        shows.sort_by_key(|s| s.id);
        assert_eq!(shows, vec![ShowRef::movie(1), ShowRef::series(2)]);
        assert!(favorites.iter().all(|i| i.detail.is_some()));
        assert_eq!(f.lists.items(ListKind::Watched)[0].name, "Dark");
        assert_eq!(
            f.lists.counts(),
            ListCounts {
                favorites: 2,
                watchlist: 0,
                watched: 1
            }
        );
        assert!(!f.lists.is_loading());
    }

    #[tokio::test]
    async fn test_clear_discards_inflight_reload() {
        let gate = Arc::new(Notify::new());
        let catalog = FakeCatalog::default()
            .with_detail(detail(ShowRef::movie(1), "Dune"))
            .gated(gate.clone());
        let f = fixture(catalog).await;
        f.db.add_membership(&f.user.id, ShowRef::movie(1), ListKind::Favorite, WatchNote::default())
            .await
            .unwrap();

        let (loaded, ()) = tokio::join!(f.lists.load_user_data(), async {
            f.lists.clear();
            gate.notify_one();
        });
        loaded.unwrap();
        assert_eq!(f.lists.counts(), ListCounts::default());
    }

    async fn until(mut ready: impl FnMut() -> bool) {
        while !ready() {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test]
    async fn test_toggle_during_reload_survives_it() {
        let gate = Arc::new(Notify::new());
        let catalog = FakeCatalog::default()
            .with_detail(detail(ShowRef::movie(1), "Dune"))
            .gated(gate.clone());
        let f = fixture(catalog).await;
        f.db.add_membership(&f.user.id, ShowRef::movie(1), ListKind::Favorite, WatchNote::default())
            .await
            .unwrap();

        let (loaded, ()) = tokio::join!(f.lists.load_user_data(), async {
            // The reload has read the store and is waiting on the catalog.
            until(|| f.lists.catalog.fetches.load(Ordering::SeqCst) == 1).await;
            for show in [ShowRef::movie(2), ShowRef::movie(1)] {
                f.lists
                    .toggle(ListKind::Favorite, &summary(show), WatchNote::default())
                    .await
                    .unwrap();
            }
            gate.notify_one();
        });
        loaded.unwrap();

        for show in [ShowRef::movie(1), ShowRef::movie(2)] {
            let stored = f.lists.check(ListKind::Favorite, show).await.unwrap();
            assert_eq!(stored, f.lists.is_cached(ListKind::Favorite, show), "{show}");
        }
        assert_eq!(f.lists.counts().favorites, 1);
    }

    #[tokio::test]
    async fn test_overlapping_reloads_keep_loading_flag() {
        let gate = Arc::new(Notify::new());
        let catalog = FakeCatalog::default()
            .with_detail(detail(ShowRef::movie(1), "Dune"))
            .gated(gate.clone());
        let f = fixture(catalog).await;
        f.db.add_membership(&f.user.id, ShowRef::movie(1), ListKind::Favorite, WatchNote::default())
            .await
            .unwrap();

        let (first, second, ()) = tokio::join!(
            f.lists.load_user_data(),
            f.lists.load_user_data(),
            async {
                until(|| f.lists.catalog.fetches.load(Ordering::SeqCst) == 2).await;
                assert!(f.lists.is_loading());
                gate.notify_one();
                until(|| f.lists.counts().favorites == 1).await;
                assert!(f.lists.is_loading());
                gate.notify_one();
            }
        );
        first.unwrap();
        second.unwrap();
        assert!(!f.lists.is_loading());
    }

    #[tokio::test]
    async fn test_episode_toggle_independent_of_series() {
        let f = fixture(FakeCatalog::default()).await;
        let series = ShowRef::series(100);
        let episode = Episode {
            id: 555,
            series_id: 100,
            season_number: 1,
            number: 3,
            name: None,
            aired: None,
            image_url: None,
            runtime: None,
        };

        f.lists
            .add(ListKind::Watched, &summary(series), WatchNote::default())
            .await
            .unwrap();
        assert!(!f.lists.is_episode_watched(100, 555).await.unwrap());

        assert!(f
            .lists
            .toggle_episode(&episode, WatchNote::default())
            .await
            .unwrap());
        assert!(f.lists.is_episode_watched(100, 555).await.unwrap());
        assert_eq!(f.lists.watched_episodes(100).await.unwrap().len(), 1);

        f.lists.remove(ListKind::Watched, series).await.unwrap();
        assert!(f.lists.is_episode_watched(100, 555).await.unwrap());

        assert!(!f
            .lists
            .toggle_episode(&episode, WatchNote::default())
            .await
            .unwrap());
        assert!(f.lists.watched_episodes(100).await.unwrap().is_empty());
    }
}
