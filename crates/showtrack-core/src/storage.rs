use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use tracing::debug;
use uuid::Uuid;

use crate::error::ShowtrackError;
use crate::models::{
    Identity, IdentityRecord, ListKind, Membership, NewWatchedEpisode, Rating, ShowKind, ShowRef,
    WatchNote, WatchedEpisode, SERIES_WATCHED_SENTINEL,
};

const SCHEMA_V1: &str = include_str!("../../../migrations/001_initial.sql");

/// SQLite-backed store for identities and list memberships.
pub struct Storage {
    conn: Connection,
}

/// Where a (list, show kind) pair lives in the schema.
struct Target {
    table: &'static str,
    column: &'static str,
    /// Series-watched rows share `watched_episodes` with real episodes.
    sentinel: bool,
}

impl Target {
    fn of(list: ListKind, kind: ShowKind) -> Self {
        let column = match kind {
            ShowKind::Movie => "movie_id",
            ShowKind::Series => "series_id",
        };
        match (list, kind) {
            (ListKind::Favorite, _) => Self {
                table: "favorites",
                column,
                sentinel: false,
            },
            (ListKind::Watchlist, _) => Self {
                table: "watchlist",
                column,
                sentinel: false,
            },
            (ListKind::Watched, ShowKind::Movie) => Self {
                table: "watched_movies",
                column,
                sentinel: false,
            },
            (ListKind::Watched, ShowKind::Series) => Self {
                table: "watched_episodes",
                column,
                sentinel: true,
            },
        }
    }

    fn key_clause(&self) -> String {
        if self.sentinel {
            format!(
                "user_id = ?1 AND {} = ?2 AND episode_id = {SERIES_WATCHED_SENTINEL}",
                self.column
            )
        } else {
            format!("user_id = ?1 AND {} = ?2", self.column)
        }
    }
}

impl Storage {
    /// Open (or create) the database at the given path and run migrations.
    pub fn open(path: &Path) -> Result<Self, ShowtrackError> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self, ShowtrackError> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys=ON;")?;
        run_migrations(&conn)?;
        Ok(Self { conn })
    }

    // ── Identities ──────────────────────────────────────────────

    /// Create a new identity with a fresh id. Fails on a duplicate email.
    pub fn insert_identity(
        &self,
        name: &str,
        email: &str,
        password_digest: &str,
    ) -> Result<Identity, ShowtrackError> {
        let identity = Identity {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            email: email.to_string(),
            created_at: Utc::now(),
        };
        self.conn.execute(
            "INSERT INTO identities (id, name, email, password_digest, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                identity.id,
                identity.name,
                identity.email,
                password_digest,
                identity.created_at.to_rfc3339(),
            ],
        )?;
        debug!(id = %identity.id, "Created identity");
        Ok(identity)
    }

    pub fn identity_by_email(&self, email: &str) -> Result<Option<IdentityRecord>, ShowtrackError> {
        self.conn
            .query_row(
                "SELECT id, name, email, created_at, password_digest
                 FROM identities WHERE email = ?1",
                params![email],
                |row| {
                    Ok(IdentityRecord {
                        identity: row_to_identity(row)?,
                        password_digest: row.get(4)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }

    pub fn identity_by_id(&self, id: &str) -> Result<Option<Identity>, ShowtrackError> {
        self.conn
            .query_row(
                "SELECT id, name, email, created_at FROM identities WHERE id = ?1",
                params![id],
                row_to_identity,
            )
            .optional()
            .map_err(Into::into)
    }

    /// Replace the credential digest for an email. Returns false if no such identity.
    pub fn update_password_digest(
        &self,
        email: &str,
        password_digest: &str,
    ) -> Result<bool, ShowtrackError> {
        let changed = self.conn.execute(
            "UPDATE identities SET password_digest = ?1 WHERE email = ?2",
            params![password_digest, email],
        )?;
        Ok(changed > 0)
    }

    // ── Memberships ─────────────────────────────────────────────

    /// Add a show to a list. Returns false if it was already there.
    ///
    /// Uniqueness is decided by the store in the same statement, so two
    /// concurrent adds for one key leave exactly one row and neither fails.
    pub fn add_membership(
        &self,
        user_id: &str,
        show: ShowRef,
        list: ListKind,
        note: &WatchNote,
    ) -> Result<bool, ShowtrackError> {
        let target = Target::of(list, show.kind);
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();
        let rating = note.rating.map(Rating::get);

        let inserted = match (list, target.sentinel) {
            (ListKind::Favorite, _) => self.conn.execute(
                &format!(
                    "INSERT INTO favorites (id, user_id, {}, created_at)
                     VALUES (?1, ?2, ?3, ?4)
                     ON CONFLICT DO NOTHING",
                    target.column
                ),
                params![id, user_id, show.id as i64, now],
            )?,
            (ListKind::Watchlist, _) => self.conn.execute(
                &format!(
                    "INSERT INTO watchlist (id, user_id, {}, created_at, notes)
                     VALUES (?1, ?2, ?3, ?4, ?5)
                     ON CONFLICT DO NOTHING",
                    target.column
                ),
                params![id, user_id, show.id as i64, now, note.notes],
            )?,
            (ListKind::Watched, false) => self.conn.execute(
                "INSERT INTO watched_movies (id, user_id, movie_id, watched_at, rating, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                 ON CONFLICT DO NOTHING",
                params![id, user_id, show.id as i64, now, rating, note.notes],
            )?,
            (ListKind::Watched, true) => self.conn.execute(
                "INSERT INTO watched_episodes (id, user_id, series_id, episode_id,
                     season_number, episode_number, watched_at, rating, notes)
                 VALUES (?1, ?2, ?3, ?4, 0, 0, ?5, ?6, ?7)
                 ON CONFLICT DO NOTHING",
                params![
                    id,
                    user_id,
                    show.id as i64,
                    SERIES_WATCHED_SENTINEL as i64,
                    now,
                    rating,
                    note.notes
                ],
            )?,
        };

        debug!(%show, list = list.as_db_str(), inserted, "add_membership");
        Ok(inserted > 0)
    }

    /// Remove a show from a list. Returns false if it wasn't there.
    pub fn remove_membership(
        &self,
        user_id: &str,
        show: ShowRef,
        list: ListKind,
    ) -> Result<bool, ShowtrackError> {
        let target = Target::of(list, show.kind);
        let deleted = self.conn.execute(
            &format!("DELETE FROM {} WHERE {}", target.table, target.key_clause()),
            params![user_id, show.id as i64],
        )?;
        debug!(%show, list = list.as_db_str(), deleted, "remove_membership");
        Ok(deleted > 0)
    }

    /// Whether the show is in the list, by count query.
    pub fn membership_exists(
        &self,
        user_id: &str,
        show: ShowRef,
        list: ListKind,
    ) -> Result<bool, ShowtrackError> {
        let target = Target::of(list, show.kind);
        let count: i64 = self.conn.query_row(
            &format!(
                "SELECT COUNT(*) FROM {} WHERE {}",
                target.table,
                target.key_clause()
            ),
            params![user_id, show.id as i64],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// All memberships of one list, newest first, across both show kinds.
    pub fn list_memberships(
        &self,
        user_id: &str,
        list: ListKind,
    ) -> Result<Vec<Membership>, ShowtrackError> {
        let sql = match list {
            ListKind::Favorite => {
                "SELECT id, user_id, movie_id, series_id, created_at, NULL AS rating, NULL AS notes
                 FROM favorites WHERE user_id = ?1
                 ORDER BY created_at DESC"
            }
            ListKind::Watchlist => {
                "SELECT id, user_id, movie_id, series_id, created_at, NULL AS rating, notes
                 FROM watchlist WHERE user_id = ?1
                 ORDER BY created_at DESC"
            }
            ListKind::Watched => {
                "SELECT id, user_id, movie_id, NULL AS series_id, watched_at AS created_at,
                        rating, notes
                 FROM watched_movies WHERE user_id = ?1
                 UNION ALL
                 SELECT id, user_id, NULL, series_id, watched_at, rating, notes
                 FROM watched_episodes WHERE user_id = ?1 AND episode_id = 0
                 ORDER BY created_at DESC"
            }
        };
        let mut stmt = self.conn.prepare(sql)?;
        let rows = stmt
            .query_map(params![user_id], |row| row_to_membership(row, list))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    // ── Watched episodes ────────────────────────────────────────

    /// Record an individual watched episode. Returns false if already recorded.
    pub fn add_watched_episode(
        &self,
        user_id: &str,
        episode: &NewWatchedEpisode,
    ) -> Result<bool, ShowtrackError> {
        if episode.episode_id == SERIES_WATCHED_SENTINEL {
            return Err(ShowtrackError::InvalidInput(format!(
                "episode id {SERIES_WATCHED_SENTINEL} is reserved for whole-series entries"
            )));
        }
        let inserted = self.conn.execute(
            "INSERT INTO watched_episodes (id, user_id, series_id, episode_id,
                 season_number, episode_number, watched_at, rating, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
             ON CONFLICT DO NOTHING",
            params![
                Uuid::new_v4().to_string(),
                user_id,
                episode.series_id as i64,
                episode.episode_id as i64,
                episode.season_number,
                episode.episode_number,
                Utc::now().to_rfc3339(),
                episode.note.rating.map(Rating::get),
                episode.note.notes,
            ],
        )?;
        Ok(inserted > 0)
    }

    pub fn remove_watched_episode(
        &self,
        user_id: &str,
        series_id: u64,
        episode_id: u64,
    ) -> Result<bool, ShowtrackError> {
        if episode_id == SERIES_WATCHED_SENTINEL {
            return Ok(false);
        }
        let deleted = self.conn.execute(
            "DELETE FROM watched_episodes
             WHERE user_id = ?1 AND series_id = ?2 AND episode_id = ?3",
            params![user_id, series_id as i64, episode_id as i64],
        )?;
        Ok(deleted > 0)
    }

    pub fn watched_episode_exists(
        &self,
        user_id: &str,
        series_id: u64,
        episode_id: u64,
    ) -> Result<bool, ShowtrackError> {
        if episode_id == SERIES_WATCHED_SENTINEL {
            return Ok(false);
        }
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM watched_episodes
             WHERE user_id = ?1 AND series_id = ?2 AND episode_id = ?3",
            params![user_id, series_id as i64, episode_id as i64],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// Individual episodes watched for a series, in airing order.
    pub fn watched_episodes(
        &self,
        user_id: &str,
        series_id: u64,
    ) -> Result<Vec<WatchedEpisode>, ShowtrackError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, user_id, series_id, episode_id, season_number, episode_number,
                    watched_at, rating, notes
             FROM watched_episodes
             WHERE user_id = ?1 AND series_id = ?2 AND episode_id <> 0
             ORDER BY season_number, episode_number",
        )?;
        let rows = stmt
            .query_map(params![user_id, series_id as i64], |row| {
                let watched_at: String = row.get(6)?;
                Ok(WatchedEpisode {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    series_id: row.get::<_, i64>(2)? as u64,
                    episode_id: row.get::<_, i64>(3)? as u64,
                    season_number: row.get(4)?,
                    episode_number: row.get(5)?,
                    watched_at: parse_datetime(&watched_at),
                    rating: rating_from_db(row.get(7)?),
                    notes: row.get(8)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

// ── Migrations ──────────────────────────────────────────────────

/// Run schema migrations using `PRAGMA user_version` for version tracking.
fn run_migrations(conn: &Connection) -> Result<(), ShowtrackError> {
    let version: i32 = conn
        .pragma_query_value(None, "user_version", |row| row.get(0))
        .unwrap_or(0);

    if version < 1 {
        conn.execute_batch(SCHEMA_V1)?;
        conn.pragma_update(None, "user_version", 1)?;
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────

/// Parse a datetime string from SQLite (either RFC 3339 or SQLite's `datetime('now')` format).
fn parse_datetime(s: &str) -> DateTime<Utc> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return dt.with_timezone(&Utc);
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return naive.and_utc();
    }
    DateTime::default()
}

fn rating_from_db(value: Option<i64>) -> Option<Rating> {
    value
        .and_then(|v| u8::try_from(v).ok())
        .and_then(|v| Rating::new(v).ok())
}

// ── Row mapping helpers ─────────────────────────────────────────

fn row_to_identity(row: &rusqlite::Row<'_>) -> rusqlite::Result<Identity> {
    let created_at: String = row.get(3)?;
    Ok(Identity {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        created_at: parse_datetime(&created_at),
    })
}

fn row_to_membership(row: &rusqlite::Row<'_>, list: ListKind) -> rusqlite::Result<Membership> {
    let movie_id: Option<i64> = row.get(2)?;
    let series_id: Option<i64> = row.get(3)?;
    let show = match (movie_id, series_id) {
        (Some(id), _) => ShowRef::movie(id as u64),
        (None, Some(id)) => ShowRef::series(id as u64),
        (None, None) => return Err(rusqlite::Error::InvalidColumnType(
            2,
            "movie_id".into(),
            rusqlite::types::Type::Null,
        )),
    };
    let created_at: String = row.get(4)?;

    Ok(Membership {
        id: row.get(0)?,
        user_id: row.get(1)?,
        show,
        list,
        created_at: parse_datetime(&created_at),
        rating: rating_from_db(row.get(5)?),
        notes: row.get(6)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::digest_password;

    fn db_with_user() -> (Storage, String) {
        let db = Storage::open_memory().unwrap();
        let user = db
            .insert_identity("Alice", "alice@x.com", &digest_password("secret1"))
            .unwrap();
        (db, user.id)
    }

    fn count_rows(db: &Storage, table: &str) -> i64 {
        db.conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
            .unwrap()
    }

    #[test]
    fn test_identity_roundtrip() {
        let (db, id) = db_with_user();
        let record = db.identity_by_email("alice@x.com").unwrap().unwrap();
        assert_eq!(record.identity.id, id);
        assert_eq!(record.identity.name, "Alice");
        assert_eq!(record.password_digest, digest_password("secret1"));

        let by_id = db.identity_by_id(&id).unwrap().unwrap();
        assert_eq!(by_id.email, "alice@x.com");
        assert!(db.identity_by_email("bob@x.com").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email_is_constraint_violation() {
        let (db, _) = db_with_user();
        let err = db
            .insert_identity("Other", "alice@x.com", "digest")
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_update_password_digest() {
        let (db, _) = db_with_user();
        assert!(db
            .update_password_digest("alice@x.com", &digest_password("newpass"))
            .unwrap());
        let record = db.identity_by_email("alice@x.com").unwrap().unwrap();
        assert_eq!(record.password_digest, digest_password("newpass"));
        assert!(!db.update_password_digest("nobody@x.com", "d").unwrap());
    }

    #[test]
    fn test_add_is_idempotent_for_every_list_and_kind() {
        let (db, user) = db_with_user();
        for list in ListKind::ALL {
            for show in [ShowRef::movie(42), ShowRef::series(42)] {
                assert!(db
                    .add_membership(&user, show, *list, &WatchNote::default())
                    .unwrap());
                assert!(!db
                    .add_membership(&user, show, *list, &WatchNote::default())
                    .unwrap());
                assert!(db.membership_exists(&user, show, *list).unwrap());
            }
            let rows = db.list_memberships(&user, *list).unwrap();
            assert_eq!(rows.len(), 2, "{list:?}");
        }
        assert_eq!(count_rows(&db, "favorites"), 2);
        assert_eq!(count_rows(&db, "watchlist"), 2);
        assert_eq!(count_rows(&db, "watched_movies"), 1);
        assert_eq!(count_rows(&db, "watched_episodes"), 1);
    }

    #[test]
    fn test_kind_is_part_of_the_key() {
        let (db, user) = db_with_user();
        db.add_membership(&user, ShowRef::movie(7), ListKind::Favorite, &WatchNote::default())
            .unwrap();
        assert!(db
            .membership_exists(&user, ShowRef::movie(7), ListKind::Favorite)
            .unwrap());
        assert!(!db
            .membership_exists(&user, ShowRef::series(7), ListKind::Favorite)
            .unwrap());
        assert!(!db
            .membership_exists(&user, ShowRef::movie(7), ListKind::Watchlist)
            .unwrap());
    }

    #[test]
    fn test_remove_absent_is_noop() {
        let (db, user) = db_with_user();
        assert!(!db
            .remove_membership(&user, ShowRef::movie(1), ListKind::Watched)
            .unwrap());

        db.add_membership(&user, ShowRef::movie(1), ListKind::Watched, &WatchNote::default())
            .unwrap();
        assert!(db
            .remove_membership(&user, ShowRef::movie(1), ListKind::Watched)
            .unwrap());
        assert!(!db
            .membership_exists(&user, ShowRef::movie(1), ListKind::Watched)
            .unwrap());
    }

    #[test]
    fn test_memberships_are_per_user() {
        let (db, alice) = db_with_user();
        let bob = db.insert_identity("Bob", "bob@x.com", "d").unwrap().id;
        db.add_membership(&alice, ShowRef::series(3), ListKind::Watchlist, &WatchNote::default())
            .unwrap();
        assert!(!db
            .membership_exists(&bob, ShowRef::series(3), ListKind::Watchlist)
            .unwrap());
        assert!(db.list_memberships(&bob, ListKind::Watchlist).unwrap().is_empty());
    }

    #[test]
    fn test_watched_keeps_rating_and_notes() {
        let (db, user) = db_with_user();
        let note = WatchNote {
            rating: Some(Rating::new(9).unwrap()),
            notes: Some("rewatch soon".into()),
        };
        db.add_membership(&user, ShowRef::movie(5), ListKind::Watched, &note)
            .unwrap();
        db.add_membership(&user, ShowRef::series(6), ListKind::Watched, &WatchNote::default())
            .unwrap();

        let rows = db.list_memberships(&user, ListKind::Watched).unwrap();
        assert_eq!(rows.len(), 2);
        let movie = rows.iter().find(|m| m.show == ShowRef::movie(5)).unwrap();
        assert_eq!(movie.rating.map(Rating::get), Some(9));
        assert_eq!(movie.notes.as_deref(), Some("rewatch soon"));
        assert!(rows.iter().any(|m| m.show == ShowRef::series(6)));
    }

    #[test]
    fn test_series_sentinel_independent_of_episodes() {
        let (db, user) = db_with_user();
        let episode = NewWatchedEpisode {
            series_id: 100,
            episode_id: 555,
            season_number: 1,
            episode_number: 3,
            note: WatchNote::default(),
        };
        assert!(db.add_watched_episode(&user, &episode).unwrap());
        assert!(!db
            .membership_exists(&user, ShowRef::series(100), ListKind::Watched)
            .unwrap());

        db.add_membership(&user, ShowRef::series(100), ListKind::Watched, &WatchNote::default())
            .unwrap();
        assert!(db.watched_episode_exists(&user, 100, 555).unwrap());
        assert!(!db
            .watched_episode_exists(&user, 100, SERIES_WATCHED_SENTINEL)
            .unwrap());

        let episodes = db.watched_episodes(&user, 100).unwrap();
        assert_eq!(episodes.len(), 1);
        assert_eq!(episodes[0].episode_number, 3);

        db.remove_membership(&user, ShowRef::series(100), ListKind::Watched)
            .unwrap();
        assert!(db.watched_episode_exists(&user, 100, 555).unwrap());
    }

    #[test]
    fn test_sentinel_episode_id_rejected() {
        let (db, user) = db_with_user();
        let episode = NewWatchedEpisode {
            series_id: 1,
            episode_id: SERIES_WATCHED_SENTINEL,
            season_number: 0,
            episode_number: 0,
            note: WatchNote::default(),
        };
        assert!(matches!(
            db.add_watched_episode(&user, &episode),
            Err(ShowtrackError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_watched_episode_add_remove() {
        let (db, user) = db_with_user();
        let episode = NewWatchedEpisode {
            series_id: 9,
            episode_id: 90,
            season_number: 2,
            episode_number: 1,
            note: WatchNote::default(),
        };
        assert!(db.add_watched_episode(&user, &episode).unwrap());
        assert!(!db.add_watched_episode(&user, &episode).unwrap());
        assert!(db.remove_watched_episode(&user, 9, 90).unwrap());
        assert!(!db.remove_watched_episode(&user, 9, 90).unwrap());
    }

    #[test]
    fn test_membership_requires_known_user() {
        let db = Storage::open_memory().unwrap();
        let err = db
            .add_membership("ghost", ShowRef::movie(1), ListKind::Favorite, &WatchNote::default())
            .unwrap_err();
        assert!(err.is_constraint_violation());
    }

    #[test]
    fn test_reopen_file_database_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("showtrack.db");
        let user = {
            let db = Storage::open(&path).unwrap();
            let user = db.insert_identity("A", "a@x.com", "d").unwrap().id;
            db.add_membership(&user, ShowRef::movie(1), ListKind::Favorite, &WatchNote::default())
                .unwrap();
            user
        };
        let db = Storage::open(&path).unwrap();
        assert!(db
            .membership_exists(&user, ShowRef::movie(1), ListKind::Favorite)
            .unwrap());
    }
}
