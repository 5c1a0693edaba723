use std::path::Path;

use tokio::sync::{mpsc, oneshot};

use showtrack_core::error::ShowtrackError;
use showtrack_core::models::{
    Identity, IdentityRecord, ListKind, Membership, NewWatchedEpisode, ShowRef, WatchNote,
    WatchedEpisode,
};
use showtrack_core::storage::Storage;

type Reply<T> = oneshot::Sender<Result<T, ShowtrackError>>;

/// Async handle to the store. The `Storage` connection lives on its own
/// thread; every call is a command sent over a channel with a oneshot reply.
#[derive(Clone)]
pub struct DbHandle {
    tx: mpsc::UnboundedSender<DbCommand>,
}

enum DbCommand {
    InsertIdentity {
        name: String,
        email: String,
        password_digest: String,
        reply: Reply<Identity>,
    },
    IdentityByEmail {
        email: String,
        reply: Reply<Option<IdentityRecord>>,
    },
    IdentityById {
        id: String,
        reply: Reply<Option<Identity>>,
    },
    UpdatePasswordDigest {
        email: String,
        password_digest: String,
        reply: Reply<bool>,
    },
    AddMembership {
        user_id: String,
        show: ShowRef,
        list: ListKind,
        note: WatchNote,
        reply: Reply<bool>,
    },
    RemoveMembership {
        user_id: String,
        show: ShowRef,
        list: ListKind,
        reply: Reply<bool>,
    },
    MembershipExists {
        user_id: String,
        show: ShowRef,
        list: ListKind,
        reply: Reply<bool>,
    },
    ListMemberships {
        user_id: String,
        list: ListKind,
        reply: Reply<Vec<Membership>>,
    },
    AddWatchedEpisode {
        user_id: String,
        episode: NewWatchedEpisode,
        reply: Reply<bool>,
    },
    RemoveWatchedEpisode {
        user_id: String,
        series_id: u64,
        episode_id: u64,
        reply: Reply<bool>,
    },
    WatchedEpisodeExists {
        user_id: String,
        series_id: u64,
        episode_id: u64,
        reply: Reply<bool>,
    },
    WatchedEpisodes {
        user_id: String,
        series_id: u64,
        reply: Reply<Vec<WatchedEpisode>>,
    },
}

impl DbHandle {
    pub fn open(path: &Path) -> Result<Self, ShowtrackError> {
        Self::spawn(Storage::open(path)?)
    }

    /// Handle backed by a private in-memory database.
    pub fn open_memory() -> Result<Self, ShowtrackError> {
        Self::spawn(Storage::open_memory()?)
    }

    fn spawn(storage: Storage) -> Result<Self, ShowtrackError> {
        let (tx, rx) = mpsc::unbounded_channel();

        std::thread::Builder::new()
            .name("db-actor".into())
            .spawn(move || actor_loop(storage, rx))?;

        Ok(Self { tx })
    }

    async fn call<T>(&self, build: impl FnOnce(Reply<T>) -> DbCommand) -> Result<T, ShowtrackError> {
        let (reply, rx) = oneshot::channel();
        let _ = self.tx.send(build(reply));
        rx.await
            .unwrap_or_else(|_| Err(ShowtrackError::Unavailable("DB actor closed".into())))
    }

    pub async fn insert_identity(
        &self,
        name: impl Into<String>,
        email: impl Into<String>,
        password_digest: String,
    ) -> Result<Identity, ShowtrackError> {
        let (name, email) = (name.into(), email.into());
        self.call(|reply| DbCommand::InsertIdentity {
            name,
            email,
            password_digest,
            reply,
        })
        .await
    }

    pub async fn identity_by_email(
        &self,
        email: impl Into<String>,
    ) -> Result<Option<IdentityRecord>, ShowtrackError> {
        let email = email.into();
        self.call(|reply| DbCommand::IdentityByEmail { email, reply })
            .await
    }

    pub async fn identity_by_id(
        &self,
        id: impl Into<String>,
    ) -> Result<Option<Identity>, ShowtrackError> {
        let id = id.into();
        self.call(|reply| DbCommand::IdentityById { id, reply }).await
    }

    pub async fn update_password_digest(
        &self,
        email: impl Into<String>,
        password_digest: String,
    ) -> Result<bool, ShowtrackError> {
        let email = email.into();
        self.call(|reply| DbCommand::UpdatePasswordDigest {
            email,
            password_digest,
            reply,
        })
        .await
    }

    pub async fn add_membership(
        &self,
        user_id: &str,
        show: ShowRef,
        list: ListKind,
        note: WatchNote,
    ) -> Result<bool, ShowtrackError> {
        let user_id = user_id.to_string();
        self.call(|reply| DbCommand::AddMembership {
            user_id,
            show,
            list,
            note,
            reply,
        })
        .await
    }

    pub async fn remove_membership(
        &self,
        user_id: &str,
        show: ShowRef,
        list: ListKind,
    ) -> Result<bool, ShowtrackError> {
        let user_id = user_id.to_string();
        self.call(|reply| DbCommand::RemoveMembership {
            user_id,
            show,
            list,
            reply,
        })
        .await
    }

    pub async fn membership_exists(
        &self,
        user_id: &str,
        show: ShowRef,
        list: ListKind,
    ) -> Result<bool, ShowtrackError> {
        let user_id = user_id.to_string();
        self.call(|reply| DbCommand::MembershipExists {
            user_id,
            show,
            list,
            reply,
        })
        .await
    }

    pub async fn list_memberships(
        &self,
        user_id: &str,
        list: ListKind,
    ) -> Result<Vec<Membership>, ShowtrackError> {
        let user_id = user_id.to_string();
        self.call(|reply| DbCommand::ListMemberships {
            user_id,
            list,
            reply,
        })
        .await
    }

    pub async fn add_watched_episode(
        &self,
        user_id: &str,
        episode: NewWatchedEpisode,
    ) -> Result<bool, ShowtrackError> {
        let user_id = user_id.to_string();
        self.call(|reply| DbCommand::AddWatchedEpisode {
            user_id,
            episode,
            reply,
        })
        .await
    }

    pub async fn remove_watched_episode(
        &self,
        user_id: &str,
        series_id: u64,
        episode_id: u64,
    ) -> Result<bool, ShowtrackError> {
        let user_id = user_id.to_string();
        self.call(|reply| DbCommand::RemoveWatchedEpisode {
            user_id,
            series_id,
            episode_id,
            reply,
        })
        .await
    }

    pub async fn watched_episode_exists(
        &self,
        user_id: &str,
        series_id: u64,
        episode_id: u64,
    ) -> Result<bool, ShowtrackError> {
        let user_id = user_id.to_string();
        self.call(|reply| DbCommand::WatchedEpisodeExists {
            user_id,
            series_id,
            episode_id,
            reply,
        })
        .await
    }

    pub async fn watched_episodes(
        &self,
        user_id: &str,
        series_id: u64,
    ) -> Result<Vec<WatchedEpisode>, ShowtrackError> {
        let user_id = user_id.to_string();
        self.call(|reply| DbCommand::WatchedEpisodes {
            user_id,
            series_id,
            reply,
        })
        .await
    }
}

fn actor_loop(storage: Storage, mut rx: mpsc::UnboundedReceiver<DbCommand>) {
    while let Some(cmd) = rx.blocking_recv() {
        match cmd {
            DbCommand::InsertIdentity {
                name,
                email,
                password_digest,
                reply,
            } => {
                let _ = reply.send(storage.insert_identity(&name, &email, &password_digest));
            }
            DbCommand::IdentityByEmail { email, reply } => {
                let _ = reply.send(storage.identity_by_email(&email));
            }
            DbCommand::IdentityById { id, reply } => {
                let _ = reply.send(storage.identity_by_id(&id));
            }
            DbCommand::UpdatePasswordDigest {
                email,
                password_digest,
                reply,
            } => {
                let _ = reply.send(storage.update_password_digest(&email, &password_digest));
            }
            DbCommand::AddMembership {
                user_id,
                show,
                list,
                note,
                reply,
            } => {
                let _ = reply.send(storage.add_membership(&user_id, show, list, &note));
            }
            DbCommand::RemoveMembership {
                user_id,
                show,
                list,
                reply,
            } => {
                let _ = reply.send(storage.remove_membership(&user_id, show, list));
            }
            DbCommand::MembershipExists {
                user_id,
                show,
                list,
                reply,
            } => {
                let _ = reply.send(storage.membership_exists(&user_id, show, list));
            }
            DbCommand::ListMemberships {
                user_id,
                list,
                reply,
            } => {
                let _ = reply.send(storage.list_memberships(&user_id, list));
            }
            DbCommand::AddWatchedEpisode {
                user_id,
                episode,
                reply,
            } => {
                let _ = reply.send(storage.add_watched_episode(&user_id, &episode));
            }
            DbCommand::RemoveWatchedEpisode {
                user_id,
                series_id,
                episode_id,
                reply,
            } => {
                let _ = reply.send(storage.remove_watched_episode(&user_id, series_id, episode_id));
            }
            DbCommand::WatchedEpisodeExists {
                user_id,
                series_id,
                episode_id,
                reply,
            } => {
                let _ = reply.send(storage.watched_episode_exists(&user_id, series_id, episode_id));
            }
            DbCommand::WatchedEpisodes {
                user_id,
                series_id,
                reply,
            } => {
                let _ = reply.send(storage.watched_episodes(&user_id, series_id));
            }
        }
    }
    tracing::debug!("DB actor stopped");
}
