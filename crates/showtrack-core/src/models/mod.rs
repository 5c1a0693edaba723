mod identity;
mod membership;
mod show;

pub use identity::{Identity, IdentityRecord};
pub use membership::{
    ListKind, Membership, NewWatchedEpisode, Rating, WatchNote, WatchedEpisode,
    SERIES_WATCHED_SENTINEL,
};
pub use show::{
    Episode, MovieDetail, SeriesDetail, ShowCommon, ShowDetail, ShowKind, ShowRef, ShowSummary,
};
