use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::show::ShowRef;
use crate::error::ShowtrackError;

/// Episode id recorded when a whole series is marked watched.
pub const SERIES_WATCHED_SENTINEL: u64 = 0;

/// The personal lists a show can belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Favorite,
    Watchlist,
    Watched,
}

impl ListKind {
    pub const ALL: &[ListKind] = &[Self::Favorite, Self::Watchlist, Self::Watched];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Favorite => "Favorites",
            Self::Watchlist => "Watchlist",
            Self::Watched => "Watched",
        }
    }

    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Favorite => "favorites",
            Self::Watchlist => "watchlist",
            Self::Watched => "watched",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "favorites" | "favorite" => Some(Self::Favorite),
            "watchlist" => Some(Self::Watchlist),
            "watched" => Some(Self::Watched),
            _ => None,
        }
    }

    /// Position in fixed-size per-list arrays.
    pub fn index(&self) -> usize {
        match self {
            Self::Favorite => 0,
            Self::Watchlist => 1,
            Self::Watched => 2,
        }
    }
}

impl std::fmt::Display for ListKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user score between 1 and 10 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, ShowtrackError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ShowtrackError::InvalidRating(value))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = ShowtrackError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// Optional metadata attached when a show or episode is marked watched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchNote {
    pub rating: Option<Rating>,
    pub notes: Option<String>,
}

/// A row asserting that a show belongs to one of a user's lists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    pub id: String,
    pub user_id: String,
    pub show: ShowRef,
    pub list: ListKind,
    pub created_at: DateTime<Utc>,
    pub rating: Option<Rating>,
    pub notes: Option<String>,
}

/// An individual episode a user has watched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchedEpisode {
    pub id: String,
    pub user_id: String,
    pub series_id: u64,
    pub episode_id: u64,
    pub season_number: u32,
    pub episode_number: u32,
    pub watched_at: DateTime<Utc>,
    pub rating: Option<Rating>,
    pub notes: Option<String>,
}

/// Input for recording a watched episode.
#[derive(Debug, Clone, PartialEq)]
pub struct NewWatchedEpisode {
    pub series_id: u64,
    pub episode_id: u64,
    pub season_number: u32,
    pub episode_number: u32,
    pub note: WatchNote,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rating_bounds() {
        assert!(Rating::new(0).is_err());
        assert_eq!(Rating::new(1).unwrap().get(), 1);
        assert_eq!(Rating::new(10).unwrap().get(), 10);
        assert!(matches!(
            Rating::new(11),
            Err(ShowtrackError::InvalidRating(11))
        ));
    }

    #[test]
    fn test_rating_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Rating>("7").is_ok());
        assert!(serde_json::from_str::<Rating>("12").is_err());
    }

    #[test]
    fn test_list_kind_db_str() {
        for list in ListKind::ALL {
            assert_eq!(ListKind::from_db_str(list.as_db_str()), Some(*list));
        }
        assert_eq!(ListKind::from_db_str("favorite"), Some(ListKind::Favorite));
        assert_eq!(ListKind::from_db_str("seen"), None);
    }

    #[test]
    fn test_list_indexes_are_distinct() {
        let mut seen = [false; 3];
        for list in ListKind::ALL {
            assert!(!seen[list.index()]);
            seen[list.index()] = true;
        }
    }
}
