use serde::{Deserialize, Serialize};

/// Which catalog namespace a numeric show id belongs to.
///
/// Catalog ids are only unique within a kind, so every lookup pairs the id
/// with its kind (see [`ShowRef`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowKind {
    Movie,
    Series,
}

impl ShowKind {
    pub const ALL: &[ShowKind] = &[Self::Movie, Self::Series];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Movie => "Movie",
            Self::Series => "Series",
        }
    }

    /// Database and wire representation.
    pub fn as_db_str(&self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "movie" => Some(Self::Movie),
            "series" => Some(Self::Series),
            _ => None,
        }
    }
}

impl std::fmt::Display for ShowKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Composite identity of a movie or series: `(id, kind)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShowRef {
    pub id: u64,
    pub kind: ShowKind,
}

impl ShowRef {
    pub fn new(id: u64, kind: ShowKind) -> Self {
        Self { id, kind }
    }

    pub fn movie(id: u64) -> Self {
        Self::new(id, ShowKind::Movie)
    }

    pub fn series(id: u64) -> Self {
        Self::new(id, ShowKind::Series)
    }
}

impl std::fmt::Display for ShowRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind.as_db_str(), self.id)
    }
}

/// One item of a browse page or search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowSummary {
    pub show: ShowRef,
    pub name: String,
    pub image_url: Option<String>,
    pub year: Option<String>,
    pub overview: Option<String>,
}

impl ShowSummary {
    /// Minimal summary for a show we only know by reference.
    pub fn bare(show: ShowRef) -> Self {
        Self {
            show,
            name: format!("{} #{}", show.kind, show.id),
            image_url: None,
            year: None,
            overview: None,
        }
    }
}

/// Fields every hydrated show carries regardless of kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShowCommon {
    pub id: u64,
    pub name: String,
    pub image_url: Option<String>,
    pub year: Option<String>,
    pub overview: Option<String>,
    pub genres: Vec<String>,
    pub artwork_urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieDetail {
    pub common: ShowCommon,
    pub runtime: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesDetail {
    pub common: ShowCommon,
    pub first_aired: Option<String>,
    pub last_aired: Option<String>,
    pub status: Option<String>,
    pub average_runtime: Option<u32>,
    pub season_count: Option<u32>,
}

/// Extended catalog metadata for one show. Never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ShowDetail {
    Movie(MovieDetail),
    Series(SeriesDetail),
}

impl ShowDetail {
    pub fn common(&self) -> &ShowCommon {
        match self {
            Self::Movie(m) => &m.common,
            Self::Series(s) => &s.common,
        }
    }

    pub fn kind(&self) -> ShowKind {
        match self {
            Self::Movie(_) => ShowKind::Movie,
            Self::Series(_) => ShowKind::Series,
        }
    }

    pub fn show_ref(&self) -> ShowRef {
        ShowRef::new(self.common().id, self.kind())
    }

    pub fn name(&self) -> &str {
        &self.common().name
    }

    pub fn summary(&self) -> ShowSummary {
        let common = self.common();
        ShowSummary {
            show: self.show_ref(),
            name: common.name.clone(),
            image_url: common.image_url.clone(),
            year: common.year.clone(),
            overview: common.overview.clone(),
        }
    }
}

/// A single episode of a series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub id: u64,
    pub series_id: u64,
    pub season_number: u32,
    pub number: u32,
    pub name: Option<String>,
    pub aired: Option<String>,
    pub image_url: Option<String>,
    pub runtime: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn common(id: u64) -> ShowCommon {
        ShowCommon {
            id,
            name: "Dune".into(),
            image_url: None,
            year: Some("2021".into()),
            overview: None,
            genres: vec![],
            artwork_urls: vec![],
        }
    }

    #[test]
    fn test_kind_db_str() {
        for kind in ShowKind::ALL {
            assert_eq!(ShowKind::from_db_str(kind.as_db_str()), Some(*kind));
        }
        assert_eq!(ShowKind::from_db_str("person"), None);
    }

    #[test]
    fn test_detail_kind_follows_variant() {
        let detail = ShowDetail::Series(SeriesDetail {
            common: common(42),
            first_aired: None,
            last_aired: None,
            status: None,
            average_runtime: None,
            season_count: Some(2),
        });
        assert_eq!(detail.show_ref(), ShowRef::series(42));
        assert_eq!(detail.summary().name, "Dune");
    }

    #[test]
    fn test_same_id_different_kind_are_distinct() {
        assert_ne!(ShowRef::movie(7), ShowRef::series(7));
    }

    #[test]
    fn test_detail_serializes_with_type_tag() {
        let detail = ShowDetail::Movie(MovieDetail {
            common: common(1),
            runtime: Some(155),
        });
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["type"], "movie");
        assert_eq!(json["runtime"], 155);
    }
}
