use serde::{Deserialize, Deserializer};
use url::Url;

use showtrack_core::models::{
    Episode, MovieDetail, SeriesDetail, ShowCommon, ShowDetail, ShowKind, ShowRef, ShowSummary,
};

// ── Envelope ─────────────────────────────────────────────────────

/// Every TheTVDB v4 response wraps its payload in `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
    #[allow(dead_code)]
    pub status: Option<String>,
}

// ── Raw records ──────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct RawSummary {
    pub id: u64,
    pub name: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    pub overview: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawGenre {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct RawArtwork {
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawStatus {
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSeasonType {
    #[serde(rename = "type")]
    pub type_: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawSeason {
    pub number: Option<u32>,
    #[serde(rename = "type")]
    pub type_: Option<RawSeasonType>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMovieExtended {
    pub id: u64,
    pub name: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    pub overview: Option<String>,
    pub runtime: Option<u32>,
    #[serde(default)]
    pub genres: Option<Vec<RawGenre>>,
    #[serde(default)]
    pub artworks: Option<Vec<RawArtwork>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSeriesExtended {
    pub id: u64,
    pub name: Option<String>,
    pub image: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    pub overview: Option<String>,
    pub first_aired: Option<String>,
    pub last_aired: Option<String>,
    pub status: Option<RawStatus>,
    pub average_runtime: Option<u32>,
    #[serde(default)]
    pub genres: Option<Vec<RawGenre>>,
    #[serde(default)]
    pub artworks: Option<Vec<RawArtwork>>,
    #[serde(default)]
    pub seasons: Option<Vec<RawSeason>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawEpisode {
    pub id: u64,
    pub series_id: Option<u64>,
    pub name: Option<String>,
    pub aired: Option<String>,
    pub runtime: Option<u32>,
    pub season_number: Option<u32>,
    pub number: Option<u32>,
    pub image: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawEpisodesPage {
    #[serde(default)]
    pub episodes: Vec<RawEpisode>,
}

#[derive(Debug, Deserialize)]
pub struct RawSearchResult {
    pub tvdb_id: Option<String>,
    pub name: Option<String>,
    pub image_url: Option<String>,
    #[serde(rename = "type")]
    pub type_: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub year: Option<String>,
    pub overview: Option<String>,
}

// ── Image paths ──────────────────────────────────────────────────

/// Rewrite a catalog image path into an absolute URL under `artwork_base`.
///
/// Already-absolute URLs are returned unchanged; empty paths yield `None`.
pub fn absolute_image_url(artwork_base: &str, path: &str) -> Option<String> {
    let path = path.trim();
    if path.is_empty() {
        return None;
    }
    if Url::parse(path).is_ok() {
        return Some(path.to_string());
    }
    let base = artwork_base.trim_end_matches('/');
    let path = path.strip_prefix('/').unwrap_or(path);
    Some(format!("{base}/{path}"))
}

fn normalize(artwork_base: &str, path: Option<&str>) -> Option<String> {
    path.and_then(|p| absolute_image_url(artwork_base, p))
}

fn artwork_urls(artwork_base: &str, artworks: Option<Vec<RawArtwork>>) -> Vec<String> {
    artworks
        .unwrap_or_default()
        .into_iter()
        .filter_map(|a| normalize(artwork_base, a.image.as_deref()))
        .collect()
}

fn genre_names(genres: Option<Vec<RawGenre>>) -> Vec<String> {
    genres
        .unwrap_or_default()
        .into_iter()
        .map(|g| g.name)
        .collect()
}

// ── Conversions ──────────────────────────────────────────────────

impl RawSummary {
    pub fn into_summary(self, kind: ShowKind, artwork_base: &str) -> ShowSummary {
        let show = ShowRef::new(self.id, kind);
        ShowSummary {
            show,
            name: self
                .name
                .unwrap_or_else(|| ShowSummary::bare(show).name),
            image_url: normalize(artwork_base, self.image.as_deref()),
            year: self.year,
            overview: self.overview,
        }
    }
}

impl RawMovieExtended {
    pub fn into_detail(self, artwork_base: &str) -> ShowDetail {
        ShowDetail::Movie(MovieDetail {
            common: ShowCommon {
                id: self.id,
                name: self
                    .name
                    .unwrap_or_else(|| ShowSummary::bare(ShowRef::movie(self.id)).name),
                image_url: normalize(artwork_base, self.image.as_deref()),
                year: self.year,
                overview: self.overview,
                genres: genre_names(self.genres),
                artwork_urls: artwork_urls(artwork_base, self.artworks),
            },
            runtime: self.runtime,
        })
    }
}

impl RawSeriesExtended {
    pub fn into_detail(self, artwork_base: &str) -> ShowDetail {
        let season_count = self.seasons.as_ref().map(|seasons| {
            seasons
                .iter()
                .filter(|s| {
                    s.type_
                        .as_ref()
                        .and_then(|t| t.type_.as_deref())
                        .map_or(true, |t| t == "official")
                })
                .filter(|s| s.number.is_some_and(|n| n > 0))
                .count() as u32
        });

        ShowDetail::Series(SeriesDetail {
            common: ShowCommon {
                id: self.id,
                name: self
                    .name
                    .unwrap_or_else(|| ShowSummary::bare(ShowRef::series(self.id)).name),
                image_url: normalize(artwork_base, self.image.as_deref()),
                year: self.year,
                overview: self.overview,
                genres: genre_names(self.genres),
                artwork_urls: artwork_urls(artwork_base, self.artworks),
            },
            first_aired: self.first_aired,
            last_aired: self.last_aired,
            status: self.status.and_then(|s| s.name),
            average_runtime: self.average_runtime,
            season_count,
        })
    }
}

impl RawEpisode {
    pub fn into_episode(self, series_id: u64, artwork_base: &str) -> Episode {
        Episode {
            id: self.id,
            series_id: self.series_id.unwrap_or(series_id),
            season_number: self.season_number.unwrap_or(0),
            number: self.number.unwrap_or(0),
            name: self.name,
            aired: self.aired,
            image_url: normalize(artwork_base, self.image.as_deref()),
            runtime: self.runtime,
        }
    }
}

impl RawSearchResult {
    /// Convert to a summary; results that aren't movies or series yield `None`.
    pub fn into_summary(self, artwork_base: &str) -> Option<ShowSummary> {
        let kind = ShowKind::from_db_str(self.type_.as_deref()?)?;
        let id: u64 = self.tvdb_id.as_deref()?.parse().ok()?;
        let show = ShowRef::new(id, kind);
        Some(ShowSummary {
            show,
            name: self.name.unwrap_or_else(|| ShowSummary::bare(show).name),
            image_url: normalize(artwork_base, self.image_url.as_deref()),
            year: self.year,
            overview: self.overview,
        })
    }
}

/// TheTVDB returns `year` as a string on some endpoints and a number on others.
fn string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s),
        Some(serde_json::Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
