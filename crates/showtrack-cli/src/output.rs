use serde::Serialize;

use showtrack_core::models::{Episode, Identity, ShowDetail, ShowSummary, WatchedEpisode};
use showtrack_runtime::{ListCounts, ListItem, ListStatus};

/// Print `value` as pretty JSON when `json` is set, otherwise with `human`.
pub fn emit<T: Serialize + ?Sized>(json: bool, value: &T, human: impl FnOnce(&T)) {
    if json {
        match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{s}"),
            Err(e) => eprintln!("failed to encode output: {e}"),
        }
    } else {
        human(value);
    }
}

pub fn identity(identity: &Identity) {
    println!("{} <{}>", identity.name, identity.email);
    println!("  id:      {}", identity.id);
    println!("  since:   {}", identity.created_at.format("%Y-%m-%d"));
}

pub fn summaries(items: &[ShowSummary]) {
    if items.is_empty() {
        println!("(nothing found)");
        return;
    }
    for item in items {
        let year = item.year.as_deref().unwrap_or("----");
        println!("{:<14} {year}  {}", item.show.to_string(), item.name);
    }
}

pub fn detail(detail: &ShowDetail) {
    let common = detail.common();
    println!("{} [{}]", common.name, detail.show_ref());
    if let Some(year) = &common.year {
        println!("  year:     {year}");
    }
    if !common.genres.is_empty() {
        println!("  genres:   {}", common.genres.join(", "));
    }
    match detail {
        ShowDetail::Movie(movie) => {
            if let Some(runtime) = movie.runtime {
                println!("  runtime:  {runtime} min");
            }
        }
        ShowDetail::Series(series) => {
            if let Some(status) = &series.status {
                println!("  status:   {status}");
            }
            if let Some(seasons) = series.season_count {
                println!("  seasons:  {seasons}");
            }
            if let (Some(first), last) = (&series.first_aired, &series.last_aired) {
                println!("  aired:    {first} .. {}", last.as_deref().unwrap_or("now"));
            }
        }
    }
    if let Some(image) = &common.image_url {
        println!("  image:    {image}");
    }
    if let Some(overview) = &common.overview {
        println!();
        println!("{overview}");
    }
}

pub fn episodes(episodes: &[Episode]) {
    for ep in episodes {
        println!(
            "S{:02}E{:02}  #{:<9} {}",
            ep.season_number,
            ep.number,
            ep.id,
            ep.name.as_deref().unwrap_or("")
        );
    }
}

pub fn watched_episodes(episodes: &[WatchedEpisode]) {
    for ep in episodes {
        println!(
            "S{:02}E{:02}  #{:<9} {}",
            ep.season_number,
            ep.episode_number,
            ep.episode_id,
            ep.watched_at.format("%Y-%m-%d")
        );
    }
}

pub fn status(status: &ListStatus) {
    let mark = |b: bool| if b { "yes" } else { "no" };
    println!("favorite:  {}", mark(status.favorite));
    println!("watchlist: {}", mark(status.watchlist));
    println!("watched:   {}", mark(status.watched));
}

pub fn list(title: &str, items: &[ListItem]) {
    println!("{title} ({})", items.len());
    for item in items {
        let rating = item
            .rating
            .map(|r| format!("  {}/10", r.get()))
            .unwrap_or_default();
        println!("  {:<14} {}{rating}", item.show.to_string(), item.name);
        if let Some(notes) = &item.notes {
            println!("                 {notes}");
        }
    }
}

pub fn counts(counts: &ListCounts) {
    println!(
        "favorites: {}  watchlist: {}  watched: {}",
        counts.favorites, counts.watchlist, counts.watched
    );
}
