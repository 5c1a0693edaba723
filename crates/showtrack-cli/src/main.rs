use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand, ValueEnum};

use showtrack_core::config::AppConfig;
use showtrack_core::models::{Episode, ListKind, Rating, ShowKind, ShowRef, ShowSummary, WatchNote};
use showtrack_runtime::{AppContext, RuntimeError};

mod logging;
mod output;

#[derive(Parser)]
#[command(name = "showtrack")]
#[command(about = "Keep track of favorite, queued and watched movies and series")]
#[command(version)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create an account and sign in
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Password confirmation; must match --password
        #[arg(long)]
        confirm: String,
    },
    /// Sign in with an existing account
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out and forget the saved session
    Logout,
    /// Show the signed-in account
    Whoami,
    /// Replace the password of an account
    ResetPassword {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// List a page of movies or series, or the home feed when no kind is given
    Browse {
        kind: Option<KindArg>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Search the catalog
    Search {
        query: String,
        #[arg(long)]
        kind: Option<KindArg>,
    },
    /// Show extended details for one movie or series
    Show { kind: KindArg, id: u64 },
    /// List episodes of a series, marking the ones you've watched
    Episodes {
        series_id: u64,
        #[arg(long, default_value_t = 0)]
        page: u32,
    },
    /// Add a show to a list, or remove it if it's already there
    Toggle {
        list: ListArg,
        kind: KindArg,
        id: u64,
        /// Rating from 1 to 10 (watched list only)
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: Option<u8>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Mark a single episode watched, or unmark it
    Episode {
        series_id: u64,
        episode_id: u64,
        #[arg(long, default_value_t = 0)]
        season: u32,
        #[arg(long, default_value_t = 0)]
        number: u32,
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=10))]
        rating: Option<u8>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Which lists a show belongs to
    Status { kind: KindArg, id: u64 },
    /// Print your lists
    Lists { list: Option<ListArg> },
}

#[derive(Clone, Copy, ValueEnum)]
enum KindArg {
    Movie,
    Series,
}

impl From<KindArg> for ShowKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Movie => ShowKind::Movie,
            KindArg::Series => ShowKind::Series,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ListArg {
    Favorites,
    Watchlist,
    Watched,
}

impl From<ListArg> for ListKind {
    fn from(list: ListArg) -> Self {
        match list {
            ListArg::Favorites => ListKind::Favorite,
            ListArg::Watchlist => ListKind::Watchlist,
            ListArg::Watched => ListKind::Watched,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };
    let _log_guard = logging::init(&config.logging, cli.verbose);

    match run(cli, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "Command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, config: AppConfig) -> Result<(), RuntimeError> {
    // Lists are only hydrated by the commands that print them.
    let ctx = AppContext::open(config).await?;
    let json = cli.json;

    match cli.command {
        Command::Register {
            name,
            email,
            password,
            confirm,
        } => {
            let identity = ctx.register(&name, &email, &password, &confirm).await?;
            output::emit(json, &identity, output::identity);
        }
        Command::Login { email, password } => {
            let identity = ctx.login(&email, &password).await?;
            output::emit(json, &identity, output::identity);
            output::emit(json, &ctx.lists().counts(), output::counts);
        }
        Command::Logout => {
            ctx.logout();
            if !json {
                println!("Signed out.");
            }
        }
        Command::Whoami => {
            let identity = ctx
                .session()
                .current()
                .ok_or(RuntimeError::NotAuthenticated)?;
            output::emit(json, &identity, output::identity);
        }
        Command::ResetPassword { email, password } => {
            ctx.session().reset_password(&email, &password).await?;
            if !json {
                println!("Password updated for {email}.");
            }
        }
        Command::Browse { kind: None, .. } => {
            let feed = ctx.home().await?;
            output::emit(json, &feed, |feed| {
                println!("Movies");
                output::summaries(&feed.movies);
                println!();
                println!("Series");
                output::summaries(&feed.series);
            });
        }
        Command::Browse {
            kind: Some(kind),
            page,
        } => {
            let items = ctx.browse(kind.into(), page).await?;
            output::emit(json, items.as_slice(), output::summaries);
        }
        Command::Search { query, kind } => {
            let items = ctx.search(&query, kind.map(Into::into)).await?;
            output::emit(json, items.as_slice(), output::summaries);
        }
        Command::Show { kind, id } => {
            let show = ShowRef::new(id, kind.into());
            match ctx.details(show).await? {
                Some(detail) => output::emit(json, &detail, output::detail),
                None => return Err(RuntimeError::Catalog(format!("no details for {show}"))),
            }
        }
        Command::Episodes { series_id, page } => {
            let episodes = ctx.episodes(series_id, page).await?;
            output::emit(json, episodes.as_slice(), output::episodes);
            if !json && ctx.session().is_authenticated() {
                let watched = ctx.lists().watched_episodes(series_id).await?;
                if !watched.is_empty() {
                    println!();
                    println!("Watched");
                    output::watched_episodes(&watched);
                }
            }
        }
        Command::Toggle {
            list,
            kind,
            id,
            rating,
            notes,
        } => {
            let show = ShowRef::new(id, kind.into());
            let summary = summary_for(&ctx, show).await;
            let note = watch_note(rating, notes)?;
            let list: ListKind = list.into();
            let member = ctx.lists().toggle(list, &summary, note).await?;
            output::emit(json, &member, |member| {
                let verb = if *member { "Added to" } else { "Removed from" };
                println!("{verb} {list}: {}", summary.name);
            });
        }
        Command::Episode {
            series_id,
            episode_id,
            season,
            number,
            rating,
            notes,
        } => {
            let episode = Episode {
                id: episode_id,
                series_id,
                season_number: season,
                number,
                name: None,
                aired: None,
                image_url: None,
                runtime: None,
            };
            let watched = ctx
                .lists()
                .toggle_episode(&episode, watch_note(rating, notes)?)
                .await?;
            output::emit(json, &watched, |watched| {
                let state = if *watched { "watched" } else { "not watched" };
                println!("Episode {episode_id} of series {series_id} is now {state}.");
            });
        }
        Command::Status { kind, id } => {
            if !ctx.session().is_authenticated() {
                return Err(RuntimeError::NotAuthenticated);
            }
            let status = ctx.lists().check_all(ShowRef::new(id, kind.into())).await;
            output::emit(json, &status, output::status);
        }
        Command::Lists { list } => {
            if !ctx.session().is_authenticated() {
                return Err(RuntimeError::NotAuthenticated);
            }
            ctx.reload().await;
            if let Some(error) = ctx.lists().last_error() {
                tracing::warn!("Lists may be incomplete: {error}");
            }
            let lists: Vec<ListKind> = match list {
                Some(list) => vec![list.into()],
                None => ListKind::ALL.to_vec(),
            };
            for list in lists {
                let items = ctx.lists().items(list);
                output::emit(json, items.as_slice(), |items| {
                    output::list(list.as_str(), items)
                });
            }
        }
    }

    ctx.shutdown();
    Ok(())
}

/// Display fields for `show`, falling back to a bare reference when the catalog can't say.
async fn summary_for(ctx: &AppContext, show: ShowRef) -> ShowSummary {
    match ctx.details(show).await {
        Ok(Some(detail)) => detail.summary(),
        Ok(None) => ShowSummary::bare(show),
        Err(e) => {
            tracing::warn!(%show, "Catalog lookup failed: {e}");
            ShowSummary::bare(show)
        }
    }
}

fn watch_note(rating: Option<u8>, notes: Option<String>) -> Result<WatchNote, RuntimeError> {
    Ok(WatchNote {
        rating: rating.map(Rating::new).transpose()?,
        notes: notes.filter(|n| !n.trim().is_empty()),
    })
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_toggle_with_rating() {
        let cli = Cli::try_parse_from([
            "showtrack", "toggle", "watched", "movie", "42", "--rating", "8", "--notes", "rewatch",
        ])
        .unwrap();
        let Command::Toggle {
            list, kind, id, rating, ..
        } = cli.command
        else {
            panic!("expected toggle");
        };
        assert_eq!(ListKind::from(list), ListKind::Watched);
        assert_eq!(ShowKind::from(kind), ShowKind::Movie);
        assert_eq!((id, rating), (42, Some(8)));
    }

    #[test]
    fn test_rating_out_of_range_rejected() {
        assert!(Cli::try_parse_from([
            "showtrack", "toggle", "watched", "series", "7", "--rating", "11",
        ])
        .is_err());
    }

    #[test]
    fn test_watch_note_drops_blank_notes() {
        let note = watch_note(Some(3), Some("  ".into())).unwrap();
        assert_eq!(note.rating.map(Rating::get), Some(3));
        assert!(note.notes.is_none());
    }
}
