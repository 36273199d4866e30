mod auth;
mod batch;
mod client;
mod config;
mod data;
mod duration;
mod error;
mod paginate;
mod queries;
mod service;
#[cfg(test)]
mod testing;

use anyhow::Context;
use auth::{Authenticator, CredentialStore};
use client::{Auth, YouTubeClient};
use config::Config;
use data::TitleEntry;
use prettytable::{cell, row, Table};
use std::path::PathBuf;
use structopt::StructOpt;
use tracing::{info, Level};

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let opts = Opts::from_args();
    tracing_subscriber::fmt()
        .with_max_level(log_level(opts.verbose))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(&opts.config)
        .with_context(|| format!("failed to load {}", opts.config.display()))?;
    let client = connect(&opts, &config).await?;

    match &opts.cmd {
        Cmd::Duration {
            user,
            playlist,
            page_size,
        } => {
            let total = queries::total_duration(&client, user, playlist, *page_size)
                .await
                .with_context(|| format!("could not total playlist '{}'", playlist))?;
            println!("Total duration of '{}': {}", playlist, total);
        }
        Cmd::MostViewed {
            user,
            playlist,
            page_size,
        } => {
            let id = queries::most_viewed(&client, user, playlist, *page_size)
                .await
                .with_context(|| format!("could not rank playlist '{}'", playlist))?;
            println!("link to most popular video ID: {}", data::watch_url(&id));
        }
        Cmd::Titles {
            playlist,
            page_size,
            plain,
        } => {
            let ids = paginate::collect_video_ids(&client, playlist, *page_size).await?;
            info!("Found {} videos in playlist '{}'", ids.len(), playlist);
            if *plain {
                for title in batch::video_titles(&client, &ids).await? {
                    println!("{}", title);
                }
            } else {
                let records = batch::video_snippets(&client, &ids).await?;
                display_titles(records.into_iter().map(|record| {
                    TitleEntry::new(record.title.unwrap_or_default(), record.id)
                }));
            }
        }
        Cmd::Dump { playlist_id, part } => {
            let response = client.playlist_items_raw(playlist_id, part).await?;
            println!("{}", response.pretty(2));
            println!();
        }
    }
    Ok(())
}

/// Builds the API client. Listing a private playlist such as `LL` needs
/// OAuth; everything else can get by with the developer key.
async fn connect(opts: &Opts, config: &Config) -> anyhow::Result<YouTubeClient> {
    let needs_oauth = opts.oauth || matches!(opts.cmd, Cmd::Titles { .. });
    if needs_oauth {
        let secret = auth::load_client_secret(&config.client_secret).await?;
        let store = CredentialStore::new(config.token_cache.clone());
        let token = Authenticator::new(secret)
            .access_token(&store)
            .await
            .context("OAuth authorization failed")?;
        return Ok(YouTubeClient::new(Auth::Bearer(token)));
    }

    let key = match &opts.api_key {
        Some(key) => key.clone(),
        None => config.api_key()?.to_owned(),
    };
    Ok(YouTubeClient::new(Auth::ApiKey(key)))
}

fn display_titles(entries: impl Iterator<Item = TitleEntry>) {
    let mut table = Table::new();
    table.set_titles(row!["#", "Title", "Link"]);
    for (i, entry) in entries.enumerate() {
        table.add_row(entry.to_row(i));
    }
    table.printstd();
}

fn log_level(verbose: u8) -> Level {
    match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

#[derive(StructOpt, Debug)]
enum Cmd {
    /// Total running time of a user's playlist
    Duration {
        user: String,
        playlist: String,
        #[structopt(short, long, default_value = "50")]
        page_size: u32,
    },
    /// The most viewed video of a user's playlist
    MostViewed {
        user: String,
        playlist: String,
        #[structopt(short, long, default_value = "50")]
        page_size: u32,
    },
    /// Titles and links of a playlist's videos, liked videos by default (OAuth)
    Titles {
        #[structopt(long, default_value = "LL")]
        playlist: String,
        #[structopt(short, long, default_value = "10")]
        page_size: u32,
        /// One title per line instead of a table
        #[structopt(long)]
        plain: bool,
    },
    /// Pretty-print one raw playlistItems page
    Dump {
        playlist_id: String,
        #[structopt(long, default_value = "status")]
        part: String,
    },
}

#[derive(StructOpt, Debug)]
#[structopt(name = "yt-playlist-stats")]
struct Opts {
    #[structopt(short, long, default_value = "config/config.json", parse(from_os_str))]
    config: PathBuf,
    /// Overrides youtube.api_key from the config file
    #[structopt(long)]
    api_key: Option<String>,
    /// Authorize with OAuth instead of the developer key
    #[structopt(long)]
    oauth: bool,
    #[structopt(short, long, parse(from_occurrences))]
    verbose: u8,
    #[structopt(subcommand)]
    cmd: Cmd,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_duration_command() {
        let opts = Opts::from_iter(&[
            "yt-playlist-stats",
            "duration",
            "schafer5",
            "Pandas Tutorials",
        ]);
        match opts.cmd {
            Cmd::Duration {
                user,
                playlist,
                page_size,
            } => {
                assert_eq!(user, "schafer5");
                assert_eq!(playlist, "Pandas Tutorials");
                assert_eq!(page_size, 50);
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert_eq!(opts.config, PathBuf::from("config/config.json"));
        assert!(!opts.oauth);
    }

    #[test]
    fn test_titles_defaults_to_liked_videos() {
        let opts = Opts::from_iter(&["yt-playlist-stats", "-vv", "titles"]);
        assert_eq!(opts.verbose, 2);
        match opts.cmd {
            Cmd::Titles {
                playlist,
                page_size,
                plain,
            } => {
                assert_eq!(playlist, "LL");
                assert_eq!(page_size, 10);
                assert!(!plain);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_log_level() {
        assert_eq!(log_level(0), Level::WARN);
        assert_eq!(log_level(1), Level::INFO);
        assert_eq!(log_level(7), Level::TRACE);
    }
}
