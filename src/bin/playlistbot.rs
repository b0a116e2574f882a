//! Build a dated playlist from the week's top posts and optionally thank
//! the posters.
//!
//! Usage:
//!   playlistbot [--subreddit NAME] [--time-filter week] [--score-threshold 70]
//!               [--post-replies | --no-post-replies] [--credentials FILE]
//!               [--save-defaults]

use std::path::PathBuf;
use std::process;
use std::thread;

use clap::Parser;
use log::error;

use playlistbot::{run_bot, Config, Credentials, RedditClient, SpotifyClient, TimeRange};

#[derive(Parser, Debug)]
#[command(name = "playlistbot")]
#[command(about = "Turn top forum posts into a deduplicated streaming playlist")]
#[command(version)]
struct Args {
    /// Community to read (without the /r/ prefix)
    #[arg(long)]
    subreddit: Option<String>,

    /// hour, day, week, month, year or all
    #[arg(long)]
    time_filter: Option<TimeRange>,

    /// Ignore posts scoring below this
    #[arg(long)]
    score_threshold: Option<i64>,

    /// Maximum number of posts to list (default: as many as the forum returns)
    #[arg(long)]
    limit: Option<u32>,

    /// Upvote and reply to posts whose songs were added
    #[arg(long)]
    post_replies: bool,

    /// Do not vote or reply, even if saved defaults enable it
    #[arg(long, conflicts_with = "post_replies")]
    no_post_replies: bool,

    /// Seconds to wait between replies
    #[arg(long)]
    reply_delay: Option<u64>,

    /// Description for newly created playlists
    #[arg(long)]
    description: Option<String>,

    /// Credentials file (default: search the usual locations)
    #[arg(long)]
    credentials: Option<PathBuf>,

    /// Save the given options as defaults (~/.state/playlistbot/defaults.toml)
    #[arg(long)]
    save_defaults: bool,

    /// Show saved defaults and exit
    #[arg(long)]
    show_saved_defaults: bool,

    /// Show built-in defaults and exit
    #[arg(long)]
    show_defaults: bool,
}

impl Args {
    /// `None` leaves the saved default in place.
    fn post_replies_override(&self) -> Option<bool> {
        if self.no_post_replies {
            Some(false)
        } else if self.post_replies {
            Some(true)
        } else {
            None
        }
    }

    fn to_config(&self) -> Config {
        Config {
            subreddit: self.subreddit.clone(),
            time_filter: self.time_filter,
            score_threshold: self.score_threshold,
            limit: self.limit,
            post_replies: self.post_replies_override(),
            reply_delay_secs: self.reply_delay,
            playlist_description: self.description.clone(),
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    if args.show_defaults {
        Config::builtin_defaults().print("Built-in defaults");
        return;
    }

    let saved_config = match Config::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Could not read saved defaults: {}", e);
            Config::new()
        }
    };

    if args.show_saved_defaults {
        match Config::get_config_path() {
            Ok(path) if path.exists() => saved_config.print("Saved defaults"),
            Ok(path) => {
                println!("No saved defaults file found at {:?}", path);
                println!("Use --save-defaults to create one.");
            }
            Err(e) => println!("Cannot locate defaults file: {}", e),
        }
        return;
    }

    let cmdline_config = args.to_config();

    if args.save_defaults {
        let mut config_to_save = saved_config.clone();
        config_to_save.merge(&cmdline_config);
        match config_to_save.save() {
            Ok(()) => {
                if let Ok(path) = Config::get_config_path() {
                    println!("Defaults saved to {:?}", path);
                }
                config_to_save.print("Saved configuration");
            }
            Err(e) => {
                eprintln!("Failed to save defaults: {}", e);
                process::exit(1);
            }
        }
    }

    let mut effective = saved_config;
    effective.merge(&cmdline_config);
    let options = effective.to_run_options();

    let creds = match Credentials::load(args.credentials.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!("Connecting to Spotify...");
    let mut spotify = match SpotifyClient::connect(&creds.spotify) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    println!("Connecting to Reddit...");
    let mut reddit = match RedditClient::connect(&creds.reddit) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let today = chrono::Local::now().date_naive();

    match run_bot(&mut reddit, &mut spotify, &options, today, thread::sleep) {
        Ok(summary) => {
            println!();
            println!("Playlist:        {} ({})", summary.playlist_name, summary.playlist_id);
            println!("Posts scanned:   {}", summary.stats.posts);
            println!("Songs found:     {}", summary.stats.resolved);
            println!("Not found:       {}", summary.stats.not_found);
            println!("Skipped:         {}", summary.stats.skipped);
            println!("Unparseable:     {}", summary.stats.parse_failures);
            println!("Added:           {}", summary.added);
            if options.post_replies {
                println!("Replies posted:  {}", summary.announced);
            }
        }
        Err(e) => {
            eprintln!("Run aborted: {}", e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("playlistbot").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_post_replies_flags() {
        assert_eq!(parse(&[]).to_config().post_replies, None);
        assert_eq!(parse(&["--post-replies"]).to_config().post_replies, Some(true));
        assert_eq!(parse(&["--no-post-replies"]).to_config().post_replies, Some(false));
    }

    #[test]
    fn test_no_post_replies_overrides_saved_default() {
        let mut saved = Config::new();
        saved.post_replies = Some(true);
        saved.merge(&parse(&["--no-post-replies"]).to_config());
        assert!(!saved.to_run_options().post_replies);
    }

    #[test]
    fn test_post_reply_flags_conflict() {
        let result = Args::try_parse_from(["playlistbot", "--post-replies", "--no-post-replies"]);
        assert!(result.is_err());
    }
}
