use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::announce::DEFAULT_REPLY_DELAY;
use crate::bot::RunOptions;
use crate::collaborator::TimeRange;
use crate::error::{Error, Result};
use crate::playlist::DEFAULT_DESCRIPTION;

/// Run defaults that can be saved to a file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subreddit: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_filter: Option<TimeRange>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub score_threshold: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_replies: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_delay_secs: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub playlist_description: Option<String>,
}

impl Config {
    /// Create a new empty config
    pub fn new() -> Self {
        Self::default()
    }

    /// Values used when neither the saved file nor the command line set them
    pub fn builtin_defaults() -> Self {
        Config {
            subreddit: Some("ListenToThis".to_string()),
            time_filter: Some(TimeRange::Week),
            score_threshold: Some(70),
            limit: None,
            post_replies: Some(false),
            reply_delay_secs: Some(DEFAULT_REPLY_DELAY.as_secs()),
            playlist_description: Some(DEFAULT_DESCRIPTION.to_string()),
        }
    }

    /// Get the config file path (~/.state/playlistbot/defaults.toml)
    pub fn get_config_path() -> std::result::Result<PathBuf, io::Error> {
        let home = std::env::var("HOME")
            .map_err(|_| io::Error::new(io::ErrorKind::NotFound, "HOME environment variable not set"))?;

        let config_dir = Path::new(&home).join(".state").join("playlistbot");
        Ok(config_dir.join("defaults.toml"))
    }

    /// Load config from the default path; a missing file is an empty config
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::get_config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::new());
        }

        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save config to the default path
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::get_config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(e.to_string()))?;
        fs::write(path, toml_string)?;

        Ok(())
    }

    /// Merge this config with another, preferring values from other
    pub fn merge(&mut self, other: &Config) {
        if other.subreddit.is_some() {
            self.subreddit = other.subreddit.clone();
        }
        if other.time_filter.is_some() {
            self.time_filter = other.time_filter;
        }
        if other.score_threshold.is_some() {
            self.score_threshold = other.score_threshold;
        }
        if other.limit.is_some() {
            self.limit = other.limit;
        }
        if other.post_replies.is_some() {
            self.post_replies = other.post_replies;
        }
        if other.reply_delay_secs.is_some() {
            self.reply_delay_secs = other.reply_delay_secs;
        }
        if other.playlist_description.is_some() {
            self.playlist_description = other.playlist_description.clone();
        }
    }

    /// Resolve into run options, filling gaps from [`Config::builtin_defaults`]
    pub fn to_run_options(&self) -> RunOptions {
        let mut effective = Config::builtin_defaults();
        effective.merge(self);

        RunOptions {
            community: effective.subreddit.unwrap_or_else(|| "ListenToThis".to_string()),
            time_range: effective.time_filter.unwrap_or(TimeRange::Week),
            score_threshold: effective.score_threshold.unwrap_or(0),
            limit: effective.limit,
            post_replies: effective.post_replies.unwrap_or(false),
            reply_delay: effective.reply_delay_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_REPLY_DELAY),
            playlist_description: effective.playlist_description
                .unwrap_or_else(|| DEFAULT_DESCRIPTION.to_string()),
        }
    }

    /// Print the config in a human-readable format
    pub fn print(&self, title: &str) {
        println!("{}:", title);

        if let Some(subreddit) = &self.subreddit {
            println!("  Subreddit:          /r/{}", subreddit);
        }
        if let Some(time_filter) = self.time_filter {
            println!("  Time filter:        {}", time_filter);
        }
        if let Some(score_threshold) = self.score_threshold {
            println!("  Score threshold:    {}", score_threshold);
        }
        if let Some(limit) = self.limit {
            println!("  Post limit:         {}", limit);
        }
        if let Some(post_replies) = self.post_replies {
            println!("  Forum replies:      {}", if post_replies { "enabled" } else { "disabled" });
        }
        if let Some(reply_delay_secs) = self.reply_delay_secs {
            println!("  Reply delay:        {} seconds", reply_delay_secs);
        }
        if let Some(description) = &self.playlist_description {
            println!("  Description:        {}", description);
        }
    }
}
