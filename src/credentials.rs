//! API credentials for Reddit and Spotify.
//!
//! Read from the first file that exists of:
//!
//! * `playlistbot_credentials.toml` (working directory)
//! * `/etc/playlistbot/credentials.toml`
//! * `~/.config/playlistbot/credentials.toml`
//!
//! ```toml
//! [reddit]
//! client_id = "..."
//! client_secret = "..."
//! username = "..."        # only needed to upvote / reply
//! password = "..."
//! user_agent = "playlistbot/0.1 by u/someone"
//!
//! [spotify]
//! client_id = "..."
//! client_secret = "..."
//! refresh_token = "..."   # user token with playlist-modify-* scopes
//! user_id = "..."
//! ```

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Deserialize)]
pub struct RedditCredentials {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl RedditCredentials {
    /// Username and password, when both are set.  Without them the client
    /// can read listings but not vote or comment.
    pub fn account(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => Some((u.as_str(), p.as_str())),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotifyCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub refresh_token: String,
    pub user_id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub reddit: RedditCredentials,
    pub spotify: SpotifyCredentials,
}

fn default_user_agent() -> String {
    format!("playlistbot/{}", env!("CARGO_PKG_VERSION"))
}

/// Candidate file locations, most specific first.
pub fn search_paths() -> Vec<PathBuf> {
    let mut paths = vec![
        PathBuf::from("playlistbot_credentials.toml"),
        PathBuf::from("/etc/playlistbot/credentials.toml"),
    ];
    if let Some(home) = std::env::var_os("HOME") {
        paths.push(PathBuf::from(home).join(".config/playlistbot/credentials.toml"));
    }
    paths
}

impl Credentials {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load from `explicit` if given, otherwise from the first existing
    /// file in [`search_paths`].
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        let paths = search_paths();
        for path in &paths {
            if path.exists() {
                return Self::load_from(path);
            }
        }

        Err(Error::Config(format!(
            "no credentials file found (looked in {})",
            paths.iter().map(|p| p.display().to_string()).collect::<Vec<_>>().join(", ")
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SAMPLE: &str = r#"
[reddit]
client_id = "rid"
client_secret = "rsecret"
username = "bot"
password = "hunter2"

[spotify]
client_id = "sid"
client_secret = "ssecret"
refresh_token = "refresh"
user_id = "someone"
"#;

    #[test]
    fn test_parse_full_file() {
        let creds = Credentials::from_toml(SAMPLE).unwrap();
        assert_eq!(creds.reddit.client_id, "rid");
        assert_eq!(creds.reddit.account(), Some(("bot", "hunter2")));
        assert!(creds.reddit.user_agent.starts_with("playlistbot/"));
        assert_eq!(creds.spotify.user_id, "someone");
    }

    #[test]
    fn test_read_only_reddit_account() {
        let content = SAMPLE.replace("username = \"bot\"\n", "");
        let creds = Credentials::from_toml(&content).unwrap();
        assert_eq!(creds.reddit.account(), None);
    }

    #[test]
    fn test_missing_spotify_section_is_an_error() {
        let content = "[reddit]\nclient_id = \"a\"\nclient_secret = \"b\"\n";
        assert!(matches!(Credentials::from_toml(content), Err(Error::Toml(_))));
    }

    #[test]
    fn test_load_explicit_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SAMPLE.as_bytes()).unwrap();

        let creds = Credentials::load(Some(file.path())).unwrap();
        assert_eq!(creds.spotify.refresh_token, "refresh");
    }

    #[test]
    fn test_load_explicit_missing_path() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        assert!(matches!(Credentials::load(Some(missing.as_path())), Err(Error::Io(_))));
    }
}
