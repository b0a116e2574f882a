//! Seams to the two external services.
//!
//! The [`Forum`] trait covers the link-aggregation site the headlines come
//! from, the [`Catalog`] trait the streaming service that owns tracks and
//! playlists.  Implementations live in separate modules:
//!
//! * [`crate::reddit::RedditClient`]
//! * [`crate::spotify::SpotifyClient`]
//!
//! Every component takes its collaborator as an explicit argument, so tests
//! drive the whole run through in-memory fakes.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Result;

// ── Forum types ──────────────────────────────────────────────────────────────

/// One post as listed by the forum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    /// Opaque post id (without the `t3_` kind prefix)
    pub id: String,
    pub title: String,
    pub score: i64,
}

/// Window for the forum's "top" listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeRange {
    Hour,
    Day,
    Week,
    Month,
    Year,
    All,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::Hour => "hour",
            TimeRange::Day => "day",
            TimeRange::Week => "week",
            TimeRange::Month => "month",
            TimeRange::Year => "year",
            TimeRange::All => "all",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hour" => Ok(TimeRange::Hour),
            "day" => Ok(TimeRange::Day),
            "week" => Ok(TimeRange::Week),
            "month" => Ok(TimeRange::Month),
            "year" => Ok(TimeRange::Year),
            "all" => Ok(TimeRange::All),
            other => Err(format!(
                "unknown time range '{}' (expected hour, day, week, month, year or all)",
                other
            )),
        }
    }
}

// ── Catalog types ────────────────────────────────────────────────────────────

/// A track search.  `artist == None` means no artist constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackQuery {
    pub title: String,
    pub artist: Option<String>,
}

impl TrackQuery {
    pub fn new(title: &str, artist: Option<&str>) -> Self {
        TrackQuery {
            title: title.to_string(),
            artist: artist.map(str::to_string),
        }
    }

    /// Field-filter query string, e.g. `track:Black Dog artist:Led Zeppelin`.
    pub fn to_query_string(&self) -> String {
        match &self.artist {
            Some(artist) => format!("track:{} artist:{}", self.title, artist),
            None => format!("track:{}", self.title),
        }
    }
}

/// One search hit, in the catalog's own relevance order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTrack {
    pub id: String,
    pub name: String,
    pub artists: Vec<String>,
}

/// First page of a search plus the catalog's total hit count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub items: Vec<CatalogTrack>,
    pub total: u64,
}

impl SearchPage {
    pub fn is_empty(&self) -> bool {
        self.total == 0 || self.items.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistSummary {
    pub id: String,
    pub name: String,
}

// ── Traits ───────────────────────────────────────────────────────────────────

/// The forum the headlines are read from.
pub trait Forum {
    /// Short display name, e.g. "Reddit".
    fn name(&self) -> &str;

    /// Top posts of `community` in `time_range`, best first.
    /// `limit == None` asks for as many as the forum will list.
    fn top_posts(
        &mut self,
        community: &str,
        time_range: TimeRange,
        limit: Option<u32>,
    ) -> Result<Vec<RawPost>>;

    fn upvote(&mut self, post_id: &str) -> Result<()>;

    fn reply(&mut self, post_id: &str, message: &str) -> Result<()>;
}

/// The streaming service tracks are resolved against.
pub trait Catalog {
    /// Short display name, e.g. "Spotify".
    fn name(&self) -> &str;

    fn search(&mut self, query: &TrackQuery) -> Result<SearchPage>;

    /// Ids of every track currently in the playlist.
    fn playlist_tracks(&mut self, playlist_id: &str) -> Result<HashSet<String>>;

    /// Create a playlist and return its id.
    fn create_playlist(&mut self, name: &str, description: &str) -> Result<String>;

    fn list_playlists(&mut self) -> Result<Vec<PlaylistSummary>>;

    fn add_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> Result<()>;

    /// Public link to the playlist, used in forum replies.
    fn playlist_url(&mut self, playlist_id: &str) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_range_from_str() {
        assert_eq!("week".parse::<TimeRange>(), Ok(TimeRange::Week));
        assert_eq!("ALL".parse::<TimeRange>(), Ok(TimeRange::All));
        assert!("fortnight".parse::<TimeRange>().is_err());
        assert_eq!(TimeRange::Month.to_string(), "month");
    }

    #[test]
    fn test_query_string() {
        let q = TrackQuery::new("Black Dog", Some("Led Zeppelin"));
        assert_eq!(q.to_query_string(), "track:Black Dog artist:Led Zeppelin");

        let q = TrackQuery::new("Black Dog", None);
        assert_eq!(q.to_query_string(), "track:Black Dog");
    }

    #[test]
    fn test_empty_search_page() {
        assert!(SearchPage::default().is_empty());
        let page = SearchPage {
            items: vec![CatalogTrack {
                id: "x".into(),
                name: "X".into(),
                artists: vec![],
            }],
            total: 1,
        };
        assert!(!page.is_empty());
    }
}
