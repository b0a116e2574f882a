//! Headline parser: turns a post title such as
//! `"Black Dog - Led Zeppelin [Classic Rock] (1975)"` into a [`ParsedCandidate`].
//!
//! Only literal delimiter and bracket matching is done.  Titles that do not
//! follow `<First> <sep> <Second> [<genre>] (<year>)` fail with
//! [`ParseError::NoSeparatorFound`]; administrative posts (discussion threads,
//! over-long segments) come back as [`TitleParse::Skip`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::fmt;

use crate::error::ParseError;

/// Segments longer than this (in characters) mark a non-music post.
pub const MAX_SEGMENT_CHARS: usize = 75;

/// Value the legacy bot wrote into both fields of a skipped headline.
/// Only surfaced through [`TitleParse::legacy_fields`].
pub const ABORT_SENTINEL: &str = "Abort6618031111";

/// Two word-led segments around a dash-like separator (`-`, `|`, `–`, `—`).
/// The second segment stops at the first `[` or `(`.
static SEGMENTS: Lazy<Regex> = Lazy::new(||
    Regex::new(r"(\w[^\-|–—]*)[\-|–—][\-|–—\s]*(\w[^\[(]*)").unwrap()
);

/// Four digits right after an opening bracket: `(1975)`, `[2019 remaster]`.
static YEAR: Lazy<Regex> = Lazy::new(||
    Regex::new(r"[\[(]([0-9]{4})").unwrap()
);

/// Digit-free text inside a matching `[...]` or `(...)` pair.
static GENRE: Lazy<Regex> = Lazy::new(||
    Regex::new(r"\[([^\]\d]+)\]|\(([^)\d]+)\)").unwrap()
);

/// Song metadata extracted from one headline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedCandidate {
    /// Second segment of the headline
    pub title: String,
    /// First segment of the headline
    pub artist: String,
    pub genre: Option<String>,
    /// Always four ASCII digits when present
    pub year: Option<String>,
}

/// Why a headline that did split was still rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// Title mentions "discussion" (weekly threads, megathreads)
    DiscussionThread,
    TrackTooLong,
    ArtistTooLong,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::DiscussionThread => write!(f, "discussion thread"),
            SkipReason::TrackTooLong => write!(f, "track longer than {} characters", MAX_SEGMENT_CHARS),
            SkipReason::ArtistTooLong => write!(f, "artist longer than {} characters", MAX_SEGMENT_CHARS),
        }
    }
}

/// Outcome of a successful split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TitleParse {
    Candidate(ParsedCandidate),
    /// Administrative or malformed post; must never be resolved.
    Skip(SkipReason),
}

impl TitleParse {
    pub fn candidate(&self) -> Option<&ParsedCandidate> {
        match self {
            TitleParse::Candidate(c) => Some(c),
            TitleParse::Skip(_) => None,
        }
    }

    /// `(title, artist)` as the legacy bot reported them: the real values for
    /// a candidate, [`ABORT_SENTINEL`] twice for a skip.
    pub fn legacy_fields(&self) -> (&str, &str) {
        match self {
            TitleParse::Candidate(c) => (&c.title, &c.artist),
            TitleParse::Skip(_) => (ABORT_SENTINEL, ABORT_SENTINEL),
        }
    }
}

/// Parse one headline.
///
/// The first segment is stored as `artist` and the second as `title`, which
/// is the order the forum's posting rules ask for ("Artist - Track").
pub fn parse_title(raw: &str) -> Result<TitleParse, ParseError> {
    let caps = SEGMENTS.captures(raw).ok_or(ParseError::NoSeparatorFound)?;
    let artist = caps[1].trim();
    let track = caps[2].trim();

    let year = YEAR.captures(raw).map(|c| c[1].to_string());

    let genre = GENRE.captures(raw)
        .and_then(|c| c.get(1).or_else(|| c.get(2)))
        .map(|m| m.as_str().trim())
        .filter(|g| !g.is_empty())
        .map(str::to_string);

    if raw.to_lowercase().contains("discussion") {
        return Ok(TitleParse::Skip(SkipReason::DiscussionThread));
    }
    if track.chars().count() > MAX_SEGMENT_CHARS {
        return Ok(TitleParse::Skip(SkipReason::TrackTooLong));
    }
    if artist.chars().count() > MAX_SEGMENT_CHARS {
        return Ok(TitleParse::Skip(SkipReason::ArtistTooLong));
    }

    Ok(TitleParse::Candidate(ParsedCandidate {
        title: track.to_string(),
        artist: artist.to_string(),
        genre,
        year,
    }))
}
