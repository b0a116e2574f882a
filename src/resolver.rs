//! Catalog resolution with progressively relaxed search.
//!
//! Artist names on the forum rarely match the catalog exactly (featuring
//! lists, "The" prefixes, locale variants), so the search is retried with
//! looser constraints:
//!
//! 1. [`Stage::Exact`]: title and full artist
//! 2. [`Stage::FirstArtistWord`]: title and first word of the artist
//!    (only when the artist has more than one word)
//! 3. [`Stage::TitleOnly`]: title alone
//!
//! The first stage with at least one hit wins and its top item is taken as
//! is; the catalog's relevance order is never re-ranked.

use std::fmt;

use log::debug;

use crate::collaborator::{Catalog, TrackQuery};
use crate::error::Result;

/// Which relaxation step produced the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Exact,
    FirstArtistWord,
    TitleOnly,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Exact => write!(f, "title + artist"),
            Stage::FirstArtistWord => write!(f, "title + first artist word"),
            Stage::TitleOnly => write!(f, "title only"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub track_id: String,
    pub stage: Stage,
}

/// The queries to try, in order.  An empty artist skips straight to the
/// title-only search.
pub fn search_plan(title: &str, artist: &str) -> Vec<(Stage, TrackQuery)> {
    let artist = artist.trim();
    let mut plan = Vec::with_capacity(3);

    if !artist.is_empty() {
        plan.push((Stage::Exact, TrackQuery::new(title, Some(artist))));

        if artist.contains(char::is_whitespace) {
            if let Some(first) = artist.split_whitespace().next() {
                plan.push((Stage::FirstArtistWord, TrackQuery::new(title, Some(first))));
            }
        }
    }

    plan.push((Stage::TitleOnly, TrackQuery::new(title, None)));
    plan
}

/// Run the search plan and report the winning stage.
/// Returns `Ok(None)` when every stage came back empty.
pub fn resolve_with_stage(
    catalog: &mut dyn Catalog,
    title: &str,
    artist: &str,
) -> Result<Option<Resolution>> {
    for (stage, query) in search_plan(title, artist) {
        let page = catalog.search(&query)?;
        debug!("[{}] \"{}\" -> {} hits", catalog.name(), query.to_query_string(), page.total);

        if page.is_empty() {
            continue;
        }
        if let Some(first) = page.items.into_iter().next() {
            debug!("[{}] Top hit: {} by {} ({})",
                   catalog.name(), first.name, first.artists.join(", "), first.id);
            return Ok(Some(Resolution { track_id: first.id, stage }));
        }
    }
    Ok(None)
}

/// Best catalog id for `title` by `artist`, or `None` if nothing matched.
pub fn resolve(catalog: &mut dyn Catalog, title: &str, artist: &str) -> Result<Option<String>> {
    Ok(resolve_with_stage(catalog, title, artist)?.map(|r| r.track_id))
}
