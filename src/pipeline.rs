//! Batch pipeline: headline → candidate → catalog id, one post at a time.

use log::{debug, info};
use serde::Serialize;

use crate::collaborator::{Catalog, RawPost};
use crate::error::Result;
use crate::resolver;
use crate::title_parser::{parse_title, ParsedCandidate, TitleParse};

/// A post whose headline was matched to a catalog track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTrack {
    pub catalog_track_id: String,
    /// Post the track came from; replies go here.
    pub source_post_id: String,
    pub candidate: ParsedCandidate,
}

/// Per-run counters.  Reported, never used for control flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunStats {
    pub posts: usize,
    pub parse_failures: usize,
    /// Administrative posts (discussion threads, over-long segments)
    pub skipped: usize,
    pub not_found: usize,
    pub resolved: usize,
}

#[derive(Debug, Clone, Default)]
pub struct BatchReport {
    /// In post order
    pub tracks: Vec<ResolvedTrack>,
    pub stats: RunStats,
}

/// Keep posts scoring at least `score_threshold`, preserving order.
pub fn select_posts(posts: Vec<RawPost>, score_threshold: i64) -> Vec<RawPost> {
    posts.into_iter()
        .filter(|p| p.score >= score_threshold)
        .collect()
}

/// Parse and resolve every post in order.
///
/// Unparseable headlines, administrative posts and catalog misses are
/// counted and skipped; only collaborator errors end the run early.
pub fn run(catalog: &mut dyn Catalog, posts: &[RawPost]) -> Result<BatchReport> {
    let mut report = BatchReport::default();
    report.stats.posts = posts.len();

    for post in posts {
        let candidate = match parse_title(&post.title) {
            Ok(TitleParse::Candidate(c)) => c,
            Ok(TitleParse::Skip(reason)) => {
                debug!("Skipping post {} ({}): \"{}\"", post.id, reason, post.title);
                report.stats.skipped += 1;
                continue;
            }
            Err(e) => {
                info!("Could not parse post {}: {} (\"{}\")", post.id, e, post.title);
                report.stats.parse_failures += 1;
                continue;
            }
        };

        debug!("Searching ... {} by {}", candidate.title.to_uppercase(), candidate.artist.to_uppercase());

        match resolver::resolve_with_stage(catalog, &candidate.title, &candidate.artist)? {
            Some(resolution) => {
                info!("Found {} - {} -> {} ({})",
                      candidate.artist, candidate.title, resolution.track_id, resolution.stage);
                report.tracks.push(ResolvedTrack {
                    catalog_track_id: resolution.track_id,
                    source_post_id: post.id.clone(),
                    candidate,
                });
                report.stats.resolved += 1;
            }
            None => {
                info!("Not found: {} - {}", candidate.artist, candidate.title);
                report.stats.not_found += 1;
            }
        }
    }

    info!(
        "Batch done: {} posts, {} resolved, {} not found, {} skipped, {} unparseable",
        report.stats.posts,
        report.stats.resolved,
        report.stats.not_found,
        report.stats.skipped,
        report.stats.parse_failures
    );

    Ok(report)
}
