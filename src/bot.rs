//! One complete run: forum → pipeline → playlist → (optional) replies.

use std::time::Duration;

use chrono::NaiveDate;
use log::info;

use crate::announce::{announce, reply_message};
use crate::collaborator::{Catalog, Forum, TimeRange};
use crate::error::Result;
use crate::pipeline::{self, RunStats};
use crate::playlist::{ensure_playlist, playlist_name, sync_playlist};

/// Effective settings for a run (built from [`crate::Config`] in the binary).
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub community: String,
    pub time_range: TimeRange,
    pub score_threshold: i64,
    /// `None` lists as many posts as the forum allows
    pub limit: Option<u32>,
    pub post_replies: bool,
    pub reply_delay: Duration,
    pub playlist_description: String,
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub playlist_id: String,
    pub playlist_name: String,
    pub stats: RunStats,
    pub added: usize,
    pub announced: usize,
}

/// Run the bot once for `today`.  `sleep` paces the forum replies.
pub fn run_bot<F>(
    forum: &mut dyn Forum,
    catalog: &mut dyn Catalog,
    options: &RunOptions,
    today: NaiveDate,
    sleep: F,
) -> Result<RunSummary>
where
    F: FnMut(Duration),
{
    info!("Gathering top posts from {} (/r/{}, {})...", forum.name(), options.community, options.time_range);
    let posts = forum.top_posts(&options.community, options.time_range, options.limit)?;
    let listed = posts.len();
    let posts = pipeline::select_posts(posts, options.score_threshold);
    info!("{} of {} posts have a score of at least {}", posts.len(), listed, options.score_threshold);

    info!("Searching for songs on {}...", catalog.name());
    let report = pipeline::run(catalog, &posts)?;

    let name = playlist_name(&options.community, today);
    let playlist_id = ensure_playlist(catalog, &name, &options.playlist_description)?;
    let added = sync_playlist(catalog, &playlist_id, &report.tracks)?;

    let announced = if options.post_replies && !added.is_empty() {
        let link = catalog.playlist_url(&playlist_id)?;
        let message = reply_message(&link);
        let post_ids: Vec<String> = added.iter().map(|t| t.source_post_id.clone()).collect();
        announce(forum, &post_ids, &message, options.reply_delay, sleep)?
    } else {
        0
    };

    Ok(RunSummary {
        playlist_id,
        playlist_name: name,
        stats: report.stats,
        added: added.len(),
        announced,
    })
}
