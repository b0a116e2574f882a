//! Upvote and thank the posts whose songs made it into the playlist.
//!
//! Young or low-karma accounts get throttled when commenting quickly, so
//! replies are spaced by a fixed delay.  No delay follows the last reply.

use std::time::Duration;

use log::info;

use crate::collaborator::Forum;
use crate::error::Result;

/// Default spacing between replies (10 minutes).
pub const DEFAULT_REPLY_DELAY: Duration = Duration::from_secs(60 * 10);

/// Thank-you text with a markdown link to the playlist.
pub fn reply_message(playlist_link: &str) -> String {
    format!(
        "Thanks for posting great music! Beep. Boop! Upvoted and added to a weekly [playlist]({}).\n\r\
         This bot parses through the top posts in this subreddit and posts them to a single spotify playlist. \
         Please upvote if you like the way it works, and message me questions or bug reports.",
        playlist_link
    )
}

/// Upvote and reply to each post in order, calling `sleep(delay)` between
/// consecutive posts.  Returns the number of posts answered.
pub fn announce<F>(
    forum: &mut dyn Forum,
    post_ids: &[String],
    message: &str,
    delay: Duration,
    mut sleep: F,
) -> Result<usize>
where
    F: FnMut(Duration),
{
    for (i, post_id) in post_ids.iter().enumerate() {
        info!("Posting reply on {}... {} of {}", forum.name(), i + 1, post_ids.len());
        forum.upvote(post_id)?;
        forum.reply(post_id, message)?;

        if i + 1 < post_ids.len() {
            sleep(delay);
        }
    }
    Ok(post_ids.len())
}
