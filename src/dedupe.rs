//! Playlist delta: which resolved tracks still need adding.

use std::collections::HashSet;

use crate::pipeline::ResolvedTrack;

/// Tracks from `resolved` whose id is neither in `existing` nor already
/// taken earlier in `resolved`.  Exact id comparison, order preserved.
pub fn playlist_delta(existing: &HashSet<String>, resolved: &[ResolvedTrack]) -> Vec<ResolvedTrack> {
    let mut seen: HashSet<&str> = existing.iter().map(String::as_str).collect();
    let mut delta = Vec::new();

    for track in resolved {
        if seen.insert(track.catalog_track_id.as_str()) {
            delta.push(track.clone());
        }
    }
    delta
}
