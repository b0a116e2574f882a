//! Dated playlist lookup/creation and applying the delta.

use chrono::NaiveDate;
use log::info;

use crate::collaborator::Catalog;
use crate::dedupe::playlist_delta;
use crate::error::Result;
use crate::pipeline::ResolvedTrack;

pub const DEFAULT_DESCRIPTION: &str =
    "A weekly playlist that takes the top songs of the week on /r/ListenToThis and puts them into a single playlist";

/// `/r/<community>_<YYMMDD>`, e.g. `/r/ListenToThis_261016`.
pub fn playlist_name(community: &str, date: NaiveDate) -> String {
    format!("/r/{}_{}", community, date.format("%y%m%d"))
}

/// Id of the first playlist named exactly `name`, creating it when missing.
pub fn ensure_playlist(catalog: &mut dyn Catalog, name: &str, description: &str) -> Result<String> {
    if let Some(existing) = catalog.list_playlists()?.into_iter().find(|p| p.name == name) {
        info!("Using existing playlist {} ({})", name, existing.id);
        return Ok(existing.id);
    }

    info!("Creating {} playlist on {}", name, catalog.name());
    catalog.create_playlist(name, description)
}

/// Add the tracks not yet in the playlist and return them, in post order.
pub fn sync_playlist(
    catalog: &mut dyn Catalog,
    playlist_id: &str,
    resolved: &[ResolvedTrack],
) -> Result<Vec<ResolvedTrack>> {
    let existing = catalog.playlist_tracks(playlist_id)?;
    let delta = playlist_delta(&existing, resolved);

    if delta.is_empty() {
        info!("Playlist {} already has all {} tracks", playlist_id, resolved.len());
        return Ok(delta);
    }

    let ids: Vec<String> = delta.iter().map(|t| t.catalog_track_id.clone()).collect();
    catalog.add_tracks(playlist_id, &ids)?;
    info!("Added {} of {} tracks to playlist {}", delta.len(), resolved.len(), playlist_id);

    Ok(delta)
}
