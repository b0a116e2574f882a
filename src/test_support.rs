//! In-memory collaborators shared by the unit tests.

use std::collections::{HashMap, HashSet};

use crate::collaborator::{
    Catalog, CatalogTrack, Forum, PlaylistSummary, RawPost, SearchPage, TimeRange, TrackQuery,
};
use crate::error::{Error, Result};

pub fn track(id: &str) -> CatalogTrack {
    CatalogTrack {
        id: id.to_string(),
        name: format!("Track {}", id),
        artists: vec![],
    }
}

pub fn post(id: &str, title: &str, score: i64) -> RawPost {
    RawPost {
        id: id.to_string(),
        title: title.to_string(),
        score,
    }
}

/// Catalog keyed by query string; unknown queries return no hits.
#[derive(Default)]
pub struct FakeCatalog {
    pub results: HashMap<String, Vec<CatalogTrack>>,
    pub searches: Vec<TrackQuery>,
    pub playlists: Vec<(PlaylistSummary, Vec<String>)>,
    pub add_calls: Vec<(String, Vec<String>)>,
    pub fail_searches: bool,
}

impl FakeCatalog {
    pub fn with_result(mut self, query: &str, ids: &[&str]) -> Self {
        self.results.insert(query.to_string(), ids.iter().map(|id| track(id)).collect());
        self
    }

    pub fn with_playlist(mut self, id: &str, name: &str, tracks: &[&str]) -> Self {
        self.playlists.push((
            PlaylistSummary { id: id.to_string(), name: name.to_string() },
            tracks.iter().map(|t| t.to_string()).collect(),
        ));
        self
    }

    pub fn search_strings(&self) -> Vec<String> {
        self.searches.iter().map(|q| q.to_query_string()).collect()
    }

    pub fn tracks_of(&self, playlist_id: &str) -> Vec<String> {
        self.playlists.iter()
            .find(|(p, _)| p.id == playlist_id)
            .map(|(_, t)| t.clone())
            .unwrap_or_default()
    }
}

impl Catalog for FakeCatalog {
    fn name(&self) -> &str {
        "Fake catalog"
    }

    fn search(&mut self, query: &TrackQuery) -> Result<SearchPage> {
        self.searches.push(query.clone());
        if self.fail_searches {
            return Err(Error::Http { service: "Fake", status: 401, body: "expired".into() });
        }
        let items = self.results.get(&query.to_query_string()).cloned().unwrap_or_default();
        Ok(SearchPage { total: items.len() as u64, items })
    }

    fn playlist_tracks(&mut self, playlist_id: &str) -> Result<HashSet<String>> {
        Ok(self.tracks_of(playlist_id).into_iter().collect())
    }

    fn create_playlist(&mut self, name: &str, _description: &str) -> Result<String> {
        let id = format!("pl{}", self.playlists.len() + 1);
        self.playlists.push((PlaylistSummary { id: id.clone(), name: name.to_string() }, vec![]));
        Ok(id)
    }

    fn list_playlists(&mut self) -> Result<Vec<PlaylistSummary>> {
        Ok(self.playlists.iter().map(|(p, _)| p.clone()).collect())
    }

    fn add_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        self.add_calls.push((playlist_id.to_string(), track_ids.to_vec()));
        let entry = self.playlists.iter_mut()
            .find(|(p, _)| p.id == playlist_id)
            .ok_or_else(|| Error::Http { service: "Fake", status: 404, body: playlist_id.into() })?;
        entry.1.extend(track_ids.iter().cloned());
        Ok(())
    }

    fn playlist_url(&mut self, playlist_id: &str) -> Result<String> {
        Ok(format!("https://example.test/playlist/{}", playlist_id))
    }
}

#[derive(Default)]
pub struct FakeForum {
    pub posts: Vec<RawPost>,
    pub upvotes: Vec<String>,
    pub replies: Vec<(String, String)>,
}

impl Forum for FakeForum {
    fn name(&self) -> &str {
        "Fake forum"
    }

    fn top_posts(&mut self, _community: &str, _range: TimeRange, limit: Option<u32>) -> Result<Vec<RawPost>> {
        let n = limit.map(|l| l as usize).unwrap_or(self.posts.len());
        Ok(self.posts.iter().take(n).cloned().collect())
    }

    fn upvote(&mut self, post_id: &str) -> Result<()> {
        self.upvotes.push(post_id.to_string());
        Ok(())
    }

    fn reply(&mut self, post_id: &str, message: &str) -> Result<()> {
        self.replies.push((post_id.to_string(), message.to_string()));
        Ok(())
    }
}
