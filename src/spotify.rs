//! Spotify Web API client implementing [`Catalog`].
//!
//! Authentication uses a long-lived refresh token (obtained once through
//! the authorization-code flow with the `playlist-modify-public` and
//! `playlist-modify-private` scopes).  The short-lived access token is
//! refreshed automatically shortly before it expires.

use std::collections::HashSet;
use std::time::{Duration, Instant};

use base64::Engine;
use log::debug;
use serde::Deserialize;
use serde_json::json;

use crate::collaborator::{Catalog, CatalogTrack, PlaylistSummary, SearchPage, TrackQuery};
use crate::credentials::SpotifyCredentials;
use crate::error::{Error, Result};
use crate::rate_limiter::RateLimiter;

const SERVICE: &str = "Spotify";
const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";

/// Spotify rejects more than 100 URIs per add request.
const ADD_CHUNK: usize = 100;
const SEARCH_LIMIT: &str = "10";
/// Refresh this long before the token actually expires.
const EXPIRY_MARGIN: Duration = Duration::from_secs(60);

// ── API response types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    tracks: ApiPaging<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiPaging<T> {
    #[serde(default = "Vec::new")]
    items: Vec<T>,
    #[serde(default)]
    total: u64,
    #[serde(default)]
    next: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiTrack {
    /// Null for local files
    id: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    artists: Vec<ApiArtist>,
}

#[derive(Debug, Deserialize)]
struct ApiArtist {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiPlaylistItem {
    track: Option<ApiTrack>,
}

#[derive(Debug, Deserialize)]
struct ApiPlaylist {
    id: String,
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct ApiPlaylistLinks {
    external_urls: ExternalUrls,
}

#[derive(Debug, Deserialize)]
struct ExternalUrls {
    spotify: Option<String>,
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct SpotifyClient {
    agent: ureq::Agent,
    creds: SpotifyCredentials,
    token: String,
    expires_at: Instant,
    rate_limiter: RateLimiter,
}

impl SpotifyClient {
    /// Exchange the refresh token for an access token and return a ready client.
    pub fn connect(creds: &SpotifyCredentials) -> Result<Self> {
        let agent = ureq::AgentBuilder::new()
            .user_agent(concat!("playlistbot/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build();

        let mut client = SpotifyClient {
            agent,
            creds: creds.clone(),
            token: String::new(),
            expires_at: Instant::now(),
            rate_limiter: RateLimiter::from_millis(SERVICE, 100),
        };
        client.refresh_token()?;
        Ok(client)
    }

    fn refresh_token(&mut self) -> Result<()> {
        let basic = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.creds.client_id, self.creds.client_secret));

        let response = self.agent.post(TOKEN_URL)
            .set("Authorization", &format!("Basic {}", basic))
            .send_form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", self.creds.refresh_token.as_str()),
            ])
            .map_err(|e| match e {
                ureq::Error::Status(status, r) => Error::Auth {
                    service: SERVICE,
                    message: format!("HTTP {}: {}", status, r.into_string().unwrap_or_default()),
                },
                other => Error::from_ureq(SERVICE, other),
            })?;

        let token: TokenResponse = serde_json::from_reader(response.into_reader())
            .map_err(|e| Error::malformed(SERVICE, e))?;

        self.token = token.access_token;
        self.expires_at = Instant::now() + Duration::from_secs(token.expires_in);
        debug!("[{}] Access token refreshed, valid for {}s", SERVICE, token.expires_in);
        Ok(())
    }

    /// Send an authorized request (JSON body when `body` is set), refreshing
    /// the token when needed and backing off on 429.
    fn send(&mut self, request: ureq::Request, body: Option<serde_json::Value>) -> Result<ureq::Response> {
        if Instant::now() + EXPIRY_MARGIN >= self.expires_at {
            self.refresh_token()?;
        }

        self.rate_limiter.wait_if_needed();

        let request = request.set("Authorization", &format!("Bearer {}", self.token));
        let result = match body {
            Some(json) => request.send_json(json),
            None => request.call(),
        };

        match result {
            Ok(response) => {
                self.rate_limiter.report_success();
                Ok(response)
            }
            Err(e) => {
                let err = Error::from_ureq(SERVICE, e);
                if err.is_rate_limited() {
                    self.rate_limiter.report_throttled();
                }
                Err(err)
            }
        }
    }

    fn get_json<T: serde::de::DeserializeOwned>(&mut self, request: ureq::Request) -> Result<T> {
        let response = self.send(request, None)?;
        serde_json::from_reader(response.into_reader()).map_err(|e| Error::malformed(SERVICE, e))
    }

    /// Follow `next` links until the last page.
    fn get_all_pages<T: serde::de::DeserializeOwned>(&mut self, first: ureq::Request) -> Result<Vec<T>> {
        let mut items = Vec::new();
        let mut page: ApiPaging<T> = self.get_json(first)?;

        loop {
            items.append(&mut page.items);
            let next = match page.next.take() {
                Some(url) => url,
                None => break,
            };
            let request = self.agent.get(&next);
            page = self.get_json(request)?;
        }

        Ok(items)
    }
}

fn track_uri(track_id: &str) -> String {
    if track_id.starts_with("spotify:track:") {
        track_id.to_string()
    } else {
        format!("spotify:track:{}", track_id)
    }
}

fn to_search_page(api: ApiPaging<ApiTrack>) -> SearchPage {
    let items = api.items.into_iter()
        .filter_map(|t| {
            let id = t.id?;
            Some(CatalogTrack {
                id,
                name: t.name,
                artists: t.artists.into_iter().map(|a| a.name).collect(),
            })
        })
        .collect();
    SearchPage { items, total: api.total }
}

impl Catalog for SpotifyClient {
    fn name(&self) -> &str {
        SERVICE
    }

    fn search(&mut self, query: &TrackQuery) -> Result<SearchPage> {
        let request = self.agent.get(&format!("{}/search", API_BASE))
            .query("q", &query.to_query_string())
            .query("type", "track")
            .query("limit", SEARCH_LIMIT);

        let response: SearchResponse = self.get_json(request)?;
        Ok(to_search_page(response.tracks))
    }

    fn playlist_tracks(&mut self, playlist_id: &str) -> Result<HashSet<String>> {
        let request = self.agent.get(&format!("{}/playlists/{}/tracks", API_BASE, playlist_id))
            .query("fields", "items(track(id)),next")
            .query("limit", "100");

        let items: Vec<ApiPlaylistItem> = self.get_all_pages(request)?;
        Ok(items.into_iter()
            .filter_map(|item| item.track.and_then(|t| t.id))
            .collect())
    }

    fn create_playlist(&mut self, name: &str, description: &str) -> Result<String> {
        let request = self.agent.post(&format!("{}/users/{}/playlists", API_BASE, self.creds.user_id));
        let body = json!({
            "name": name,
            "description": description,
            "public": true,
        });

        let response = self.send(request, Some(body))?;
        let playlist: ApiPlaylist = serde_json::from_reader(response.into_reader())
            .map_err(|e| Error::malformed(SERVICE, e))?;
        Ok(playlist.id)
    }

    fn list_playlists(&mut self) -> Result<Vec<PlaylistSummary>> {
        let request = self.agent.get(&format!("{}/users/{}/playlists", API_BASE, self.creds.user_id))
            .query("limit", "50");

        let playlists: Vec<ApiPlaylist> = self.get_all_pages(request)?;
        Ok(playlists.into_iter()
            .map(|p| PlaylistSummary { id: p.id, name: p.name })
            .collect())
    }

    fn add_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        let url = format!("{}/playlists/{}/tracks", API_BASE, playlist_id);

        for chunk in track_ids.chunks(ADD_CHUNK) {
            let uris: Vec<String> = chunk.iter().map(|id| track_uri(id)).collect();
            let request = self.agent.post(&url);
            self.send(request, Some(json!({ "uris": uris })))?;
            debug!("[{}] Added {} tracks to {}", SERVICE, chunk.len(), playlist_id);
        }
        Ok(())
    }

    fn playlist_url(&mut self, playlist_id: &str) -> Result<String> {
        let request = self.agent.get(&format!("{}/playlists/{}", API_BASE, playlist_id))
            .query("fields", "external_urls");

        let links: ApiPlaylistLinks = self.get_json(request)?;
        links.external_urls.spotify.ok_or_else(|| Error::MalformedResponse {
            service: SERVICE,
            message: format!("playlist {} has no public link", playlist_id),
        })
    }
}
