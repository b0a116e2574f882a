//! Reddit API client implementing [`Forum`].
//!
//! Authenticates with OAuth2: the "password" grant when account credentials
//! are configured (needed to vote and comment), otherwise the read-only
//! "client_credentials" grant.  Reddit allows 60 requests per minute for
//! OAuth clients, so requests are paced at one per second.

use std::time::Duration;

use base64::Engine;
use log::{debug, warn};
use serde::Deserialize;

use crate::collaborator::{Forum, RawPost, TimeRange};
use crate::credentials::RedditCredentials;
use crate::error::{Error, Result};
use crate::rate_limiter::RateLimiter;

const SERVICE: &str = "Reddit";
const TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";
const API_BASE: &str = "https://oauth.reddit.com";

/// Largest page the listing endpoint returns.
const PAGE_SIZE: u32 = 100;

// ── API response types ───────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Listing {
    data: ListingData,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    children: Vec<Thing>,
    after: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    data: LinkData,
}

#[derive(Debug, Deserialize)]
struct LinkData {
    id: String,
    title: String,
    score: i64,
}

#[derive(Debug, Deserialize)]
struct CommentResponse {
    json: CommentJson,
}

#[derive(Debug, Deserialize)]
struct CommentJson {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────────────

pub struct RedditClient {
    agent: ureq::Agent,
    token: String,
    rate_limiter: RateLimiter,
}

impl RedditClient {
    /// Request an access token and return a ready client.
    pub fn connect(creds: &RedditCredentials) -> Result<Self> {
        let agent = ureq::AgentBuilder::new()
            .user_agent(&creds.user_agent)
            .timeout(Duration::from_secs(30))
            .build();

        let basic = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", creds.client_id, creds.client_secret));

        let request = agent.post(TOKEN_URL)
            .set("Authorization", &format!("Basic {}", basic));

        let response = match creds.account() {
            Some((username, password)) => request.send_form(&[
                ("grant_type", "password"),
                ("username", username),
                ("password", password),
            ]),
            None => {
                warn!("No Reddit account configured; voting and replies will fail");
                request.send_form(&[("grant_type", "client_credentials")])
            }
        };

        let response = response.map_err(|e| match e {
            ureq::Error::Status(status, r) => Error::Auth {
                service: SERVICE,
                message: format!("HTTP {}: {}", status, r.into_string().unwrap_or_default()),
            },
            other => Error::from_ureq(SERVICE, other),
        })?;

        let token: TokenResponse = serde_json::from_reader(response.into_reader())
            .map_err(|e| Error::malformed(SERVICE, e))?;

        let token = token.access_token.ok_or_else(|| Error::Auth {
            service: SERVICE,
            message: token.error.unwrap_or_else(|| "no access_token in response".to_string()),
        })?;

        Ok(RedditClient {
            agent,
            token,
            rate_limiter: RateLimiter::from_millis(SERVICE, 1000),
        })
    }

    fn bearer(&self) -> String {
        format!("bearer {}", self.token)
    }

    /// Send an authorized request (form-encoded when `form` is set), pacing
    /// and backing off on 429.
    fn call(&mut self, request: ureq::Request, form: Option<&[(&str, &str)]>) -> Result<ureq::Response> {
        self.rate_limiter.wait_if_needed();

        let request = request.set("Authorization", &self.bearer());
        let result = match form {
            Some(fields) => request.send_form(fields),
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
}

/// Turn a non-empty `json.errors` list into a [`Error::Rejected`].
/// Each entry is `[code, message, field]`; a `RATELIMIT` code anywhere in
/// the list marks the rejection as throttled.
fn comment_error(errors: &[serde_json::Value]) -> Option<Error> {
    if errors.is_empty() {
        return None;
    }

    let mut throttled = false;
    let parts: Vec<String> = errors.iter().map(|entry| {
        let code = entry.get(0).and_then(|v| v.as_str());
        if code == Some("RATELIMIT") {
            throttled = true;
        }
        match (code, entry.get(1).and_then(|v| v.as_str())) {
            (Some(code), Some(text)) => format!("{}: {}", code, text),
            (Some(code), None) => code.to_string(),
            _ => entry.to_string(),
        }
    }).collect();

    Some(Error::Rejected {
        service: SERVICE,
        message: parts.join("; "),
        throttled,
    })
}

/// Reddit "fullname" of a link post.
fn link_fullname(post_id: &str) -> String {
    if post_id.starts_with("t3_") {
        post_id.to_string()
    } else {
        format!("t3_{}", post_id)
    }
}

impl Forum for RedditClient {
    fn name(&self) -> &str {
        SERVICE
    }

    fn top_posts(&mut self, community: &str, time_range: TimeRange, limit: Option<u32>) -> Result<Vec<RawPost>> {
        let url = format!("{}/r/{}/top", API_BASE, community);
        let mut posts = Vec::new();
        let mut after: Option<String> = None;

        loop {
            let remaining = limit.map(|l| l.saturating_sub(posts.len() as u32));
            let page_size = remaining.map_or(PAGE_SIZE, |r| r.min(PAGE_SIZE));
            if page_size == 0 {
                break;
            }

            let mut request = self.agent.get(&url)
                .query("t", time_range.as_str())
                .query("limit", &page_size.to_string())
                .query("raw_json", "1");
            if let Some(cursor) = &after {
                request = request.query("after", cursor);
            }

            let response = self.call(request, None)?;
            let listing: Listing = serde_json::from_reader(response.into_reader())
                .map_err(|e| Error::malformed(SERVICE, e))?;

            let fetched = listing.data.children.len();
            posts.extend(listing.data.children.into_iter().map(|t| RawPost {
                id: t.data.id,
                title: t.data.title,
                score: t.data.score,
            }));
            debug!("[{}] /r/{}: {} posts so far", SERVICE, community, posts.len());

            after = listing.data.after;
            if after.is_none() || fetched == 0 {
                break;
            }
        }

        Ok(posts)
    }

    fn upvote(&mut self, post_id: &str) -> Result<()> {
        let request = self.agent.post(&format!("{}/api/vote", API_BASE));
        let id = link_fullname(post_id);
        self.call(request, Some(&[("id", id.as_str()), ("dir", "1")][..]))?;
        Ok(())
    }

    fn reply(&mut self, post_id: &str, message: &str) -> Result<()> {
        let request = self.agent.post(&format!("{}/api/comment", API_BASE));
        let id = link_fullname(post_id);
        let response = self.call(request, Some(&[
            ("api_type", "json"),
            ("thing_id", id.as_str()),
            ("text", message),
        ][..]))?;

        let body: CommentResponse = serde_json::from_reader(response.into_reader())
            .map_err(|e| Error::malformed(SERVICE, e))?;
        if let Some(err) = comment_error(&body.json.errors) {
            if err.is_rate_limited() {
                self.rate_limiter.report_throttled();
            }
            return Err(err);
        }
        Ok(())
    }
}
