//! End-to-end runs against in-memory forum and catalog.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use chrono::NaiveDate;
use playlistbot::collaborator::{CatalogTrack, PlaylistSummary, SearchPage, TrackQuery};
use playlistbot::pipeline::{self, RunStats};
use playlistbot::{
    parse_title, playlist_delta, resolve, run_bot, Catalog, Forum, ParseError, RawPost, Result,
    RunOptions, TimeRange, TitleParse,
};

struct MemoryForum {
    posts: Vec<RawPost>,
    replies: Vec<String>,
}

impl Forum for MemoryForum {
    fn name(&self) -> &str {
        "memory forum"
    }

    fn top_posts(&mut self, _community: &str, _range: TimeRange, _limit: Option<u32>) -> Result<Vec<RawPost>> {
        Ok(self.posts.clone())
    }

    fn upvote(&mut self, _post_id: &str) -> Result<()> {
        Ok(())
    }

    fn reply(&mut self, post_id: &str, _message: &str) -> Result<()> {
        self.replies.push(post_id.to_string());
        Ok(())
    }
}

#[derive(Default)]
struct MemoryCatalog {
    by_query: HashMap<String, Vec<String>>,
    playlists: HashMap<String, (String, Vec<String>)>,
    queries: Vec<String>,
}

impl MemoryCatalog {
    fn hit(mut self, query: &str, ids: &[&str]) -> Self {
        self.by_query.insert(query.into(), ids.iter().map(|s| s.to_string()).collect());
        self
    }
}

impl Catalog for MemoryCatalog {
    fn name(&self) -> &str {
        "memory catalog"
    }

    fn search(&mut self, query: &TrackQuery) -> Result<SearchPage> {
        let q = query.to_query_string();
        self.queries.push(q.clone());
        let items: Vec<CatalogTrack> = self.by_query.get(&q).cloned().unwrap_or_default()
            .into_iter()
            .map(|id| CatalogTrack { name: id.clone(), id, artists: vec![] })
            .collect();
        Ok(SearchPage { total: items.len() as u64, items })
    }

    fn playlist_tracks(&mut self, playlist_id: &str) -> Result<HashSet<String>> {
        Ok(self.playlists.get(playlist_id).map(|(_, t)| t.iter().cloned().collect()).unwrap_or_default())
    }

    fn create_playlist(&mut self, name: &str, _description: &str) -> Result<String> {
        let id = format!("playlist-{}", self.playlists.len());
        self.playlists.insert(id.clone(), (name.to_string(), Vec::new()));
        Ok(id)
    }

    fn list_playlists(&mut self) -> Result<Vec<PlaylistSummary>> {
        Ok(self.playlists.iter()
            .map(|(id, (name, _))| PlaylistSummary { id: id.clone(), name: name.clone() })
            .collect())
    }

    fn add_tracks(&mut self, playlist_id: &str, track_ids: &[String]) -> Result<()> {
        if let Some((_, tracks)) = self.playlists.get_mut(playlist_id) {
            tracks.extend(track_ids.iter().cloned());
        }
        Ok(())
    }

    fn playlist_url(&mut self, playlist_id: &str) -> Result<String> {
        Ok(format!("memory://{}", playlist_id))
    }
}

fn post(id: &str, title: &str, score: i64) -> RawPost {
    RawPost { id: id.into(), title: title.into(), score }
}

fn options() -> RunOptions {
    RunOptions {
        community: "ListenToThis".into(),
        time_range: TimeRange::Week,
        score_threshold: 50,
        limit: None,
        post_replies: true,
        reply_delay: Duration::from_secs(600),
        playlist_description: "weekly".into(),
    }
}

#[test]
fn documented_example_title() {
    let parsed = parse_title("Black Dog - Led Zeppelin [Classic Rock] (1975)").unwrap();
    let c = parsed.candidate().unwrap();
    assert_eq!(c.title, "Led Zeppelin");
    assert_eq!(c.artist, "Black Dog");
    assert_eq!(c.genre.as_deref(), Some("Classic Rock"));
    assert_eq!(c.year.as_deref(), Some("1975"));

    assert_eq!(
        parse_title("Weekly Discussion Thread (please read)"),
        Err(ParseError::NoSeparatorFound)
    );
    assert!(matches!(
        parse_title("Megathread - Album DISCUSSION"),
        Ok(TitleParse::Skip(_))
    ));
}

#[test]
fn resolver_relaxes_to_title_only() {
    let mut catalog = MemoryCatalog::default().hit("track:Holland, 1945", &["nmh1", "nmh2"]);
    let id = resolve(&mut catalog, "Holland, 1945", "Neutral Milk Hotel").unwrap();

    assert_eq!(id.as_deref(), Some("nmh1"));
    assert_eq!(catalog.queries, vec![
        "track:Holland, 1945 artist:Neutral Milk Hotel",
        "track:Holland, 1945 artist:Neutral",
        "track:Holland, 1945",
    ]);
}

#[test]
fn pipeline_keeps_encounter_order_and_dedupes() {
    let mut catalog = MemoryCatalog::default()
        .hit("track:Alison artist:Slowdive", &["alison"])
        .hit("track:Lullaby artist:Low", &["lullaby"])
        .hit("track:Alison artist:Slowdive UK", &["alison"]);

    let posts = vec![
        post("p1", "Slowdive - Alison [Shoegaze] (1993)", 300),
        post("p2", "Low - Lullaby (1994)", 200),
        post("p3", "Slowdive UK - Alison", 100),
        post("p4", "No separator here", 90),
    ];

    let report = pipeline::run(&mut catalog, &posts).unwrap();
    let found: Vec<&str> = report.tracks.iter().map(|t| t.source_post_id.as_str()).collect();
    assert_eq!(found, vec!["p1", "p2", "p3"]);
    assert_eq!(report.stats, RunStats { posts: 4, parse_failures: 1, skipped: 0, not_found: 0, resolved: 3 });

    let existing: HashSet<String> = ["lullaby".to_string()].into_iter().collect();
    let delta = playlist_delta(&existing, &report.tracks);
    assert_eq!(delta.len(), 1);
    assert_eq!(delta[0].catalog_track_id, "alison");
    assert_eq!(delta[0].source_post_id, "p1");
}

#[test]
fn second_run_is_a_no_op() {
    let mut forum = MemoryForum {
        posts: vec![
            post("a", "Khruangbin - Maria También [Psychedelic Funk] (2018)", 800),
            post("b", "Weekly Discussion - say hi", 700),
            post("c", "Nina Simone - Sinnerman (1965)", 40),
        ],
        replies: vec![],
    };
    let mut catalog = MemoryCatalog::default()
        .hit("track:Maria También artist:Khruangbin", &["maria"])
        .hit("track:Sinnerman artist:Nina Simone", &["sinnerman"]);
    let today = NaiveDate::from_ymd_opt(2026, 10, 16).unwrap();

    let mut sleeps = 0;
    let first = run_bot(&mut forum, &mut catalog, &options(), today, |_| sleeps += 1).unwrap();
    assert_eq!(first.playlist_name, "/r/ListenToThis_261016");
    assert_eq!(first.added, 1);
    assert_eq!(first.stats.skipped, 1);
    assert_eq!(forum.replies, vec!["a"]);
    assert_eq!(sleeps, 0);

    let second = run_bot(&mut forum, &mut catalog, &options(), today, |_| sleeps += 1).unwrap();
    assert_eq!(second.playlist_id, first.playlist_id);
    assert_eq!(second.added, 0);
    assert_eq!(second.announced, 0);
    assert_eq!(forum.replies.len(), 1);
    assert_eq!(catalog.playlists.len(), 1);
}
