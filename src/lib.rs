pub mod announce;
pub mod bot;
pub mod collaborator;
pub mod config;
pub mod credentials;
pub mod dedupe;
pub mod error;
pub mod pipeline;
pub mod playlist;
pub mod rate_limiter;
pub mod reddit;
pub mod resolver;
pub mod spotify;
pub mod title_parser;

#[cfg(test)]
mod test_support;

pub use bot::{run_bot, RunOptions, RunSummary};
pub use collaborator::{Catalog, Forum, RawPost, TimeRange};
pub use config::Config;
pub use credentials::Credentials;
pub use dedupe::playlist_delta;
pub use error::{Error, ParseError, Result};
pub use pipeline::{BatchReport, ResolvedTrack, RunStats};
pub use reddit::RedditClient;
pub use resolver::resolve;
pub use spotify::SpotifyClient;
pub use title_parser::{parse_title, ParsedCandidate, SkipReason, TitleParse};
