//! Channel upload feed parsing.
//!
//! YouTube exposes per-channel Atom feeds at
//! `https://www.youtube.com/feeds/videos.xml?channel_id=<id>`. Only the
//! newest `<entry>` matters to the poller, so the relevant fields are pulled
//! out with targeted patterns rather than a full XML parse.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

static ENTRY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<entry>(.*?)</entry>").unwrap());
static VIDEO_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<yt:videoId>([^<]+)</yt:videoId>").unwrap());
static TITLE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<title>([^<]*)</title>").unwrap());
static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<link\s+rel="alternate"\s+href="([^"]+)""#).unwrap());
static PUBLISHED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<published>([^<]+)</published>").unwrap());

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub video_id: String,
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

/// Extracts the newest entry from a channel feed document. Returns `None`
/// when the feed has no entries or the entry lacks a video id.
pub fn parse_latest_entry(xml: &str) -> Option<FeedEntry> {
    let entry = ENTRY_RE.captures(xml)?.get(1)?.as_str();

    let video_id = VIDEO_ID_RE.captures(entry)?.get(1)?.as_str().to_string();
    let title = TITLE_RE
        .captures(entry)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "Unknown Title".to_string());
    let link = LINK_RE
        .captures(entry)
        .and_then(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| format!("https://www.youtube.com/watch?v={video_id}"));
    let published = PUBLISHED_RE
        .captures(entry)
        .and_then(|cap| cap.get(1))
        .and_then(|m| DateTime::parse_from_rfc3339(m.as_str()).ok())
        .map(|dt| dt.with_timezone(&Utc));

    Some(FeedEntry {
        video_id,
        title,
        link,
        published,
    })
}
