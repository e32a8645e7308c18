//! # Input Classifier
//!
//! Classifies a free-form user string as either a single video or a channel
//! and extracts its canonical identifier. Pure string matching, no network
//! calls; video URL patterns are checked before channel patterns, and
//! ambiguous bare tokens fall through to the channel interpretation.

use std::sync::LazyLock;

use briefly_datastore::TargetKind;
use regex::Regex;
use serde::{Deserialize, Serialize};

static SHORTS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)youtube\.com/shorts/([\w-]{11})").unwrap());
static WATCH_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)youtube\.com/watch\?.*v=([\w-]{11})").unwrap());
static SHARE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)youtu\.be/([\w-]{11})").unwrap());
static CHANNEL_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)youtube\.com/channel/(UC[\w-]{21}[AQgw])").unwrap());
static HANDLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)youtube\.com/@([\w-]+)").unwrap());

/// Transient classification result; never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParsedInput {
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub value: String,
}

impl ParsedInput {
    fn video(value: &str) -> Self {
        ParsedInput {
            kind: TargetKind::Video,
            value: value.to_string(),
        }
    }

    fn channel(value: impl Into<String>) -> Self {
        ParsedInput {
            kind: TargetKind::Channel,
            value: value.into(),
        }
    }
}

/// Classifies `raw` as a video or channel reference, first-match-wins.
pub fn parse_input(raw: &str) -> ParsedInput {
    let trimmed = raw.trim();

    for re in [&SHORTS_RE, &WATCH_RE, &SHARE_RE] {
        if let Some(id) = re.captures(trimmed).and_then(|cap| cap.get(1)) {
            return ParsedInput::video(id.as_str());
        }
    }

    if let Some(id) = CHANNEL_ID_RE.captures(trimmed).and_then(|cap| cap.get(1)) {
        return ParsedInput::channel(id.as_str());
    }

    if let Some(handle) = HANDLE_RE.captures(trimmed).and_then(|cap| cap.get(1)) {
        return ParsedInput::channel(format!("@{}", handle.as_str()));
    }

    // Bare channel ID, bare @handle, or free-text channel name
    ParsedInput::channel(trimmed)
}
