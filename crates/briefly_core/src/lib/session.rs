//! Session identifiers for inference backend invocations.
//!
//! The backend correlates one invocation per session id and constrains it to
//! 33..=95 characters of `[A-Za-z0-9_-]`. Ids are derived from sanitized
//! channel/video titles plus a UUID suffix so they stay human-scannable in
//! backend logs while remaining unique.

const MIN_LEN: usize = 33;
const MAX_LEN: usize = 95;
const CHANNEL_TITLE_LEN: usize = 20;
const VIDEO_TITLE_LEN: usize = 38;

fn clean(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut last_was_hyphen = false;
    for ch in raw.chars() {
        let mapped = if ch == ' ' { '-' } else { ch };
        if mapped.is_ascii_alphanumeric() || mapped == '_' {
            out.push(mapped);
            last_was_hyphen = false;
        } else if mapped == '-' {
            if !last_was_hyphen {
                out.push('-');
            }
            last_was_hyphen = true;
        }
        // any other character is dropped
    }
    out.trim_matches('-').to_string()
}

fn truncated(s: &str, max: usize) -> String {
    s.chars().take(max).collect()
}

/// Builds a session id of the form `{channel}-{video}-{uuid}`, clamped to the
/// backend's length constraints. Empty or unsanitizable titles are skipped;
/// the UUID alone satisfies the minimum length.
pub fn session_id(channel_title: Option<&str>, video_title: Option<&str>) -> String {
    let channel = truncated(&clean(channel_title.unwrap_or_default()), CHANNEL_TITLE_LEN);
    let video = truncated(&clean(video_title.unwrap_or_default()), VIDEO_TITLE_LEN);
    let suffix = uuid::Uuid::new_v4().to_string();

    let mut id = [channel.as_str(), video.as_str(), suffix.as_str()]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("-");

    id = truncated(&id, MAX_LEN);

    if id.len() < MIN_LEN {
        let pad = uuid::Uuid::new_v4().simple().to_string();
        id = truncated(&format!("{id}-{pad}"), MAX_LEN);
    }

    id
}
