//! Prompt override resolution and the save-prompt UI trigger.

use std::future::Future;

use briefly_datastore::{DataStore, PromptOverride};

/// Single-override lookup seam. Blanket-implemented for every [`DataStore`],
/// and small enough to mock in tests.
pub trait OverrideLookup {
    fn lookup(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> impl Future<Output = anyhow::Result<Option<PromptOverride>>> + Send;
}

impl<D: DataStore + Sync> OverrideLookup for D {
    async fn lookup(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> anyhow::Result<Option<PromptOverride>> {
        self.get_prompt_override(user_id, target_id).await
    }
}

/// Returns the applicable override under the fixed precedence rule: a
/// video-level override beats a channel-level one. No caching; every call
/// re-queries the lookup, and lookup failures propagate to the caller.
pub async fn resolve_override<L: OverrideLookup>(
    lookup: &L,
    user_id: &str,
    video_id: Option<&str>,
    channel_id: Option<&str>,
) -> anyhow::Result<Option<PromptOverride>> {
    if let Some(video_id) = video_id {
        if let Some(video_override) = lookup.lookup(user_id, video_id).await? {
            return Ok(Some(video_override));
        }
    }

    if let Some(channel_id) = channel_id {
        if let Some(channel_override) = lookup.lookup(user_id, channel_id).await? {
            return Ok(Some(channel_override));
        }
    }

    Ok(None)
}

/// Decides whether to offer the "save this prompt" action: only once a run
/// has started, only for non-blank input, and only when the input differs
/// from the previously loaded override (or none existed).
pub fn should_show_save_prompt(
    current_input: &str,
    original_override: Option<&str>,
    has_started: bool,
) -> bool {
    if !has_started {
        return false;
    }
    if current_input.trim().is_empty() {
        return false;
    }

    match original_override {
        None => true,
        Some(original) => current_input.trim() != original.trim(),
    }
}
