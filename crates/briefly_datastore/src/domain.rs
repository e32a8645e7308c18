use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of entity a prompt override or summarize input refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    Video,
    Channel,
}

impl TargetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TargetKind::Video => "video",
            TargetKind::Channel => "channel",
        }
    }
}

impl FromStr for TargetKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video" => Ok(TargetKind::Video),
            "channel" => Ok(TargetKind::Channel),
            other => Err(anyhow::anyhow!("unknown target kind: {other}")),
        }
    }
}

/// A user-saved custom summarization instruction for a single video or channel.
///
/// At most one override exists per `(user_id, target_id)`; concurrent saves are
/// last-writer-wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptOverride {
    pub user_id: String,
    pub target_id: String,
    pub prompt: String,
    #[serde(rename = "type")]
    pub kind: TargetKind,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_thumbnail: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
}

/// Per-user notification settings. One row per user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification_email: Option<String>,
    pub email_notifications_enabled: bool,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Default profile handed out (and persisted) on first settings fetch.
    pub fn new_default(user_id: impl Into<String>) -> Self {
        UserProfile {
            user_id: user_id.into(),
            notification_email: None,
            email_notifications_enabled: false,
            updated_at: Utc::now(),
        }
    }
}

/// A user's subscription to a channel for periodic digest emails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    pub user_id: String,
    pub channel_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub channel_thumbnail: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A channel with at least one subscriber, as seen by the poller.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelRef {
    pub channel_id: String,
    pub channel_title: Option<String>,
}

/// Poller bookkeeping: the most recently digested video for a channel.
#[derive(Debug, Clone, PartialEq)]
pub struct ChannelTracker {
    pub channel_id: String,
    pub last_video_id: String,
    pub updated_at: DateTime<Utc>,
}
