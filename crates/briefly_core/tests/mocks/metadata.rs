use std::sync::{Arc, Mutex};

use briefly_core::{
    yt::{ChannelDetails, FeedEntry, VideoDetails, VideoMetadata},
    Error,
};
use serde_json::{json, Value};

#[derive(Clone, Default)]
pub struct MockMetadata {
    pub video: Option<VideoDetails>,
    pub channel: Option<ChannelDetails>,
    pub feed_entry: Option<FeedEntry>,
    pub calls: Arc<Mutex<Vec<String>>>,
    pub fail_with: Option<String>,
}

impl MockMetadata {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn with_video(mut self, video: VideoDetails) -> Self {
        self.video = Some(video);
        self
    }

    pub fn with_channel(mut self, channel: ChannelDetails) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn with_feed_entry(mut self, entry: FeedEntry) -> Self {
        self.feed_entry = Some(entry);
        self
    }

    fn fail_or<T>(&self, value: Option<T>, call: String) -> Result<T, Error> {
        self.calls.lock().unwrap().push(call.clone());
        if let Some(ref msg) = self.fail_with {
            return Err(Error::Backend {
                status: 500,
                message: msg.clone(),
            });
        }
        value.ok_or_else(|| Error::NotFound(call))
    }
}

impl VideoMetadata for MockMetadata {
    async fn video_details(&self, video_id: &str) -> Result<VideoDetails, Error> {
        self.fail_or(self.video.clone(), format!("video:{video_id}"))
    }

    async fn channel_details(&self, channel_id: &str) -> Result<ChannelDetails, Error> {
        self.fail_or(self.channel.clone(), format!("channel:{channel_id}"))
    }

    async fn channel_by_handle(&self, handle: &str) -> Result<ChannelDetails, Error> {
        self.fail_or(self.channel.clone(), format!("handle:{handle}"))
    }

    async fn recent_videos(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
    ) -> Result<Value, Error> {
        self.fail_or(
            Some(json!({ "items": [], "channelId": channel_id, "pageToken": page_token })),
            format!("recent:{channel_id}"),
        )
    }

    async fn latest_feed_entry(&self, channel_id: &str) -> Result<Option<FeedEntry>, Error> {
        self.calls.lock().unwrap().push(format!("feed:{channel_id}"));
        if let Some(ref msg) = self.fail_with {
            return Err(Error::Backend {
                status: 500,
                message: msg.clone(),
            });
        }
        Ok(self.feed_entry.clone())
    }
}
