mod client;
pub mod feed;

use std::future::Future;

use serde_json::Value;

use crate::Error;

pub use client::YouTubeClient;
pub use feed::FeedEntry;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: String,
    pub channel_id: String,
    pub channel_title: String,
    pub thumbnail: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDetails {
    pub channel_id: String,
    pub title: String,
    pub thumbnail: Option<String>,
}

/// Read-only access to the external video-metadata provider.
pub trait VideoMetadata {
    fn video_details(
        &self,
        video_id: &str,
    ) -> impl Future<Output = Result<VideoDetails, Error>> + Send;

    fn channel_details(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = Result<ChannelDetails, Error>> + Send;

    fn channel_by_handle(
        &self,
        handle: &str,
    ) -> impl Future<Output = Result<ChannelDetails, Error>> + Send;

    /// Raw provider response for the recent-uploads proxy route; the payload
    /// is passed through to the caller untouched.
    fn recent_videos(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
    ) -> impl Future<Output = Result<Value, Error>> + Send;

    /// Latest entry of the channel's public Atom feed, if any.
    fn latest_feed_entry(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = Result<Option<FeedEntry>, Error>> + Send;
}
