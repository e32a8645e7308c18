use reqwest::Client;
use serde_json::Value;

use crate::{
    yt::{feed, ChannelDetails, FeedEntry, VideoDetails, VideoMetadata},
    Error,
};

/// Client for the YouTube Data API v3 plus the public channel upload feeds.
#[derive(Debug, Clone)]
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: String,
    feed_base_url: String,
}

impl YouTubeClient {
    const DATA_API_BASE_URL: &'static str = "https://www.googleapis.com/youtube/v3";
    const FEED_BASE_URL: &'static str = "https://www.youtube.com";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: Self::DATA_API_BASE_URL.into(),
            feed_base_url: Self::FEED_BASE_URL.into(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_feed_base_url(mut self, url: impl Into<String>) -> Self {
        self.feed_base_url = url.into();
        self
    }

    async fn get_json(&self, path: &str, query: &[(&str, &str)]) -> Result<Value, Error> {
        let resp = self
            .client
            .get(format!("{}/{path}", self.base_url))
            .query(query)
            .query(&[("key", self.api_key.as_str())])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to make http request"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Backend { status, message });
        }

        Ok(resp.json::<Value>().await?)
    }

    fn channel_from_item(item: &Value) -> ChannelDetails {
        ChannelDetails {
            channel_id: item["id"].as_str().unwrap_or_default().to_string(),
            title: item["snippet"]["title"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            thumbnail: item["snippet"]["thumbnails"]["default"]["url"]
                .as_str()
                .map(str::to_string),
        }
    }
}

impl VideoMetadata for YouTubeClient {
    async fn video_details(&self, video_id: &str) -> Result<VideoDetails, Error> {
        let data = self
            .get_json("videos", &[("part", "snippet"), ("id", video_id)])
            .await?;

        let item = data["items"]
            .get(0)
            .ok_or_else(|| Error::NotFound(format!("video {video_id} not found")))?;
        let snippet = &item["snippet"];

        Ok(VideoDetails {
            video_id: video_id.to_string(),
            title: snippet["title"].as_str().unwrap_or_default().to_string(),
            channel_id: snippet["channelId"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            channel_title: snippet["channelTitle"]
                .as_str()
                .unwrap_or_default()
                .to_string(),
            thumbnail: snippet["thumbnails"]["default"]["url"]
                .as_str()
                .map(str::to_string),
        })
    }

    async fn channel_details(&self, channel_id: &str) -> Result<ChannelDetails, Error> {
        let data = self
            .get_json("channels", &[("part", "snippet"), ("id", channel_id)])
            .await?;

        let item = data["items"]
            .get(0)
            .ok_or_else(|| Error::NotFound(format!("channel {channel_id} not found")))?;

        Ok(Self::channel_from_item(item))
    }

    async fn channel_by_handle(&self, handle: &str) -> Result<ChannelDetails, Error> {
        let data = self
            .get_json("channels", &[("part", "snippet"), ("forHandle", handle)])
            .await?;

        let item = data["items"]
            .get(0)
            .ok_or_else(|| Error::NotFound(format!("channel {handle} not found")))?;

        Ok(Self::channel_from_item(item))
    }

    async fn recent_videos(
        &self,
        channel_id: &str,
        page_token: Option<&str>,
    ) -> Result<Value, Error> {
        let mut query = vec![
            ("part", "snippet"),
            ("channelId", channel_id),
            ("maxResults", "10"),
            ("order", "date"),
            ("type", "video"),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        self.get_json("search", &query).await
    }

    async fn latest_feed_entry(&self, channel_id: &str) -> Result<Option<FeedEntry>, Error> {
        let resp = self
            .client
            .get(format!("{}/feeds/videos.xml", self.feed_base_url))
            .query(&[("channel_id", channel_id)])
            .send()
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Failed to fetch channel feed"))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(Error::Backend { status, message });
        }

        let xml = resp.text().await?;
        Ok(feed::parse_latest_entry(&xml))
    }
}
