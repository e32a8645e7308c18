pub mod builder;

use anyhow::Context;
use briefly_datastore::{ChannelRef, ChannelTracker, DataStore};
use chrono::Utc;
use futures::StreamExt;

use crate::{
    agent::{SummarizeRequest, Summarizer},
    notify::{EmailSender, NotificationDispatcher},
    prompt::resolve_override,
    session,
    yt::{FeedEntry, VideoMetadata},
};

/// The periodic channel digest sweep.
#[derive(Debug)]
pub struct ChannelPoller<D, S, M, E>
where
    D: DataStore + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    M: VideoMetadata + Send + Sync + 'static,
    E: EmailSender + Send + Sync + 'static,
{
    store: D,
    summarizer: S,
    metadata: M,
    dispatcher: NotificationDispatcher<D, M, E>,
    max_channels: usize,
}

impl<D, S, M, E> ChannelPoller<D, S, M, E>
where
    D: DataStore + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    M: VideoMetadata + Send + Sync + 'static,
    E: EmailSender + Send + Sync + 'static,
{
    /// On first sight of a channel, uploads older than this are skipped so a
    /// fresh subscription does not trigger a digest for a stale video.
    const FIRST_SIGHT_MAX_AGE_SECS: i64 = 86_400;

    /// Sweeps every subscribed channel once. Per-channel failures are logged
    /// and do not stop the sweep.
    #[tracing::instrument(skip(self))]
    pub async fn run(&self) -> anyhow::Result<()> {
        let channels = self
            .store
            .list_subscribed_channels()
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to list subscribed channels"))
            .context("Failed to list subscribed channels")?;

        tracing::info!(count = channels.len(), "Polling subscribed channels");

        for channel in channels.iter().take(self.max_channels) {
            if let Err(e) = self.process_channel(channel).await {
                tracing::error!(
                    error = ?e,
                    channel_id = %channel.channel_id,
                    "Channel digest failed"
                );
            }
        }

        Ok(())
    }

    #[tracing::instrument(skip(self, channel), fields(channel_id = %channel.channel_id))]
    async fn process_channel(&self, channel: &ChannelRef) -> anyhow::Result<()> {
        let Some(entry) = self.metadata.latest_feed_entry(&channel.channel_id).await? else {
            tracing::debug!("No uploads in channel feed");
            return Ok(());
        };

        let tracker = self.store.get_channel_tracker(&channel.channel_id).await?;
        if tracker
            .as_ref()
            .is_some_and(|t| t.last_video_id == entry.video_id)
        {
            tracing::debug!(video_id = %entry.video_id, "Latest video already digested");
            return Ok(());
        }

        // first run for this channel: don't digest a stale upload
        if tracker.is_none() {
            if let Some(published) = entry.published {
                let age = Utc::now() - published;
                if age.num_seconds() > Self::FIRST_SIGHT_MAX_AGE_SECS {
                    tracing::info!(
                        video_id = %entry.video_id,
                        age_secs = age.num_seconds(),
                        "Skipping stale upload on first sight"
                    );
                    self.advance_tracker(&channel.channel_id, &entry.video_id)
                        .await?;
                    return Ok(());
                }
            }
        }

        tracing::info!(video_id = %entry.video_id, title = %entry.title, "Digesting new upload");

        let subscribers = self
            .store
            .list_channel_subscribers(&channel.channel_id)
            .await?;

        let mut all_delivered = true;
        for subscription in &subscribers {
            if let Err(e) = self
                .digest_for_user(&subscription.user_id, channel, &entry)
                .await
            {
                tracing::error!(
                    error = ?e,
                    user_id = %subscription.user_id,
                    "Failed to deliver digest"
                );
                all_delivered = false;
            }
        }

        // only advance past the video once every delivery attempt succeeded,
        // so the next sweep picks up the stragglers
        if all_delivered {
            self.advance_tracker(&channel.channel_id, &entry.video_id)
                .await?;
        }

        Ok(())
    }

    async fn digest_for_user(
        &self,
        user_id: &str,
        channel: &ChannelRef,
        entry: &FeedEntry,
    ) -> anyhow::Result<()> {
        let Some(profile) = self.store.get_user_profile(user_id).await? else {
            return Ok(());
        };
        if !profile.email_notifications_enabled {
            return Ok(());
        }
        let Some(to) = profile.notification_email else {
            return Ok(());
        };

        let prompt_override =
            resolve_override(&self.store, user_id, None, Some(&channel.channel_id)).await?;
        if prompt_override.is_some() {
            tracing::debug!(%user_id, "Using custom prompt for digest");
        }

        let request = SummarizeRequest {
            video_url: entry.link.clone(),
            additional_instructions: prompt_override.map(|o| o.prompt),
        };
        let session_id = session::session_id(channel.channel_title.as_deref(), Some(&entry.title));

        let mut stream = self
            .summarizer
            .summarize(request, &session_id)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to summarize video: {e:?}"))?;

        let mut summary = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| anyhow::anyhow!("Failed to read summary stream: {e:?}"))?;
            summary.push_str(&String::from_utf8_lossy(&chunk));
        }

        if summary.trim().is_empty() {
            anyhow::bail!("Summarizer produced an empty digest");
        }

        self.dispatcher
            .send_summary(&to, &entry.link, &entry.title, &summary)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to send digest email: {e:?}"))?;

        Ok(())
    }

    async fn advance_tracker(&self, channel_id: &str, video_id: &str) -> anyhow::Result<()> {
        self.store
            .put_channel_tracker(&ChannelTracker {
                channel_id: channel_id.to_string(),
                last_video_id: video_id.to_string(),
                updated_at: Utc::now(),
            })
            .await
    }
}
