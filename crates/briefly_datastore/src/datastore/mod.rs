use std::future::Future;

pub mod postgres;

use crate::{ChannelRef, ChannelTracker, PromptOverride, Subscription, UserProfile};

/// One page of a prompt override listing. `next_token` is an opaque
/// continuation cursor; callers pass it back verbatim to fetch the next page.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptOverridePage {
    pub items: Vec<PromptOverride>,
    pub next_token: Option<String>,
}

/// Returned when a caller-supplied continuation token cannot be decoded.
/// Callers can downcast to this to report the bad token as the client's
/// fault rather than a server failure.
#[derive(Debug, thiserror::Error)]
#[error("invalid continuation token")]
pub struct InvalidContinuationToken;

pub trait DataStore {
    fn get_prompt_override(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> impl Future<Output = anyhow::Result<Option<PromptOverride>>> + Send;

    fn put_prompt_override(
        &self,
        prompt_override: &PromptOverride,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn delete_prompt_override(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Linear scan over one user's overrides, bounded by `limit`, optionally
    /// substring-filtered on prompt text.
    fn list_prompt_overrides(
        &self,
        user_id: &str,
        limit: i64,
        next_token: Option<&str>,
        filter: Option<&str>,
    ) -> impl Future<Output = anyhow::Result<PromptOverridePage>> + Send;

    fn get_user_profile(
        &self,
        user_id: &str,
    ) -> impl Future<Output = anyhow::Result<Option<UserProfile>>> + Send;

    fn save_user_profile(
        &self,
        profile: &UserProfile,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn put_subscription(
        &self,
        subscription: &Subscription,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn delete_subscription(
        &self,
        user_id: &str,
        channel_id: &str,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;

    fn list_subscriptions(
        &self,
        user_id: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<Subscription>>> + Send;

    /// Distinct channels with at least one subscriber, across all users.
    fn list_subscribed_channels(
        &self,
    ) -> impl Future<Output = anyhow::Result<Vec<ChannelRef>>> + Send;

    fn list_channel_subscribers(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = anyhow::Result<Vec<Subscription>>> + Send;

    fn get_channel_tracker(
        &self,
        channel_id: &str,
    ) -> impl Future<Output = anyhow::Result<Option<ChannelTracker>>> + Send;

    fn put_channel_tracker(
        &self,
        tracker: &ChannelTracker,
    ) -> impl Future<Output = anyhow::Result<()>> + Send;
}

impl<T: DataStore + Send + Sync> DataStore for &T {
    async fn get_prompt_override(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> anyhow::Result<Option<PromptOverride>> {
        (*self).get_prompt_override(user_id, target_id).await
    }

    async fn put_prompt_override(&self, prompt_override: &PromptOverride) -> anyhow::Result<()> {
        (*self).put_prompt_override(prompt_override).await
    }

    async fn delete_prompt_override(&self, user_id: &str, target_id: &str) -> anyhow::Result<()> {
        (*self).delete_prompt_override(user_id, target_id).await
    }

    async fn list_prompt_overrides(
        &self,
        user_id: &str,
        limit: i64,
        next_token: Option<&str>,
        filter: Option<&str>,
    ) -> anyhow::Result<PromptOverridePage> {
        (*self)
            .list_prompt_overrides(user_id, limit, next_token, filter)
            .await
    }

    async fn get_user_profile(&self, user_id: &str) -> anyhow::Result<Option<UserProfile>> {
        (*self).get_user_profile(user_id).await
    }

    async fn save_user_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        (*self).save_user_profile(profile).await
    }

    async fn put_subscription(&self, subscription: &Subscription) -> anyhow::Result<()> {
        (*self).put_subscription(subscription).await
    }

    async fn delete_subscription(&self, user_id: &str, channel_id: &str) -> anyhow::Result<()> {
        (*self).delete_subscription(user_id, channel_id).await
    }

    async fn list_subscriptions(&self, user_id: &str) -> anyhow::Result<Vec<Subscription>> {
        (*self).list_subscriptions(user_id).await
    }

    async fn list_subscribed_channels(&self) -> anyhow::Result<Vec<ChannelRef>> {
        (*self).list_subscribed_channels().await
    }

    async fn list_channel_subscribers(
        &self,
        channel_id: &str,
    ) -> anyhow::Result<Vec<Subscription>> {
        (*self).list_channel_subscribers(channel_id).await
    }

    async fn get_channel_tracker(
        &self,
        channel_id: &str,
    ) -> anyhow::Result<Option<ChannelTracker>> {
        (*self).get_channel_tracker(channel_id).await
    }

    async fn put_channel_tracker(&self, tracker: &ChannelTracker) -> anyhow::Result<()> {
        (*self).put_channel_tracker(tracker).await
    }
}
