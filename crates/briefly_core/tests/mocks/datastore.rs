use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use briefly_datastore::{
    ChannelRef, ChannelTracker, DataStore, InvalidContinuationToken, PromptOverride,
    PromptOverridePage, Subscription, UserProfile,
};

/// In-memory datastore keyed the same way as the Postgres implementation.
#[derive(Clone, Default)]
pub struct MockDataStore {
    pub overrides: Arc<Mutex<HashMap<(String, String), PromptOverride>>>,
    pub profiles: Arc<Mutex<HashMap<String, UserProfile>>>,
    pub subscriptions: Arc<Mutex<Vec<Subscription>>>,
    pub trackers: Arc<Mutex<HashMap<String, ChannelTracker>>>,
    pub fail_with: Option<String>,
}

impl MockDataStore {
    pub fn failing(msg: &str) -> Self {
        Self {
            fail_with: Some(msg.to_string()),
            ..Default::default()
        }
    }

    pub fn with_override(self, prompt_override: PromptOverride) -> Self {
        self.overrides.lock().unwrap().insert(
            (
                prompt_override.user_id.clone(),
                prompt_override.target_id.clone(),
            ),
            prompt_override,
        );
        self
    }

    pub fn with_profile(self, profile: UserProfile) -> Self {
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile);
        self
    }

    pub fn with_subscription(self, subscription: Subscription) -> Self {
        self.subscriptions.lock().unwrap().push(subscription);
        self
    }

    fn check_failure(&self) -> anyhow::Result<()> {
        if let Some(ref msg) = self.fail_with {
            anyhow::bail!("{}", msg);
        }
        Ok(())
    }
}

impl DataStore for MockDataStore {
    async fn get_prompt_override(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> anyhow::Result<Option<PromptOverride>> {
        self.check_failure()?;
        Ok(self
            .overrides
            .lock()
            .unwrap()
            .get(&(user_id.to_string(), target_id.to_string()))
            .cloned())
    }

    async fn put_prompt_override(&self, prompt_override: &PromptOverride) -> anyhow::Result<()> {
        self.check_failure()?;
        self.overrides.lock().unwrap().insert(
            (
                prompt_override.user_id.clone(),
                prompt_override.target_id.clone(),
            ),
            prompt_override.clone(),
        );
        Ok(())
    }

    async fn delete_prompt_override(&self, user_id: &str, target_id: &str) -> anyhow::Result<()> {
        self.check_failure()?;
        self.overrides
            .lock()
            .unwrap()
            .remove(&(user_id.to_string(), target_id.to_string()));
        Ok(())
    }

    async fn list_prompt_overrides(
        &self,
        user_id: &str,
        limit: i64,
        next_token: Option<&str>,
        filter: Option<&str>,
    ) -> anyhow::Result<PromptOverridePage> {
        self.check_failure()?;
        // same opaque cursor scheme as the Postgres implementation
        let after = next_token
            .map(|t| {
                BASE64
                    .decode(t)
                    .ok()
                    .and_then(|bytes| String::from_utf8(bytes).ok())
                    .ok_or(InvalidContinuationToken)
            })
            .transpose()?;

        let mut items: Vec<PromptOverride> = self
            .overrides
            .lock()
            .unwrap()
            .values()
            .filter(|o| o.user_id == user_id)
            .filter(|o| filter.map_or(true, |f| o.prompt.contains(f)))
            .filter(|o| after.as_deref().map_or(true, |t| o.target_id.as_str() > t))
            .cloned()
            .collect();
        items.sort_by(|a, b| a.target_id.cmp(&b.target_id));

        let has_more = items.len() as i64 > limit;
        items.truncate(limit as usize);
        let next_token = has_more
            .then(|| items.last().map(|o| BASE64.encode(&o.target_id)))
            .flatten();
        Ok(PromptOverridePage { items, next_token })
    }

    async fn get_user_profile(&self, user_id: &str) -> anyhow::Result<Option<UserProfile>> {
        self.check_failure()?;
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }

    async fn save_user_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        self.check_failure()?;
        self.profiles
            .lock()
            .unwrap()
            .insert(profile.user_id.clone(), profile.clone());
        Ok(())
    }

    async fn put_subscription(&self, subscription: &Subscription) -> anyhow::Result<()> {
        self.check_failure()?;
        let mut subscriptions = self.subscriptions.lock().unwrap();
        subscriptions.retain(|s| {
            !(s.user_id == subscription.user_id && s.channel_id == subscription.channel_id)
        });
        subscriptions.push(subscription.clone());
        Ok(())
    }

    async fn delete_subscription(&self, user_id: &str, channel_id: &str) -> anyhow::Result<()> {
        self.check_failure()?;
        self.subscriptions
            .lock()
            .unwrap()
            .retain(|s| !(s.user_id == user_id && s.channel_id == channel_id));
        Ok(())
    }

    async fn list_subscriptions(&self, user_id: &str) -> anyhow::Result<Vec<Subscription>> {
        self.check_failure()?;
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_subscribed_channels(&self) -> anyhow::Result<Vec<ChannelRef>> {
        self.check_failure()?;
        let mut channels: Vec<ChannelRef> = Vec::new();
        for subscription in self.subscriptions.lock().unwrap().iter() {
            if !channels.iter().any(|c| c.channel_id == subscription.channel_id) {
                channels.push(ChannelRef {
                    channel_id: subscription.channel_id.clone(),
                    channel_title: subscription.channel_title.clone(),
                });
            }
        }
        Ok(channels)
    }

    async fn list_channel_subscribers(&self, channel_id: &str) -> anyhow::Result<Vec<Subscription>> {
        self.check_failure()?;
        Ok(self
            .subscriptions
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.channel_id == channel_id)
            .cloned()
            .collect())
    }

    async fn get_channel_tracker(&self, channel_id: &str) -> anyhow::Result<Option<ChannelTracker>> {
        self.check_failure()?;
        Ok(self.trackers.lock().unwrap().get(channel_id).cloned())
    }

    async fn put_channel_tracker(&self, tracker: &ChannelTracker) -> anyhow::Result<()> {
        self.check_failure()?;
        self.trackers
            .lock()
            .unwrap()
            .insert(tracker.channel_id.clone(), tracker.clone());
        Ok(())
    }
}
