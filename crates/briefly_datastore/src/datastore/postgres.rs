use anyhow::Context;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use chrono::{DateTime, Utc};
use sqlx::{migrate::Migrator, postgres::PgPoolOptions, PgPool, QueryBuilder};

use crate::{
    datastore::{DataStore, InvalidContinuationToken, PromptOverridePage},
    ChannelRef, ChannelTracker, PromptOverride, Subscription, UserProfile,
};

static MIGRATOR: Migrator = sqlx::migrate!();

#[derive(Debug, Clone)]
pub struct PgDataStore {
    pub pool: PgPool,
}

impl PgDataStore {
    /// Establish connection to database and run pending migrations.
    pub async fn init(database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .inspect_err(
                |e| tracing::error!(error = ?e, "Failed to establish connection to database"),
            )
            .context("Failed to connect to postgres database")?;

        MIGRATOR
            .run(&pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to run database migrations"))
            .context("Failed to run database migrations")?;

        Ok(PgDataStore { pool })
    }
}

#[derive(sqlx::FromRow)]
struct OverrideRow {
    user_id: String,
    target_id: String,
    prompt: String,
    kind: String,
    updated_at: DateTime<Utc>,
    target_title: Option<String>,
    target_thumbnail: Option<String>,
    channel_title: Option<String>,
}

impl TryFrom<OverrideRow> for PromptOverride {
    type Error = anyhow::Error;

    fn try_from(row: OverrideRow) -> Result<Self, Self::Error> {
        Ok(PromptOverride {
            kind: row.kind.parse()?,
            user_id: row.user_id,
            target_id: row.target_id,
            prompt: row.prompt,
            updated_at: row.updated_at,
            target_title: row.target_title,
            target_thumbnail: row.target_thumbnail,
            channel_title: row.channel_title,
        })
    }
}

#[derive(sqlx::FromRow)]
struct SubscriptionRow {
    user_id: String,
    channel_id: String,
    channel_title: Option<String>,
    channel_thumbnail: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<SubscriptionRow> for Subscription {
    fn from(row: SubscriptionRow) -> Self {
        Subscription {
            user_id: row.user_id,
            channel_id: row.channel_id,
            channel_title: row.channel_title,
            channel_thumbnail: row.channel_thumbnail,
            created_at: row.created_at,
        }
    }
}

fn encode_token(last_target_id: &str) -> String {
    BASE64.encode(last_target_id)
}

fn decode_token(token: &str) -> anyhow::Result<String> {
    let bytes = BASE64.decode(token).map_err(|_| InvalidContinuationToken)?;
    Ok(String::from_utf8(bytes).map_err(|_| InvalidContinuationToken)?)
}

fn escape_like(filter: &str) -> String {
    filter
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

impl DataStore for PgDataStore {
    async fn get_prompt_override(
        &self,
        user_id: &str,
        target_id: &str,
    ) -> anyhow::Result<Option<PromptOverride>> {
        let row = sqlx::query_as::<_, OverrideRow>(
            r#"
            SELECT user_id, target_id, prompt, kind, updated_at,
                   target_title, target_thumbnail, channel_title
            FROM prompt_overrides
            WHERE user_id = $1 AND target_id = $2
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch prompt override"))
        .context("Failed to fetch prompt override")?;

        row.map(PromptOverride::try_from).transpose()
    }

    async fn put_prompt_override(&self, prompt_override: &PromptOverride) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO prompt_overrides
                (user_id, target_id, prompt, kind, updated_at,
                 target_title, target_thumbnail, channel_title)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (user_id, target_id) DO UPDATE SET
                prompt = EXCLUDED.prompt,
                kind = EXCLUDED.kind,
                updated_at = EXCLUDED.updated_at,
                target_title = EXCLUDED.target_title,
                target_thumbnail = EXCLUDED.target_thumbnail,
                channel_title = EXCLUDED.channel_title
            "#,
        )
        .bind(&prompt_override.user_id)
        .bind(&prompt_override.target_id)
        .bind(&prompt_override.prompt)
        .bind(prompt_override.kind.as_str())
        .bind(prompt_override.updated_at)
        .bind(&prompt_override.target_title)
        .bind(&prompt_override.target_thumbnail)
        .bind(&prompt_override.channel_title)
        .execute(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = ?e,
                target_id = %prompt_override.target_id,
                "Failed to upsert prompt override"
            )
        })
        .context("Failed to upsert prompt override")?;

        Ok(())
    }

    async fn delete_prompt_override(&self, user_id: &str, target_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM prompt_overrides WHERE user_id = $1 AND target_id = $2")
            .bind(user_id)
            .bind(target_id)
            .execute(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to delete prompt override"))
            .context("Failed to delete prompt override")?;

        Ok(())
    }

    async fn list_prompt_overrides(
        &self,
        user_id: &str,
        limit: i64,
        next_token: Option<&str>,
        filter: Option<&str>,
    ) -> anyhow::Result<PromptOverridePage> {
        let mut builder = QueryBuilder::new(
            "SELECT user_id, target_id, prompt, kind, updated_at, \
             target_title, target_thumbnail, channel_title \
             FROM prompt_overrides WHERE user_id = ",
        );
        builder.push_bind(user_id);

        if let Some(token) = next_token {
            let after = decode_token(token)?;
            builder.push(" AND target_id > ").push_bind(after);
        }
        if let Some(filter) = filter {
            builder
                .push(" AND prompt ILIKE ")
                .push_bind(format!("%{}%", escape_like(filter)));
        }
        // fetch one extra row to learn whether another page exists
        builder
            .push(" ORDER BY target_id LIMIT ")
            .push_bind(limit + 1);

        let mut rows: Vec<OverrideRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to list prompt overrides"))
            .context("Failed to list prompt overrides")?;

        let next_token = if rows.len() as i64 > limit {
            rows.truncate(limit as usize);
            rows.last().map(|row| encode_token(&row.target_id))
        } else {
            None
        };

        let items = rows
            .into_iter()
            .map(PromptOverride::try_from)
            .collect::<anyhow::Result<Vec<_>>>()?;

        Ok(PromptOverridePage { items, next_token })
    }

    async fn get_user_profile(&self, user_id: &str) -> anyhow::Result<Option<UserProfile>> {
        let profile = sqlx::query_as::<_, (String, Option<String>, bool, DateTime<Utc>)>(
            r#"
            SELECT user_id, notification_email, email_notifications_enabled, updated_at
            FROM user_profiles
            WHERE user_id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch user profile"))
        .context("Failed to fetch user profile")?;

        Ok(profile.map(
            |(user_id, notification_email, email_notifications_enabled, updated_at)| UserProfile {
                user_id,
                notification_email,
                email_notifications_enabled,
                updated_at,
            },
        ))
    }

    async fn save_user_profile(&self, profile: &UserProfile) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_profiles
                (user_id, notification_email, email_notifications_enabled, updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                notification_email = EXCLUDED.notification_email,
                email_notifications_enabled = EXCLUDED.email_notifications_enabled,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&profile.user_id)
        .bind(&profile.notification_email)
        .bind(profile.email_notifications_enabled)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to save user profile"))
        .context("Failed to save user profile")?;

        Ok(())
    }

    async fn put_subscription(&self, subscription: &Subscription) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO subscriptions
                (user_id, channel_id, channel_title, channel_thumbnail, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, channel_id) DO UPDATE SET
                channel_title = EXCLUDED.channel_title,
                channel_thumbnail = EXCLUDED.channel_thumbnail
            "#,
        )
        .bind(&subscription.user_id)
        .bind(&subscription.channel_id)
        .bind(&subscription.channel_title)
        .bind(&subscription.channel_thumbnail)
        .bind(subscription.created_at)
        .execute(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = ?e,
                channel_id = %subscription.channel_id,
                "Failed to save subscription"
            )
        })
        .context("Failed to save subscription")?;

        Ok(())
    }

    async fn delete_subscription(&self, user_id: &str, channel_id: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM subscriptions WHERE user_id = $1 AND channel_id = $2")
            .bind(user_id)
            .bind(channel_id)
            .execute(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = ?e, "Failed to delete subscription"))
            .context("Failed to delete subscription")?;

        Ok(())
    }

    async fn list_subscriptions(&self, user_id: &str) -> anyhow::Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT user_id, channel_id, channel_title, channel_thumbnail, created_at
            FROM subscriptions
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to list subscriptions"))
        .context("Failed to list subscriptions")?;

        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn list_subscribed_channels(&self) -> anyhow::Result<Vec<ChannelRef>> {
        let rows = sqlx::query_as::<_, (String, Option<String>)>(
            r#"
            SELECT DISTINCT ON (channel_id) channel_id, channel_title
            FROM subscriptions
            ORDER BY channel_id, channel_title NULLS LAST
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to list subscribed channels"))
        .context("Failed to list subscribed channels")?;

        Ok(rows
            .into_iter()
            .map(|(channel_id, channel_title)| ChannelRef {
                channel_id,
                channel_title,
            })
            .collect())
    }

    async fn list_channel_subscribers(
        &self,
        channel_id: &str,
    ) -> anyhow::Result<Vec<Subscription>> {
        let rows = sqlx::query_as::<_, SubscriptionRow>(
            r#"
            SELECT user_id, channel_id, channel_title, channel_thumbnail, created_at
            FROM subscriptions
            WHERE channel_id = $1
            "#,
        )
        .bind(channel_id)
        .fetch_all(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to list channel subscribers"))
        .context("Failed to list channel subscribers")?;

        Ok(rows.into_iter().map(Subscription::from).collect())
    }

    async fn get_channel_tracker(&self, channel_id: &str) -> anyhow::Result<Option<ChannelTracker>> {
        let row = sqlx::query_as::<_, (String, String, DateTime<Utc>)>(
            r#"
            SELECT channel_id, last_video_id, updated_at
            FROM channel_trackers
            WHERE channel_id = $1
            "#,
        )
        .bind(channel_id)
        .fetch_optional(&self.pool)
        .await
        .inspect_err(|e| tracing::error!(error = ?e, "Failed to fetch channel tracker"))
        .context("Failed to fetch channel tracker")?;

        Ok(row.map(|(channel_id, last_video_id, updated_at)| ChannelTracker {
            channel_id,
            last_video_id,
            updated_at,
        }))
    }

    async fn put_channel_tracker(&self, tracker: &ChannelTracker) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO channel_trackers (channel_id, last_video_id, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (channel_id) DO UPDATE SET
                last_video_id = EXCLUDED.last_video_id,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(&tracker.channel_id)
        .bind(&tracker.last_video_id)
        .bind(tracker.updated_at)
        .execute(&self.pool)
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = ?e,
                channel_id = %tracker.channel_id,
                "Failed to save channel tracker"
            )
        })
        .context("Failed to save channel tracker")?;

        Ok(())
    }
}
