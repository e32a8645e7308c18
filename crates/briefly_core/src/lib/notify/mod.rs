mod mailer;

use std::future::Future;

use briefly_datastore::{DataStore, TargetKind};
use serde::{Deserialize, Serialize};

use crate::{markdown::markdown_to_html, parser::parse_input, yt::VideoMetadata, Error};

pub use mailer::MailerClient;

/// A single outbound message, already rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub trait EmailSender {
    fn send(&self, email: &Email) -> impl Future<Output = Result<(), Error>> + Send;
}

/// Sends summary emails to users who opted in.
///
/// Delivery is best-effort: send failures are logged and swallowed so they
/// never affect the response already streamed to the user.
#[derive(Debug, Clone)]
pub struct NotificationDispatcher<D, M, E> {
    store: D,
    metadata: M,
    email: E,
}

impl<D, M, E> NotificationDispatcher<D, M, E>
where
    D: DataStore + Send + Sync,
    M: VideoMetadata + Send + Sync,
    E: EmailSender + Send + Sync,
{
    pub fn new(store: D, metadata: M, email: E) -> Self {
        NotificationDispatcher {
            store,
            metadata,
            email,
        }
    }

    /// Emails the summary to `user_id` if their profile opts in; a missing
    /// profile, disabled notifications, or unset address is a silent no-op.
    #[tracing::instrument(skip(self, summary))]
    pub async fn notify(
        &self,
        user_id: &str,
        video_url: &str,
        summary: &str,
    ) -> anyhow::Result<()> {
        let Some(profile) = self.store.get_user_profile(user_id).await? else {
            tracing::debug!(%user_id, "No profile, skipping notification");
            return Ok(());
        };

        if !profile.email_notifications_enabled {
            tracing::debug!(%user_id, "Email notifications disabled, skipping");
            return Ok(());
        }

        let Some(to) = profile.notification_email else {
            tracing::debug!(%user_id, "No notification email set, skipping");
            return Ok(());
        };

        let title = self.resolve_title(video_url).await;

        if let Err(e) = self.send_summary(&to, video_url, &title, summary).await {
            tracing::error!(error = %e, %user_id, "Failed to send summary email");
        }

        Ok(())
    }

    /// Renders and sends one summary email. Used directly by the poller,
    /// which already knows the video title.
    pub async fn send_summary(
        &self,
        to: &str,
        video_url: &str,
        title: &str,
        summary: &str,
    ) -> Result<(), Error> {
        let html_summary = markdown_to_html(summary);
        let html = format!(
            "<h1>New Video: <a href=\"{video_url}\">{title}</a></h1>\n\
             {html_summary}\n\
             <p><small>Sent by Briefly</small></p>"
        );

        let email = Email {
            to: to.to_string(),
            subject: format!("New Video Summary: {title}"),
            html,
            text: summary.to_string(),
        };

        self.email.send(&email).await
    }

    /// Best-effort title resolution; any failure falls back to the raw URL.
    async fn resolve_title(&self, video_url: &str) -> String {
        let parsed = parse_input(video_url);
        if parsed.kind == TargetKind::Video {
            if let Ok(details) = self.metadata.video_details(&parsed.value).await {
                return details.title;
            }
        }
        video_url.to_string()
    }
}
