use axum::{
    body::Body,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use briefly_datastore::{
    DataStore, InvalidContinuationToken, PromptOverride, Subscription, TargetKind, UserProfile,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::{
    agent::{SummarizeRequest, Summarizer},
    error::Error,
    notify::EmailSender,
    parser::parse_input,
    prompt::resolve_override,
    relay::relay_with_capture,
    session,
    yt::{ChannelDetails, VideoMetadata},
};

use super::{AppState, UserId};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummarizeBody {
    pub video_url: Option<String>,
    pub additional_instructions: Option<String>,
}

/// POST /api/summarize. Streams the summary back verbatim and dispatches an
/// email notification once the final chunk has been relayed.
pub async fn summarize<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(user_id): UserId,
    Json(body): Json<SummarizeBody>,
) -> Result<Response, Error>
where
    D: DataStore + Clone + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    M: VideoMetadata + Clone + Send + Sync + 'static,
    E: EmailSender + Clone + Send + Sync + 'static,
{
    let video_url = body
        .video_url
        .map(|url| url.trim().to_string())
        .filter(|url| !url.is_empty())
        .ok_or_else(|| Error::Validation("Missing videoUrl".to_string()))?;

    let parsed = parse_input(&video_url);

    // Metadata is best-effort here: a lookup failure must not block the
    // summary, it only degrades the session id and override resolution.
    let (video_id, details) = match parsed.kind {
        TargetKind::Video => {
            let details = state
                .metadata
                .video_details(&parsed.value)
                .await
                .inspect_err(|e| {
                    tracing::warn!(error = ?e, video_id = %parsed.value, "Failed to fetch video details")
                })
                .ok();
            (Some(parsed.value), details)
        }
        TargetKind::Channel => (None, None),
    };
    let channel_id = details.as_ref().map(|d| d.channel_id.clone());

    // Explicit instructions in the request win over any stored override.
    let instructions = match body
        .additional_instructions
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
    {
        Some(explicit) => Some(explicit),
        None => resolve_override(
            &state.store,
            &user_id,
            video_id.as_deref(),
            channel_id.as_deref(),
        )
        .await?
        .map(|o| o.prompt),
    };

    let session_id = session::session_id(
        details.as_ref().map(|d| d.channel_title.as_str()),
        details.as_ref().map(|d| d.title.as_str()),
    );

    let upstream = state
        .summarizer
        .summarize(
            SummarizeRequest {
                video_url: video_url.clone(),
                additional_instructions: instructions,
            },
            &session_id,
        )
        .await?;

    let dispatcher = state.dispatcher.clone();
    let notify_url = video_url.clone();
    let relayed = relay_with_capture(upstream, move |summary| async move {
        if let Err(e) = dispatcher.notify(&user_id, &notify_url, &summary).await {
            tracing::error!(error = ?e, "Failed to dispatch summary notification");
        }
    });

    Ok((
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        Body::from_stream(relayed),
    )
        .into_response())
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptsQuery {
    pub target_id: Option<String>,
    pub video_id: Option<String>,
    pub channel_id: Option<String>,
    pub limit: Option<i64>,
    pub next_token: Option<String>,
    pub filter: Option<String>,
}

/// GET /api/user/prompts. Three shapes depending on the query: exact lookup
/// by `targetId`, resolution by `videoId`/`channelId`, or a paginated list.
pub async fn get_prompts<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(user_id): UserId,
    Query(query): Query<PromptsQuery>,
) -> Result<Json<Value>, Error>
where
    D: DataStore + Sync,
    S: Send + Sync,
    M: Send + Sync,
    E: Send + Sync,
{
    if let Some(target_id) = query.target_id.as_deref() {
        let found = state.store.get_prompt_override(&user_id, target_id).await?;
        return Ok(Json(json!({ "override": found })));
    }

    if query.video_id.is_some() || query.channel_id.is_some() {
        let resolved = resolve_override(
            &state.store,
            &user_id,
            query.video_id.as_deref(),
            query.channel_id.as_deref(),
        )
        .await?;
        return Ok(Json(json!({ "override": resolved })));
    }

    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let page = state
        .store
        .list_prompt_overrides(
            &user_id,
            limit,
            query.next_token.as_deref(),
            query.filter.as_deref(),
        )
        .await
        .map_err(|e| {
            // a bad cursor is the caller's fault, not a server failure
            if e.downcast_ref::<InvalidContinuationToken>().is_some() {
                Error::Validation("Invalid nextToken".to_string())
            } else {
                Error::Internal(e)
            }
        })?;
    Ok(Json(
        json!({ "items": page.items, "nextToken": page.next_token }),
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertPromptBody {
    pub target_id: Option<String>,
    pub prompt: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TargetKind>,
}

/// POST/PUT /api/user/prompts. Creates or replaces an override, enriching it
/// with display metadata when the lookup succeeds.
pub async fn upsert_prompt<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(user_id): UserId,
    Json(body): Json<UpsertPromptBody>,
) -> Result<Json<Value>, Error>
where
    D: DataStore + Sync,
    S: Send + Sync,
    M: VideoMetadata + Sync,
    E: Send + Sync,
{
    let (Some(target_id), Some(prompt), Some(kind)) = (body.target_id, body.prompt, body.kind)
    else {
        return Err(Error::Validation(
            "Missing required fields: targetId, prompt, type".to_string(),
        ));
    };
    if prompt.trim().is_empty() {
        return Err(Error::Validation("Prompt must not be empty".to_string()));
    }

    let (target_title, target_thumbnail, channel_title) = match kind {
        TargetKind::Video => match state.metadata.video_details(&target_id).await {
            Ok(d) => (Some(d.title), d.thumbnail, Some(d.channel_title)),
            Err(e) => {
                tracing::warn!(error = ?e, target_id = %target_id, "Failed to enrich video override");
                (None, None, None)
            }
        },
        TargetKind::Channel => {
            let details = if target_id.starts_with('@') {
                state.metadata.channel_by_handle(&target_id).await
            } else {
                state.metadata.channel_details(&target_id).await
            };
            match details {
                Ok(d) => (Some(d.title.clone()), d.thumbnail, Some(d.title)),
                Err(e) => {
                    tracing::warn!(error = ?e, target_id = %target_id, "Failed to enrich channel override");
                    (None, None, None)
                }
            }
        }
    };

    let stored = PromptOverride {
        user_id,
        target_id,
        prompt,
        kind,
        updated_at: Utc::now(),
        target_title,
        target_thumbnail,
        channel_title,
    };
    state.store.put_prompt_override(&stored).await?;
    Ok(Json(json!({ "success": true, "override": stored })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletePromptQuery {
    pub target_id: Option<String>,
}

pub async fn delete_prompt<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(user_id): UserId,
    Query(query): Query<DeletePromptQuery>,
) -> Result<Json<Value>, Error>
where
    D: DataStore + Sync,
    S: Send + Sync,
    M: Send + Sync,
    E: Send + Sync,
{
    let target_id = query
        .target_id
        .filter(|t| !t.is_empty())
        .ok_or_else(|| Error::Validation("Missing targetId".to_string()))?;
    state
        .store
        .delete_prompt_override(&user_id, &target_id)
        .await?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/user/settings. First fetch for a user persists a default profile
/// so later notification checks read a concrete row.
pub async fn get_settings<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(user_id): UserId,
) -> Result<Json<Value>, Error>
where
    D: DataStore + Sync,
    S: Send + Sync,
    M: Send + Sync,
    E: Send + Sync,
{
    let profile = match state.store.get_user_profile(&user_id).await? {
        Some(profile) => profile,
        None => {
            let profile = UserProfile::new_default(&user_id);
            state.store.save_user_profile(&profile).await?;
            profile
        }
    };
    Ok(Json(json!({ "profile": profile })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsBody {
    pub notification_email: Option<String>,
    pub email_notifications_enabled: Option<bool>,
}

pub async fn post_settings<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(user_id): UserId,
    Json(body): Json<SettingsBody>,
) -> Result<Json<Value>, Error>
where
    D: DataStore + Sync,
    S: Send + Sync,
    M: Send + Sync,
    E: Send + Sync,
{
    let enabled = body.email_notifications_enabled.unwrap_or(false);
    let email = body
        .notification_email
        .map(|e| e.trim().to_string())
        .filter(|e| !e.is_empty());
    if enabled && email.is_none() {
        return Err(Error::Validation(
            "Notification email is required when notifications are enabled".to_string(),
        ));
    }

    let profile = UserProfile {
        user_id,
        notification_email: email,
        email_notifications_enabled: enabled,
        updated_at: Utc::now(),
    };
    state.store.save_user_profile(&profile).await?;
    Ok(Json(json!({ "success": true, "profile": profile })))
}

pub async fn list_subscriptions<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(user_id): UserId,
) -> Result<Json<Value>, Error>
where
    D: DataStore + Sync,
    S: Send + Sync,
    M: Send + Sync,
    E: Send + Sync,
{
    let subscriptions = state.store.list_subscriptions(&user_id).await?;
    Ok(Json(json!({ "subscriptions": subscriptions })))
}

#[derive(Debug, Deserialize)]
pub struct SubscribeBody {
    pub input: Option<String>,
}

/// POST /api/subscriptions. Accepts any channel-or-video input shape and
/// resolves it to a canonical channel before storing the subscription.
pub async fn create_subscription<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(user_id): UserId,
    Json(body): Json<SubscribeBody>,
) -> Result<Json<Value>, Error>
where
    D: DataStore + Sync,
    S: Send + Sync,
    M: VideoMetadata + Sync,
    E: Send + Sync,
{
    let input = body
        .input
        .map(|i| i.trim().to_string())
        .filter(|i| !i.is_empty())
        .ok_or_else(|| Error::Validation("Missing input".to_string()))?;

    let parsed = parse_input(&input);
    let channel = match parsed.kind {
        TargetKind::Channel if parsed.value.starts_with('@') => {
            state.metadata.channel_by_handle(&parsed.value).await?
        }
        TargetKind::Channel => state.metadata.channel_details(&parsed.value).await?,
        TargetKind::Video => {
            let d = state.metadata.video_details(&parsed.value).await?;
            ChannelDetails {
                channel_id: d.channel_id,
                title: d.channel_title,
                thumbnail: None,
            }
        }
    };
    if channel.channel_id.is_empty() {
        return Err(Error::Validation(
            "Could not resolve a channel ID from the input".to_string(),
        ));
    }

    let subscription = Subscription {
        user_id,
        channel_id: channel.channel_id.clone(),
        channel_title: Some(channel.title.clone()),
        channel_thumbnail: channel.thumbnail.clone(),
        created_at: Utc::now(),
    };
    state.store.put_subscription(&subscription).await?;
    Ok(Json(json!({
        "success": true,
        "channelId": channel.channel_id,
        "channelTitle": channel.title,
    })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsubscribeQuery {
    pub channel_id: Option<String>,
}

pub async fn delete_subscription<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(user_id): UserId,
    Query(query): Query<UnsubscribeQuery>,
) -> Result<Json<Value>, Error>
where
    D: DataStore + Sync,
    S: Send + Sync,
    M: Send + Sync,
    E: Send + Sync,
{
    let channel_id = query
        .channel_id
        .filter(|c| !c.is_empty())
        .ok_or_else(|| Error::Validation("Missing channelId".to_string()))?;
    state.store.delete_subscription(&user_id, &channel_id).await?;
    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideosQuery {
    pub channel_id: Option<String>,
    pub video_id: Option<String>,
    pub page_token: Option<String>,
}

/// GET /api/youtube/videos. Thin proxy over the metadata backend so the
/// frontend never holds the API key.
pub async fn youtube_videos<D, S, M, E>(
    State(state): State<AppState<D, S, M, E>>,
    UserId(_user_id): UserId,
    Query(query): Query<VideosQuery>,
) -> Result<Json<Value>, Error>
where
    D: Send + Sync,
    S: Send + Sync,
    M: VideoMetadata + Sync,
    E: Send + Sync,
{
    if let Some(channel_id) = query.channel_id.as_deref() {
        let data = state
            .metadata
            .recent_videos(channel_id, query.page_token.as_deref())
            .await?;
        return Ok(Json(data));
    }

    if let Some(video_id) = query.video_id.as_deref() {
        let d = state.metadata.video_details(video_id).await?;
        return Ok(Json(json!({
            "items": [{
                "videoId": d.video_id,
                "title": d.title,
                "channelId": d.channel_id,
                "channelTitle": d.channel_title,
                "thumbnail": d.thumbnail,
            }]
        })));
    }

    Err(Error::Validation(
        "Missing channelId or videoId".to_string(),
    ))
}
