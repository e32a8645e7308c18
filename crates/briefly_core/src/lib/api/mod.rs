//! HTTP surface. Routes are thin glue: extract, validate, call into the
//! crate's components, serialize. User identity arrives in the `x-user-id`
//! header installed by the fronting identity provider.

pub mod handlers;

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    routing::{get, post},
    Router,
};
use briefly_datastore::DataStore;
use tower_http::cors::CorsLayer;

use crate::{
    agent::Summarizer,
    notify::{EmailSender, NotificationDispatcher},
    yt::VideoMetadata,
    Error,
};

#[derive(Debug, Clone)]
pub struct AppState<D, S, M, E> {
    pub store: D,
    pub summarizer: S,
    pub metadata: M,
    pub dispatcher: NotificationDispatcher<D, M, E>,
}

impl<D, S, M, E> AppState<D, S, M, E>
where
    D: DataStore + Clone + Send + Sync + 'static,
    S: Summarizer + Send + Sync + 'static,
    M: VideoMetadata + Clone + Send + Sync + 'static,
    E: EmailSender + Send + Sync + 'static,
{
    pub fn new(store: D, summarizer: S, metadata: M, email: E) -> Self {
        let dispatcher = NotificationDispatcher::new(store.clone(), metadata.clone(), email);
        AppState {
            store,
            summarizer,
            metadata,
            dispatcher,
        }
    }
}

/// Authenticated caller identity, taken from the `x-user-id` header.
#[derive(Debug, Clone)]
pub struct UserId(pub String);

impl<St: Send + Sync> FromRequestParts<St> for UserId {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &St) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(|value| UserId(value.to_string()))
            .ok_or(Error::Unauthorized)
    }
}

pub fn router<D, S, M, E>(state: AppState<D, S, M, E>) -> Router
where
    D: DataStore + Clone + Send + Sync + 'static,
    S: Summarizer + Clone + Send + Sync + 'static,
    M: VideoMetadata + Clone + Send + Sync + 'static,
    E: EmailSender + Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/api/summarize", post(handlers::summarize::<D, S, M, E>))
        .route(
            "/api/user/prompts",
            get(handlers::get_prompts::<D, S, M, E>)
                .post(handlers::upsert_prompt::<D, S, M, E>)
                .put(handlers::upsert_prompt::<D, S, M, E>)
                .delete(handlers::delete_prompt::<D, S, M, E>),
        )
        .route(
            "/api/user/settings",
            get(handlers::get_settings::<D, S, M, E>).post(handlers::post_settings::<D, S, M, E>),
        )
        .route(
            "/api/subscriptions",
            get(handlers::list_subscriptions::<D, S, M, E>)
                .post(handlers::create_subscription::<D, S, M, E>)
                .delete(handlers::delete_subscription::<D, S, M, E>),
        )
        .route(
            "/api/youtube/videos",
            get(handlers::youtube_videos::<D, S, M, E>),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
