//! # DataStore Module
//!
//! This module provides functionality for interacting with a Postgres database
//! to store and retrieve per-user records: prompt overrides, notification
//! profiles, channel subscriptions and poller bookkeeping.
//!
//! The module uses sqlx for database operations and provides an abstraction layer
//! for CRUD operations keyed by `(user_id, target_id)` pairs.

mod datastore;
mod domain;

pub use datastore::postgres::PgDataStore;
pub use datastore::{DataStore, InvalidContinuationToken, PromptOverridePage};
pub use domain::{
    ChannelRef, ChannelTracker, PromptOverride, Subscription, TargetKind, UserProfile,
};
