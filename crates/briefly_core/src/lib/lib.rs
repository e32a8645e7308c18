//! Core components for Briefly: URL parsing, prompt override resolution,
//! summary streaming against the inference backend, email notifications,
//! the HTTP API, and the subscription poller.

mod agent;
pub mod api;
mod error;
pub mod markdown;
mod notify;
pub mod parser;
pub mod poller;
pub mod prompt;
pub mod relay;
pub mod session;
pub mod tracing;
pub mod yt;

pub use agent::{AgentClient, SummarizeRequest, Summarizer, SummaryStream};
pub use api::{router, AppState, UserId};
pub use error::Error;
pub use notify::{Email, EmailSender, MailerClient, NotificationDispatcher};
pub use parser::{parse_input, ParsedInput};
pub use poller::{builder::ChannelPollerBuilder, ChannelPoller};
pub use prompt::{resolve_override, should_show_save_prompt, OverrideLookup};
pub use relay::relay_with_capture;
