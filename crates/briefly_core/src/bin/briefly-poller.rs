use std::str::FromStr;

use apalis::{layers::sentry::SentryLayer, prelude::*};
use apalis_cron::{CronStream, Tick};
use briefly_core::{
    tracing::init_tracing_subscriber, yt::YouTubeClient, AgentClient, ChannelPollerBuilder,
    MailerClient,
};
use briefly_datastore::PgDataStore;
use clap::{Parser, Subcommand};
use cron::Schedule;

#[derive(Parser)]
#[command(name = "briefly-poller", about = "Briefly channel subscription poller")]
struct Cli {
    /// Database connection URL
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Summarization backend invocation endpoint
    #[arg(long, env = "AGENT_ENDPOINT")]
    agent_endpoint: String,

    /// YouTube Data API key
    #[arg(long, env = "YOUTUBE_API_KEY")]
    youtube_api_key: String,

    /// Transactional email API key
    #[arg(long, env = "MAIL_API_KEY")]
    mail_api_key: String,

    /// Sender address for notification emails
    #[arg(long, env = "MAIL_FROM_ADDRESS")]
    mail_from_address: String,

    /// Maximum channels to sweep per run
    #[arg(long, env = "MAX_CHANNELS_PER_RUN", default_value = "25")]
    max_channels: usize,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sweep subscribed channels once and exit
    Run,
    /// Start the cron scheduler
    Cron {
        /// Cron schedule expression
        #[arg(long, env = "CRON_SCHEDULE", default_value = "0 0 */4 * * *")]
        schedule: String,
    },
}

#[derive(Clone)]
struct Config {
    database_url: String,
    agent_endpoint: String,
    youtube_api_key: String,
    mail_api_key: String,
    mail_from_address: String,
    max_channels: usize,
}

async fn run_sweep(config: &Config) -> anyhow::Result<()> {
    let store = PgDataStore::init(&config.database_url).await?;
    let summarizer = AgentClient::new(&config.agent_endpoint);
    let metadata = YouTubeClient::new(&config.youtube_api_key);
    let mailer = MailerClient::new(&config.mail_api_key, &config.mail_from_address);

    let poller = ChannelPollerBuilder::new()
        .store(store)
        .summarizer(summarizer)
        .metadata(metadata)
        .email(mailer)
        .max_channels(config.max_channels)
        .build();

    poller.run().await
}

async fn handle_tick(_tick: Tick, config: Data<Config>) -> anyhow::Result<()> {
    tracing::info!(
        max_channels = config.max_channels,
        "Running scheduled channel sweep..."
    );
    run_sweep(&config).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    let _guard = sentry::init((
        std::env::var("SENTRY_DSN").unwrap_or_default(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: Some("production".into()),
            ..Default::default()
        },
    ));

    let cli = Cli::parse();
    init_tracing_subscriber()?;

    let config = Config {
        database_url: cli.database_url,
        agent_endpoint: cli.agent_endpoint,
        youtube_api_key: cli.youtube_api_key,
        mail_api_key: cli.mail_api_key,
        mail_from_address: cli.mail_from_address,
        max_channels: cli.max_channels,
    };

    match cli.command {
        Command::Run => {
            tracing::info!(max_channels = config.max_channels, "Running sweep once...");
            run_sweep(&config).await?;
        }
        Command::Cron { schedule } => {
            tracing::info!(%schedule, "Starting cron scheduler...");
            let schedule = Schedule::from_str(&schedule)?;

            let worker = WorkerBuilder::new("briefly-poller-cron")
                .backend(CronStream::new(schedule))
                .layer(SentryLayer::new())
                .data(config)
                .build(handle_tick);

            worker.run().await?;
        }
    }

    Ok(())
}
