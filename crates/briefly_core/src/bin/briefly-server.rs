use briefly_core::{
    router, tracing::init_tracing_subscriber, AgentClient, AppState, MailerClient,
};
use briefly_core::yt::YouTubeClient;
use briefly_datastore::PgDataStore;
use clap::Parser;

#[derive(Parser)]
#[command(name = "briefly-server", about = "Briefly HTTP API server")]
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

    /// Address to bind the HTTP listener to
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:3000")]
    listen_addr: String,
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

    let store = PgDataStore::init(&cli.database_url).await?;
    let summarizer = AgentClient::new(&cli.agent_endpoint);
    let metadata = YouTubeClient::new(&cli.youtube_api_key);
    let mailer = MailerClient::new(&cli.mail_api_key, &cli.mail_from_address);

    let state = AppState::new(store, summarizer, metadata, mailer);
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(&cli.listen_addr).await?;
    tracing::info!(addr = %cli.listen_addr, "Starting HTTP server...");
    axum::serve(listener, app).await?;

    Ok(())
}
