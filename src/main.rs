use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use geminichat::connector::web;
use geminichat::domain::DEFAULT_PROMPT_FILE;
use geminichat::{
    ApiKey, Commands, Container, ContainerConfig, GenerationConfig, Router, SafetySettings,
};

#[derive(Parser)]
#[command(name = "geminichat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// File holding the system prompt
    #[arg(long, global = true, default_value = DEFAULT_PROMPT_FILE)]
    prompt_file: String,

    /// Model identifier (defaults to $GEMINI_MODEL, then gemini-1.5-flash)
    #[arg(long, global = true)]
    model: Option<String>,

    /// Answer with an offline echo client instead of calling the API
    #[arg(long, global = true)]
    mock: bool,

    /// Per-request timeout for model calls, in seconds
    #[arg(long, global = true, default_value = "60")]
    timeout_secs: u64,

    #[arg(long, global = true)]
    temperature: Option<f32>,

    #[arg(long, global = true)]
    top_p: Option<f32>,

    #[arg(long, global = true)]
    top_k: Option<u32>,

    #[arg(long, global = true)]
    max_output_tokens: Option<u32>,

    /// Drop chat sessions idle for this many seconds
    #[arg(long, global = true, default_value = "1800")]
    session_idle_secs: u64,

    /// Upper bound on sessions held in memory
    #[arg(long, global = true, default_value = "1024")]
    max_sessions: usize,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn generation_config(&self) -> GenerationConfig {
        let mut config = GenerationConfig::default();
        if let Some(t) = self.temperature {
            config = config.with_temperature(t);
        }
        if let Some(p) = self.top_p {
            config = config.with_top_p(p);
        }
        if let Some(k) = self.top_k {
            config = config.with_top_k(k);
        }
        if let Some(n) = self.max_output_tokens {
            config = config.with_max_output_tokens(n);
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = ContainerConfig {
        prompt_file: cli.prompt_file.clone(),
        model: cli.model.clone(),
        mock: cli.mock,
        timeout: Duration::from_secs(cli.timeout_secs),
        generation: cli.generation_config(),
        safety: SafetySettings::default(),
        fallback_api_key: ApiKey::from_env(),
        session_idle: Duration::from_secs(cli.session_idle_secs),
        max_sessions: cli.max_sessions,
    };
    let container = Container::new(config).await?;

    if let Commands::Serve { port, public } = cli.command {
        let ip = if public {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V4(Ipv4Addr::LOCALHOST)
        };
        return web::serve(Arc::new(container), SocketAddr::new(ip, port)).await;
    }

    let router = Router::new(&container);
    let output = router.route(cli.command).await?;
    println!("{}", output);

    Ok(())
}
