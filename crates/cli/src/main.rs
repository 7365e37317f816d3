use clap::{Parser, Subcommand};
use ringback::config::{self, Settings};
use ringback::outreach::{self, MessageKind};
use ringback::provider::{ElksClient, ProviderResponse};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ringback")]
#[command(about = "Ringback: ask for permission by SMS, call back on consent", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory with a default config and a static/audio directory for call recordings.
    Init {
        /// Config file path (default: RINGBACK_CONFIG_PATH or ~/.ringback/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,
    },

    /// Run the webhook gateway. Credentials come from config or ELK46_USERNAME, ELK46_PASSWORD, ELK46_NUMBER and HOST_URL.
    Serve {
        /// Config file path (default: RINGBACK_CONFIG_PATH or ~/.ringback/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// HTTP port (default from config or 8000)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Send the permission-request SMS to a number.
    Request {
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        /// Recipient number, e.g. +46711111111
        #[arg(long)]
        to: String,
    },

    /// Send the final nudge SMS to a number.
    Nudge {
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        #[arg(long)]
        to: String,
    },

    /// Call a number and play a prerecorded message.
    Call {
        #[arg(long, short, value_name = "PATH")]
        config: Option<PathBuf>,

        #[arg(long)]
        to: String,

        /// percy1, percy2, percy3, someone1, someone2 or someone3
        #[arg(long, short, default_value = "percy1")]
        message: MessageKind,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Version) => {
            println!("ringback {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Some(Commands::Init { config }) => run_init(config),
        Some(Commands::Serve { config, port }) => run_serve(config, port).await,
        Some(Commands::Request { config, to }) => run_request(config, to).await,
        Some(Commands::Nudge { config, to }) => run_nudge(config, to).await,
        Some(Commands::Call {
            config,
            to,
            message,
        }) => run_call(config, to, message).await,
        None => {
            println!("Run with --help for usage");
            Ok(())
        }
    };

    if let Err(e) = result {
        log::error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run_init(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(config::default_config_path);
    let dir = ringback::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_serve(config_path: Option<PathBuf>, port: Option<u16>) -> anyhow::Result<()> {
    let (mut config, path) = config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting gateway on {}:{}",
        config.gateway.bind,
        config.gateway.port
    );
    ringback::gateway::run_gateway(config, path).await
}

/// Load config and resolve settings for one-off provider commands.
fn load_settings(config_path: Option<PathBuf>) -> anyhow::Result<Settings> {
    let (config, path) = config::load_config(config_path)?;
    Ok(Settings::resolve(&config, &path)?)
}

fn report(action: &str, to: &str, res: ProviderResponse) {
    println!("{} {}: {} {}", action, to, res.status, res.body);
}

async fn run_request(config_path: Option<PathBuf>, to: String) -> anyhow::Result<()> {
    let client = ElksClient::new(&load_settings(config_path)?);
    let res = outreach::send_permission_request(&client, &to).await?;
    report("permission request sent to", &to, res);
    Ok(())
}

async fn run_nudge(config_path: Option<PathBuf>, to: String) -> anyhow::Result<()> {
    let client = ElksClient::new(&load_settings(config_path)?);
    let res = outreach::send_final_nudge(&client, &to).await?;
    report("final nudge sent to", &to, res);
    Ok(())
}

async fn run_call(
    config_path: Option<PathBuf>,
    to: String,
    message: MessageKind,
) -> anyhow::Result<()> {
    let settings = load_settings(config_path)?;
    let client = ElksClient::new(&settings);
    let res = outreach::send_call(&client, &settings.public_url, &to, message).await?;
    report(&format!("call ({}) placed to", message), &to, res);
    Ok(())
}
