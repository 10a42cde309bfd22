use clap::{Parser, Subcommand};
use photofeed_core::CycleState;
use photofeed_runner::{Config, Runner};
use reqwest::Client;
use tracing_subscriber::EnvFilter;

mod render;

use render::TerminalRenderer;

#[derive(Parser)]
#[command(name = "photofeed", version, about = "Shows every photo of a manifest once before repeating")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create .photofeed/ with a config and state db in the current directory
    Init {
        #[arg(long)]
        manifest_url: String,
        #[arg(long, default_value = "")]
        image_base_url: String,
        #[arg(long)]
        storage_key: Option<String>,
    },

    /// Fetch the manifest and show the current photo
    Show,

    /// Advance to the next photo (reshuffles after a full pass)
    Next {
        #[arg(long, default_value_t = 1)]
        count: usize,
    },

    /// Print the persisted cycle state without fetching
    Status,

    /// Forget persisted progress; the next run starts a fresh pass
    Forget,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let cli = Cli::parse();
    let root = std::env::current_dir()?;

    match cli.cmd {
        Command::Init { manifest_url, image_base_url, storage_key } => {
            let mut cfg = Config::default_with_manifest(&manifest_url);
            cfg.feed.image_base_url = image_base_url;
            if let Some(key) = storage_key {
                cfg.feed.storage_key = key;
            }
            Runner::init_root(&root, &cfg)?;
            println!("Initialized photofeed in {}", root.display());
        }
        Command::Show => {
            let r = Runner::open(root)?;
            let client = Client::new();
            let renderer = TerminalRenderer::new(std::io::stdout(), r.cfg.feed.button_text.clone());
            let mut feed = r.mount(renderer.with_prefetcher(client.clone()));
            feed.init(&client).await?;
            if feed.items().map_or(true, |i| i.is_empty()) {
                println!("Manifest has no photos");
            }
        }
        Command::Next { count } => {
            let r = Runner::open(root)?;
            let client = Client::new();
            let renderer = TerminalRenderer::new(std::io::stdout(), r.cfg.feed.button_text.clone());
            let mut feed = r.mount(renderer.with_prefetcher(client.clone()));
            // only the photo we land on is printed
            feed.renderer_mut().set_muted(true);
            feed.init(&client).await?;
            for _ in 1..count {
                feed.advance();
            }
            feed.renderer_mut().set_muted(false);
            feed.advance();
            if feed.items().map_or(true, |i| i.is_empty()) {
                println!("Manifest has no photos");
            }
        }
        Command::Status => {
            let r = Runner::open(root)?;
            println!("Manifest: {}", r.cfg.feed.manifest_url);
            println!("Storage key: {}", r.cfg.feed.storage_key);
            match r.stored_state()? {
                None => println!("No persisted progress"),
                Some(raw) => match serde_json::from_str::<CycleState>(&raw) {
                    Ok(state) => println!(
                        "Slot {}/{} (fingerprint {})",
                        state.position + 1,
                        state.order.len(),
                        state.fingerprint
                    ),
                    Err(_) => println!("Persisted progress is unreadable and will be reseeded"),
                },
            }
        }
        Command::Forget => {
            let r = Runner::open(root)?;
            r.forget()?;
            println!("Forgot progress for {}", r.cfg.feed.storage_key);
        }
    }

    Ok(())
}
