use anyhow::{Context, Result};
use aristotle_tooltip::{Config, RegistryClient, TooltipLine, TooltipManager};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

const LOOKUP_WIDGET: &str = "lookup";
const WRAP_WIDTH: usize = 72;
const RULE_WIDTH: usize = 40;

#[derive(Parser, Debug)]
#[command(
    name = "aristotle-tooltip",
    about = "Show Aristotle Metadata Registry definitions as tooltips",
    version
)]
struct Cli {
    /// Path to the config file (defaults to the user config directory).
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Registry base URL, overriding the config file.
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch one item and print its tooltip.
    Lookup {
        /// Registry item identifier.
        item_id: String,
        /// Show the long definition instead of the short one.
        #[arg(long)]
        expanded: bool,
        /// Print the definition as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Browse the configured items in the terminal.
    Browse,
}

fn init_tracing(default_directive: &str) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Log lines would tear the alternate screen, so the browser is quiet by default.
    init_tracing(match cli.command {
        Command::Browse => "off",
        Command::Lookup { .. } => "warn",
    });

    let mut config = Config::load(cli.config.as_deref()).context("loading configuration")?;
    config.override_url(cli.url);
    config.warn_if_incomplete();
    let base_url = config.registry_url()?;
    let client = Arc::new(RegistryClient::new(base_url, config.timeout()));

    match cli.command {
        Command::Lookup {
            item_id,
            expanded,
            json,
        } => lookup(&config, client, &item_id, expanded, json).await,
        Command::Browse => aristotle_tooltip::ui::run(&config, client).await,
    }
}

async fn lookup(
    config: &Config,
    client: Arc<RegistryClient>,
    item_id: &str,
    expanded: bool,
    json: bool,
) -> Result<()> {
    let (mut manager, mut rx) = TooltipManager::new(client, config.tooltip_options());
    manager.register(LOOKUP_WIDGET, item_id);
    manager.trigger(LOOKUP_WIDGET);

    let message = rx
        .recv()
        .await
        .context("definition fetch ended without a result")?;
    manager.apply(message);
    if expanded {
        manager.toggle(LOOKUP_WIDGET);
    }

    let state = manager
        .state(LOOKUP_WIDGET)
        .context("lookup widget disappeared")?;
    if let Some(err) = state.error {
        eprintln!("{}", err);
        std::process::exit(1);
    }

    if json {
        let result = state.result.as_ref().context("no definition fetched")?;
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    let content = manager
        .content(LOOKUP_WIDGET)
        .context("no definition fetched")?;

    for line in content.lines() {
        match line {
            TooltipLine::Rule => println!("{}", "-".repeat(RULE_WIDTH)),
            line => println!("{}", textwrap::fill(&line.text(), WRAP_WIDTH)),
        }
    }
    Ok(())
}
