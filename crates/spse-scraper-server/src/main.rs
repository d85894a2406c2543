//! spse-scraper — entry point.

use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use spse_scraper::Scraper;
use spse_scraper_server::{resolve_listen_addr, scraper_config, serve};

#[derive(Parser)]
#[command(
    name = "spse-scraper",
    about = "Collect finished procurement awards for an organization from an SPSE portal",
    version
)]
struct Cli {
    /// Portal root URL (defaults to SPSE_BASE_URL or the Jawa Barat LPSE).
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scrape one organization and print the records as JSON.
    Scrape {
        /// Organization (rekanan) name as registered on the portal.
        company: String,

        /// Also write the records to "<company>.json".
        #[arg(long)]
        save: bool,

        /// Directory for saved results (defaults to SPSE_OUTPUT_DIR or ".").
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },

    /// Serve the scrape operation over HTTP.
    Serve {
        /// Listen address (host:port). Falls back to PORT, then 0.0.0.0:3001.
        #[arg(long)]
        addr: Option<String>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell type (bash, zsh, fish, powershell, elvish).
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scrape {
            company,
            save,
            output_dir,
        } => {
            let scraper = Scraper::new(scraper_config(cli.base_url, output_dir));
            let records = scraper.run(&company, save).await?;
            println!("{}", serde_json::to_string_pretty(&records)?);
        }

        Commands::Serve { addr } => {
            let addr = resolve_listen_addr(addr.as_deref());
            let scraper = Scraper::new(scraper_config(cli.base_url, None));
            tracing::info!("Portal: {}", scraper.config().base_url);
            serve(&addr, scraper).await?;
        }

        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "spse-scraper", &mut std::io::stdout());
        }
    }

    Ok(())
}
