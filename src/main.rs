use clap::Parser;
use searchbox::cli::{Cli, Commands, ConfigAction};
use searchbox::config::{validate_config_object, Config, DEFAULT_CONFIG_FILE};
use searchbox::logging;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Search(opts) => {
            let config = Config::load(opts.config.as_deref())?;
            logging::init(&config.logging);
            info!("Starting debounced search");
            searchbox::app::run_search(&config, &opts).await?;
        }
        Commands::Register(opts) => {
            logging::init(&Default::default());
            searchbox::app::run_register(&opts)?;
        }
        Commands::Config(opts) => {
            let config = Config::load(opts.config.as_deref())?;
            logging::init(&config.logging);
            match opts.action {
                ConfigAction::Show => {
                    println!("{}", serde_json::to_string_pretty(&config)?);
                }
                ConfigAction::Validate => {
                    validate_config_object(&config)?;
                    info!("Configuration is valid");
                }
                ConfigAction::Init => {
                    Config::write_default(opts.config.as_deref().unwrap_or(DEFAULT_CONFIG_FILE))?;
                    info!("Configuration file created");
                }
            }
        }
        Commands::Version => {
            println!("searchbox {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
