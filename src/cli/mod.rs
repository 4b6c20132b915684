use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "searchbox", version, about = "Debounced post search and registration checks")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read queries from stdin, one per line, and print debounced results.
    Search(SearchOpts),
    /// Validate a registration and print it as JSON.
    Register(RegisterOpts),
    Config(ConfigOpts),
    Version,
}

#[derive(clap::Args)]
pub struct SearchOpts {
    #[arg(short, long)]
    pub config: Option<String>,
    /// Override the API base URL.
    #[arg(short, long, env = "SEARCHBOX_BASE_URL")]
    pub base_url: Option<String>,
    /// Override the quiet period in milliseconds.
    #[arg(short, long)]
    pub debounce_ms: Option<u64>,
}

#[derive(clap::Args)]
pub struct RegisterOpts {
    #[arg(long, default_value = "")]
    pub first_name: String,
    #[arg(long, default_value = "")]
    pub last_name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "", env = "SEARCHBOX_PASSWORD")]
    pub password: String,
    #[arg(long, default_value = "")]
    pub confirm_password: String,
}

#[derive(clap::Args)]
pub struct ConfigOpts {
    #[arg(short, long)]
    pub config: Option<String>,
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    Show,
    Validate,
    Init,
}
