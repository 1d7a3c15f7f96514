pub use clap::Parser;

use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "vcider")]
#[command(about = "Talk to the vCider network API")]
pub struct Args {
    /// API base URI (defaults to the config file, then https://my.vcider.com/api)
    #[arg(long, global = true)]
    pub base_uri: Option<String>,

    /// API credential id (overrides VCIDER_API_ID)
    #[arg(long, global = true)]
    pub api_id: Option<String>,

    /// API credential secret (overrides VCIDER_API_SECRET)
    #[arg(long, global = true)]
    pub api_secret: Option<String>,

    /// Path to the vcider config directory (defaults to ~/.vcider)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Synchronize with the server clock before running the command
    #[arg(long, global = true)]
    pub time_sync: bool,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: crate::Command,
}
