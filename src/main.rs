use std::fs::File;

use clap::Parser;
use log::{info, warn};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

use charla::api::PayloadField;
use charla::core::config::{self, CliOverrides, ResolvedConfig};
use charla::tui;

#[derive(Parser)]
#[command(name = "charla", about = "Terminal client for a JSON chat endpoint")]
struct Args {
    /// Chat endpoint URL (overrides config and CHARLA_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// JSON field carrying the user's text in the request body
    #[arg(short, long, value_enum)]
    payload_field: Option<PayloadField>,

    /// Render bot replies as plain text with line breaks only
    #[arg(long)]
    no_markdown: bool,

    /// Log level written to charla.log
    #[arg(long, default_value = "debug")]
    log_level: LevelFilter,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger in the current directory; the terminal belongs to the UI
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    if let Ok(log_file) = File::create("charla.log") {
        let _ = WriteLogger::init(args.log_level, log_config, log_file);
    }

    let file_config = match config::load_config() {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to load config, using defaults: {}", e);
            Default::default()
        }
    };
    let cli = CliOverrides {
        endpoint: args.endpoint,
        payload_field: args.payload_field,
        no_markdown: args.no_markdown,
    };
    let resolved: ResolvedConfig = config::resolve(&file_config, &cli);

    info!(
        "Charla starting up (endpoint={}, field={}, markdown={})",
        resolved.endpoint,
        resolved.payload_field.key(),
        resolved.markdown
    );

    tui::run(resolved)
}
