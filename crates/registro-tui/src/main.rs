//! Terminal client for the Registro Nacional records service.

use anyhow::Context;
use clap::Parser;
use log::{debug, info};
use registro_client::{DirectoryExportSink, ExportSink, HttpRecordsClient, RecordsApi};
use registro_config::{LayeredConfigOptions, RegistroConfig};
use registro_tui::TuiConfig;
use registro_tui::cli::{Command, run_command};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line options for the records client.
#[derive(Parser)]
#[command(name = "registro", version)]
struct Cli {
    /// Optional path to a registro.json5 config file applied over the defaults
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Override the backend base URL
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Run a single command instead of the interactive view
    #[command(subcommand)]
    command: Option<Command>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting registro (config_set={}, api_url_set={}, command_set={})",
        cli.config.is_some(),
        cli.api_url.is_some(),
        cli.command.is_some()
    );
    let config = load_config(&cli)?;

    let client = HttpRecordsClient::new(&config.api).context("failed to build HTTP client")?;
    let backend = client.base_url().to_string();
    let export_dir = cli
        .command
        .as_ref()
        .and_then(Command::export_dir)
        .map(PathBuf::from)
        .unwrap_or_else(|| config.export.resolve_directory());
    debug!("export directory: {}", export_dir.display());

    let api: Arc<dyn RecordsApi> = Arc::new(client);
    let sink: Arc<dyn ExportSink> = Arc::new(DirectoryExportSink::new(export_dir));

    match cli.command {
        Some(command) => {
            let mut stdout = std::io::stdout();
            run_command(command, api.as_ref(), sink.as_ref(), &mut stdout).await
        }
        None => registro_tui::run(api, sink, TuiConfig { backend }).await,
    }
}

/// Load the layered config, then apply command-line overrides.
fn load_config(cli: &Cli) -> anyhow::Result<RegistroConfig> {
    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    info!("loading layered config from cwd: {}", cwd.display());
    let mut options = LayeredConfigOptions::new(&cwd);
    if let Some(path) = cli.config.as_ref() {
        options = options.with_runtime_path(path);
    }
    let layered = RegistroConfig::load_layered_with_options(options)
        .context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());

    let mut config = layered.config;
    if let Some(api_url) = cli.api_url.as_ref() {
        config.api.base_url.clone_from(api_url);
        config.validate().context("invalid --api-url")?;
    }
    Ok(config)
}
