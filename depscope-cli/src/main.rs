use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use depscope_core::TranslationHelper;
use depscope_github::{ClientProvider, ConfiguredClientProvider};
use depscope_mcp::McpServer;
use depscope_tools::{ToolsetGroup, default_toolset_group};
use tracing::info;

mod config;
mod error;
mod logging;

use config::{ServerConfig, split_list};
use error::CliError;
use logging::LogFormat;

#[derive(Parser, Debug)]
#[command(name = "depscope", version)]
#[command(about = "depscope - GitHub dependency review tools over MCP")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true, env = "DEPSCOPE_CONFIG")]
    config: Option<PathBuf>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Json)]
    log_format: LogFormat,

    /// Append logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve tools over MCP on stdin/stdout
    Stdio(ServerArgs),
    /// Print the tool definitions the server would expose
    Tools(ServerArgs),
    /// Write every translation key with its current text as JSON
    ExportTranslations {
        #[command(flatten)]
        server: ServerArgs,
        /// Output file (default: the translations file)
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Default)]
struct ServerArgs {
    /// Expose read-only tools only
    #[arg(long)]
    read_only: bool,

    /// Comma separated toolsets to enable
    #[arg(long, value_delimiter = ',')]
    toolsets: Option<Vec<String>>,

    /// GitHub Enterprise host
    #[arg(long)]
    gh_host: Option<String>,

    /// JSON file with translation overrides
    #[arg(long)]
    translations: Option<PathBuf>,
}

impl ServerArgs {
    fn apply(&self, config: &mut ServerConfig) {
        if self.read_only {
            config.read_only = true;
        }
        if let Some(toolsets) = &self.toolsets {
            config.toolsets = split_list(&toolsets.join(","));
        }
        if let Some(host) = &self.gh_host {
            config.github.host = Some(host.clone());
        }
        if let Some(path) = &self.translations {
            config.translations_file = Some(path.clone());
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_format, cli.log_file.as_deref()) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Stdio(args) => {
            let config = resolve_config(cli.config.as_deref(), &args)?;
            if !config.github.has_token() {
                return Err(CliError::MissingToken);
            }
            run_stdio(config).await
        }
        Commands::Tools(args) => {
            let config = resolve_config(cli.config.as_deref(), &args)?;
            let (group, _) = build_toolsets(&config)?;
            let server = McpServer::from_toolsets(&group);
            println!("{}", serde_json::to_string_pretty(&server.tool_definitions())?);
            Ok(())
        }
        Commands::ExportTranslations { server, output } => {
            let config = resolve_config(cli.config.as_deref(), &server)?;
            let (_, translator) = build_toolsets(&config)?;
            let output = output.unwrap_or_else(|| config.translations_path().0);
            translator.export_to_file(&output)?;
            info!(path = %output.display(), keys = translator.used_keys().len(), "Exported translations");
            Ok(())
        }
    }
}

fn resolve_config(path: Option<&Path>, args: &ServerArgs) -> Result<ServerConfig, CliError> {
    let mut config = ServerConfig::load(path)?;
    args.apply(&mut config);
    config.validate()?;
    Ok(config)
}

fn load_translations(config: &ServerConfig) -> Result<TranslationHelper, CliError> {
    let (path, explicit) = config.translations_path();
    let helper = TranslationHelper::new();
    Ok(if explicit {
        helper.load_file(&path)?
    } else {
        helper.load_file_if_exists(&path)?
    })
}

/// Build the enabled toolsets, returning the translator that described them.
fn build_toolsets(config: &ServerConfig) -> Result<(ToolsetGroup, TranslationHelper), CliError> {
    let translator = load_translations(config)?;
    let clients: Arc<dyn ClientProvider> =
        Arc::new(ConfiguredClientProvider::new(config.github.clone()));

    let mut group = default_toolset_group(clients, &translator, config.read_only)?;
    group.enable_toolsets(&config.toolsets)?;
    Ok((group, translator))
}

async fn run_stdio(config: ServerConfig) -> Result<(), CliError> {
    let (group, _) = build_toolsets(&config)?;
    let server = McpServer::from_toolsets(&group);

    info!(
        read_only = config.read_only,
        toolsets = ?config.toolsets,
        host = config.github.host.as_deref().unwrap_or("github.com"),
        "depscope MCP server starting"
    );

    tokio::select! {
        result = server.serve_stdio() => result?,
        _ = tokio::signal::ctrl_c() => info!("Received interrupt, shutting down"),
    }
    Ok(())
}
