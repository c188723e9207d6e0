use anyhow::Result;
use clap::{Parser, Subcommand};

use quotedesk::cli::{
    handle_audit_command, handle_entity_command, handle_mapping_command, handle_quote_command,
    handle_workflow_command,
};
use quotedesk::config::{paths::QuotePaths, settings::Settings};
use quotedesk::storage::Storage;

#[derive(Parser)]
#[command(
    name = "quotedesk",
    version,
    about = "Quote calculation for translation services",
    long_about = "quotedesk prices translation work from a rate sheet and stored \
                  workflows, and keeps the service names of every billing entity \
                  mapped to a single master catalog."
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the data directory with the starter catalog
    Init,

    /// Show current configuration and paths
    Config,

    /// Show recent audit log entries
    Audit(quotedesk::cli::AuditArgs),

    /// Entity and catalog management commands
    #[command(subcommand)]
    Entity(quotedesk::cli::EntityCommands),

    /// Service mapping commands
    #[command(subcommand)]
    Mapping(quotedesk::cli::MappingCommands),

    /// Account and workflow commands
    #[command(subcommand, alias = "wf")]
    Workflow(quotedesk::cli::WorkflowCommands),

    /// Generate charges for language pairs
    Quote(quotedesk::cli::QuoteArgs),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Initialize paths and settings
    let paths = QuotePaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    if matches!(cli.command, Some(Commands::Init)) {
        println!("Initializing quotedesk at: {}", paths.base_dir().display());
        let report = quotedesk::storage::initialize_storage(&paths)?;
        settings.save(&paths)?;
        if report.is_empty() {
            println!("Already initialized, nothing was overwritten.");
        }
        for file in &report.created {
            println!("  created {}", file);
        }
        for (entity, pairs) in &report.seeded {
            println!("  seeded {} mapping(s) for {}", pairs.len(), entity);
        }
        println!();
        println!("Run 'quotedesk entity list' to see the entities.");
        return Ok(());
    }

    // Initialize storage
    let storage = Storage::new(paths.clone())?;
    storage.load_all()?;

    match cli.command {
        Some(Commands::Init) => {}
        Some(Commands::Config) => {
            println!("quotedesk Configuration");
            println!("=======================");
            println!("Base directory:  {}", paths.base_dir().display());
            println!("Data directory:  {}", paths.data_dir().display());
            println!("Settings file:   {}", paths.settings_file().display());
            println!("Audit log:       {}", paths.audit_log().display());
            println!("Initialized:     {}", storage.is_initialized());
            println!();
            println!("Settings:");
            println!("  Minimum fee:     {}", settings.default_min_fee);
            println!("  Rush premium %:  {}", settings.default_rush_percent);
            println!("  File type:       {}", settings.default_file_type);
            println!("  Input mode:      {}", settings.default_input_mode);
            println!("  Export format:   {}", settings.export_format);
        }
        Some(Commands::Audit(args)) => {
            handle_audit_command(&storage, args)?;
        }
        Some(Commands::Entity(cmd)) => {
            handle_entity_command(&storage, cmd)?;
        }
        Some(Commands::Mapping(cmd)) => {
            handle_mapping_command(&storage, cmd)?;
        }
        Some(Commands::Workflow(cmd)) => {
            handle_workflow_command(&storage, cmd)?;
        }
        Some(Commands::Quote(args)) => {
            handle_quote_command(&storage, &settings, args)?;
        }
        None => {
            println!("quotedesk - quote calculation for translation services");
            println!();
            println!("Run 'quotedesk --help' for usage information.");
            println!("Run 'quotedesk init' to create the starter catalog.");
        }
    }

    Ok(())
}
