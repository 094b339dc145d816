mod cmd;
mod logging;

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "formist",
    version,
    about = "Inspect declarative admin forms, their schemas and navigation routes"
)]
struct Cli {
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[arg(long, global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Validate configuration and print resolved paths
    Doctor,

    /// List forms and pages defined under forms_dir
    List(ListArgs),

    /// Print the presentation schema and UI schema of a form
    Schema(SchemaArgs),

    /// Validate a payload against a form, or check every definition
    Validate(ValidateArgs),

    /// Inspect and maintain persisted navigation routes
    Routes(RoutesArgs),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
    Quiet,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Output format
    #[arg(long, short, value_enum, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Shorthand for --output json
    #[arg(long)]
    pub json: bool,

    /// Print names only
    #[arg(long, short)]
    pub quiet: bool,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    /// Form name
    pub name: String,

    /// Print only the UI schema
    #[arg(long, conflicts_with = "presentation")]
    pub ui: bool,

    /// Print only the presentation schema
    #[arg(long)]
    pub presentation: bool,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Form to validate the payload against
    #[arg(required_unless_present = "all")]
    pub name: Option<String>,

    /// JSON file holding the payload; reads stdin when omitted
    #[arg(long, conflicts_with = "all")]
    pub data: Option<PathBuf>,

    /// Check that every definition loads and projects cleanly
    #[arg(long)]
    pub all: bool,
}

#[derive(Debug, Args)]
pub struct RoutesArgs {
    #[command(subcommand)]
    pub command: RoutesCommand,
}

#[derive(Debug, Subcommand)]
pub enum RoutesCommand {
    /// List stored routes
    List {
        /// Print routes as JSON
        #[arg(long)]
        json: bool,
    },

    /// Store a route for every registered form and page
    Sync,

    /// Delete a stored route by id
    Delete {
        /// Route id
        id: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Doctor => cmd::doctor::run(config, profile),
        Commands::List(args) => cmd::list::run(config, profile, args),
        Commands::Schema(args) => cmd::schema::run(config, profile, args),
        Commands::Validate(args) => cmd::validate::run(config, profile, args),
        Commands::Routes(args) => cmd::routes::run(config, profile, args.command),
    }
}
