use anyhow::Result;
use clap::Parser;
use lintup::commands::{self, Config, InitOptions};
use lintup::runtime::RealRuntime;
use std::path::PathBuf;

/// lintup - ESLint setup for JavaScript and TypeScript projects
///
/// Detects the project's package manager, installs the linting
/// dependencies, adds lint scripts to package.json and writes
/// eslint.config.mjs from a preset.
///
/// Examples:
///   lintup init                  # Interactive setup with the default preset
///   lintup init -y --preset react
///   lintup show strict > eslint.config.mjs
#[derive(Parser, Debug)]
#[command(author, version = env!("LINTUP_VERSION"), about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Project directory (defaults to the current directory)
    #[arg(long = "dir", short = 'C', value_name = "PATH", global = true)]
    pub project_dir: Option<PathBuf>,

    /// Directory containing a presets.json catalog (overrides the built-in presets)
    #[arg(long, env = "LINTUP_PRESETS", value_name = "DIR", global = true)]
    pub presets: Option<PathBuf>,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Set up ESLint in the project
    Init(InitArgs),

    /// Print the package manager used by the project
    Detect,

    /// List available presets
    Presets,

    /// Print a preset's eslint.config.mjs
    Show(ShowArgs),
}

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Preset to use (see `lintup presets`)
    #[arg(long, short = 'p', env = "LINTUP_PRESET", value_name = "NAME")]
    pub preset: Option<String>,

    /// Run all steps without asking for confirmation
    #[arg(long, short = 'y')]
    pub yes: bool,

    /// Do not install dependencies
    #[arg(long)]
    pub skip_install: bool,

    /// Do not add lint scripts to package.json
    #[arg(long)]
    pub skip_scripts: bool,

    /// Do not write the config file
    #[arg(long)]
    pub skip_config: bool,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Preset name
    #[arg(value_name = "NAME")]
    pub name: String,
}

impl From<InitArgs> for InitOptions {
    fn from(args: InitArgs) -> Self {
        InitOptions {
            preset: args.preset,
            yes: args.yes,
            skip_install: args.skip_install,
            skip_scripts: args.skip_scripts,
            skip_config: args.skip_config,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let runtime = RealRuntime;
    let config = Config::load(&runtime, cli.project_dir, cli.presets)?;

    match cli.command {
        Commands::Init(args) => commands::init(runtime, config, args.into()).await?,
        Commands::Detect => commands::detect(runtime, &config)?,
        Commands::Presets => commands::presets(&config)?,
        Commands::Show(args) => commands::show(&config, &args.name)?,
    }
    Ok(())
}
