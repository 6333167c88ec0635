// Command routing and dispatch

use std::path::PathBuf;

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use themeswitch_themes::ThemesConfig;
use tracing::debug;

use crate::{
    commands::{
        ApplyCommand, CloneCommand, Command, Context, EditCommand, FontsCommand, ListCommand,
        RemoveCommand, SelectCommand, ShowCommand, VarsCommand,
    },
    output::OutputStyle,
};

/// Themeswitch - stylesheet theme switcher
#[derive(Parser, Debug)]
#[command(name = "themeswitch")]
#[command(bin_name = "themeswitch")]
#[command(about = "List, select and edit stylesheet themes")]
#[command(version)]
#[command(author = "Themeswitch Contributors")]
#[command(disable_help_subcommand = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Configuration file (default: <config dir>/themeswitch/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List bundled and user themes
    List,

    /// Show the selected theme and the layers applied at startup
    Show,

    /// Select a theme and apply it
    Select {
        /// Theme name; omit to clear the selection
        #[arg(value_name = "NAME")]
        name: Option<String>,
    },

    /// Apply a theme without changing the selection
    Apply {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Copy a theme into the user theme directory
    #[command(name = "clone")]
    CloneTheme {
        #[arg(value_name = "SOURCE")]
        source: String,

        #[arg(value_name = "NEW_NAME")]
        name: String,
    },

    /// Delete a user theme
    Remove {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Print a theme's variables
    Vars {
        #[arg(value_name = "NAME")]
        name: String,

        /// Set a variable before printing (repeatable)
        #[arg(long = "set", value_name = "KEY=VALUE")]
        set: Vec<String>,
    },

    /// Open a theme's style sheet in the system editor
    Edit {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// List available font families
    Fonts,
}

impl Commands {
    /// Subcommand name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Commands::List => "list",
            Commands::Show => "show",
            Commands::Select { .. } => "select",
            Commands::Apply { .. } => "apply",
            Commands::CloneTheme { .. } => "clone",
            Commands::Remove { .. } => "remove",
            Commands::Vars { .. } => "vars",
            Commands::Edit { .. } => "edit",
            Commands::Fonts => "fonts",
        }
    }
}

/// Command router
pub struct CommandRouter;

impl CommandRouter {
    /// Parse arguments and route to the appropriate handler
    pub async fn route() -> Result<()> {
        let cli = Cli::parse();
        crate::logging::init_logging(cli.verbose, cli.quiet);
        Self::execute(&cli).await
    }

    pub fn load_config(cli: &Cli) -> Result<ThemesConfig> {
        debug!(path = ?cli.config, "Loading configuration");
        match &cli.config {
            Some(path) => ThemesConfig::load_from(path)
                .with_context(|| format!("failed to load configuration from {}", path.display())),
            None => ThemesConfig::load().context("failed to load configuration"),
        }
    }

    pub async fn execute(cli: &Cli) -> Result<()> {
        let config = Self::load_config(cli)?;
        let ctx = Context::new(config, OutputStyle::default())?;
        Self::dispatch(&cli.command, &ctx).await
    }

    pub async fn dispatch(command: &Commands, ctx: &Context) -> Result<()> {
        debug!(command = command.name(), args = ?command, "Dispatching command");
        match command {
            Commands::List => ListCommand.execute(ctx).await,
            Commands::Show => ShowCommand.execute(ctx).await,
            Commands::Select { name } => SelectCommand::new(name.clone()).execute(ctx).await,
            Commands::Apply { name } => ApplyCommand::new(name.clone()).execute(ctx).await,
            Commands::CloneTheme { source, name } => {
                CloneCommand::new(source.clone(), name.clone())
                    .execute(ctx)
                    .await
            }
            Commands::Remove { name } => RemoveCommand::new(name.clone()).execute(ctx).await,
            Commands::Vars { name, set } => {
                VarsCommand::new(name.clone(), set.clone())
                    .execute(ctx)
                    .await
            }
            Commands::Edit { name } => EditCommand::new(name.clone()).execute(ctx).await,
            Commands::Fonts => FontsCommand.execute(ctx).await,
        }
    }
}
