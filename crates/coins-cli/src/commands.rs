//! CLI command definitions and handlers

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use coins_validator::{
    Profile, ProfileError, ProfileParser, ProfileRegistry, RegistryConfig, TopLevelIoPolicy,
};
use std::path::PathBuf;
use tracing::{debug, warn};

/// Main CLI structure
#[derive(Parser)]
#[command(name = "coins-validator")]
#[command(about = "Inspect and check COINS validation profiles")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(flatten)]
    pub options: GlobalOptions,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// JSON registry configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Additional directory of profile files (repeatable)
    #[arg(long = "profile-dir", global = true)]
    pub profile_dirs: Vec<PathBuf>,

    /// Treat read failures between rule blocks as errors
    #[arg(long, global = true)]
    pub strict: bool,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List registered profile names
    List {
        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show one registered profile
    Show {
        /// Profile name
        name: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Parse a profile file without registering it
    Check {
        /// Profile file
        file: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show build information
    Info,
}

/// Output format options
#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    JsonPretty,
}

/// Command execution result
pub struct CommandResult {
    pub success: bool,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Execute CLI commands
pub struct CommandExecutor {
    registry: ProfileRegistry,
    parser: ProfileParser,
}

impl CommandExecutor {
    pub fn new(registry: ProfileRegistry) -> Self {
        let parser = ProfileParser::new(registry.config().parse_options());
        Self { registry, parser }
    }

    /// Build the registry described by the command-line options
    pub fn from_options(options: &GlobalOptions) -> Result<Self> {
        let mut config = match &options.config {
            Some(path) => RegistryConfig::from_file(path)
                .with_context(|| format!("failed to load configuration {}", path.display()))?,
            None => RegistryConfig::default(),
        };
        config.profile_dirs.extend(options.profile_dirs.iter().cloned());
        if options.strict {
            config.top_level_io = TopLevelIoPolicy::Fail;
        }
        debug!("Registry configuration: {:?}", config);

        Ok(Self::new(ProfileRegistry::new(config)))
    }

    pub fn registry(&self) -> &ProfileRegistry {
        &self.registry
    }

    /// Execute a CLI command
    pub fn execute(&self, command: Commands) -> Result<CommandResult> {
        match command {
            Commands::List { format } => self.execute_list(format),
            Commands::Show { name, format } => self.execute_show(&name, format),
            Commands::Check { file, format } => self.execute_check(file, format),
            Commands::Info => self.execute_info(),
        }
    }

    fn execute_list(&self, format: OutputFormat) -> Result<CommandResult> {
        let names = self.registry.list();

        let message = match format {
            OutputFormat::Text => names.join("\n"),
            OutputFormat::Json => serde_json::to_string(&names)?,
            OutputFormat::JsonPretty => serde_json::to_string_pretty(&names)?,
        };

        Ok(CommandResult {
            success: true,
            message,
            data: Some(serde_json::json!({ "profiles": names })),
        })
    }

    fn execute_show(&self, name: &str, format: OutputFormat) -> Result<CommandResult> {
        let profile = match self.registry.select(name) {
            Ok(profile) => profile,
            Err(e @ ProfileError::NotFound(_)) => {
                return Ok(CommandResult {
                    success: false,
                    message: format!("{}\nRegistered profiles: {}", e, self.registry.list().join(", ")),
                    data: None,
                });
            }
            Err(e) => return Err(e.into()),
        };

        Ok(CommandResult {
            success: true,
            message: render(&profile, &format)?,
            data: Some(serde_json::to_value(profile.as_ref())?),
        })
    }

    fn execute_check(&self, file: PathBuf, format: OutputFormat) -> Result<CommandResult> {
        let stream = std::fs::File::open(&file)
            .with_context(|| format!("failed to open {}", file.display()))?;

        let report = match self.parser.parse_with_report(stream) {
            Ok(report) => report,
            Err(e) => {
                return Ok(CommandResult {
                    success: false,
                    message: format!("{}: {}", file.display(), e),
                    data: Some(serde_json::json!({ "valid": false, "error": e.to_string() })),
                });
            }
        };

        if let Some(reason) = &report.interrupted {
            warn!("{} was only partly read: {}", file.display(), reason);
        }

        let mut message = render(&report.profile, &format)?;
        if format == OutputFormat::Text {
            if let Some(reason) = &report.interrupted {
                message.push_str(&format!("Warning: file was only partly read ({})\n", reason));
            }
        }

        Ok(CommandResult {
            success: true,
            message,
            data: Some(serde_json::json!({
                "valid": true,
                "complete": report.is_complete(),
                "profile": report.profile,
            })),
        })
    }

    fn execute_info(&self) -> Result<CommandResult> {
        let info = serde_json::json!({
            "name": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "profile_extension": self.registry.config().extension,
            "profile_dirs": self.registry.config().profile_dirs,
            "include_bundled": self.registry.config().include_bundled,
        });

        Ok(CommandResult {
            success: true,
            message: serde_json::to_string_pretty(&info)?,
            data: Some(info),
        })
    }
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new(ProfileRegistry::default())
    }
}

fn render(profile: &Profile, format: &OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Text => profile.to_simple_string(),
        OutputFormat::Json => serde_json::to_string(profile)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(profile)?,
    })
}
