//! Command-line interface for the umlgen utility
//!
//! Provides a CLI to export UML class diagrams as a Spring Boot server, a
//! Flutter client, or both.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;

use umlgen::core::logging::init_logging;
use umlgen::plugins::Orchestrator;
use umlgen::scaffold::{default_output_name, export_with, ExportRequest};
use umlgen::{
    analyze_with_diagnostics, ArchiveFormat, Diagnostics, Diagram, ExportTarget,
    ForeignKeyPolicy, GeneratorConfig,
};

/// umlgen - Export UML class diagrams as server and client projects
#[derive(Parser)]
#[command(name = "umlgen")]
#[command(about = "Compile UML class diagrams into a Spring Boot server and a Flutter client")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off); falls back to UMLGEN_LOG_LEVEL
    #[arg(long, value_enum, global = true)]
    pub log_level: Option<LogLevel>,

    /// Set log format (compact|pretty|json); falls back to UMLGEN_LOG_FORMAT
    #[arg(long, value_enum, global = true)]
    pub log_format: Option<LogFormat>,
}

/// Log level options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, clap::ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the projects for an export request and package them
    Export {
        /// Export request JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Which stacks to generate
        #[arg(short, long, value_enum, default_value_t = TargetChoice::Fullstack)]
        target: TargetChoice,

        /// Archive or directory to create; defaults to `<project>-<target>.tar.gz`
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output container
        #[arg(long, value_enum)]
        format: Option<FormatChoice>,

        /// Generator configuration JSON
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the request's project name
        #[arg(long)]
        project_name: Option<String>,

        /// Override the request's base package
        #[arg(long)]
        base_package: Option<String>,

        /// Override the server URL the client talks to
        #[arg(long)]
        base_url: Option<String>,

        /// Budget for all filesystem work, in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// What generated services do with an id that matches no row
        #[arg(long, value_enum)]
        fk_policy: Option<PolicyChoice>,
    },

    /// Print the relation metadata of a diagram as JSON
    Analyze {
        /// Diagram or export request JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Validate an export request without writing anything
    Validate {
        /// Export request JSON (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

/// Stacks an export produces
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum TargetChoice {
    /// Spring Boot project only
    Server,
    /// Flutter project only
    Client,
    /// Both, under backend/ and frontend/
    Fullstack,
}

impl From<TargetChoice> for ExportTarget {
    fn from(value: TargetChoice) -> Self {
        match value {
            TargetChoice::Server => ExportTarget::Server,
            TargetChoice::Client => ExportTarget::Client,
            TargetChoice::Fullstack => ExportTarget::Fullstack,
        }
    }
}

/// Output containers
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatChoice {
    /// Gzip-compressed tarball
    TarGz,
    /// Plain directory tree
    Dir,
}

impl From<FormatChoice> for ArchiveFormat {
    fn from(value: FormatChoice) -> Self {
        match value {
            FormatChoice::TarGz => ArchiveFormat::TarGz,
            FormatChoice::Dir => ArchiveFormat::Directory,
        }
    }
}

/// Foreign-key resolution policies
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum PolicyChoice {
    /// Leave the relation unset
    Ignore,
    /// Answer 404 naming the missing target
    Reject,
}

impl From<PolicyChoice> for ForeignKeyPolicy {
    fn from(value: PolicyChoice) -> Self {
        match value {
            PolicyChoice::Ignore => ForeignKeyPolicy::Ignore,
            PolicyChoice::Reject => ForeignKeyPolicy::Reject,
        }
    }
}

/// Request overrides taken from `export` flags
#[derive(Debug, Default)]
pub struct RequestOverrides {
    pub project_name: Option<String>,
    pub base_package: Option<String>,
    pub base_url: Option<String>,
}

impl RequestOverrides {
    fn apply(self, mut request: ExportRequest) -> ExportRequest {
        if let Some(name) = self.project_name {
            request.project_name = name;
        }
        if let Some(package) = self.base_package {
            request.base_package = package;
        }
        if let Some(url) = self.base_url {
            request.base_url = Some(url);
        }
        request
    }
}

/// Config overrides taken from `export` flags
#[derive(Debug, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub format: Option<FormatChoice>,
    pub timeout_secs: Option<u64>,
    pub fk_policy: Option<PolicyChoice>,
}

/// Main CLI application
pub struct UmlgenApp {
    orchestrator: Orchestrator,
}

impl UmlgenApp {
    /// Create a new application instance with both stacks registered
    pub fn new() -> Self {
        Self {
            orchestrator: Orchestrator::with_all_plugins(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&mut self, cli: Cli) -> Result<()> {
        // --verbose raises the default level; an explicit --log-level still wins
        let level = cli
            .log_level
            .map(|l| l.as_str())
            .or(if cli.verbose { Some("debug") } else { None });
        if let Err(e) = init_logging(level, cli.log_format.map(|f| f.as_str())) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("umlgen v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Export {
                input,
                target,
                output,
                format,
                config,
                project_name,
                base_package,
                base_url,
                timeout_secs,
                fk_policy,
            } => self.export_command(
                input,
                target,
                output,
                RequestOverrides {
                    project_name,
                    base_package,
                    base_url,
                },
                ConfigOverrides {
                    config,
                    format,
                    timeout_secs,
                    fk_policy,
                },
                cli.verbose,
            ),
            Commands::Analyze { input, pretty } => self.analyze_command(input, pretty, cli.verbose),
            Commands::Validate { input } => self.validate_command(input, cli.verbose),
        }
    }

    /// Handle the export command
    fn export_command(
        &self,
        input: Option<PathBuf>,
        target: TargetChoice,
        output: Option<PathBuf>,
        request_overrides: RequestOverrides,
        config_overrides: ConfigOverrides,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let request = request_overrides.apply(ExportRequest::from_json(&content)?);
        let config = Self::build_config(config_overrides)?;
        let target = ExportTarget::from(target);

        let destination = match output {
            Some(path) => path,
            None => {
                let (_, settings) = request.clone().into_parts(config.clone())?;
                PathBuf::from(default_output_name(&settings, target, config.archive_format))
            }
        };
        if verbose {
            eprintln!("Writing {} output to {}", target.as_str(), destination.display());
        }

        let outcome = export_with(&self.orchestrator, request, target, config, &destination)?;
        print_diagnostics(&outcome.diagnostics);
        println!(
            "✓ Exported {} files to {}",
            outcome.files_written,
            outcome.archive_path.display()
        );
        Ok(())
    }

    /// Handle the analyze command
    fn analyze_command(&self, input: Option<PathBuf>, pretty: bool, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let diagram = parse_diagram(&content)?;
        let mut diagnostics = Diagnostics::new();
        let metadata = analyze_with_diagnostics(&diagram, &mut diagnostics);
        print_diagnostics(&diagnostics);

        let json = if pretty {
            serde_json::to_string_pretty(&metadata)?
        } else {
            serde_json::to_string(&metadata)?
        };
        println!("{}", json);
        Ok(())
    }

    /// Handle the validate command
    fn validate_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;
        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let request = ExportRequest::from_json(&content)?;
        let (diagram, settings) = match request.into_parts(GeneratorConfig::default().with_env_overrides()) {
            Ok(parts) => parts,
            Err(e) => {
                println!("✗ {}", e);
                return Err(e.into());
            }
        };

        let generation = self
            .orchestrator
            .generate(&diagram, settings, ExportTarget::Fullstack)?;
        print_diagnostics(&generation.diagnostics);
        println!(
            "✓ Valid request: {} classes, {} relations, {} warnings",
            diagram.class_count(),
            diagram.relation_count(),
            generation.diagnostics.warning_count()
        );
        Ok(())
    }

    /// Config file or defaults, then environment, then flags
    fn build_config(overrides: ConfigOverrides) -> Result<GeneratorConfig> {
        let base: GeneratorConfig = match overrides.config {
            Some(path) => {
                let raw = read_file(&path)?;
                serde_json::from_str(&raw).map_err(|e| {
                    anyhow!("Failed to parse config file '{}': {}", path.display(), e)
                })?
            }
            None => GeneratorConfig::default(),
        };

        let mut config = base.with_env_overrides();
        if let Some(format) = overrides.format {
            config = config.with_archive_format(format.into());
        }
        if let Some(secs) = overrides.timeout_secs {
            config = config.with_timeout(Duration::from_secs(secs));
        }
        if let Some(policy) = overrides.fk_policy {
            config = config.with_foreign_key_policy(policy.into());
        }
        Ok(config)
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        match input {
            Some(path) if path.to_string_lossy() != "-" => read_file(&path),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }
}

impl Default for UmlgenApp {
    fn default() -> Self {
        Self::new()
    }
}

fn read_file(path: &Path) -> Result<String> {
    fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e))
}

/// Accept a bare diagram or a full export request
fn parse_diagram(content: &str) -> Result<Diagram> {
    let value: serde_json::Value = serde_json::from_str(content)?;
    if value.get("diagram").is_some() {
        let request: ExportRequest = serde_json::from_value(value)?;
        request
            .diagram
            .ok_or_else(|| anyhow!("Request carries no diagram"))
    } else {
        Ok(serde_json::from_value(value)?)
    }
}

fn print_diagnostics(diagnostics: &Diagnostics) {
    for diagnostic in diagnostics.iter() {
        eprintln!("{}", diagnostic);
    }
}
