//! Proto Service Generator CLI
//!
//! Command-line interface for resolving gRPC service descriptors from a
//! directory of proto files.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use colored::*;
use proto_service_generator_common::{GeneratorConfig, Method, ResolvedType, Service};
use proto_service_generator_parser::{scan_proto_files, ProtoServiceParser, SearchPath};
use std::path::{Path, PathBuf};
use tracing::Level;

#[derive(Parser)]
#[command(name = "proto-service-generator")]
#[command(version, about = "Resolve gRPC service descriptors from proto files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a proto directory and display the resolved services
    #[command(after_help = "EXAMPLES:\n  \
        # Parse a directory, resolving imports from ./third_party\n  \
        proto-service-generator parse --dir ./protos -I ./third_party\n\n  \
        # Emit JSON for a template renderer\n  \
        proto-service-generator parse --dir ./protos --output json\n\n  \
        # Use a configuration file\n  \
        proto-service-generator parse --dir ./protos --config generator.yaml")]
    Parse {
        /// Directory scanned recursively for proto files
        #[arg(short, long)]
        dir: PathBuf,

        /// Import search root (repeatable, searched in order)
        #[arg(short = 'I', long = "import-path")]
        import_paths: Vec<PathBuf>,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Skip files with syntax errors instead of failing
        #[arg(long)]
        lenient: bool,

        /// Output format
        #[arg(short, long, default_value = "text")]
        output: OutputFormat,
    },

    /// List the proto files a parse would start from
    Scan {
        /// Directory scanned recursively for proto files
        #[arg(short, long)]
        dir: PathBuf,

        /// YAML configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable summary
    Text,
    /// Resolved services as JSON
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Parse {
            dir,
            import_paths,
            config,
            lenient,
            output,
        } => {
            let mut config = load_config(config.as_deref())?;
            config.import_paths.extend(import_paths);
            config.lenient_syntax |= lenient;
            parse_command(&dir, config, output, cli.verbose)?;
        }
        Commands::Scan { dir, config } => {
            let config = load_config(config.as_deref())?;
            scan_command(&dir, &config)?;
        }
    }

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<GeneratorConfig> {
    match path {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(GeneratorConfig::default()),
    }
}

fn parse_command(
    dir: &Path,
    config: GeneratorConfig,
    output: OutputFormat,
    verbose: bool,
) -> Result<()> {
    let parser = ProtoServiceParser::new(config);
    let search_path = SearchPath::new(parser.config().import_paths.clone());

    if verbose {
        println!("{} Parsing proto directory: {}", "→".cyan(), dir.display());
        for root in search_path.roots() {
            println!("  Import path: {}", root.display());
        }
    }

    let services = parser
        .parse_directory_with(dir, &search_path)
        .with_context(|| format!("Failed to parse proto files in {}", dir.display()))?;

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&services)
                .context("Failed to serialize services")?;
            println!("{}", json);
        }
        OutputFormat::Text => print_services(&services, verbose),
    }

    Ok(())
}

fn scan_command(dir: &Path, config: &GeneratorConfig) -> Result<()> {
    let files = scan_proto_files(dir, &config.extension)
        .with_context(|| format!("Failed to scan {}", dir.display()))?;

    for file in &files {
        println!("  {}", file.display());
    }
    println!("{} Discovered {} proto files", "✓".green(), files.len());

    Ok(())
}

fn print_services(services: &[Service<ResolvedType>], verbose: bool) {
    println!("\n{}", "✓ Parse successful!".green().bold());
    println!("  Services: {}", services.len());

    for service in services {
        println!(
            "\n{} {}",
            service.name.yellow().bold(),
            format!("({})", service.output_package).dimmed()
        );

        if verbose {
            for line in &service.comments {
                println!("  {}", format!("// {}", line).dimmed());
            }
        }

        for method in &service.methods {
            println!("  • {}", format_method(method));
            if verbose {
                for line in &method.comments {
                    println!("      {}", format!("// {}", line).dimmed());
                }
            }
        }
    }
}

fn format_method(method: &Method<ResolvedType>) -> String {
    let requests = method
        .request_types
        .iter()
        .map(ResolvedType::qualified_name)
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        "{}({}) → {}",
        method.name.cyan(),
        requests,
        method.response_type.qualified_name()
    )
}
