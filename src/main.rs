use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use epcis_validation_engine::config::AppConfig;
use epcis_validation_engine::monitoring::logging::{self, log_validation_outcome};
use epcis_validation_engine::storage::InMemoryStore;
use epcis_validation_engine::{validate_document, EpcisKgError};
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "epcis-validation-engine",
    about = "EPCIS/DSCSA document validation engine",
    version = "0.1.0",
    author = "Your Name <your.email@example.com>"
)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a single EPCIS document
    Validate {
        /// Path to the EPCIS document
        file: PathBuf,

        /// Parse the document as XML (default: sniffed from content)
        #[arg(long, conflicts_with = "json")]
        xml: bool,

        /// Parse the document as JSON
        #[arg(long, conflicts_with = "xml")]
        json: bool,

        /// Print a human-readable summary instead of JSON
        #[arg(long)]
        pretty: bool,
    },

    /// Start the HTTP interface stub
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },

    /// Write a default configuration file
    Init {
        /// Destination path for the configuration file
        #[arg(short, long, default_value = "config/default.toml")]
        path: String,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), EpcisKgError> {
    let args = Args::parse();

    let config = AppConfig::from_file_or_default(&args.config)?;
    let log_level = if args.verbose { "debug" } else { config.log_level.as_str() };
    let logging_config = logging::LoggingConfig {
        level: log_level.to_string(),
        ..logging::LoggingConfig::default()
    };
    logging::init_logging(&logging_config).map_err(|e| EpcisKgError::System(e.to_string()))?;

    match args.command {
        Commands::Validate { file, xml, json, pretty } => run_validate(&file, xml, json, pretty),
        Commands::Serve { port } => run_serve(config, port).await,
        Commands::Init { path, force } => run_init(&path, force),
    }
}

fn run_validate(file: &PathBuf, xml: bool, json: bool, pretty: bool) -> Result<(), EpcisKgError> {
    let content = std::fs::read(file)?;

    let is_xml = if xml {
        true
    } else if json {
        false
    } else {
        sniff_xml(file, &content)
    };

    info!(path = %file.display(), is_xml, "validating document");
    let report = validate_document(&content, is_xml);
    log_validation_outcome(
        "cli",
        &file.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default(),
        &report,
    );

    if pretty {
        print_human_summary(&report);
    } else {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    if report.valid {
        Ok(())
    } else {
        std::process::exit(1);
    }
}

fn sniff_xml(file: &std::path::Path, content: &[u8]) -> bool {
    if let Some(ext) = file.extension().and_then(|e| e.to_str()) {
        if ext.eq_ignore_ascii_case("json") {
            return false;
        }
        if ext.eq_ignore_ascii_case("xml") {
            return true;
        }
    }
    content.iter().find(|b| !b.is_ascii_whitespace()) != Some(&b'{')
}

fn print_human_summary(report: &epcis_validation_engine::ValidationReport) {
    println!("valid: {}", report.valid);
    println!("events: {}", report.event_count);
    println!("companies: {}", report.companies.join(", "));
    if report.errors.is_empty() {
        println!("no issues found");
        return;
    }
    println!("issues:");
    for error in &report.errors {
        let line = error
            .line_number
            .map(|n| format!(" (line {n})"))
            .unwrap_or_default();
        println!("  [{:?}/{}]{} {}", error.severity, error.error_type, line, error.message);
    }
}

async fn run_serve(config: AppConfig, port: u16) -> Result<(), EpcisKgError> {
    let store: Arc<dyn epcis_validation_engine::storage::SubmissionStore> =
        Arc::new(InMemoryStore::new());
    let server = epcis_validation_engine::api::server::WebServer::new(config, store);
    server
        .run(port)
        .await
        .map_err(|e| EpcisKgError::System(e.to_string()))
}

fn run_init(path: &str, force: bool) -> Result<(), EpcisKgError> {
    let dest = std::path::Path::new(path);
    if dest.exists() && !force {
        return Err(EpcisKgError::Config(format!(
            "Configuration file {} already exists. Use --force to overwrite.",
            path
        )));
    }
    if let Some(parent) = dest.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    AppConfig::default().to_file(dest)?;
    println!("Wrote default configuration to {}", path);
    Ok(())
}
