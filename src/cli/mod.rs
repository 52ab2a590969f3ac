//! # Command Line Interface
//!
//! Plays the host's role locally: reads store properties, runs one job through
//! the [`JobRegistry`], and prints callback payloads and the job result as JSON.

pub mod output;

use crate::azure::AzureClientFactory;
use crate::config::{AzureSettings, ObservabilityConfig};
use crate::host::{JobCallbacks, JobConfigInfo, OperationType};
use crate::jobs::{JobKind, JobRegistry, JobStatus};
use crate::observability::init_logging;
use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use clap::{Parser, Subcommand};
use output::{print_json, CallbackEvent};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::error;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "akv-orchestrator")]
#[command(about = "Azure Key Vault certificate store jobs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Store properties as a JSON object
    #[arg(long, global = true, conflicts_with = "properties_file")]
    pub properties: Option<String>,

    /// Path to a file containing the store properties JSON
    #[arg(long, global = true)]
    pub properties_file: Option<PathBuf>,

    /// Vault URL (the store path)
    #[arg(long, global = true, default_value = "")]
    pub store_path: String,

    /// Host job id to attach to logs
    #[arg(long, global = true)]
    pub job_id: Option<Uuid>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create the configured vault
    Create,

    /// List the vaults in the subscription
    Discover,

    /// List the certificates in the vault
    Inventory,

    /// Request a CSR for a new version of a certificate
    Reenroll {
        /// Certificate name in the vault
        #[arg(long)]
        alias: String,
    },

    /// Vault and certificate management
    Manage {
        #[command(subcommand)]
        command: ManageCommands,
    },
}

#[derive(Subcommand)]
pub enum ManageCommands {
    /// Create the configured vault
    Create,

    /// Import a PFX bundle
    Add {
        #[arg(long)]
        alias: String,

        /// Path to the PFX file
        #[arg(long)]
        pfx_file: PathBuf,

        #[arg(long)]
        pfx_password: String,
    },

    /// Delete a certificate
    Remove {
        #[arg(long)]
        alias: String,
    },
}

impl Cli {
    /// Store properties from `--properties` or `--properties-file`.
    pub fn load_properties(&self) -> Result<String> {
        match (&self.properties, &self.properties_file) {
            (Some(json), _) => Ok(json.clone()),
            (None, Some(path)) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read properties file {}", path.display())),
            (None, None) => {
                anyhow::bail!("Store properties are required: pass --properties or --properties-file")
            }
        }
    }

    /// Translate the subcommand into the job kind and host configuration it runs.
    pub fn job_request(&self) -> Result<(JobKind, JobConfigInfo)> {
        let mut config = JobConfigInfo::new(self.load_properties()?, self.store_path.clone());
        if let Some(job_id) = self.job_id {
            config = config.with_job_id(job_id);
        }

        let request = match &self.command {
            Commands::Create => (JobKind::Create, config),
            Commands::Discover => (JobKind::Discovery, config),
            Commands::Inventory => (JobKind::Inventory, config),
            Commands::Reenroll { alias } => (JobKind::Reenrollment, config.with_alias(alias)),
            Commands::Manage { command } => {
                let config = match command {
                    ManageCommands::Create => config.with_operation(OperationType::Create),
                    ManageCommands::Add { alias, pfx_file, pfx_password } => {
                        let pfx = std::fs::read(pfx_file).with_context(|| {
                            format!("Failed to read PFX file {}", pfx_file.display())
                        })?;
                        config
                            .with_operation(OperationType::Add)
                            .with_alias(alias)
                            .with_entry(STANDARD.encode(pfx), pfx_password.as_str())
                    }
                    ManageCommands::Remove { alias } => {
                        config.with_operation(OperationType::Remove).with_alias(alias)
                    }
                };
                (JobKind::Management, config)
            }
        };
        Ok(request)
    }
}

/// Callbacks that print each payload as a JSON document.
pub fn printing_callbacks() -> JobCallbacks {
    fn emit(event: CallbackEvent) {
        if let Err(e) = print_json(&event) {
            error!(error = %e, "Failed to print callback payload");
        }
    }

    JobCallbacks::default()
        .on_inventory(|items| emit(CallbackEvent::Inventory(items)))
        .on_enrollment(|csr| emit(CallbackEvent::Enrollment(csr)))
        .on_discovery(|names| emit(CallbackEvent::Discovery(names)))
}

/// Run CLI commands and return the job's status
pub async fn run_cli() -> Result<JobStatus> {
    let cli = Cli::parse();

    let mut observability = ObservabilityConfig::from_env();
    if cli.verbose {
        observability.log_level = "debug".to_string();
    }
    init_logging(&observability)?;

    let settings = AzureSettings::from_env()?;
    let (kind, config) = cli.job_request()?;

    let registry = JobRegistry::with_defaults(Arc::new(AzureClientFactory::new(settings)));
    let result = registry.process(kind, &config, &printing_callbacks()).await;

    print_json(&result)?;
    Ok(result.status)
}
