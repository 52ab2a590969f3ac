use akv_orchestrator::{cli, jobs::JobStatus};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env file if it exists (optional - won't fail if missing)
    // This must happen before any config is read from environment
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("Warning: Error loading .env file: {}", e);
        }
    }

    match cli::run_cli().await {
        Ok(JobStatus::Success) => ExitCode::SUCCESS,
        Ok(JobStatus::Failure) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(1)
        }
    }
}
