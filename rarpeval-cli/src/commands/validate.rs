//! Validate command implementation

use crate::{
    config::TaskSelection,
    error::{require_dir, CliError},
    logging::init_logging,
};
use anyhow::{Context, Result};
use clap::Args;
use rarpeval_engine::PredictionValidator;
use std::path::PathBuf;

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Reference (ground truth) root holding video_* directories
    #[arg(value_name = "TEST_DIR")]
    pub reference: PathBuf,

    /// Prediction root holding video_* directories
    #[arg(value_name = "PREDICTION_DIR")]
    pub prediction: PathBuf,

    /// Tasks to validate
    #[arg(short, long, value_enum, default_value = "all")]
    pub tasks: TaskSelection,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute(&self) -> Result<()> {
        require_dir(&self.reference)?;
        require_dir(&self.prediction)?;
        init_logging(self.verbose, false, None)?;

        println!(
            "Validating predictions: {} against {}",
            self.prediction.display(),
            self.reference.display()
        );

        let report = PredictionValidator::new(self.tasks.into())
            .validate(&self.reference, &self.prediction)
            .context("Validation failed")?;

        if report.is_valid() {
            println!("✓ All {} videos are valid!", report.pairs.len());
            return Ok(());
        }

        println!(
            "✗ {} of {} videos are invalid!",
            report.failures.len(),
            report.pairs.len()
        );
        for failure in &report.failures {
            let kind = if failure.error.is_content_mismatch() {
                "content"
            } else {
                "structure"
            };
            println!("  {} [{kind}]: {}", failure.video, failure.error);
        }
        Err(CliError::ValidationFailed(report.failures.len()).into())
    }
}
