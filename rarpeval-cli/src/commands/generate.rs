//! Generate command implementation

use crate::{error::require_dir, logging::init_logging};
use anyhow::{Context, Result};
use clap::Args;
use rarpeval_engine::MockGenerator;
use std::path::PathBuf;

/// Arguments for the generate command
#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Reference (ground truth) root holding video_* directories
    #[arg(value_name = "TEST_DIR")]
    pub reference: PathBuf,

    /// Prediction root to create
    #[arg(value_name = "PREDICTION_DIR")]
    pub prediction: PathBuf,

    /// Seed for reproducible output
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Replace an existing prediction root
    #[arg(long)]
    pub overwrite: bool,

    /// Number of action classes to draw from
    #[arg(long, value_name = "N", default_value_t = 8)]
    pub action_classes: usize,

    /// Number of segmentation classes, background excluded
    #[arg(long, value_name = "N", default_value_t = 9)]
    pub segmentation_classes: usize,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl GenerateArgs {
    /// Execute the generate command
    pub fn execute(&self) -> Result<()> {
        require_dir(&self.reference)?;
        init_logging(self.verbose, false, None)?;

        println!("Generating mock predictions...");
        println!("  Reference: {}", self.reference.display());
        println!("  Output: {}", self.prediction.display());

        let mut generator =
            MockGenerator::new(self.action_classes, self.segmentation_classes, self.seed)?;
        let summary = generator
            .generate(&self.reference, &self.prediction, self.overwrite)
            .with_context(|| {
                format!("Failed to generate predictions in {}", self.prediction.display())
            })?;

        println!(
            "✓ Wrote {} videos ({} action files, {} masks)",
            summary.videos, summary.action_files, summary.masks
        );
        Ok(())
    }
}
