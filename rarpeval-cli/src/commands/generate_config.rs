//! Generate config command implementation

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

/// Arguments for the generate-config command
#[derive(Debug, Args)]
pub struct GenerateConfigArgs {
    /// Output file path
    #[arg(short, long, value_name = "FILE", default_value = "rarpeval.toml")]
    pub output: PathBuf,

    /// Replace an existing file
    #[arg(long)]
    pub force: bool,
}

impl GenerateConfigArgs {
    /// Execute the generate-config command
    pub fn execute(&self) -> Result<()> {
        use std::fs;

        if self.output.exists() && !self.force {
            anyhow::bail!(
                "{} already exists (use --force to replace it)",
                self.output.display()
            );
        }

        println!("Generating configuration template...");
        println!("  Output file: {}", self.output.display());

        fs::write(&self.output, Self::template())
            .with_context(|| format!("Failed to write to {}", self.output.display()))?;

        println!("✓ Configuration template generated successfully!");
        println!();
        println!("Next steps:");
        println!("1. Edit the configuration file to match your evaluation setup");
        println!("2. Use it for scoring:");
        println!(
            "   rarpeval evaluate TEST_DIR PREDICTION_DIR --config {}",
            self.output.display()
        );

        Ok(())
    }

    /// Template configuration content, every value at its default
    pub fn template() -> &'static str {
        r#"# rarpeval configuration
#
# Command-line flags override the values below.

[evaluation]
# Tasks to score: "all", "segmentation" or "actions"
tasks = "all"

# Instrument classes in the masks, background (0) excluded
segmentation_classes = 9

# Action classes in action_discrete.txt
action_classes = 8

# Boundary tolerance of the normalized surface distance, in pixels
nsd_tolerance = 10.0

# Minimum segment IoU, in percent, for an F1 match
f1_overlap = 10

# Action label skipped by segment matching (unset = none)
# background_action = 0

[output]
# Directory for result tables (unset = the prediction directory)
# directory = "results"

# Write <video>_class_stats_iou.csv and _nsd.csv per video
class_statistics = false

# Append the run log to evaluation.log in the prediction directory
log_file = true

# Summary printed to stdout: "text", "json" or "markdown"
summary_format = "text"

[performance]
# Worker threads (0 = all cores)
worker_threads = 0
"#
    }
}
