//! CLI command implementations

use clap::Subcommand;
use rarpeval_engine::{DatasetSummary, Metric, Tasks, SEGMENTATION_CLASS_NAMES};

pub mod evaluate;
pub mod generate;
pub mod generate_config;
pub mod validate;

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Validate and score a prediction set
    Evaluate(evaluate::EvaluateArgs),

    /// Check a prediction set's structure without scoring it
    Validate(validate::ValidateArgs),

    /// Write random predictions mirroring a reference set
    Generate(generate::GenerateArgs),

    /// Write a configuration template
    GenerateConfig(generate_config::GenerateConfigArgs),

    /// List available components
    List {
        #[command(subcommand)]
        subcommand: ListCommands,
    },
}

/// List subcommands
#[derive(Debug, Subcommand)]
pub enum ListCommands {
    /// List reported metrics
    Metrics,

    /// List segmentation class names
    Classes,
}

impl Commands {
    /// Run the selected command
    pub fn execute(&self) -> anyhow::Result<()> {
        match self {
            Commands::Evaluate(args) => args.execute(),
            Commands::Validate(args) => args.execute(),
            Commands::Generate(args) => args.execute(),
            Commands::GenerateConfig(args) => args.execute(),
            Commands::List { subcommand } => {
                subcommand.execute();
                Ok(())
            }
        }
    }
}

impl ListCommands {
    /// Print the listing
    pub fn execute(&self) {
        for line in self.lines() {
            println!("{line}");
        }
    }

    fn lines(&self) -> Vec<String> {
        match self {
            ListCommands::Metrics => {
                let mut lines = vec!["Reported metrics:".to_string()];
                for metric in Metric::for_tasks(Tasks::default(), 10) {
                    lines.push(format!(
                        "  {:<18} {}",
                        metric.column_name(),
                        metric.description()
                    ));
                }
                lines.push(format!(
                    "  {:<18} {}",
                    DatasetSummary::SEGMENTATION_SCORE,
                    "geometric mean of seg_mIoU and seg_mNSD over the dataset"
                ));
                lines.push(format!(
                    "  {:<18} {}",
                    DatasetSummary::ACTION_SCORE,
                    "geometric mean of ar_acc and ar_f1 over the dataset"
                ));
                lines
            }
            ListCommands::Classes => {
                let mut lines = vec![
                    "Segmentation classes:".to_string(),
                    "  0  Background".to_string(),
                ];
                for (i, name) in SEGMENTATION_CLASS_NAMES.iter().enumerate() {
                    lines.push(format!("  {}  {name}", i + 1));
                }
                lines
            }
        }
    }
}
