//! Evaluate command implementation

use crate::{
    config::{CliConfig, TaskSelection},
    error::{require_dir, CliError},
    logging::{init_logging, LOG_FILE},
    output::{
        files::{
            write_class_statistics, write_score_table, write_summary, PER_VIDEO_FILE, SUMMARY_FILE,
        },
        SummaryFormat,
    },
    progress::ProgressReporter,
};
use anyhow::{Context, Result};
use clap::Args;
use rarpeval_engine::{EngineError, EvalConfig, Evaluation, Evaluator, Tasks};
use std::path::{Path, PathBuf};

/// Arguments for the evaluate command
#[derive(Debug, Args)]
pub struct EvaluateArgs {
    /// Reference (ground truth) root holding video_* directories
    #[arg(value_name = "TEST_DIR")]
    pub reference: PathBuf,

    /// Prediction root holding video_* directories
    #[arg(value_name = "PREDICTION_DIR")]
    pub prediction: PathBuf,

    /// Tasks to score
    #[arg(short, long, value_enum)]
    pub tasks: Option<TaskSelection>,

    /// Write per-class statistics tables for every video
    #[arg(long)]
    pub class_errors: bool,

    /// NSD boundary tolerance in pixels
    #[arg(long, value_name = "PIXELS")]
    pub nsd_tolerance: Option<f64>,

    /// F1 overlap threshold in percent
    #[arg(long, value_name = "PERCENT")]
    pub f1_overlap: Option<u32>,

    /// Directory for result tables (default: PREDICTION_DIR)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Summary format printed to stdout
    #[arg(short, long, value_enum)]
    pub format: Option<SummaryFormat>,

    /// Do not append to evaluation.log
    #[arg(long)]
    pub no_log_file: bool,

    /// Number of worker threads (0 = all cores)
    #[arg(short = 'j', long, value_name = "N", env = "RARPEVAL_THREADS")]
    pub threads: Option<usize>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,

    /// Increase verbosity
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl EvaluateArgs {
    /// Execute the evaluate command
    pub fn execute(&self) -> Result<()> {
        require_dir(&self.reference)?;
        require_dir(&self.prediction)?;

        let file_config = CliConfig::load_or_default(self.config.as_deref())?;
        let log_file = (!self.no_log_file && file_config.output.log_file)
            .then(|| self.prediction.join(LOG_FILE));
        init_logging(self.verbose, self.quiet, log_file.as_deref())?;

        log::info!("Starting evaluation");
        log::debug!("Arguments: {:?}", self);

        let config = self.eval_config(&file_config)?;
        let threads = config.threads.unwrap_or_else(num_cpus::get);
        log::info!("Using {threads} worker threads");

        let evaluator = Evaluator::new(config)?;
        let evaluation = self.run(&evaluator)?;

        let output_dir = self
            .output_dir
            .clone()
            .or(file_config.output.directory.clone())
            .unwrap_or_else(|| self.prediction.clone());
        self.write_results(&output_dir, &evaluation)?;

        let format = self.format.unwrap_or(file_config.output.summary_format);
        let stdout = std::io::stdout();
        let mut formatter = format.formatter(stdout.lock());
        formatter.format_report(&evaluation.table, &evaluation.summary)?;
        formatter.finish()?;

        log::info!("Evaluation finished");
        Ok(())
    }

    /// Merge command-line flags over file settings
    pub fn eval_config(&self, file: &CliConfig) -> Result<EvalConfig> {
        let evaluation = &file.evaluation;
        let tasks: Tasks = self.tasks.unwrap_or(evaluation.tasks).into();
        let threads = self.threads.unwrap_or(file.performance.worker_threads);

        EvalConfig::builder()
            .tasks(tasks)
            .n_seg_classes(evaluation.segmentation_classes)
            .n_action_classes(evaluation.action_classes)
            .nsd_tau(self.nsd_tolerance.unwrap_or(evaluation.nsd_tolerance))
            .f1_overlap_percent(self.f1_overlap.unwrap_or(evaluation.f1_overlap))
            .background_class(evaluation.background_action)
            .threads((threads > 0).then_some(threads))
            .class_statistics(self.class_errors || file.output.class_statistics)
            .build()
            .map_err(|e| match e {
                EngineError::Config(msg) => CliError::ConfigError(msg).into(),
                other => anyhow::Error::from(other),
            })
    }

    fn run(&self, evaluator: &Evaluator) -> Result<Evaluation> {
        let mut progress = ProgressReporter::new(self.quiet);
        progress.start_validation();
        let report = evaluator
            .validator()
            .validate(&self.reference, &self.prediction)
            .context("Validation failed")?;
        progress.finish_validation(&report);
        if !report.is_valid() {
            for failure in &report.failures {
                eprintln!("✗ {}: {}", failure.video, failure.error);
            }
            return Err(CliError::ValidationFailed(report.failures.len()).into());
        }
        let pairs = report.into_pairs()?;
        log::info!("All {} videos passed validation", pairs.len());

        progress.init_videos(pairs.len() as u64);
        let result =
            evaluator.evaluate_with_progress(&pairs, |video| progress.video_completed(video));
        match result {
            Ok(evaluation) => {
                progress.finish(&evaluation.summary);
                if progress.missing_frames() > 0 {
                    log::warn!(
                        "{} reference masks had no usable prediction and scored as zero",
                        progress.missing_frames()
                    );
                }
                Ok(evaluation)
            }
            Err(e) => {
                progress.abandon();
                Err(e).context("Evaluation failed")
            }
        }
    }

    fn write_results(&self, dir: &Path, evaluation: &Evaluation) -> Result<()> {
        std::fs::create_dir_all(dir)
            .map_err(|e| CliError::OutputError(format!("{}: {e}", dir.display())))?;

        write_score_table(&dir.join(PER_VIDEO_FILE), &evaluation.table)?;
        write_summary(&dir.join(SUMMARY_FILE), &evaluation.summary)?;
        log::info!("Results written to {}", dir.display());

        for video in &evaluation.videos {
            for stats in video.class_statistics() {
                let path = write_class_statistics(dir, &stats)?;
                log::debug!("Class statistics written to {}", path.display());
            }
        }
        Ok(())
    }
}
