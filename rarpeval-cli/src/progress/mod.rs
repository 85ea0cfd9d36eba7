//! Progress reporting for validation and scoring

use indicatif::{ProgressBar, ProgressStyle};
use rarpeval_engine::{DatasetSummary, ValidationReport, VideoScores};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Spinner while validating, then one bar tick per scored video
pub struct ProgressReporter {
    progress_bar: Option<ProgressBar>,
    missing_frames: AtomicUsize,
    quiet: bool,
}

impl ProgressReporter {
    /// Create a new progress reporter
    pub fn new(quiet: bool) -> Self {
        Self {
            progress_bar: None,
            missing_frames: AtomicUsize::new(0),
            quiet,
        }
    }

    /// Show a spinner while the prediction set is checked
    pub fn start_validation(&mut self) {
        if self.quiet {
            return;
        }
        let spinner = ProgressBar::new_spinner();
        spinner.set_message("Validating predictions...");
        spinner.enable_steady_tick(Duration::from_millis(100));
        self.progress_bar = Some(spinner);
    }

    /// Replace the spinner with the validation outcome
    pub fn finish_validation(&mut self, report: &ValidationReport) {
        if let Some(spinner) = self.progress_bar.take() {
            spinner.finish_with_message(validation_line(report));
        }
    }

    /// Start the scoring bar
    pub fn init_videos(&mut self, total_videos: u64) {
        if self.quiet {
            return;
        }

        let pb = ProgressBar::new(total_videos);
        let style = ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} videos {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-");
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));

        self.progress_bar = Some(pb);
    }

    /// Record a scored video; called from worker threads
    pub fn video_completed(&self, video: &VideoScores) {
        let missing = video.segmentation.as_ref().map_or(0, |s| s.missing_frames);
        self.missing_frames.fetch_add(missing, Ordering::Relaxed);
        if let Some(pb) = &self.progress_bar {
            pb.set_message(video_line(video));
            pb.inc(1);
        }
    }

    /// Reference frames scored as empty predictions so far
    pub fn missing_frames(&self) -> usize {
        self.missing_frames.load(Ordering::Relaxed)
    }

    /// Finish the bar with the dataset composites
    pub fn finish(&self, summary: &DatasetSummary) {
        if let Some(pb) = &self.progress_bar {
            pb.finish_with_message(summary_line(summary, self.missing_frames()));
        }
    }

    /// Stop the bar in place after a failure
    pub fn abandon(&self) {
        if let Some(pb) = &self.progress_bar {
            pb.abandon_with_message("Scoring failed");
        }
    }
}

fn validation_line(report: &ValidationReport) -> String {
    if report.is_valid() {
        format!("{} videos validated", report.pairs.len())
    } else {
        format!(
            "{} of {} videos failed validation",
            report.failures.len(),
            report.pairs.len() + report.failures.len()
        )
    }
}

fn video_line(video: &VideoScores) -> String {
    let mut line = video.pair.name.clone();
    if let Some(segmentation) = &video.segmentation {
        line.push_str(&format!(" mIoU {:.4}", segmentation.miou()));
    }
    if let Some(actions) = &video.actions {
        line.push_str(&format!(" acc {:.4}", actions.accuracy));
    }
    line
}

fn summary_line(summary: &DatasetSummary, missing_frames: usize) -> String {
    let composites: Vec<String> = summary
        .entries
        .iter()
        .filter(|entry| {
            entry.name == DatasetSummary::SEGMENTATION_SCORE
                || entry.name == DatasetSummary::ACTION_SCORE
        })
        .map(|entry| format!("{} {:.4}", entry.name, entry.value))
        .collect();
    let mut line = if composites.is_empty() {
        "Complete".to_string()
    } else {
        composites.join(", ")
    };
    if missing_frames > 0 {
        line.push_str(&format!(" ({missing_frames} missing masks)"));
    }
    line
}
