//! Configuration types for the engine

use crate::error::{EngineError, Result};
use rarpeval_metrics::{Label, OverlapThreshold};

/// Display names of the scored segmentation classes (channel 1 onwards)
pub const SEGMENTATION_CLASS_NAMES: [&str; 9] = [
    "Tool Clasper",
    "Tool Wrist",
    "Tool Shaft",
    "Suturing Needle",
    "Thread",
    "Suction Tool",
    "Needle Holder",
    "Clamps",
    "Catheter",
];

/// Which prediction tasks are scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tasks {
    /// Score segmentation masks (mIoU, mNSD)
    pub segmentation: bool,
    /// Score action labels (accuracy, F1@k)
    pub actions: bool,
}

impl Default for Tasks {
    fn default() -> Self {
        Self {
            segmentation: true,
            actions: true,
        }
    }
}

/// Evaluation configuration
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Enabled tasks
    pub tasks: Tasks,
    /// Scored segmentation classes, background excluded
    pub n_seg_classes: usize,
    /// Number of action classes
    pub n_action_classes: usize,
    /// NSD boundary tolerance in pixels
    pub nsd_tau: f64,
    /// F1 overlap threshold in percent (10 means F1@10)
    pub f1_overlap_percent: u32,
    /// Action label removed before segment matching
    pub background_class: Option<Label>,
    /// Worker threads (None = all cores)
    pub threads: Option<usize>,
    /// Keep per-frame class scores for descriptive statistics
    pub class_statistics: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            tasks: Tasks::default(),
            n_seg_classes: 9,
            n_action_classes: 8,
            nsd_tau: 10.0,
            f1_overlap_percent: 10,
            background_class: None,
            threads: None,
            class_statistics: false,
        }
    }
}

impl EvalConfig {
    /// Create a builder starting from the defaults
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::default()
    }

    /// F1 threshold as a fraction
    pub fn overlap(&self) -> Result<OverlapThreshold> {
        OverlapThreshold::from_percent(self.f1_overlap_percent)
            .map_err(|e| EngineError::Config(e.to_string()))
    }

    /// Reject configurations no evaluation can run with
    pub fn validate(&self) -> Result<()> {
        if !self.tasks.segmentation && !self.tasks.actions {
            return Err(EngineError::Config(
                "at least one of segmentation or actions must be evaluated".to_string(),
            ));
        }
        if self.n_seg_classes == 0 || self.n_action_classes == 0 {
            return Err(EngineError::Config("class counts must be positive".to_string()));
        }
        if self.n_seg_classes > u8::MAX as usize {
            return Err(EngineError::Config(format!(
                "{} segmentation classes do not fit 8-bit masks",
                self.n_seg_classes
            )));
        }
        if !self.nsd_tau.is_finite() || self.nsd_tau < 0.0 {
            return Err(EngineError::Config(format!(
                "NSD tolerance {} must be finite and non-negative",
                self.nsd_tau
            )));
        }
        if self.f1_overlap_percent > 100 {
            return Err(EngineError::Config(format!(
                "F1 overlap {}% is outside 0..=100",
                self.f1_overlap_percent
            )));
        }
        if self.threads == Some(0) {
            return Err(EngineError::Config("thread count must be positive".to_string()));
        }
        Ok(())
    }
}

/// Builder for [`EvalConfig`]
#[derive(Debug, Default)]
pub struct EvalConfigBuilder {
    config: EvalConfig,
}

impl EvalConfigBuilder {
    /// Set both task switches at once
    pub fn tasks(mut self, tasks: Tasks) -> Self {
        self.config.tasks = tasks;
        self
    }

    /// Enable or disable segmentation scoring
    pub fn segmentation(mut self, enabled: bool) -> Self {
        self.config.tasks.segmentation = enabled;
        self
    }

    /// Enable or disable action scoring
    pub fn actions(mut self, enabled: bool) -> Self {
        self.config.tasks.actions = enabled;
        self
    }

    /// Set the number of scored segmentation classes
    pub fn n_seg_classes(mut self, n: usize) -> Self {
        self.config.n_seg_classes = n;
        self
    }

    /// Set the number of action classes
    pub fn n_action_classes(mut self, n: usize) -> Self {
        self.config.n_action_classes = n;
        self
    }

    /// Set the NSD tolerance in pixels
    pub fn nsd_tau(mut self, tau: f64) -> Self {
        self.config.nsd_tau = tau;
        self
    }

    /// Set the F1 overlap threshold in percent
    pub fn f1_overlap_percent(mut self, percent: u32) -> Self {
        self.config.f1_overlap_percent = percent;
        self
    }

    /// Exclude an action label from segment matching
    pub fn background_class(mut self, class: Option<Label>) -> Self {
        self.config.background_class = class;
        self
    }

    /// Set thread count
    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.config.threads = threads;
        self
    }

    /// Keep per-frame class scores
    pub fn class_statistics(mut self, enabled: bool) -> Self {
        self.config.class_statistics = enabled;
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EvalConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EvalConfig::default();
        assert_eq!(config.n_seg_classes, 9);
        assert_eq!(config.n_action_classes, 8);
        assert_eq!(config.nsd_tau, 10.0);
        assert_eq!(config.f1_overlap_percent, 10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_both_tasks_disabled_rejected() {
        let result = EvalConfig::builder()
            .segmentation(false)
            .actions(false)
            .build();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(EvalConfig::builder().nsd_tau(-1.0).build().is_err());
        assert!(EvalConfig::builder().f1_overlap_percent(150).build().is_err());
        assert!(EvalConfig::builder().n_seg_classes(0).build().is_err());
        assert!(EvalConfig::builder().threads(Some(0)).build().is_err());
    }

    #[test]
    fn test_builder_sets_fields() {
        let config = EvalConfig::builder()
            .actions(false)
            .nsd_tau(5.0)
            .f1_overlap_percent(25)
            .threads(Some(2))
            .build()
            .unwrap();
        assert!(!config.tasks.actions);
        assert_eq!(config.overlap().unwrap().value(), 0.25);
        assert_eq!(config.threads, Some(2));
    }
}
