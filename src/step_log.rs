use crate::error::Result;
use crate::scheduler::StopReason;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// What happened in one scheduler step
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum StepEvent {
    /// Cell became a sensor
    Accepted {
        id: i32,
        x: i32,
        y: i32,
        newly_covered: usize,
        covered_total: usize,
    },
    /// Cell failed the placement constraint and left the queue
    Rejected { id: i32 },
    /// Run stopped
    Finished { reason: StopReason },
}

/// Logged event with its position in the run
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoggedStep {
    pub step: usize,
    pub event: StepEvent,
}

/// Ordered record of scheduler steps.
///
/// Rejections are always counted. Their individual entries are kept only
/// while `record_rejections` is on, so step numbers may have gaps.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StepLog {
    steps: Vec<LoggedStep>,
    #[serde(skip)]
    record_rejections: bool,
    #[serde(skip)]
    step_count: usize,
    #[serde(skip)]
    rejected: usize,
}

impl Default for StepLog {
    fn default() -> Self {
        StepLog {
            steps: Vec::new(),
            record_rejections: true,
            step_count: 0,
            rejected: 0,
        }
    }
}

impl StepLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Log that counts rejections without storing them
    pub fn without_rejections() -> Self {
        StepLog {
            record_rejections: false,
            ..Self::default()
        }
    }

    pub fn records_rejections(&self) -> bool {
        self.record_rejections
    }

    pub fn log(&mut self, event: StepEvent) {
        let step = self.step_count;
        self.step_count += 1;
        if let StepEvent::Rejected { .. } = event {
            self.rejected += 1;
            if !self.record_rejections {
                return;
            }
        }
        self.steps.push(LoggedStep { step, event });
    }

    pub fn steps(&self) -> &[LoggedStep] {
        &self.steps
    }

    /// Stored entries
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Steps logged, stored or not
    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn accepted_count(&self) -> usize {
        self.steps
            .iter()
            .filter(|s| matches!(s.event, StepEvent::Accepted { .. }))
            .count()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        self.steps.iter().rev().find_map(|s| match s.event {
            StepEvent::Finished { reason } => Some(reason),
            _ => None,
        })
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.steps)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let steps: Vec<LoggedStep> = serde_json::from_str(&json)?;
        let step_count = steps.last().map_or(0, |s| s.step + 1);
        let rejected = steps
            .iter()
            .filter(|s| matches!(s.event, StepEvent::Rejected { .. }))
            .count();
        Ok(StepLog {
            steps,
            step_count,
            rejected,
            ..Self::default()
        })
    }

    pub fn summary(&self) -> String {
        let reason = match self.stop_reason() {
            Some(reason) => reason.to_string(),
            None => "running".to_string(),
        };
        format!(
            "{} steps: {} accepted, {} rejected, stopped: {}",
            self.step_count,
            self.accepted_count(),
            self.rejected_count(),
            reason
        )
    }
}
