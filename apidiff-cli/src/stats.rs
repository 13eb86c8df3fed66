//! Run statistics.
//!
//! Collected for every run and written to the debug log when the run ends.
//! Nothing is sent anywhere.

use std::time::{Duration, Instant};

use serde::Serialize;

use crate::load::Source;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LoadBase,
    LoadRevision,
    Diff,
    Summary,
    Render,
}

/// Where one of the two documents came from.
#[derive(Debug, Clone, Serialize)]
pub struct SourceInfo {
    pub protocol: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extension: Option<String>,
}

impl From<&Source> for SourceInfo {
    fn from(source: &Source) -> Self {
        Self {
            protocol: source.protocol(),
            extension: source.extension(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub base: SourceInfo,
    pub revision: SourceInfo,
    /// Elapsed time per completed stage, in completion order.
    pub timings: Vec<(Stage, Duration)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_empty: Option<bool>,
    pub status: u8,
    #[serde(skip)]
    started: Option<Instant>,
}

impl RunStats {
    pub fn new(base: &Source, revision: &Source) -> Self {
        Self {
            base: base.into(),
            revision: revision.into(),
            timings: Vec::new(),
            diff_empty: None,
            status: 0,
            started: Some(Instant::now()),
        }
    }

    pub fn record(&mut self, stage: Stage, started: Instant) {
        self.timings.push((stage, started.elapsed()));
    }

    pub fn duration(&self, stage: Stage) -> Option<Duration> {
        self.timings
            .iter()
            .find(|(recorded, _)| *recorded == stage)
            .map(|(_, elapsed)| *elapsed)
    }

    /// Log the collected statistics with the final exit status.
    pub fn finish(mut self, status: u8) {
        self.status = status;
        let total = self.started.map(|started| started.elapsed()).unwrap_or_default();
        let diff_us = self.duration(Stage::Diff).map_or(0, |elapsed| elapsed.as_micros() as u64);
        match serde_json::to_string(&self) {
            Ok(stats) => tracing::debug!(
                total_ms = total.as_millis() as u64,
                diff_us,
                %stats,
                "run finished"
            ),
            Err(e) => tracing::debug!("Failed to serialize run statistics: {}", e),
        }
    }
}
