use std::path::PathBuf;

use chrono::{DateTime, Utc};
use realty_data::{quality::QualityReport, summary::ExploratorySummary};
use realty_model::pipeline::EvaluationReport;
use serde::Serialize;

/// Evaluation report as written to disk.
#[derive(Debug, Clone, Serialize)]
pub struct EvaluationRecord {
    pub generated_at: DateTime<Utc>,
    pub input: PathBuf,
    #[serde(flatten)]
    pub report: EvaluationReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryRecord {
    pub generated_at: DateTime<Utc>,
    pub input: PathBuf,
    /// Whether outliers were removed before summarizing.
    pub filtered: bool,
    pub summary: ExploratorySummary,
}

#[derive(Debug, Clone, Serialize)]
pub struct QualityRecord {
    pub generated_at: DateTime<Utc>,
    pub input: PathBuf,
    pub replica_count: usize,
    pub report: QualityReport,
}
