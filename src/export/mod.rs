//! Statistics report generation: one spreadsheet and one slide-deck builder,
//! both returning raw document bytes for the base64 response envelope.

mod pptx;
mod xlsx;

pub use pptx::build_powerpoint;
pub use xlsx::build_excel;

use crate::stats::{QuestionStat, ScoreBucket};

pub const REPORT_TITLE: &str = "攝影問卷系統統計報告";

/// Everything either exporter needs, aggregated once by the handler.
pub struct ReportData<'a> {
    /// Human-readable "start 至 end" range line.
    pub period: String,
    pub total_responses: usize,
    pub total_questions: usize,
    pub avg_score: f64,
    /// Histogram buckets with at least one session, ascending by score.
    pub observed_buckets: &'a [ScoreBucket],
    pub breakdown: &'a [QuestionStat],
}
