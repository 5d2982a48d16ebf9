//! 노트 본문 렌더링 포트 구현 어댑터.

use crate::application::ports::ReportFormatter;
use crate::domain::decoration::{AnalysisReport, ReportedIssue};
use crate::infrastructure::render;

/// 마크다운 노트 렌더링 어댑터.
pub struct MarkdownReportFormatter;

impl ReportFormatter for MarkdownReportFormatter {
    fn format_summary(&self, report: &AnalysisReport, pull_request: &str) -> String {
        render::render_summary_markdown(report, pull_request)
    }

    fn format_issue(
        &self,
        report: &AnalysisReport,
        pull_request: &str,
        issue: &ReportedIssue,
    ) -> String {
        render::render_issue_markdown(report, pull_request, issue)
    }
}
