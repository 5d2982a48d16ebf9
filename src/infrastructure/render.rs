//! MR 노트용 Markdown 렌더링 모듈.
//!
//! 모든 본문 끝에 `[View in SonarQube](...)` 링크를 붙인다. 이 링크가 다음 실행에서
//! 노트 소유 이슈/요약을 복원하는 근거이므로 형식을 바꾸면 기존 토론과 매칭되지 않는다.

use std::collections::BTreeMap;

use crate::domain::decoration::{AnalysisReport, ReportedIssue};
use crate::domain::policy::{dashboard_url, issue_url, markdown_link};

/// 품질 게이트/이슈 수/커버리지를 담은 요약 노트 본문을 생성한다.
pub fn render_summary_markdown(report: &AnalysisReport, pull_request: &str) -> String {
    let mut out = String::new();
    if report.quality_gate.is_passing() {
        out.push_str("**Quality Gate passed**\n\n");
    } else {
        out.push_str("**Quality Gate failed**\n\n");
    }

    let open: Vec<&ReportedIssue> = report.reportable_issues().collect();
    out.push_str(&format!("- {} open {}\n", open.len(), plural(open.len(), "issue", "issues")));

    let mut by_severity: BTreeMap<&str, usize> = BTreeMap::new();
    for issue in &open {
        *by_severity
            .entry(issue.severity.as_deref().unwrap_or("UNKNOWN"))
            .or_default() += 1;
    }
    for (severity, count) in &by_severity {
        out.push_str(&format!("  - {severity}: {count}\n"));
    }

    let general = open.iter().filter(|i| i.line.is_none()).count();
    if general > 0 {
        out.push_str(&format!("- {general} without a source line (not annotated inline)\n"));
    }

    match report.new_coverage {
        Some(coverage) => out.push_str(&format!("- Coverage on new code: {coverage:.1}%\n")),
        None => out.push_str("- Coverage on new code: n/a\n"),
    }

    out.push('\n');
    out.push_str(&markdown_link(&dashboard_url(
        &report.server_url,
        &report.project_key,
        pull_request,
    )));
    out
}

/// 개별 이슈 노트 본문을 생성한다.
pub fn render_issue_markdown(
    report: &AnalysisReport,
    pull_request: &str,
    issue: &ReportedIssue,
) -> String {
    let mut out = String::new();
    if let Some(severity) = issue.severity.as_deref() {
        out.push_str(&format!("**{severity}**: "));
    }
    out.push_str(issue.message.trim());
    if let Some(rule) = issue.rule.as_deref() {
        out.push_str(&format!(" (`{rule}`)"));
    }
    out.push_str("\n\n");
    out.push_str(&markdown_link(&issue_url(
        &report.server_url,
        &report.project_key,
        pull_request,
        &issue.key,
    )));
    out
}

fn plural<'s>(n: usize, one: &'s str, many: &'s str) -> &'s str {
    if n == 1 { one } else { many }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::identity::{MatchTarget, parse_link};

    fn report() -> AnalysisReport {
        serde_json::from_str(
            r#"{
                "project_key": "proj",
                "server_url": "https://sonar.local",
                "commit_sha": "abc",
                "quality_gate": "ERROR",
                "new_coverage": 71.25,
                "issues": [
                    {"key": "K1", "status": "OPEN", "line": 3, "scm_path": "a.rs", "message": "bad", "severity": "MAJOR", "rule": "rust:S1"},
                    {"key": "K2", "status": "FIXED", "line": 4, "scm_path": "a.rs", "message": "gone"},
                    {"key": "K3", "status": "CONFIRMED", "message": "file level", "severity": "MINOR"}
                ]
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn summary_counts_reportable_issues_and_carries_marker() {
        let body = render_summary_markdown(&report(), "7");
        assert!(body.starts_with("**Quality Gate failed**"));
        assert!(body.contains("- 2 open issues"));
        assert!(body.contains("  - MAJOR: 1"));
        assert!(body.contains("- 1 without a source line"));
        assert!(body.contains("71.2%") || body.contains("71.3%"));
        assert!(parse_link(&body).unwrap().matches(MatchTarget::Summary));
    }

    #[test]
    fn issue_note_is_matchable_by_key() {
        let report = report();
        let body = render_issue_markdown(&report, "7", &report.issues[0]);
        assert!(body.starts_with("**MAJOR**: bad (`rust:S1`)"));
        let link = parse_link(&body).unwrap();
        assert!(link.matches(MatchTarget::Issue("K1")));
        assert!(!link.matches(MatchTarget::Summary));
    }
}
