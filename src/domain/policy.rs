//! 도메인 정책(고정 안내 문구, 링크 규칙, 빌드 상태 구성).

use url::form_urlencoded::byte_serialize;

use crate::domain::decoration::{AnalysisReport, DecorationSettings};
use crate::domain::merge_request::{PipelineState, PipelineStatus};

/// 사라진 이슈의 토론에 다른 사용자의 댓글이 있어 닫지 못할 때 남기는 안내.
pub const ISSUE_GONE_NOTE: &str = "This issue no longer exists in SonarQube, but due to other comments being present in this discussion, the discussion is not being being closed automatically. Please manually resolve this discussion once the other comments have been reviewed.";

/// 교체된 요약 토론에 다른 사용자의 댓글이 있어 삭제하지 못할 때 남기는 안내.
pub const OUTDATED_SUMMARY_NOTE: &str = "This summary note is outdated, but due to other comments being present in this discussion, the discussion is not being being removed. Please manually resolve this discussion once the other comments have been reviewed.";

/// 이전 실행과의 연결 고리가 되는 링크 라벨.
pub const LINK_LABEL: &str = "View in SonarQube";

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

fn trim_server(server_url: &str) -> &str {
    server_url.trim_end_matches('/')
}

/// MR 단위 분석 대시보드 주소. 요약 마커와 빌드 상태 링크에 함께 쓴다.
pub fn dashboard_url(server_url: &str, project_key: &str, pull_request: &str) -> String {
    format!(
        "{}/dashboard?id={}&pullRequest={}",
        trim_server(server_url),
        encode(project_key),
        encode(pull_request)
    )
}

/// 개별 이슈 주소. `issues` 파라미터가 다음 실행에서 이슈 키를 복원하는 근거다.
pub fn issue_url(server_url: &str, project_key: &str, pull_request: &str, issue_key: &str) -> String {
    format!(
        "{}/project/issues?id={}&pullRequest={}&issues={}&open={}",
        trim_server(server_url),
        encode(project_key),
        encode(pull_request),
        encode(issue_key),
        encode(issue_key)
    )
}

pub fn markdown_link(url: &str) -> String {
    format!("[{LINK_LABEL}]({url})")
}

pub fn pipeline_status(
    report: &AnalysisReport,
    settings: &DecorationSettings,
    pull_request: &str,
) -> PipelineStatus {
    let state = if report.quality_gate.is_passing() {
        PipelineState::Success
    } else {
        PipelineState::Failed
    };

    PipelineStatus {
        name: settings.status_name.clone(),
        description: settings.status_description.clone(),
        state,
        target_url: dashboard_url(&report.server_url, &report.project_key, pull_request),
        coverage: report.new_coverage,
        pipeline_id: settings.pipeline_id,
    }
}

/// 실행 결과로 돌려줄 MR 주소. 설정된 프로젝트 URL이 있으면 우선한다.
pub fn pull_request_url(project_url: Option<&str>, iid: u64, web_url: &str) -> String {
    match project_url {
        Some(base) => format!("{}/merge_requests/{}", base.trim_end_matches('/'), iid),
        None => web_url.to_string(),
    }
}
