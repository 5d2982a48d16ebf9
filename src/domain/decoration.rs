//! 분석 결과와 데코레이션 실행 옵션/결과 값 객체.

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// GitLab MR URL
    pub url: String,
    /// 분석 결과 JSON 경로
    pub report_path: String,
    /// blame을 수행할 로컬 저장소 경로
    pub repo_dir: String,
    /// `None`이면 설정 파일 값을 따른다.
    pub summary_note_first: Option<bool>,
    pub summary_note_edit: Option<bool>,
    pub pipeline_id: Option<u64>,
    pub project_url: Option<String>,
}

/// 설정 + CLI 옵션을 병합한 최종 데코레이션 정책.
#[derive(Debug, Clone, PartialEq)]
pub struct DecorationSettings {
    /// 요약 노트를 이슈 노트보다 먼저 게시한다.
    pub summary_note_first: bool,
    /// 기존 요약 노트를 교체하지 않고 본문만 수정한다.
    pub summary_note_edit: bool,
    pub project_url: Option<String>,
    pub pipeline_id: Option<u64>,
    pub status_name: String,
    pub status_description: String,
}

impl Default for DecorationSettings {
    fn default() -> Self {
        Self {
            summary_note_first: false,
            summary_note_edit: false,
            project_url: None,
            pipeline_id: None,
            status_name: DEFAULT_STATUS_NAME.to_string(),
            status_description: DEFAULT_STATUS_DESCRIPTION.to_string(),
        }
    }
}

pub const DEFAULT_STATUS_NAME: &str = "SonarQube";
pub const DEFAULT_STATUS_DESCRIPTION: &str = "SonarQube Status";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueStatus {
    Open,
    Confirmed,
    Accepted,
    Fixed,
    FalsePositive,
    InSandbox,
    Reopened,
    Resolved,
    Closed,
}

impl IssueStatus {
    /// 이미 처리되어 토론을 유지할 필요가 없는 상태.
    pub fn is_closeable(self) -> bool {
        matches!(
            self,
            Self::Accepted | Self::Fixed | Self::FalsePositive | Self::Resolved | Self::Closed
        )
    }
}

/// 분석 시점에 보고된 이슈. 엔진은 읽기만 한다.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportedIssue {
    pub key: String,
    pub status: IssueStatus,
    /// 1-based 소스 라인
    #[serde(default)]
    pub line: Option<u32>,
    /// 저장소 루트 기준 파일 경로
    #[serde(default)]
    pub scm_path: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub severity: Option<String>,
    #[serde(default)]
    pub rule: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityGateStatus {
    Ok,
    Warn,
    Error,
    /// 분석기가 게이트 상태를 내보내지 않은 경우(`null` 또는 누락).
    #[default]
    #[serde(skip_deserializing)]
    Missing,
}

impl QualityGateStatus {
    pub fn is_passing(self) -> bool {
        self == Self::Ok
    }
}

/// 외부 분석기가 생성한 분석 결과.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisReport {
    pub project_key: String,
    /// 대시보드/이슈 링크 생성에 쓰는 분석 서버 주소
    pub server_url: String,
    /// 분석 대상 커밋(빌드 상태를 올릴 리비전)
    pub commit_sha: String,
    /// 통과(`OK`)일 때만 요약 토론을 해결하고 빌드 상태를 성공으로 올린다.
    #[serde(default, deserialize_with = "null_as_missing")]
    pub quality_gate: QualityGateStatus,
    #[serde(default)]
    pub new_coverage: Option<f64>,
    #[serde(default)]
    pub issues: Vec<ReportedIssue>,
}

fn null_as_missing<'de, D>(deserializer: D) -> Result<QualityGateStatus, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<QualityGateStatus>::deserialize(deserializer)?.unwrap_or_default())
}

impl AnalysisReport {
    /// 닫힘 상태가 아닌, 현재 보고 대상 이슈.
    pub fn reportable_issues(&self) -> impl Iterator<Item = &ReportedIssue> {
        self.issues.iter().filter(|i| !i.status.is_closeable())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecorationResult {
    pub pull_request_url: String,
}
