//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use std::path::Path;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::{Config, HostConfig};
use crate::domain::decoration::{AnalysisReport, ReportedIssue};
use crate::domain::merge_request::{
    MergeRequestRef, OutboundNote, PipelineStatus, RemoteDiscussion, User,
};
use crate::domain::target::MergeRequestTarget;

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    fn inspect_pretty_json(&self) -> Result<String>;
}

/// URL 입력값을 도메인 대상 식별자로 변환하는 포트.
pub trait TargetResolver: Send + Sync {
    fn parse(&self, input: &str) -> Result<MergeRequestTarget>;
}

/// 호스트 토큰 해석 결과.
#[derive(Debug, Clone)]
pub struct HostTokenResolution {
    pub token: Option<String>,
    /// 토큰 출처 라벨(inline/env:NAME/cmd:...)
    pub source: Option<String>,
}

/// 호스트 설정(token/env/cmd)으로부터 런타임 토큰을 얻는 포트.
pub trait HostTokenResolver: Send + Sync {
    fn resolve(&self, host: &str, host_cfg: Option<&HostConfig>) -> Result<HostTokenResolution>;
}

/// 외부 분석기가 남긴 분석 결과를 읽는 포트.
pub trait AnalysisSource: Send + Sync {
    fn load(&self, path: &Path) -> Result<AnalysisReport>;
}

/// 리뷰 플랫폼(GitLab MR discussions/notes/statuses) 연동 포트.
///
/// 모든 메서드는 전송 실패 시 에러를 반환하며, 호출자는 이를 실행 중단으로 취급한다.
#[async_trait]
pub trait MergeRequestPlatform: Send + Sync {
    async fn fetch_merge_request(&self, project_path: &str, iid: u64) -> Result<MergeRequestRef>;
    /// 노트 작성자(봇 계정) 식별.
    async fn fetch_current_user(&self) -> Result<User>;
    /// MR에 포함된 커밋 해시 목록(생성 순).
    async fn fetch_commits(&self, project_id: u64, iid: u64) -> Result<Vec<String>>;
    async fn fetch_discussions(&self, project_id: u64, iid: u64) -> Result<Vec<RemoteDiscussion>>;
    async fn create_discussion(
        &self,
        project_id: u64,
        iid: u64,
        note: &OutboundNote,
    ) -> Result<RemoteDiscussion>;
    async fn add_note(
        &self,
        project_id: u64,
        iid: u64,
        discussion_id: &str,
        body: &str,
    ) -> Result<()>;
    async fn edit_note(
        &self,
        project_id: u64,
        iid: u64,
        discussion_id: &str,
        note_id: u64,
        body: &str,
    ) -> Result<()>;
    async fn delete_note(
        &self,
        project_id: u64,
        iid: u64,
        discussion_id: &str,
        note_id: u64,
    ) -> Result<()>;
    async fn resolve_discussion(&self, project_id: u64, iid: u64, discussion_id: &str)
    -> Result<()>;
    async fn push_pipeline_status(
        &self,
        project_id: u64,
        sha: &str,
        status: &PipelineStatus,
    ) -> Result<()>;
}

/// 대상/호스트 설정에 맞는 플랫폼 클라이언트를 생성하는 팩토리 포트.
pub trait VcsFactory: Send + Sync {
    fn build(
        &self,
        target: &MergeRequestTarget,
        host_cfg: Option<&HostConfig>,
        token: Option<String>,
    ) -> Box<dyn MergeRequestPlatform>;
}

/// 소스 라인을 도입한 커밋을 찾는 SCM 포트.
#[async_trait]
pub trait ScmBlame: Send + Sync {
    /// 찾지 못하면 `Ok(None)`.
    async fn changeset_for_line(&self, path: &str, line: u32) -> Result<Option<String>>;
}

pub trait ScmFactory: Send + Sync {
    fn build(&self, repo_dir: &Path) -> Box<dyn ScmBlame>;
}

/// 요약/이슈 노트 본문 생성 포트.
pub trait ReportFormatter: Send + Sync {
    fn format_summary(&self, report: &AnalysisReport, pull_request: &str) -> String;
    fn format_issue(
        &self,
        report: &AnalysisReport,
        pull_request: &str,
        issue: &ReportedIssue,
    ) -> String;
}

/// 콘솔/로그 출력 추상화 포트.
pub trait Reporter: Send + Sync {
    fn section(&self, name: &str);
    fn kv(&self, key: &str, value: &str);
    fn status(&self, scope: &str, message: &str);
}
