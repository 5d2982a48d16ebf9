#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, bail};
use async_trait::async_trait;

use mr_decorator::application::ports::{
    MergeRequestPlatform, ReportFormatter, Reporter, ScmBlame,
};
use mr_decorator::domain::decoration::{
    AnalysisReport, DecorationSettings, IssueStatus, QualityGateStatus, ReportedIssue,
};
use mr_decorator::domain::merge_request::{
    DiffRefs, MergeRequestRef, OutboundNote, PipelineStatus, RemoteDiscussion, RemoteNote, User,
};
use mr_decorator::domain::policy::{dashboard_url, issue_url, markdown_link};

pub const BOT: &str = "sonar-bot";
pub const PROJECT_KEY: &str = "proj";
pub const SERVER: &str = "https://sonar.local";
pub const SOURCE_PROJECT: u64 = 11;
pub const TARGET_PROJECT: u64 = 22;
pub const IID: u64 = 123;

/// 플랫폼에 보낸 변경 요청 기록.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateDiscussion {
        project_id: u64,
        note: OutboundNote,
    },
    AddNote {
        discussion_id: String,
        body: String,
    },
    EditNote {
        discussion_id: String,
        note_id: u64,
        body: String,
    },
    DeleteNote {
        discussion_id: String,
        note_id: u64,
    },
    Resolve {
        discussion_id: String,
    },
    PipelineStatus {
        project_id: u64,
        sha: String,
        status: PipelineStatus,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailAt {
    FetchMergeRequest,
    FetchUser,
    FetchCommits,
    FetchDiscussions,
    CreateDiscussion,
    AddNote,
    EditNote,
    DeleteNote,
    Resolve,
    PipelineStatus,
}

pub struct FakePlatform {
    pub merge_request: MergeRequestRef,
    pub user: User,
    pub commits: Vec<String>,
    pub discussions: Vec<RemoteDiscussion>,
    pub fail_at: Option<FailAt>,
    calls: Mutex<Vec<Call>>,
    created: Mutex<u64>,
}

impl FakePlatform {
    pub fn new(discussions: Vec<RemoteDiscussion>) -> Self {
        Self {
            merge_request: MergeRequestRef {
                iid: IID,
                source_project_id: SOURCE_PROJECT,
                target_project_id: TARGET_PROJECT,
                diff_refs: diff_refs(),
                web_url: format!("https://gitlab.local/group/app/-/merge_requests/{IID}"),
            },
            user: User {
                username: BOT.to_string(),
            },
            commits: vec!["ABC".into(), "DEF".into(), "GHI".into(), "JKL".into()],
            discussions,
            fail_at: None,
            calls: Mutex::new(Vec::new()),
            created: Mutex::new(0),
        }
    }

    pub fn failing_at(mut self, fail_at: FailAt) -> Self {
        self.fail_at = Some(fail_at);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    /// 빌드 상태를 제외한 토론 변경 호출.
    pub fn discussion_calls(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::PipelineStatus { .. }))
            .collect()
    }

    /// 이번 실행에서 생성된 토론을 다음 실행의 원격 상태로 되돌려 준다.
    pub fn created_discussions(&self) -> Vec<RemoteDiscussion> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::CreateDiscussion { note, .. } => Some(note),
                _ => None,
            })
            .enumerate()
            .map(|(n, note)| {
                discussion(
                    &format!("new-{}", n + 1),
                    vec![bot_note(1000 + n as u64 + 1, note_body(&note))],
                )
            })
            .collect()
    }

    fn check(&self, point: FailAt) -> Result<()> {
        if self.fail_at == Some(point) {
            bail!("transport error at {point:?}");
        }
        Ok(())
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl MergeRequestPlatform for FakePlatform {
    async fn fetch_merge_request(&self, _project_path: &str, _iid: u64) -> Result<MergeRequestRef> {
        self.check(FailAt::FetchMergeRequest)?;
        Ok(self.merge_request.clone())
    }

    async fn fetch_current_user(&self) -> Result<User> {
        self.check(FailAt::FetchUser)?;
        Ok(self.user.clone())
    }

    async fn fetch_commits(&self, _project_id: u64, _iid: u64) -> Result<Vec<String>> {
        self.check(FailAt::FetchCommits)?;
        Ok(self.commits.clone())
    }

    async fn fetch_discussions(&self, _project_id: u64, _iid: u64) -> Result<Vec<RemoteDiscussion>> {
        self.check(FailAt::FetchDiscussions)?;
        Ok(self.discussions.clone())
    }

    async fn create_discussion(
        &self,
        project_id: u64,
        _iid: u64,
        note: &OutboundNote,
    ) -> Result<RemoteDiscussion> {
        self.check(FailAt::CreateDiscussion)?;
        self.record(Call::CreateDiscussion {
            project_id,
            note: note.clone(),
        });
        let mut created = self.created.lock().unwrap();
        *created += 1;
        Ok(discussion(
            &format!("new-{created}"),
            vec![bot_note(1000 + *created, note_body(note))],
        ))
    }

    async fn add_note(
        &self,
        _project_id: u64,
        _iid: u64,
        discussion_id: &str,
        body: &str,
    ) -> Result<()> {
        self.check(FailAt::AddNote)?;
        self.record(Call::AddNote {
            discussion_id: discussion_id.to_string(),
            body: body.to_string(),
        });
        Ok(())
    }

    async fn edit_note(
        &self,
        _project_id: u64,
        _iid: u64,
        discussion_id: &str,
        note_id: u64,
        body: &str,
    ) -> Result<()> {
        self.check(FailAt::EditNote)?;
        self.record(Call::EditNote {
            discussion_id: discussion_id.to_string(),
            note_id,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn delete_note(
        &self,
        _project_id: u64,
        _iid: u64,
        discussion_id: &str,
        note_id: u64,
    ) -> Result<()> {
        self.check(FailAt::DeleteNote)?;
        self.record(Call::DeleteNote {
            discussion_id: discussion_id.to_string(),
            note_id,
        });
        Ok(())
    }

    async fn resolve_discussion(&self, _project_id: u64, _iid: u64, discussion_id: &str) -> Result<()> {
        self.check(FailAt::Resolve)?;
        self.record(Call::Resolve {
            discussion_id: discussion_id.to_string(),
        });
        Ok(())
    }

    async fn push_pipeline_status(
        &self,
        project_id: u64,
        sha: &str,
        status: &PipelineStatus,
    ) -> Result<()> {
        self.check(FailAt::PipelineStatus)?;
        self.record(Call::PipelineStatus {
            project_id,
            sha: sha.to_string(),
            status: status.clone(),
        });
        Ok(())
    }
}

/// `(path, line)`별 blame 결과. 등록되지 않은 라인은 커밋을 찾지 못한 것으로 본다.
#[derive(Default)]
pub struct ScriptedBlame {
    revisions: HashMap<(String, u32), Result<String, String>>,
}

impl ScriptedBlame {
    pub fn with(mut self, path: &str, line: u32, revision: &str) -> Self {
        self.revisions
            .insert((path.to_string(), line), Ok(revision.to_string()));
        self
    }

    pub fn failing(mut self, path: &str, line: u32) -> Self {
        self.revisions
            .insert((path.to_string(), line), Err("blame exploded".to_string()));
        self
    }
}

#[async_trait]
impl ScmBlame for ScriptedBlame {
    async fn changeset_for_line(&self, path: &str, line: u32) -> Result<Option<String>> {
        match self.revisions.get(&(path.to_string(), line)) {
            Some(Ok(revision)) => Ok(Some(revision.clone())),
            Some(Err(msg)) => bail!("{msg}"),
            None => Ok(None),
        }
    }
}

/// 링크만 실제 규칙을 따르는 고정 문구 포매터.
pub struct FixedFormatter;

impl ReportFormatter for FixedFormatter {
    fn format_summary(&self, report: &AnalysisReport, pull_request: &str) -> String {
        format!(
            "summary\n{}",
            markdown_link(&dashboard_url(&report.server_url, &report.project_key, pull_request))
        )
    }

    fn format_issue(
        &self,
        report: &AnalysisReport,
        pull_request: &str,
        issue: &ReportedIssue,
    ) -> String {
        issue_body_for(report, pull_request, &issue.key)
    }
}

/// 마커 링크가 없던 시절의 요약 문구를 흉내 내는 포매터.
pub struct LinklessFormatter;

pub const LINKLESS_SUMMARY: &str = "Analysis summary without a link";

impl ReportFormatter for LinklessFormatter {
    fn format_summary(&self, _report: &AnalysisReport, _pull_request: &str) -> String {
        LINKLESS_SUMMARY.to_string()
    }

    fn format_issue(
        &self,
        report: &AnalysisReport,
        pull_request: &str,
        issue: &ReportedIssue,
    ) -> String {
        issue_body_for(report, pull_request, &issue.key)
    }
}

pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn section(&self, _name: &str) {}
    fn kv(&self, _key: &str, _value: &str) {}
    fn status(&self, _scope: &str, _message: &str) {}
}

pub fn note_body(note: &OutboundNote) -> &str {
    match note {
        OutboundNote::General { body } => body,
        OutboundNote::Line { body, .. } => body,
    }
}

pub fn diff_refs() -> DiffRefs {
    DiffRefs {
        base_sha: "baseSha".to_string(),
        start_sha: "startSha".to_string(),
        head_sha: "headSha".to_string(),
    }
}

pub fn issue_body_for(report: &AnalysisReport, pull_request: &str, key: &str) -> String {
    format!(
        "issue {key}\n{}",
        markdown_link(&issue_url(&report.server_url, &report.project_key, pull_request, key))
    )
}

pub fn issue_body(key: &str) -> String {
    format!(
        "issue {key}\n{}",
        markdown_link(&issue_url(SERVER, PROJECT_KEY, &IID.to_string(), key))
    )
}

pub fn summary_body() -> String {
    format!(
        "summary\n{}",
        markdown_link(&dashboard_url(SERVER, PROJECT_KEY, &IID.to_string()))
    )
}

pub fn note(id: u64, author: &str, body: &str) -> RemoteNote {
    RemoteNote {
        id,
        author: User {
            username: author.to_string(),
        },
        body: body.to_string(),
        resolvable: true,
        resolved: false,
        system: false,
    }
}

pub fn bot_note(id: u64, body: &str) -> RemoteNote {
    note(id, BOT, body)
}

pub fn discussion(id: &str, notes: Vec<RemoteNote>) -> RemoteDiscussion {
    RemoteDiscussion {
        id: id.to_string(),
        notes,
    }
}

pub fn issue(key: &str, line: Option<u32>, path: Option<&str>) -> ReportedIssue {
    ReportedIssue {
        key: key.to_string(),
        status: IssueStatus::Open,
        line,
        scm_path: path.map(ToString::to_string),
        message: format!("message for {key}"),
        severity: Some("MAJOR".to_string()),
        rule: None,
    }
}

pub fn report(quality_gate: QualityGateStatus, issues: Vec<ReportedIssue>) -> AnalysisReport {
    AnalysisReport {
        project_key: PROJECT_KEY.to_string(),
        server_url: SERVER.to_string(),
        commit_sha: "commitSha".to_string(),
        quality_gate,
        new_coverage: Some(85.5),
        issues,
    }
}

pub fn settings() -> DecorationSettings {
    DecorationSettings::default()
}
