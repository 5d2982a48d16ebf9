//! 실행 시작 시 원격 상태 스냅샷을 가져와 토론을 분류하는 단계.

use anyhow::{Context, Result};

use crate::application::usecases::decorate_mr::{DecorationRequest, MergeRequestDecorator};
use crate::domain::classify::{ClassifyContext, DiscussionClass, classify};
use crate::domain::decoration::{AnalysisReport, DecorationSettings};
use crate::domain::merge_request::MergeRequestRef;
use crate::domain::target::parse_merge_request_id;

/// 분류가 끝난 원격 토론. 이후 단계는 `class`만 본다.
#[derive(Debug, Clone)]
pub(super) struct ClassifiedDiscussion {
    pub id: String,
    pub class: DiscussionClass,
}

/// 데코레이션 전 구간에서 공유되는 실행 상태(읽기 전용 스냅샷).
pub(super) struct DecorationContext<'r> {
    pub report: &'r AnalysisReport,
    pub settings: &'r DecorationSettings,
    pub merge_request: MergeRequestRef,
    /// 링크/상태 URL에 쓰는 MR 번호 문자열
    pub pull_request: String,
    pub commits: Vec<String>,
    pub discussions: Vec<ClassifiedDiscussion>,
    pub summary_body: String,
}

impl DecorationContext<'_> {
    /// 토론 API 대상 프로젝트.
    pub fn project_id(&self) -> u64 {
        self.merge_request.target_project_id
    }

    pub fn iid(&self) -> u64 {
        self.merge_request.iid
    }
}

/// MR/사용자/커밋/토론을 순서대로 가져온다. 이후에는 다시 조회하지 않는다.
pub(super) async fn load_snapshot<'r>(
    decorator: &MergeRequestDecorator<'_>,
    request: &DecorationRequest<'r>,
) -> Result<DecorationContext<'r>> {
    let iid = parse_merge_request_id(request.merge_request_id)?;

    decorator.reporter.section("Fetch Merge Request");
    let merge_request = decorator
        .platform
        .fetch_merge_request(request.project_path, iid)
        .await
        .context("Could not retrieve Merge Request details")?;
    decorator.reporter.kv("MR", &merge_request.web_url);

    let machine = decorator
        .platform
        .fetch_current_user()
        .await
        .context("Could not retrieve current user details")?;
    decorator.reporter.kv("User", &machine.username);

    let commits = decorator
        .platform
        .fetch_commits(merge_request.target_project_id, merge_request.iid)
        .await
        .context("Could not retrieve commit details for Merge Request")?;
    decorator.reporter.kv("Commits", &commits.len().to_string());

    let remote = decorator
        .platform
        .fetch_discussions(merge_request.target_project_id, merge_request.iid)
        .await
        .context("Could not retrieve Merge Request discussions")?;

    let pull_request = merge_request.iid.to_string();
    let summary_body = decorator
        .formatter
        .format_summary(request.report, &pull_request);

    let classify_ctx = ClassifyContext {
        machine: &machine,
        project_key: &request.report.project_key,
        summary_body: Some(summary_body.as_str()),
    };
    let discussions: Vec<ClassifiedDiscussion> = remote
        .iter()
        .map(|d| ClassifiedDiscussion {
            id: d.id.clone(),
            class: classify(d, &classify_ctx),
        })
        .collect();

    let owned = discussions
        .iter()
        .filter(|d| d.class != DiscussionClass::Unrelated)
        .count();
    decorator
        .reporter
        .kv("Discussions", &format!("{} ({} owned)", discussions.len(), owned));
    tracing::debug!(?discussions, "classified discussions");

    Ok(DecorationContext {
        report: request.report,
        settings: request.settings,
        merge_request,
        pull_request,
        commits,
        discussions,
        summary_body,
    })
}
