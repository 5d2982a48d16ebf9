//! 아직 토론이 없는 보고 이슈에 라인 토론을 만드는 단계.

use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::application::usecases::decorate_mr::{
    MergeRequestDecorator, context::DecorationContext,
};
use crate::domain::decoration::ReportedIssue;
use crate::domain::merge_request::OutboundNote;

/// 이슈 순서는 분석 결과의 순서를 그대로 따른다.
pub(super) async fn create_missing_discussions(
    decorator: &MergeRequestDecorator<'_>,
    ctx: &DecorationContext<'_>,
) -> Result<()> {
    decorator.reporter.section("Issue Discussions");

    let mut represented: HashSet<String> = ctx
        .discussions
        .iter()
        .filter_map(|d| d.class.represented_issue())
        .map(ToString::to_string)
        .collect();

    let mut created = 0usize;
    for issue in ctx.report.reportable_issues() {
        // 라인이 없는 이슈는 요약에만 포함된다.
        let (Some(line), Some(path)) = (issue.line, issue.scm_path.as_deref()) else {
            continue;
        };
        if represented.contains(&issue.key) {
            continue;
        }
        if !anchorable(decorator, ctx, issue, path, line).await? {
            continue;
        }

        let body = decorator
            .formatter
            .format_issue(ctx.report, &ctx.pull_request, issue);
        let note = OutboundNote::line(body, ctx.merge_request.diff_refs.clone(), path, line);
        decorator
            .platform
            .create_discussion(ctx.project_id(), ctx.iid(), &note)
            .await
            .context("Could not submit commit comment to Gitlab")?;

        decorator
            .reporter
            .status("Issue", &format!("{} -> {}:{}", issue.key, path, line));
        represented.insert(issue.key.clone());
        created += 1;
    }

    decorator.reporter.kv("Created", &created.to_string());
    Ok(())
}

/// blame 결과가 이 MR의 커밋일 때만 diff 위치에 고정할 수 있다.
/// 라인을 커밋으로 옮길 수 없으면 건너뛰고, SCM 자체의 실패는 실행을 중단한다.
async fn anchorable(
    decorator: &MergeRequestDecorator<'_>,
    ctx: &DecorationContext<'_>,
    issue: &ReportedIssue,
    path: &str,
    line: u32,
) -> Result<bool> {
    let revision = decorator
        .scm
        .changeset_for_line(path, line)
        .await
        .with_context(|| format!("Could not retrieve changeset for {path}:{line}"))?;
    let Some(revision) = revision else {
        tracing::debug!(issue = %issue.key, path, line, "no changeset for line");
        return Ok(false);
    };

    if !ctx.commits.iter().any(|c| *c == revision) {
        tracing::debug!(issue = %issue.key, %revision, "changeset is outside the merge request");
        return Ok(false);
    }
    Ok(true)
}
