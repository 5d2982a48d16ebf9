//! MR당 하나인 요약 토론과 빌드 상태를 갱신하는 단계.

use anyhow::{Context, Result};

use crate::application::usecases::decorate_mr::{
    MergeRequestDecorator, context::DecorationContext,
};
use crate::domain::classify::DiscussionClass;
use crate::domain::merge_request::OutboundNote;
use crate::domain::policy::{OUTDATED_SUMMARY_NOTE, pipeline_status};

struct ExistingSummary<'c> {
    discussion_id: &'c str,
    note_id: u64,
    has_foreign_replies: bool,
    outdated_note_posted: bool,
}

fn existing_summaries<'c>(ctx: &'c DecorationContext<'_>) -> Vec<ExistingSummary<'c>> {
    ctx.discussions
        .iter()
        .filter_map(|d| match d.class {
            DiscussionClass::Summary {
                note_id,
                has_foreign_replies,
                outdated_note_posted,
            } => Some(ExistingSummary {
                discussion_id: &d.id,
                note_id,
                has_foreign_replies,
                outdated_note_posted,
            }),
            _ => None,
        })
        .collect()
}

/// 요약 토론을 생성하거나(기본) 기존 토론을 수정한다.
/// 품질 게이트 통과 시 대상 토론을 해결 처리하며, 이미 해결된 경우에도 다시 요청한다.
pub(super) async fn reconcile_summary(
    decorator: &MergeRequestDecorator<'_>,
    ctx: &DecorationContext<'_>,
) -> Result<()> {
    decorator.reporter.section("Summary");

    let summaries = existing_summaries(ctx);
    let editable = if ctx.settings.summary_note_edit {
        summaries.iter().find(|s| !s.outdated_note_posted)
    } else {
        None
    };

    let discussion_id = match editable {
        Some(existing) => {
            decorator
                .platform
                .edit_note(
                    ctx.project_id(),
                    ctx.iid(),
                    existing.discussion_id,
                    existing.note_id,
                    &ctx.summary_body,
                )
                .await
                .context("Could not edit Merge Request discussion note")?;
            decorator.reporter.status("Summary", "edited in place");
            existing.discussion_id.to_string()
        }
        None => {
            let created = decorator
                .platform
                .create_discussion(
                    ctx.project_id(),
                    ctx.iid(),
                    &OutboundNote::general(ctx.summary_body.clone()),
                )
                .await
                .context("Could not submit summary comment to Gitlab")?;
            decorator.reporter.status("Summary", "created");
            created.id
        }
    };

    for old in summaries.iter().filter(|s| s.discussion_id != discussion_id) {
        retire_summary(decorator, ctx, old).await?;
    }

    if ctx.report.quality_gate.is_passing() {
        decorator
            .platform
            .resolve_discussion(ctx.project_id(), ctx.iid(), &discussion_id)
            .await
            .context("Could not resolve Merge Request discussion")?;
        decorator.reporter.status("Summary", "resolved (quality gate passed)");
    }

    Ok(())
}

/// 교체된 요약: 다른 댓글이 없으면 삭제, 있으면 안내 노트를 한 번만 남긴다.
async fn retire_summary(
    decorator: &MergeRequestDecorator<'_>,
    ctx: &DecorationContext<'_>,
    old: &ExistingSummary<'_>,
) -> Result<()> {
    if old.outdated_note_posted {
        return Ok(());
    }

    if old.has_foreign_replies {
        decorator
            .platform
            .add_note(ctx.project_id(), ctx.iid(), old.discussion_id, OUTDATED_SUMMARY_NOTE)
            .await
            .context("Could not add note to Merge Request discussion")?;
        decorator
            .reporter
            .status("Summary", &format!("marked outdated ({})", old.discussion_id));
    } else {
        decorator
            .platform
            .delete_note(ctx.project_id(), ctx.iid(), old.discussion_id, old.note_id)
            .await
            .context("Could not delete Merge Request discussion note")?;
        decorator
            .reporter
            .status("Summary", &format!("removed old ({})", old.discussion_id));
    }
    Ok(())
}

/// 분석 커밋에 빌드 상태를 올린다(소스 프로젝트 기준).
pub(super) async fn push_pipeline_status(
    decorator: &MergeRequestDecorator<'_>,
    ctx: &DecorationContext<'_>,
) -> Result<()> {
    let status = pipeline_status(ctx.report, ctx.settings, &ctx.pull_request);
    decorator
        .platform
        .push_pipeline_status(
            ctx.merge_request.source_project_id,
            &ctx.report.commit_sha,
            &status,
        )
        .await
        .context("Could not update pipeline status in Gitlab")?;
    decorator.reporter.kv("Status", status.state.code());
    Ok(())
}
