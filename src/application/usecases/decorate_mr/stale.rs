//! 더 이상 보고되지 않는 이슈의 토론을 정리하는 단계.
//!
//! - 봇 노트 하나뿐인 토론: 해결 처리
//! - 다른 노트가 섞인 토론: 안내 노트만 추가하고 해결하지 않는다
//! - 이슈 키를 복원할 수 없는 토론과 요약 토론은 대상이 아니다

use std::collections::HashSet;

use anyhow::{Context, Result};

use crate::application::usecases::decorate_mr::{
    MergeRequestDecorator, context::DecorationContext,
};
use crate::domain::classify::DiscussionClass;
use crate::domain::policy::ISSUE_GONE_NOTE;

pub(super) async fn close_stale_discussions(
    decorator: &MergeRequestDecorator<'_>,
    ctx: &DecorationContext<'_>,
) -> Result<()> {
    decorator.reporter.section("Stale Discussions");

    let reported: HashSet<&str> = ctx
        .report
        .reportable_issues()
        .map(|i| i.key.as_str())
        .collect();

    for discussion in &ctx.discussions {
        match &discussion.class {
            DiscussionClass::SingletonIdentifiable { issue_key }
                if !reported.contains(issue_key.as_str()) =>
            {
                decorator
                    .platform
                    .resolve_discussion(ctx.project_id(), ctx.iid(), &discussion.id)
                    .await
                    .context("Could not resolve Merge Request discussion")?;
                decorator
                    .reporter
                    .status("Resolved", &format!("{issue_key} ({})", discussion.id));
            }
            DiscussionClass::Mixed {
                issue_key: Some(issue_key),
            } if !reported.contains(issue_key.as_str()) => {
                decorator
                    .platform
                    .add_note(ctx.project_id(), ctx.iid(), &discussion.id, ISSUE_GONE_NOTE)
                    .await
                    .context("Could not add note to Merge Request discussion")?;
                decorator
                    .reporter
                    .status("Kept open", &format!("{issue_key} ({})", discussion.id));
            }
            _ => {}
        }
    }

    Ok(())
}
