//! 원격 토론 하나를 실행당 한 번 분류한다.
//!
//! 이후 단계(이슈 생성, 오래된 토론 정리, 요약 갱신)는 노트를 다시 보지 않고
//! 여기서 계산한 [`DiscussionClass`]만 검사한다.

use crate::domain::identity::{MatchTarget, NoteLink, parse_link};
use crate::domain::merge_request::{RemoteDiscussion, User};
use crate::domain::policy::{ISSUE_GONE_NOTE, OUTDATED_SUMMARY_NOTE};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiscussionClass {
    /// 다른 사용자가 시작했거나 다른 분석 프로젝트의 토론.
    Unrelated,
    /// 이미 해결되었거나 안내 노트가 달린 토론. 더 이상 건드리지 않는다.
    Resolved,
    /// 봇 노트 하나뿐이며 이슈 키를 복원할 수 있다.
    SingletonIdentifiable { issue_key: String },
    /// 봇 노트 하나뿐이지만 이슈 키를 복원할 수 없다.
    SingletonUnidentifiable,
    /// 봇이 시작했지만 다른 노트가 섞여 있어 자동으로 닫을 수 없다.
    Mixed { issue_key: Option<String> },
    Summary {
        note_id: u64,
        has_foreign_replies: bool,
        outdated_note_posted: bool,
    },
}

impl DiscussionClass {
    /// 이 토론이 대표하는 이슈 키(이미 게시된 것으로 간주).
    pub fn represented_issue(&self) -> Option<&str> {
        match self {
            Self::SingletonIdentifiable { issue_key } => Some(issue_key),
            Self::Mixed { issue_key } => issue_key.as_deref(),
            _ => None,
        }
    }
}

pub struct ClassifyContext<'a> {
    pub machine: &'a User,
    pub project_key: &'a str,
    /// 마커 도입 전 요약 노트와 비교할 현재 요약 본문.
    pub summary_body: Option<&'a str>,
}

pub fn classify(discussion: &RemoteDiscussion, ctx: &ClassifyContext<'_>) -> DiscussionClass {
    let notes: Vec<_> = discussion.authored_notes().collect();
    let Some(first) = notes.first() else {
        return DiscussionClass::Unrelated;
    };
    if !first.is_authored_by(ctx.machine) {
        return DiscussionClass::Unrelated;
    }

    let link = parse_link(&first.body);
    if let Some(key) = link.as_ref().and_then(NoteLink::project_key)
        && key != ctx.project_key
    {
        return DiscussionClass::Unrelated;
    }

    let legacy_summary = notes.len() == 1 && ctx.summary_body == Some(first.body.as_str());
    let summary_link = link.as_ref().is_some_and(|l| l.matches(MatchTarget::Summary));
    if summary_link || legacy_summary {
        return DiscussionClass::Summary {
            note_id: first.id,
            has_foreign_replies: notes.iter().any(|n| !n.is_authored_by(ctx.machine)),
            outdated_note_posted: notes
                .iter()
                .any(|n| n.is_authored_by(ctx.machine) && n.body == OUTDATED_SUMMARY_NOTE),
        };
    }

    let already_closed = notes.iter().any(|n| n.resolved)
        || notes
            .iter()
            .any(|n| n.is_authored_by(ctx.machine) && n.body == ISSUE_GONE_NOTE);
    if already_closed {
        return DiscussionClass::Resolved;
    }

    let issue_key = link
        .as_ref()
        .and_then(NoteLink::issue_key)
        .map(ToString::to_string);

    if notes.len() == 1 && first.resolvable {
        return match issue_key {
            Some(issue_key) => DiscussionClass::SingletonIdentifiable { issue_key },
            None => DiscussionClass::SingletonUnidentifiable,
        };
    }

    DiscussionClass::Mixed { issue_key }
}
