//! 노트 본문에 심어 둔 링크로부터 "어떤 이슈/요약의 노트인지"를 복원하는 규칙.
//!
//! 엔진은 로컬 상태를 저장하지 않으므로, 이 텍스트 추출 규칙이 실행 간 매칭의 유일한 근거다.
//! - 이슈 노트: `[View in SonarQube](<url>)` 링크의 `issues` 쿼리 파라미터가 이슈 키
//! - 요약 노트: 같은 링크가 `issues` 없이 `pullRequest` 파라미터를 가진 대시보드 주소
//! - 링크가 없거나 URL로 해석되지 않으면 식별 불가

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\[View in SonarQube\]\(([^)\s]*)\)").expect("valid link regex")
});

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueIdentifier {
    /// 링크의 `id` 파라미터. 오래된 노트에는 없을 수 있다.
    pub project_key: Option<String>,
    pub issue_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteLink {
    Issue(IssueIdentifier),
    Summary { project_key: Option<String> },
}

impl NoteLink {
    pub fn project_key(&self) -> Option<&str> {
        match self {
            NoteLink::Issue(id) => id.project_key.as_deref(),
            NoteLink::Summary { project_key } => project_key.as_deref(),
        }
    }

    /// 이슈 노트의 키. 요약 노트는 `None`.
    pub fn issue_key(&self) -> Option<&str> {
        match self {
            NoteLink::Issue(id) => Some(&id.issue_key),
            NoteLink::Summary { .. } => None,
        }
    }

    /// 이 링크가 주어진 이슈 또는 요약을 가리키는지.
    pub fn matches(&self, target: MatchTarget<'_>) -> bool {
        match (self, target) {
            (NoteLink::Issue(id), MatchTarget::Issue(key)) => id.issue_key == key,
            (NoteLink::Summary { .. }, MatchTarget::Summary) => true,
            _ => false,
        }
    }
}

/// 매칭 대상.
#[derive(Debug, Clone, Copy)]
pub enum MatchTarget<'a> {
    Issue(&'a str),
    Summary,
}

/// 본문에서 첫 번째 분석 링크를 찾아 해석한다.
pub fn parse_link(body: &str) -> Option<NoteLink> {
    let caps = LINK_RE.captures(body)?;
    let url = Url::parse(caps.get(1)?.as_str()).ok()?;

    let mut issue_key = None;
    let mut project_key = None;
    let mut has_pull_request = false;
    for (name, value) in url.query_pairs() {
        match name.as_ref() {
            "issues" if issue_key.is_none() => issue_key = Some(value.into_owned()),
            "id" if project_key.is_none() => project_key = Some(value.into_owned()),
            "pullRequest" => has_pull_request = true,
            _ => {}
        }
    }

    match issue_key {
        Some(issue_key) if !issue_key.is_empty() => Some(NoteLink::Issue(IssueIdentifier {
            project_key,
            issue_key,
        })),
        Some(_) => None,
        None if has_pull_request => Some(NoteLink::Summary { project_key }),
        None => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ISSUE_BODY: &str = "Bug: null dereference\n[View in SonarQube](https://sonar.local/project/issues?id=proj&pullRequest=7&issues=AX-1&open=AX-1)";

    #[test]
    fn extracts_issue_key_and_project() {
        let link = parse_link(ISSUE_BODY).unwrap();
        assert_eq!(link.issue_key(), Some("AX-1"));
        assert_eq!(link.project_key(), Some("proj"));
        assert!(link.matches(MatchTarget::Issue("AX-1")));
        assert!(!link.matches(MatchTarget::Issue("AX-2")));
        assert!(!link.matches(MatchTarget::Summary));
    }

    #[test]
    fn dashboard_link_is_summary_marker() {
        let body = "Quality Gate passed\n[View in SonarQube](https://sonar.local/dashboard?id=proj&pullRequest=7)";
        assert!(parse_link(body).unwrap().matches(MatchTarget::Summary));
        assert_eq!(
            parse_link(body),
            Some(NoteLink::Summary { project_key: Some("proj".to_string()) })
        );
    }

    #[test]
    fn other_labels_are_unidentifiable() {
        let body = "[Don't View in SonarQube](https://sonar.local/project/issues?id=proj&issues=AX-1)";
        assert_eq!(parse_link(body), None);
    }

    #[test]
    fn unparsable_url_is_unidentifiable() {
        assert_eq!(parse_link("[View in SonarQube](url)"), None);
        assert_eq!(parse_link("Post with no issue ID"), None);
    }

    #[test]
    fn link_without_known_params_is_unidentifiable() {
        assert_eq!(parse_link("[View in SonarQube](https://sonar.local/about)"), None);
    }
}
