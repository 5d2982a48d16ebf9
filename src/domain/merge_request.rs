//! 리뷰 플랫폼(GitLab) 측 원격 상태를 표현하는 엔티티/값 객체.
//!
//! 실행 시작 시 한 번 가져온 스냅샷이며, 엔진은 이후 변경 요청만 보낸다.

/// diff 경계를 정의하는 세 커밋 해시.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiffRefs {
    pub base_sha: String,
    pub start_sha: String,
    pub head_sha: String,
}

/// 머지 리퀘스트 메타데이터 스냅샷.
#[derive(Debug, Clone)]
pub struct MergeRequestRef {
    pub iid: u64,
    pub source_project_id: u64,
    pub target_project_id: u64,
    pub diff_refs: DiffRefs,
    pub web_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
}

#[derive(Debug, Clone)]
pub struct RemoteNote {
    pub id: u64,
    pub author: User,
    pub body: String,
    pub resolvable: bool,
    pub resolved: bool,
    pub system: bool,
}

impl RemoteNote {
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.author.username == user.username
    }
}

/// 노트 순서는 생성 순서이며, 첫 노트가 스레드의 소유자를 결정한다.
#[derive(Debug, Clone)]
pub struct RemoteDiscussion {
    pub id: String,
    pub notes: Vec<RemoteNote>,
}

impl RemoteDiscussion {
    /// 시스템이 생성한 노트를 제외한 사람/봇 작성 노트.
    pub fn authored_notes(&self) -> impl Iterator<Item = &RemoteNote> {
        self.notes.iter().filter(|n| !n.system)
    }
}

/// 엔진이 게시하는 노트. 변형에 따라 호출할 API 엔드포인트가 달라진다.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundNote {
    /// MR 전체에 붙는 일반 노트.
    General { body: String },
    /// 특정 파일/라인에 고정되는 노트.
    Line {
        body: String,
        diff_refs: DiffRefs,
        old_path: String,
        new_path: String,
        new_line: u32,
    },
}

impl OutboundNote {
    pub fn general(body: impl Into<String>) -> Self {
        Self::General { body: body.into() }
    }

    pub fn line(body: impl Into<String>, diff_refs: DiffRefs, path: &str, line: u32) -> Self {
        Self::Line {
            body: body.into(),
            diff_refs,
            old_path: path.to_string(),
            new_path: path.to_string(),
            new_line: line,
        }
    }

    pub fn is_line_note(&self) -> bool {
        matches!(self, Self::Line { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Success,
    Failed,
}

impl PipelineState {
    /// GitLab commit status API 값.
    pub fn code(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failed => "failed",
        }
    }
}

/// 외부 빌드 상태 협력자에게 전달하는 1회성 상태 값.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineStatus {
    pub name: String,
    pub description: String,
    pub state: PipelineState,
    pub target_url: String,
    pub coverage: Option<f64>,
    pub pipeline_id: Option<u64>,
}
