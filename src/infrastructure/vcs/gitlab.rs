//! GitLab REST API(v4) 연동 구현.

use anyhow::{Context, Result};
use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::application::ports::MergeRequestPlatform;
use crate::domain::merge_request::{
    DiffRefs, MergeRequestRef, OutboundNote, PipelineStatus, RemoteDiscussion, RemoteNote, User,
};

const PER_PAGE: u32 = 100;

pub struct GitLabClient {
    client: Client,
    host: String,
    token: Option<String>,
    api_base: Option<String>,
}

impl GitLabClient {
    pub fn new(host: String, token: Option<String>, api_base: Option<String>) -> Self {
        Self {
            client: Client::new(),
            host,
            token,
            api_base,
        }
    }

    fn api_base(&self) -> String {
        // override가 없으면 호스트의 기본 API 경로를 사용한다.
        if let Some(base) = &self.api_base {
            return base.trim_end_matches('/').to_string();
        }
        format!("https://{}/api/v4", self.host)
    }

    fn merge_request_endpoint(&self, project_id: u64, iid: u64) -> String {
        format!(
            "{}/projects/{}/merge_requests/{}",
            self.api_base(),
            project_id,
            iid
        )
    }

    fn discussions_endpoint(&self, project_id: u64, iid: u64) -> String {
        format!("{}/discussions", self.merge_request_endpoint(project_id, iid))
    }

    fn discussion_endpoint(&self, project_id: u64, iid: u64, discussion_id: &str) -> String {
        format!(
            "{}/{}",
            self.discussions_endpoint(project_id, iid),
            utf8_percent_encode(discussion_id, NON_ALPHANUMERIC)
        )
    }

    fn request(&self, method: Method, url: String) -> RequestBuilder {
        // GitLab 토큰 헤더(`PRIVATE-TOKEN`)를 공통 적용한다.
        let req = self.client.request(method, url);
        if let Some(token) = &self.token {
            req.header("PRIVATE-TOKEN", token)
        } else {
            req
        }
    }

    /// 응답 본문을 읽고, 실패 상태 코드면 본문을 포함해 에러로 만든다.
    async fn read_body(resp: Response, action: &str) -> Result<String> {
        let status = resp.status();
        let body = resp
            .text()
            .await
            .with_context(|| format!("gitlab: failed to read {action} body"))?;

        if !status.is_success() {
            anyhow::bail!("gitlab: failed to {action} ({status}): {body}");
        }
        Ok(body)
    }

    async fn send(&self, req: RequestBuilder, action: &str) -> Result<String> {
        let resp = req
            .send()
            .await
            .with_context(|| format!("gitlab: failed to {action}"))?;
        Self::read_body(resp, action).await
    }

    async fn send_json<T: DeserializeOwned>(&self, req: RequestBuilder, action: &str) -> Result<T> {
        let body = self.send(req, action).await?;
        serde_json::from_str(&body).with_context(|| format!("gitlab: invalid {action} JSON"))
    }

    /// `x-next-page` 헤더가 빌 때까지 목록 API를 순회한다.
    async fn get_all_pages<T: DeserializeOwned>(&self, url: &str, action: &str) -> Result<Vec<T>> {
        let mut out = Vec::new();
        let mut page = 1u32;
        loop {
            let resp = self
                .request(Method::GET, url.to_string())
                .query(&[("per_page", PER_PAGE), ("page", page)])
                .send()
                .await
                .with_context(|| format!("gitlab: failed to {action}"))?;

            let next = resp
                .headers()
                .get("x-next-page")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u32>().ok());

            let body = Self::read_body(resp, action).await?;
            let items: Vec<T> = serde_json::from_str(&body)
                .with_context(|| format!("gitlab: invalid {action} JSON"))?;
            out.extend(items);

            match next {
                Some(n) if n > page => page = n,
                _ => break,
            }
        }
        Ok(out)
    }
}

#[derive(Debug, Deserialize)]
struct MergeRequestResponse {
    iid: u64,
    source_project_id: u64,
    target_project_id: u64,
    web_url: String,
    diff_refs: DiffRefsResponse,
}

#[derive(Debug, Deserialize)]
struct DiffRefsResponse {
    base_sha: String,
    start_sha: String,
    head_sha: String,
}

#[derive(Debug, Deserialize)]
struct UserResponse {
    username: String,
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DiscussionResponse {
    id: String,
    #[serde(default)]
    notes: Vec<NoteResponse>,
}

#[derive(Debug, Deserialize)]
struct NoteResponse {
    id: u64,
    author: UserResponse,
    #[serde(default)]
    body: String,
    #[serde(default)]
    resolvable: bool,
    #[serde(default)]
    resolved: bool,
    #[serde(default)]
    system: bool,
}

impl From<DiscussionResponse> for RemoteDiscussion {
    fn from(d: DiscussionResponse) -> Self {
        RemoteDiscussion {
            id: d.id,
            notes: d
                .notes
                .into_iter()
                .map(|n| RemoteNote {
                    id: n.id,
                    author: User {
                        username: n.author.username,
                    },
                    body: n.body,
                    resolvable: n.resolvable,
                    resolved: n.resolved,
                    system: n.system,
                })
                .collect(),
        }
    }
}

/// 새 토론 요청 본문. 라인 노트는 `position`(text 타입)으로 diff 위치에 고정한다.
fn discussion_payload(note: &OutboundNote) -> Value {
    match note {
        OutboundNote::General { body } => json!({ "body": body }),
        OutboundNote::Line {
            body,
            diff_refs,
            old_path,
            new_path,
            new_line,
        } => json!({
            "body": body,
            "position": {
                "position_type": "text",
                "base_sha": diff_refs.base_sha,
                "start_sha": diff_refs.start_sha,
                "head_sha": diff_refs.head_sha,
                "old_path": old_path,
                "new_path": new_path,
                "new_line": new_line,
            }
        }),
    }
}

fn status_payload(status: &PipelineStatus) -> Value {
    let mut payload = json!({
        "state": status.state.code(),
        "name": status.name,
        "description": status.description,
        "target_url": status.target_url,
    });
    if let Some(coverage) = status.coverage {
        payload["coverage"] = json!(coverage);
    }
    if let Some(pipeline_id) = status.pipeline_id {
        payload["pipeline_id"] = json!(pipeline_id);
    }
    payload
}

#[async_trait]
impl MergeRequestPlatform for GitLabClient {
    async fn fetch_merge_request(&self, project_path: &str, iid: u64) -> Result<MergeRequestRef> {
        // /projects/{path} API 규격에 맞춰 경로를 URL 인코딩한다.
        let url = format!(
            "{}/projects/{}/merge_requests/{}",
            self.api_base(),
            utf8_percent_encode(project_path, NON_ALPHANUMERIC),
            iid
        );
        let mr: MergeRequestResponse = self
            .send_json(self.request(Method::GET, url), "fetch MR")
            .await?;

        Ok(MergeRequestRef {
            iid: mr.iid,
            source_project_id: mr.source_project_id,
            target_project_id: mr.target_project_id,
            diff_refs: DiffRefs {
                base_sha: mr.diff_refs.base_sha,
                start_sha: mr.diff_refs.start_sha,
                head_sha: mr.diff_refs.head_sha,
            },
            web_url: mr.web_url,
        })
    }

    async fn fetch_current_user(&self) -> Result<User> {
        let url = format!("{}/user", self.api_base());
        let user: UserResponse = self
            .send_json(self.request(Method::GET, url), "fetch current user")
            .await?;
        Ok(User {
            username: user.username,
        })
    }

    async fn fetch_commits(&self, project_id: u64, iid: u64) -> Result<Vec<String>> {
        let url = format!("{}/commits", self.merge_request_endpoint(project_id, iid));
        let commits: Vec<CommitResponse> = self.get_all_pages(&url, "list MR commits").await?;
        Ok(commits.into_iter().map(|c| c.id).collect())
    }

    async fn fetch_discussions(&self, project_id: u64, iid: u64) -> Result<Vec<RemoteDiscussion>> {
        let url = self.discussions_endpoint(project_id, iid);
        let discussions: Vec<DiscussionResponse> =
            self.get_all_pages(&url, "list discussions").await?;
        Ok(discussions.into_iter().map(RemoteDiscussion::from).collect())
    }

    async fn create_discussion(
        &self,
        project_id: u64,
        iid: u64,
        note: &OutboundNote,
    ) -> Result<RemoteDiscussion> {
        let req = self
            .request(Method::POST, self.discussions_endpoint(project_id, iid))
            .json(&discussion_payload(note));
        let created: DiscussionResponse = self.send_json(req, "create discussion").await?;
        tracing::info!(discussion = %created.id, line = note.is_line_note(), "gitlab: discussion created");
        Ok(created.into())
    }

    async fn add_note(
        &self,
        project_id: u64,
        iid: u64,
        discussion_id: &str,
        body: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/notes",
            self.discussion_endpoint(project_id, iid, discussion_id)
        );
        let req = self
            .request(Method::POST, url)
            .json(&json!({ "body": body }));
        self.send(req, "add discussion note").await?;
        Ok(())
    }

    async fn edit_note(
        &self,
        project_id: u64,
        iid: u64,
        discussion_id: &str,
        note_id: u64,
        body: &str,
    ) -> Result<()> {
        let url = format!(
            "{}/notes/{}",
            self.discussion_endpoint(project_id, iid, discussion_id),
            note_id
        );
        let req = self.request(Method::PUT, url).json(&json!({ "body": body }));
        self.send(req, "edit discussion note").await?;
        Ok(())
    }

    async fn delete_note(
        &self,
        project_id: u64,
        iid: u64,
        discussion_id: &str,
        note_id: u64,
    ) -> Result<()> {
        let url = format!(
            "{}/notes/{}",
            self.discussion_endpoint(project_id, iid, discussion_id),
            note_id
        );
        self.send(self.request(Method::DELETE, url), "delete discussion note")
            .await?;
        Ok(())
    }

    async fn resolve_discussion(
        &self,
        project_id: u64,
        iid: u64,
        discussion_id: &str,
    ) -> Result<()> {
        let req = self
            .request(
                Method::PUT,
                self.discussion_endpoint(project_id, iid, discussion_id),
            )
            .query(&[("resolved", "true")]);
        self.send(req, "resolve discussion").await?;
        Ok(())
    }

    async fn push_pipeline_status(
        &self,
        project_id: u64,
        sha: &str,
        status: &PipelineStatus,
    ) -> Result<()> {
        let url = format!("{}/projects/{}/statuses/{}", self.api_base(), project_id, sha);
        let req = self
            .request(Method::POST, url)
            .json(&status_payload(status));
        self.send(req, "update commit status").await?;
        Ok(())
    }
}
