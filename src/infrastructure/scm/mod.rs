//! 로컬 git 저장소에서 라인을 도입한 커밋을 찾는 SCM 연동.

use std::path::PathBuf;
use std::process::Stdio;

use anyhow::{Context, Result, bail};
use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::ScmBlame;

/// `git blame --porcelain`으로 한 줄씩 조회한다.
pub struct GitBlame {
    repo_dir: PathBuf,
}

impl GitBlame {
    pub fn new(repo_dir: PathBuf) -> Self {
        Self { repo_dir }
    }
}

#[async_trait]
impl ScmBlame for GitBlame {
    async fn changeset_for_line(&self, path: &str, line: u32) -> Result<Option<String>> {
        let range = format!("{line},{line}");
        let output = Command::new("git")
            .arg("-C")
            .arg(&self.repo_dir)
            .args(["blame", "--porcelain", "-L", range.as_str(), "--", path])
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .context("failed to spawn git blame")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if is_unmapped_line(&stderr) {
                tracing::debug!(path, line, stderr = %stderr.trim(), "git blame: line has no changeset");
                return Ok(None);
            }
            bail!("git blame failed ({}): {}", output.status, stderr.trim());
        }

        Ok(parse_porcelain_revision(&String::from_utf8_lossy(
            &output.stdout,
        )))
    }
}

/// 저장소는 정상이지만 해당 라인을 커밋으로 옮길 수 없는 경우(범위 밖 라인, 추적되지 않는 파일).
fn is_unmapped_line(stderr: &str) -> bool {
    stderr.lines().any(|l| {
        let l = l.trim();
        (l.contains(" has only ") && l.ends_with(" lines"))
            || l.ends_with(" has only 1 line")
            || l.contains("no such path")
    })
}

/// porcelain 출력 첫 줄의 커밋 해시. 아직 커밋되지 않은 라인(0으로 채운 해시)은 `None`.
fn parse_porcelain_revision(stdout: &str) -> Option<String> {
    let sha = stdout.lines().next()?.split_whitespace().next()?;
    if sha.len() < 40 || !sha.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    if sha.chars().all(|c| c == '0') {
        return None;
    }
    Some(sha.to_string())
}
