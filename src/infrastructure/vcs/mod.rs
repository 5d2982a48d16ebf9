//! 리뷰 플랫폼 연동 계층.
//! 대상 호스트/설정으로 GitLab 클라이언트를 구성한다.

pub mod gitlab;

use crate::application::config::HostConfig;
use crate::application::ports::MergeRequestPlatform;
use crate::domain::target::MergeRequestTarget;

pub fn build_platform_client(
    target: &MergeRequestTarget,
    host_cfg: Option<&HostConfig>,
    token: Option<String>,
) -> Box<dyn MergeRequestPlatform> {
    let api_base = host_cfg.and_then(|h| h.api_base.clone());
    Box::new(gitlab::GitLabClient::new(target.host.clone(), token, api_base))
}
