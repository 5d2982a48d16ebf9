//! 리뷰 플랫폼 클라이언트 팩토리 포트 구현 어댑터.

use crate::application::config::HostConfig;
use crate::application::ports::{MergeRequestPlatform, VcsFactory};
use crate::domain::target::MergeRequestTarget;
use crate::infrastructure::vcs;

pub struct VcsFactoryAdapter;

impl VcsFactory for VcsFactoryAdapter {
    fn build(
        &self,
        target: &MergeRequestTarget,
        host_cfg: Option<&HostConfig>,
        token: Option<String>,
    ) -> Box<dyn MergeRequestPlatform> {
        vcs::build_platform_client(target, host_cfg, token)
    }
}
