//! 애플리케이션 조립(composition root) 모듈.

use crate::application::usecases::decorate_mr::DecorateMergeRequestUseCase;
use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::infrastructure::adapters::{
    ConsoleReporter, GitScmFactory, HostTokenResolverAdapter, JsonAnalysisSource,
    JsonConfigRepository, MarkdownReportFormatter, UrlTargetResolver, VcsFactoryAdapter,
};

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    target_resolver: UrlTargetResolver,
    host_token_resolver: HostTokenResolverAdapter,
    analysis_source: JsonAnalysisSource,
    vcs_factory: VcsFactoryAdapter,
    scm_factory: GitScmFactory,
    formatter: MarkdownReportFormatter,
    reporter: ConsoleReporter,
}

impl Default for AppComposition {
    fn default() -> Self {
        Self {
            config_repo: JsonConfigRepository,
            target_resolver: UrlTargetResolver,
            host_token_resolver: HostTokenResolverAdapter,
            analysis_source: JsonAnalysisSource,
            vcs_factory: VcsFactoryAdapter,
            scm_factory: GitScmFactory,
            formatter: MarkdownReportFormatter,
            reporter: ConsoleReporter,
        }
    }
}

impl AppComposition {
    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
        }
    }

    /// MR 데코레이션 유스케이스를 생성한다.
    pub fn decorate_usecase(&self) -> DecorateMergeRequestUseCase<'_> {
        DecorateMergeRequestUseCase {
            config_repo: &self.config_repo,
            target_resolver: &self.target_resolver,
            host_token_resolver: &self.host_token_resolver,
            analysis_source: &self.analysis_source,
            vcs_factory: &self.vcs_factory,
            scm_factory: &self.scm_factory,
            formatter: &self.formatter,
            reporter: &self.reporter,
        }
    }
}
