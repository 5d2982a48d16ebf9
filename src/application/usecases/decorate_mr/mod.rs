//! 분석 결과를 MR 토론으로 반영하는 데코레이션 유스케이스.
//!
//! 원격 토론 스냅샷을 한 번 가져와 분류한 뒤, 필요한 생성/수정/해결/삭제/노트 추가만 즉시 호출한다.
//! 어느 호출이든 실패하면 실행 전체가 중단되며, 이미 반영된 변경은 되돌리지 않는다.

mod context;
mod issues;
mod stale;
mod summary;

use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::application::ports::{
    AnalysisSource, ConfigRepository, HostTokenResolver, MergeRequestPlatform, ReportFormatter,
    Reporter, ScmBlame, ScmFactory, TargetResolver, VcsFactory,
};
use crate::domain::decoration::{
    AnalysisReport, DecorationResult, DecorationSettings, RunOptions,
};
use crate::domain::policy::pull_request_url;

use context::load_snapshot;
use issues::create_missing_discussions;
use stale::close_stale_discussions;
use summary::{push_pipeline_status, reconcile_summary};

/// 한 번의 데코레이션 입력.
pub struct DecorationRequest<'r> {
    pub project_path: &'r str,
    /// 원문 MR 식별자. 숫자가 아니면 입력 오류로 중단한다.
    pub merge_request_id: &'r str,
    pub report: &'r AnalysisReport,
    pub settings: &'r DecorationSettings,
}

/// 토론 조정 엔진. 협력자는 모두 포트로 주입된다.
pub struct MergeRequestDecorator<'a> {
    pub platform: &'a dyn MergeRequestPlatform,
    pub scm: &'a dyn ScmBlame,
    pub formatter: &'a dyn ReportFormatter,
    pub reporter: &'a dyn Reporter,
}

impl<'a> MergeRequestDecorator<'a> {
    /// 실행 순서:
    /// 요약(summary-first일 때) -> 이슈 토론 생성 -> 오래된 토론 정리 -> 요약 -> 빌드 상태
    pub async fn decorate(&self, request: &DecorationRequest<'_>) -> Result<DecorationResult> {
        let ctx = load_snapshot(self, request).await?;

        if ctx.settings.summary_note_first {
            reconcile_summary(self, &ctx).await?;
        }
        create_missing_discussions(self, &ctx).await?;
        close_stale_discussions(self, &ctx).await?;
        if !ctx.settings.summary_note_first {
            reconcile_summary(self, &ctx).await?;
        }
        push_pipeline_status(self, &ctx).await?;

        Ok(DecorationResult {
            pull_request_url: pull_request_url(
                ctx.settings.project_url.as_deref(),
                ctx.merge_request.iid,
                &ctx.merge_request.web_url,
            ),
        })
    }
}

/// 설정/대상/토큰/분석 결과를 준비하고 엔진을 실행한다.
pub struct DecorateMergeRequestUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub target_resolver: &'a dyn TargetResolver,
    pub host_token_resolver: &'a dyn HostTokenResolver,
    pub analysis_source: &'a dyn AnalysisSource,
    pub vcs_factory: &'a dyn VcsFactory,
    pub scm_factory: &'a dyn ScmFactory,
    pub formatter: &'a dyn ReportFormatter,
    pub reporter: &'a dyn Reporter,
}

impl<'a> DecorateMergeRequestUseCase<'a> {
    pub async fn execute(&self, options: RunOptions) -> Result<DecorationResult> {
        self.reporter.section("Session");
        self.reporter.kv("Target", &options.url);
        self.reporter.kv("Report", &options.report_path);

        let config = self
            .config_repo
            .load()
            .context("failed to load mr-decorator config")?;
        let settings = config.decoration_settings(&options);

        let target = self
            .target_resolver
            .parse(&options.url)
            .context("failed to parse target URL")?;

        let host_cfg = config.host_config(&target.host);
        let token = self
            .host_token_resolver
            .resolve(&target.host, host_cfg)
            .with_context(|| format!("failed to resolve token for host '{}'", target.host))?;
        let Some(token_value) = token.token else {
            bail!(
                "missing GitLab token for host '{}'. Configure hosts.{}.token, token_env or token_command in config",
                target.host,
                target.host,
            );
        };
        if let Some(source) = token.source.as_deref() {
            self.reporter.kv("Token", source);
        }

        let report = self
            .analysis_source
            .load(Path::new(&options.report_path))
            .with_context(|| format!("failed to load analysis report {}", options.report_path))?;
        self.reporter.kv("Project", &report.project_key);
        self.reporter.kv("Issues", &report.issues.len().to_string());

        let platform = self.vcs_factory.build(&target, host_cfg, Some(token_value));
        let scm = self.scm_factory.build(Path::new(&options.repo_dir));

        let decorator = MergeRequestDecorator {
            platform: platform.as_ref(),
            scm: scm.as_ref(),
            formatter: self.formatter,
            reporter: self.reporter,
        };
        let result = decorator
            .decorate(&DecorationRequest {
                project_path: &target.project_path,
                merge_request_id: &target.merge_request_id,
                report: &report,
                settings: &settings,
            })
            .await?;

        self.reporter.section("Done");
        self.reporter.kv("MR", &result.pull_request_url);
        Ok(result)
    }
}
