//! 애플리케이션 포트를 실제 인프라 구현체로 연결하는 어댑터 계층.

mod analysis_source;
mod config_repository;
mod host_token_resolver;
mod report_formatter;
mod reporter;
mod scm_factory;
mod target_resolver;
mod vcs_factory;

pub use analysis_source::JsonAnalysisSource;
pub use config_repository::JsonConfigRepository;
pub use host_token_resolver::HostTokenResolverAdapter;
pub use report_formatter::MarkdownReportFormatter;
pub use reporter::ConsoleReporter;
pub use scm_factory::GitScmFactory;
pub use target_resolver::UrlTargetResolver;
pub use vcs_factory::VcsFactoryAdapter;
