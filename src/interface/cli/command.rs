//! CLI 명령 파싱 모듈.

use clap::{Parser, Subcommand};

use crate::domain::decoration::RunOptions;

#[derive(Debug, Parser)]
#[command(name = "mr-decorator")]
#[command(about = "Reconcile static-analysis results into GitLab merge request discussions")]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// MR URL (https://<host>/<group>/<project>/-/merge_requests/<iid>)
    url: Option<String>,

    /// Analysis report JSON
    #[arg(long)]
    report: Option<String>,

    /// Local repository used for git blame
    #[arg(long, default_value = ".")]
    repo: String,

    /// Post the summary discussion before issue discussions
    #[arg(long, overrides_with = "no_summary_note_first")]
    summary_note_first: bool,

    /// Post the summary discussion after issue discussions, even if configured otherwise
    #[arg(long, overrides_with = "summary_note_first")]
    no_summary_note_first: bool,

    /// Edit the existing summary note instead of replacing it
    #[arg(long, overrides_with = "no_summary_note_edit")]
    summary_note_edit: bool,

    /// Replace the existing summary note, even if configured otherwise
    #[arg(long, overrides_with = "summary_note_edit")]
    no_summary_note_edit: bool,

    /// Pipeline id attached to the commit status
    #[arg(long)]
    pipeline_id: Option<u64>,

    /// Project URL used to build the returned merge request URL
    #[arg(long)]
    project_url: Option<String>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show effective merged config and host token resolution
    Config,
}

#[derive(Debug)]
pub enum CliAction {
    InspectConfig,
    Decorate(RunOptions),
}

impl Cli {
    pub fn parse_action() -> Result<CliAction, String> {
        Cli::parse().into_action()
    }

    fn into_action(self) -> Result<CliAction, String> {
        if let Some(Commands::Config) = self.command {
            return Ok(CliAction::InspectConfig);
        }

        let Some(url) = self.url else {
            return Err("missing merge request URL".to_string());
        };
        let Some(report_path) = self.report else {
            return Err("missing --report <analysis.json>".to_string());
        };

        Ok(CliAction::Decorate(RunOptions {
            url,
            report_path,
            repo_dir: self.repo,
            summary_note_first: flag(self.summary_note_first, self.no_summary_note_first),
            summary_note_edit: flag(self.summary_note_edit, self.no_summary_note_edit),
            pipeline_id: self.pipeline_id,
            project_url: self.project_url,
        }))
    }
}

/// `--x`/`--no-x` 쌍. 둘 다 없으면 설정 파일 값을 따른다.
fn flag(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(args: &[&str]) -> Result<CliAction, String> {
        Cli::try_parse_from(args).map_err(|e| e.to_string())?.into_action()
    }

    #[test]
    fn decorate_flags_are_collected() {
        let parsed = action(&[
            "mr-decorator",
            "https://gitlab.local/g/p/-/merge_requests/3",
            "--report",
            "out/analysis.json",
            "--summary-note-edit",
            "--pipeline-id",
            "42",
        ])
        .unwrap();

        let CliAction::Decorate(options) = parsed else {
            panic!("expected decorate action");
        };
        assert_eq!(options.report_path, "out/analysis.json");
        assert_eq!(options.repo_dir, ".");
        assert_eq!(options.summary_note_edit, Some(true));
        assert_eq!(options.summary_note_first, None);
        assert_eq!(options.pipeline_id, Some(42));
    }

    #[test]
    fn negated_flags_override_config_and_last_one_wins() {
        let parsed = action(&[
            "mr-decorator",
            "https://gitlab.local/g/p/-/merge_requests/3",
            "--report",
            "a.json",
            "--no-summary-note-first",
            "--summary-note-edit",
            "--no-summary-note-edit",
        ])
        .unwrap();

        let CliAction::Decorate(options) = parsed else {
            panic!("expected decorate action");
        };
        assert_eq!(options.summary_note_first, Some(false));
        assert_eq!(options.summary_note_edit, Some(false));
    }

    #[test]
    fn config_subcommand() {
        assert!(matches!(
            action(&["mr-decorator", "config"]),
            Ok(CliAction::InspectConfig)
        ));
    }

    #[test]
    fn missing_inputs_are_errors() {
        assert!(action(&["mr-decorator"]).is_err());
        assert!(action(&["mr-decorator", "https://gitlab.local/g/p/-/merge_requests/3"]).is_err());
    }
}
