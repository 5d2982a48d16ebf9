//! 적용 설정 진단(inspection) 뷰 모델.

use std::collections::BTreeMap;

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::resolve_host_token;
use crate::application::config::{DefaultsConfig, HostConfig};
use crate::domain::decoration::{DEFAULT_STATUS_DESCRIPTION, DEFAULT_STATUS_NAME};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub defaults: DefaultsConfig,
    pub effective_defaults: EffectiveDefaults,
    pub hosts: BTreeMap<String, HostInspection>,
}

/// CLI 플래그를 적용하기 전의 실효 기본값.
#[derive(Debug, Clone, Serialize)]
pub struct EffectiveDefaults {
    pub summary_note_first: bool,
    pub summary_note_edit: bool,
    pub project_url: Option<String>,
    pub pipeline_id: Option<u64>,
    pub status_name: String,
    pub status_description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct HostInspection {
    pub token_source: Option<String>,
    pub token_resolved: bool,
    pub api_base: Option<String>,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let hosts = loaded
            .config
            .hosts
            .iter()
            .map(|(host, cfg)| (host.clone(), host_inspection(cfg)))
            .collect();
        let defaults = loaded.config.defaults;

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            effective_defaults: EffectiveDefaults {
                summary_note_first: defaults.summary_note_first.unwrap_or(false),
                summary_note_edit: defaults.summary_note_edit.unwrap_or(false),
                project_url: defaults.project_url.clone(),
                pipeline_id: defaults.pipeline_id,
                status_name: defaults
                    .status_name
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STATUS_NAME.to_string()),
                status_description: defaults
                    .status_description
                    .clone()
                    .unwrap_or_else(|| DEFAULT_STATUS_DESCRIPTION.to_string()),
            },
            defaults,
            hosts,
        }
    }
}

fn host_inspection(cfg: &HostConfig) -> HostInspection {
    let token_resolution = resolve_host_token(Some(cfg)).ok();
    HostInspection {
        token_source: token_resolution.as_ref().and_then(|r| r.source.clone()),
        token_resolved: token_resolution
            .as_ref()
            .and_then(|r| r.token.as_ref())
            .is_some(),
        api_base: cfg.api_base.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    use crate::application::config::Config;

    #[test]
    fn never_exposes_token_value() {
        let mut config = Config::default();
        config.hosts.insert(
            "gitlab.local".to_string(),
            HostConfig {
                token: Some("glpat-secret".to_string()),
                ..HostConfig::default()
            },
        );
        let inspection = ConfigInspection::from_loaded(LoadedConfig {
            config,
            searched_paths: vec![PathBuf::from("/etc/mr-decorator/config.json")],
            loaded_paths: vec![],
        });

        let host = &inspection.hosts["gitlab.local"];
        assert!(host.token_resolved);
        assert_eq!(host.token_source.as_deref(), Some("inline"));
        assert_eq!(inspection.effective_defaults.status_name, "SonarQube");

        let json = serde_json::to_string(&inspection.hosts).unwrap();
        assert!(!json.contains("glpat-secret"));
    }
}
