//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수/프로세스 접근은 `infrastructure`에서만 수행한다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::domain::decoration::{
    DEFAULT_STATUS_DESCRIPTION, DEFAULT_STATUS_NAME, DecorationSettings, RunOptions,
};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 전역 기본값
    #[serde(default)]
    pub defaults: DefaultsConfig,
    /// GitLab 호스트별 인증/엔드포인트 설정
    #[serde(default)]
    pub hosts: HashMap<String, HostConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct DefaultsConfig {
    /// 요약 토론을 이슈 토론보다 먼저 생성
    pub summary_note_first: Option<bool>,
    /// 기존 요약 노트를 교체 대신 수정
    pub summary_note_edit: Option<bool>,
    /// 결과 URL 생성에 쓸 프로젝트 주소(`<project_url>/merge_requests/<iid>`)
    pub project_url: Option<String>,
    /// 빌드 상태에 그대로 실어 보낼 파이프라인 ID
    pub pipeline_id: Option<u64>,
    /// 빌드 상태 이름(기본 `SonarQube`)
    pub status_name: Option<String>,
    /// 빌드 상태 설명(기본 `SonarQube Status`)
    pub status_description: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct HostConfig {
    /// 고정 토큰(민감정보: 권장하지 않음)
    pub token: Option<String>,
    /// 토큰을 읽을 환경변수 이름
    pub token_env: Option<String>,
    /// 토큰을 stdout으로 출력하는 커맨드(예: ["glab","auth","token"])
    pub token_command: Option<Vec<String>>,
    /// API base URL override(선택)
    pub api_base: Option<String>,
}

impl Config {
    pub fn host_config(&self, host: &str) -> Option<&HostConfig> {
        self.hosts.get(host)
    }

    /// CLI 플래그가 켜져 있으면 설정값보다 우선한다.
    pub fn decoration_settings(&self, options: &RunOptions) -> DecorationSettings {
        let defaults = &self.defaults;
        DecorationSettings {
            summary_note_first: options
                .summary_note_first
                .or(defaults.summary_note_first)
                .unwrap_or(false),
            summary_note_edit: options
                .summary_note_edit
                .or(defaults.summary_note_edit)
                .unwrap_or(false),
            project_url: options
                .project_url
                .clone()
                .or_else(|| defaults.project_url.clone()),
            pipeline_id: options.pipeline_id.or(defaults.pipeline_id),
            status_name: defaults
                .status_name
                .clone()
                .unwrap_or_else(|| DEFAULT_STATUS_NAME.to_string()),
            status_description: defaults
                .status_description
                .clone()
                .unwrap_or_else(|| DEFAULT_STATUS_DESCRIPTION.to_string()),
        }
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub fn merge_from(&mut self, other: Config) {
        self.defaults.merge_from(other.defaults);

        for (host, incoming) in other.hosts {
            if let Some(existing) = self.hosts.get_mut(&host) {
                existing.merge_from(incoming);
            } else {
                self.hosts.insert(host, incoming);
            }
        }
    }
}

impl DefaultsConfig {
    pub fn merge_from(&mut self, other: DefaultsConfig) {
        if other.summary_note_first.is_some() {
            self.summary_note_first = other.summary_note_first;
        }
        if other.summary_note_edit.is_some() {
            self.summary_note_edit = other.summary_note_edit;
        }
        if other.project_url.is_some() {
            self.project_url = other.project_url;
        }
        if other.pipeline_id.is_some() {
            self.pipeline_id = other.pipeline_id;
        }
        if other.status_name.is_some() {
            self.status_name = other.status_name;
        }
        if other.status_description.is_some() {
            self.status_description = other.status_description;
        }
    }
}

impl HostConfig {
    pub fn merge_from(&mut self, other: HostConfig) {
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.token_env.is_some() {
            self.token_env = other.token_env;
        }
        if other.token_command.is_some() {
            self.token_command = other.token_command;
        }
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
    }
}
