//! 분석 결과(JSON 파일) 로딩 포트 구현 어댑터.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use crate::application::ports::AnalysisSource;
use crate::domain::decoration::AnalysisReport;

pub struct JsonAnalysisSource;

impl AnalysisSource for JsonAnalysisSource {
    fn load(&self, path: &Path) -> Result<AnalysisReport> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read analysis report at {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse analysis report JSON in {}", path.display()))
    }
}
